//! Pure scoring over the eight component condition scores.
//!
//! Both functions are total over the wizard-guaranteed domain and are used
//! unchanged for live preview and for the persisted record; there is no
//! separate final-calculation path.

use crate::core::types::{Component, ConditionBand};
use crate::draft::ComponentScores;

/// Arithmetic mean of the eight component scores, rounded half-up.
pub fn overall_score(scores: &ComponentScores) -> u8 {
    let sum: u32 = Component::ALL
        .iter()
        .map(|component| u32::from(scores.get(*component)))
        .sum();
    (f64::from(sum) / Component::ALL.len() as f64).round() as u8
}

/// Fraction of the asking price a motorcycle with this overall score is
/// worth. Stepped by condition band, not interpolated.
pub fn value_multiplier(overall: u8) -> f64 {
    ConditionBand::from_score(overall).multiplier()
}

/// Estimated fair value from the asking price.
///
/// An absent or exactly-zero asking price means "not provided" and yields
/// no estimate.
pub fn estimated_value(overall: u8, asking_price: Option<f64>) -> Option<f64> {
    let price = asking_price?;
    if price == 0.0 {
        return None;
    }
    Some(price * value_multiplier(overall))
}
