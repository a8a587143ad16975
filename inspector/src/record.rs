//! Persisted inspection record types, shared by core validation and the
//! store implementations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::scoring::{estimated_value, overall_score};
use crate::draft::{ComponentScores, DraftInspection};

/// A completed inspection ready for persistence: the draft fields plus the
/// two derived values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewInspection {
    pub user_id: String,
    pub motorcycle_name: String,
    pub motorcycle_year: Option<i32>,
    pub motorcycle_make: Option<String>,
    pub motorcycle_model: Option<String>,
    pub mileage: Option<u32>,
    pub asking_price: Option<f64>,
    pub inspection_location: Option<String>,
    pub scores: ComponentScores,
    pub overall_score: u8,
    pub estimated_value: Option<f64>,
    pub notes: Option<String>,
}

impl NewInspection {
    /// Build the record submitted to the store, deriving the overall score
    /// and estimated value with the same scoring functions used for live
    /// preview.
    pub fn from_draft(user_id: &str, draft: &DraftInspection) -> Self {
        let overall = overall_score(&draft.scores);
        Self {
            user_id: user_id.to_string(),
            motorcycle_name: draft.name.clone(),
            motorcycle_year: draft.year,
            motorcycle_make: opt_text(&draft.make),
            motorcycle_model: opt_text(&draft.model),
            mileage: draft.mileage,
            asking_price: draft.asking_price,
            inspection_location: opt_text(&draft.location),
            scores: draft.scores,
            overall_score: overall,
            estimated_value: estimated_value(overall, draft.asking_price),
            notes: opt_text(&draft.notes),
        }
    }
}

/// Optional text fields persist the empty string as "not provided".
fn opt_text(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// A persisted inspection as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredInspection {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub inspection: NewInspection,
}
