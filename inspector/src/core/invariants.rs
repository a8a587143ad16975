//! Semantic invariants not expressible via JSON Schema.

use crate::core::scoring::{estimated_value, overall_score};
use crate::record::StoredInspection;

/// Check semantic invariants not expressible in JSON Schema:
/// - Name non-empty after trimming
/// - Stored overall score matches the scoring engine's output
/// - Stored estimated value matches the scoring engine's output
pub fn validate_record(record: &StoredInspection) -> Vec<String> {
    let mut errors = Vec::new();
    let inspection = &record.inspection;

    if inspection.motorcycle_name.trim().is_empty() {
        errors.push(format!("{}: motorcycle_name must not be blank", record.id));
    }

    let expected_overall = overall_score(&inspection.scores);
    if inspection.overall_score != expected_overall {
        errors.push(format!(
            "{}: overall_score {} does not match component scores (expected {})",
            record.id, inspection.overall_score, expected_overall
        ));
    }

    let expected_value = estimated_value(inspection.overall_score, inspection.asking_price);
    if inspection.estimated_value != expected_value {
        errors.push(format!(
            "{}: estimated_value {:?} does not match asking price and score (expected {:?})",
            record.id, inspection.estimated_value, expected_value
        ));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::stored_record;

    #[test]
    fn consistent_record_has_no_violations() {
        let record = stored_record("ins-1", "user-1", "Red Ducati", [50; 8], Some(8_000.0));
        assert!(validate_record(&record).is_empty());
    }

    #[test]
    fn blank_name_is_reported() {
        let record = stored_record("ins-1", "user-1", "   ", [50; 8], None);
        let errors = validate_record(&record);
        assert!(errors.iter().any(|err| err.contains("must not be blank")));
    }

    #[test]
    fn stale_overall_score_is_reported() {
        let mut record = stored_record("ins-1", "user-1", "Red Ducati", [50; 8], None);
        record.inspection.overall_score = 99;
        let errors = validate_record(&record);
        assert!(errors.iter().any(|err| err.contains("overall_score")));
    }

    #[test]
    fn stale_estimated_value_is_reported() {
        let mut record = stored_record("ins-1", "user-1", "Red Ducati", [50; 8], Some(8_000.0));
        record.inspection.estimated_value = Some(1.0);
        let errors = validate_record(&record);
        assert!(errors.iter().any(|err| err.contains("estimated_value")));

        // an estimate without an asking price is also inconsistent
        let mut record = stored_record("ins-2", "user-1", "Red Ducati", [50; 8], None);
        record.inspection.estimated_value = Some(5_600.0);
        let errors = validate_record(&record);
        assert!(errors.iter().any(|err| err.contains("estimated_value")));
    }
}
