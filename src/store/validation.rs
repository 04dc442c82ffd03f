//! Validation of history records read back from storage.

use crate::core::HistoryEntry;
use crate::store::error::RecordViolation;
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

fn check(ok: bool, violation: RecordViolation) -> Validation<(), NonEmptyVec<RecordViolation>> {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation)
    }
}

/// Validate every record, accumulating ALL violations.
///
/// Returns `Validation::Success(())` if every record is usable, otherwise
/// `Validation::Failure` listing each problem found.
pub fn validate_records(entries: &[HistoryEntry]) -> Validation<(), NonEmptyVec<RecordViolation>> {
    let mut checks: Vec<Validation<(), NonEmptyVec<RecordViolation>>> = Vec::new();
    let mut seen = HashSet::new();

    for (index, entry) in entries.iter().enumerate() {
        let id = entry.id.trim();
        checks.push(check(!id.is_empty(), RecordViolation::MissingId { index }));
        checks.push(check(
            !entry.expression.trim().is_empty(),
            RecordViolation::MissingExpression { index },
        ));
        checks.push(check(
            entry.result.is_finite(),
            RecordViolation::NonFiniteResult { index },
        ));

        if !id.is_empty() && !seen.insert(id) {
            checks.push(Validation::fail(RecordViolation::DuplicateId {
                index,
                id: id.to_string(),
            }));
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Operator, Stamp};
    use chrono::Utc;

    fn entry(id: &str) -> HistoryEntry {
        HistoryEntry::from_calculation(
            Stamp {
                id: id.to_string(),
                at: Utc::now(),
            },
            1.0,
            Operator::Add,
            2.0,
            3.0,
        )
    }

    #[test]
    fn valid_records_pass() {
        let entries = vec![entry("a"), entry("b")];
        assert!(validate_records(&entries).is_success());
    }

    #[test]
    fn empty_history_passes() {
        assert!(validate_records(&[]).is_success());
    }

    #[test]
    fn accumulates_all_violations() {
        let mut broken = entry("");
        broken.expression = "  ".to_string();
        broken.result = f64::NAN;
        let entries = vec![entry("a"), broken, entry("a")];

        match validate_records(&entries) {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 4);
                assert!(errors
                    .iter()
                    .any(|e| *e == RecordViolation::MissingId { index: 1 }));
                assert!(errors
                    .iter()
                    .any(|e| *e == RecordViolation::MissingExpression { index: 1 }));
                assert!(errors
                    .iter()
                    .any(|e| *e == RecordViolation::NonFiniteResult { index: 1 }));
                assert!(errors.iter().any(|e| *e
                    == RecordViolation::DuplicateId {
                        index: 2,
                        id: "a".to_string()
                    }));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }
}
