use super::domain::CoverageResult;

/// Why an address-history form cannot be submitted as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistorySubmissionError {
    #[error("address history leaves {gap_count} gap(s) totalling {gap_days} day(s) without an explanation")]
    UnexplainedGaps { gap_count: usize, gap_days: i64 },
    #[error("address history accounts for {covered_days} of {required_days} required days without an explanation")]
    InsufficientCoverage {
        covered_days: i64,
        required_days: i64,
    },
}

/// Gate applied when a person submits their address history.
///
/// A fully covered window always passes. Anything short of that needs a non-blank
/// explanation from the applicant before it can go to the agency for review.
pub fn validate_history_submission(
    coverage: &CoverageResult,
    explanation: Option<&str>,
) -> Result<(), HistorySubmissionError> {
    if coverage.is_fully_covered {
        return Ok(());
    }

    if explanation.is_some_and(|text| !text.trim().is_empty()) {
        return Ok(());
    }

    if coverage.gaps.is_empty() {
        Err(HistorySubmissionError::InsufficientCoverage {
            covered_days: coverage.covered_days,
            required_days: coverage.required_days,
        })
    } else {
        Err(HistorySubmissionError::UnexplainedGaps {
            gap_count: coverage.gaps.len(),
            gap_days: coverage.gap_days(),
        })
    }
}
