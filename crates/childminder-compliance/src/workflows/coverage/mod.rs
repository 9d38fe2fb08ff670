//! Address-history coverage: merges declared residences and finds the gaps in the
//! trailing window an applicant must account for.

pub mod domain;
mod engine;
mod submission;

pub use domain::{
    CoverageConfig, CoverageError, CoverageResult, DateRange, PeriodEnd, ResidencePeriod,
};
pub use engine::{compute_coverage, TimelineCoverageEngine};
pub use submission::{validate_history_submission, HistorySubmissionError};
