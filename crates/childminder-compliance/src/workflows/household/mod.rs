//! Per-person review combining the vetting verdict with address-history coverage, plus the
//! roster import and dashboard aggregation used for nightly re-evaluation.

pub mod domain;
pub mod report;
mod review;
pub mod roster;

pub use domain::{HouseholdRole, MemberId, PersonFile, PersonReview, ReviewError, ReviewSettings};
pub use report::{ComplianceDashboard, ComplianceReport, RejectedRecord};
pub use review::{evaluate_roster, review_person};
pub use roster::{attach_addresses, parse_addresses, parse_roster, RosterImportError};
