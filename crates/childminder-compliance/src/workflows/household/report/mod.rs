mod summary;
pub mod views;

pub use summary::{ComplianceReport, RejectedRecord};
pub use views::ComplianceDashboard;
