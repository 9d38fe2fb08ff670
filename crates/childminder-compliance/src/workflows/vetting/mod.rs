//! DBS vetting lifecycle: one ordered rule list deriving compliance state, risk tier and
//! the next date the classification changes.

mod classifier;
pub mod domain;
mod policy;

#[cfg(test)]
mod tests;

pub use classifier::{classify, ComplianceClassifier};
pub use domain::{
    CheckStatus, ClassificationError, ComplianceState, ComplianceVerdict, DataQualityWarning,
    InvalidRecord, RiskTier, VettingRecord,
};
pub use policy::CompliancePolicy;
