use super::super::coverage::{CoverageConfig, CoverageError, CoverageResult, ResidencePeriod};
use super::super::vetting::{ClassificationError, CompliancePolicy, ComplianceVerdict, VettingRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for people registered against a childminding setting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MemberId(pub String);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseholdRole {
    Childminder,
    Assistant,
    HouseholdMember,
    RegularVisitor,
}

impl HouseholdRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Childminder => "Childminder",
            Self::Assistant => "Assistant",
            Self::HouseholdMember => "Household Member",
            Self::RegularVisitor => "Regular Visitor",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "childminder" | "provider" | "applicant" => Some(Self::Childminder),
            "assistant" | "childminderassistant" => Some(Self::Assistant),
            "householdmember" | "household" | "adult" | "child" => Some(Self::HouseholdMember),
            "regularvisitor" | "visitor" => Some(Self::RegularVisitor),
            _ => None,
        }
    }
}

/// Everything the back office holds about one person that bears on suitability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonFile {
    pub member_id: MemberId,
    pub display_name: String,
    pub role: HouseholdRole,
    pub vetting: VettingRecord,
    /// `None` when the address history has not been captured for this snapshot.
    #[serde(default)]
    pub residences: Option<Vec<ResidencePeriod>>,
    #[serde(default)]
    pub history_explanation: Option<String>,
}

/// Settings shared by single-person reviews and roster runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewSettings {
    pub policy: CompliancePolicy,
    pub coverage: CoverageConfig,
    /// Reviews due within this many days appear on the dashboard schedule.
    pub horizon_days: u32,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            policy: CompliancePolicy::default(),
            coverage: CoverageConfig::default(),
            horizon_days: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonReview {
    pub member_id: MemberId,
    pub display_name: String,
    pub role: HouseholdRole,
    pub verdict: ComplianceVerdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<CoverageResult>,
    /// Why the address history could not be accepted, when it cannot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_blocker: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewError {
    #[error(transparent)]
    Vetting(#[from] ClassificationError),
    #[error(transparent)]
    Coverage(#[from] CoverageError),
}
