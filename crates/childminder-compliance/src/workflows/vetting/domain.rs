use super::super::calendar::deserialize_optional_day;
use super::policy::CompliancePolicy;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    NotRequested,
    Requested,
    Received,
    Expired,
}

impl CheckStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotRequested => "Not Requested",
            Self::Requested => "Requested",
            Self::Received => "Received",
            Self::Expired => "Expired",
        }
    }

    /// Parse the status spellings found in agency exports.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "notrequested" | "none" | "" => Some(Self::NotRequested),
            "requested" | "applied" | "pending" => Some(Self::Requested),
            "received" | "issued" | "complete" | "completed" => Some(Self::Received),
            "expired" => Some(Self::Expired),
            _ => None,
        }
    }
}

/// Snapshot of one person's DBS check as held by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VettingRecord {
    pub check_status: CheckStatus,
    #[serde(default, deserialize_with = "deserialize_optional_day")]
    pub certificate_issued_on: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_day")]
    pub certificate_expires_on: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_day")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_day")]
    pub requested_on: Option<NaiveDate>,
}

impl VettingRecord {
    pub fn new(check_status: CheckStatus, date_of_birth: NaiveDate) -> Self {
        Self {
            check_status,
            certificate_issued_on: None,
            certificate_expires_on: None,
            date_of_birth: Some(date_of_birth),
            requested_on: None,
        }
    }

    /// Pre-fill the expiry from the issue date when none was entered.
    ///
    /// An expiry typed in by staff is left untouched even when it disagrees with the
    /// policy's validity period.
    pub fn with_suggested_expiry(mut self, policy: &CompliancePolicy) -> Self {
        if self.certificate_expires_on.is_none() {
            self.certificate_expires_on = self
                .certificate_issued_on
                .and_then(|issued| policy.suggested_expiry(issued));
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceState {
    Compliant,
    PendingResponse,
    AtRisk,
    Overdue,
    Expired,
    NotApplicableYet,
}

impl ComplianceState {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Expired,
            Self::Overdue,
            Self::AtRisk,
            Self::PendingResponse,
            Self::Compliant,
            Self::NotApplicableYet,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Compliant => "Compliant",
            Self::PendingResponse => "Pending Response",
            Self::AtRisk => "At Risk",
            Self::Overdue => "Overdue",
            Self::Expired => "Expired",
            Self::NotApplicableYet => "Not Applicable Yet",
        }
    }
}

/// Dashboard triage bucket; ordering runs from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    pub const fn ordered() -> [Self; 4] {
        [Self::Critical, Self::High, Self::Medium, Self::Low]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

/// Problems with the captured data that must be visible but do not block rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQualityWarning {
    ReceivedWithoutExpiry,
    RequestedWithoutDate,
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReceivedWithoutExpiry => f.write_str(
                "data quality: certificate recorded as received but no expiry date captured",
            ),
            Self::RequestedWithoutDate => {
                f.write_str("data quality: check marked as requested but no request date captured")
            }
        }
    }
}

/// Outcome of classifying one vetting snapshot at a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceVerdict {
    pub state: ComplianceState,
    pub risk_tier: RiskTier,
    pub next_review_date: Option<NaiveDate>,
    pub reasons: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<DataQualityWarning>,
}

impl ComplianceVerdict {
    pub fn summary(&self) -> String {
        let mut summary = format!("{} ({} risk)", self.state.label(), self.risk_tier.label());
        if let Some(date) = self.next_review_date {
            summary.push_str(&format!(", review on {date}"));
        }
        summary
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRecord {
    #[error("date of birth is missing")]
    MissingDateOfBirth,
    #[error("date of birth {date_of_birth} is after {now}")]
    FutureDateOfBirth {
        date_of_birth: NaiveDate,
        now: NaiveDate,
    },
    #[error("certificate expires on {expires_on}, before it was issued on {issued_on}")]
    ExpiryBeforeIssue {
        issued_on: NaiveDate,
        expires_on: NaiveDate,
    },
    #[error("check request date {requested_on} is after {now}")]
    RequestInFuture {
        requested_on: NaiveDate,
        now: NaiveDate,
    },
}

/// Raised instead of guessing when a snapshot cannot be classified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassificationError {
    #[error("invalid vetting record: {0}")]
    InvalidRecord(#[from] InvalidRecord),
    #[error("policy thresholds push {0} outside the supported calendar")]
    DateOutOfRange(NaiveDate),
}
