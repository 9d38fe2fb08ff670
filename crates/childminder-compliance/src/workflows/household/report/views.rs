use super::super::super::vetting::{ComplianceState, RiskTier};
use super::super::domain::MemberId;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct RiskTierEntry {
    pub tier: RiskTier,
    pub tier_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateEntry {
    pub state: ComplianceState,
    pub state_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttentionEntry {
    pub member_id: MemberId,
    pub display_name: String,
    pub role_label: &'static str,
    pub state: ComplianceState,
    pub state_label: &'static str,
    pub risk_tier: RiskTier,
    pub tier_label: &'static str,
    pub reasons: Vec<String>,
}

/// Input for the reminder scheduler: re-run classification on `review_on`.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewReminderView {
    pub member_id: MemberId,
    pub display_name: String,
    pub review_on: NaiveDate,
    pub days_until: i64,
    pub state: ComplianceState,
    pub state_label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverageGapView {
    pub member_id: MemberId,
    pub display_name: String,
    pub gap_count: usize,
    pub gap_days: i64,
    pub covered_pct: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocker: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceDashboard {
    pub evaluated_on: NaiveDate,
    pub total_people: usize,
    pub risk_tiers: Vec<RiskTierEntry>,
    pub states: Vec<StateEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attention: Vec<AttentionEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub review_schedule: Vec<ReviewReminderView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coverage_gaps: Vec<CoverageGapView>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<super::RejectedRecord>,
}
