use super::super::super::vetting::{ComplianceState, RiskTier};
use super::super::domain::{MemberId, PersonReview};
use super::views::{
    AttentionEntry, ComplianceDashboard, CoverageGapView, ReviewReminderView, RiskTierEntry,
    StateEntry,
};
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

/// A person whose snapshot could not be classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRecord {
    pub member_id: MemberId,
    pub display_name: String,
    pub error: String,
}

/// Raw outcome of a roster run, before it is shaped for the dashboard.
#[derive(Debug, Clone)]
pub struct ComplianceReport {
    pub evaluated_on: NaiveDate,
    pub reviews: Vec<PersonReview>,
    pub rejected: Vec<RejectedRecord>,
}

impl ComplianceReport {
    pub fn new(evaluated_on: NaiveDate) -> Self {
        Self {
            evaluated_on,
            reviews: Vec::new(),
            rejected: Vec::new(),
        }
    }

    pub fn tier_counts(&self) -> HashMap<RiskTier, usize> {
        let mut counts = HashMap::new();
        for review in &self.reviews {
            *counts.entry(review.verdict.risk_tier).or_default() += 1;
        }
        counts
    }

    pub fn summary(&self, horizon_days: u32) -> ComplianceDashboard {
        let tier_counts = self.tier_counts();
        let risk_tiers = RiskTier::ordered()
            .into_iter()
            .map(|tier| RiskTierEntry {
                tier,
                tier_label: tier.label(),
                count: tier_counts.get(&tier).copied().unwrap_or(0),
            })
            .collect();

        let mut state_counts: HashMap<ComplianceState, usize> = HashMap::new();
        for review in &self.reviews {
            *state_counts.entry(review.verdict.state).or_default() += 1;
        }
        let states = ComplianceState::ordered()
            .into_iter()
            .filter_map(|state| {
                state_counts.get(&state).map(|count| StateEntry {
                    state,
                    state_label: state.label(),
                    count: *count,
                })
            })
            .collect();

        let mut attention: Vec<AttentionEntry> = self
            .reviews
            .iter()
            .filter(|review| review.verdict.risk_tier >= RiskTier::Medium)
            .map(|review| AttentionEntry {
                member_id: review.member_id.clone(),
                display_name: review.display_name.clone(),
                role_label: review.role.label(),
                state: review.verdict.state,
                state_label: review.verdict.state.label(),
                risk_tier: review.verdict.risk_tier,
                tier_label: review.verdict.risk_tier.label(),
                reasons: review.verdict.reasons.clone(),
            })
            .collect();
        attention.sort_by(|a, b| {
            b.risk_tier
                .cmp(&a.risk_tier)
                .then_with(|| a.display_name.cmp(&b.display_name))
        });

        let horizon = self
            .evaluated_on
            .checked_add_days(Days::new(u64::from(horizon_days)))
            .unwrap_or(NaiveDate::MAX);
        let mut review_schedule: Vec<ReviewReminderView> = self
            .reviews
            .iter()
            .filter_map(|review| {
                let review_on = review.verdict.next_review_date?;
                (review_on <= horizon).then(|| ReviewReminderView {
                    member_id: review.member_id.clone(),
                    display_name: review.display_name.clone(),
                    review_on,
                    days_until: (review_on - self.evaluated_on).num_days(),
                    state: review.verdict.state,
                    state_label: review.verdict.state.label(),
                })
            })
            .collect();
        review_schedule.sort_by(|a, b| {
            a.review_on
                .cmp(&b.review_on)
                .then_with(|| a.display_name.cmp(&b.display_name))
        });

        let coverage_gaps = self
            .reviews
            .iter()
            .filter_map(|review| {
                let coverage = review.coverage.as_ref()?;
                (!coverage.is_fully_covered).then(|| CoverageGapView {
                    member_id: review.member_id.clone(),
                    display_name: review.display_name.clone(),
                    gap_count: coverage.gaps.len(),
                    gap_days: coverage.gap_days(),
                    covered_pct: (coverage.coverage_ratio() * 100.0) as f32,
                    blocker: review.history_blocker.clone(),
                })
            })
            .collect();

        ComplianceDashboard {
            evaluated_on: self.evaluated_on,
            total_people: self.reviews.len() + self.rejected.len(),
            risk_tiers,
            states,
            attention,
            review_schedule,
            coverage_gaps,
            rejected: self.rejected.clone(),
        }
    }
}
