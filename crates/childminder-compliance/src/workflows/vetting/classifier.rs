use super::super::calendar::years_after;
use super::domain::{
    CheckStatus, ClassificationError, ComplianceState, ComplianceVerdict, DataQualityWarning,
    InvalidRecord, RiskTier, VettingRecord,
};
use super::policy::CompliancePolicy;
use chrono::{Days, NaiveDate};

/// Stateless classifier applying one policy to vetting snapshots.
#[derive(Debug, Clone, Default)]
pub struct ComplianceClassifier {
    policy: CompliancePolicy,
}

impl ComplianceClassifier {
    pub fn new(policy: CompliancePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &CompliancePolicy {
        &self.policy
    }

    pub fn classify(
        &self,
        record: &VettingRecord,
        now: NaiveDate,
    ) -> Result<ComplianceVerdict, ClassificationError> {
        classify(record, now, &self.policy)
    }
}

/// Derive the compliance state of `record` as of `now`.
///
/// Rules are applied in a fixed order and the first match wins:
/// 1. under the minimum age: not applicable until the birthday that crosses it
/// 2. received certificate with an expiry: expired, at risk, or compliant
/// 3. outstanding request: pending until `overdue_after_days`, then overdue
/// 4. anything else is overdue (or expired, when the check itself is marked expired)
pub fn classify(
    record: &VettingRecord,
    now: NaiveDate,
    policy: &CompliancePolicy,
) -> Result<ComplianceVerdict, ClassificationError> {
    let date_of_birth = validate(record, now)?;

    let comes_of_age = years_after(date_of_birth, policy.minimum_age)
        .ok_or(ClassificationError::DateOutOfRange(date_of_birth))?;
    if now < comes_of_age {
        return Ok(verdict(
            ComplianceState::NotApplicableYet,
            RiskTier::Low,
            Some(comes_of_age),
            format!(
                "under {} until {comes_of_age}; vetting not yet required",
                policy.minimum_age
            ),
        ));
    }

    if let (CheckStatus::Received, Some(expires_on)) =
        (record.check_status, record.certificate_expires_on)
    {
        return classify_certificate(expires_on, now, policy);
    }

    if record.check_status == CheckStatus::Requested {
        return Ok(classify_request(record.requested_on, now, policy));
    }

    Ok(match record.check_status {
        CheckStatus::Expired => verdict(
            ComplianceState::Expired,
            RiskTier::Critical,
            None,
            "check marked as expired; a new certificate is required".to_string(),
        ),
        CheckStatus::Received => {
            let mut outcome = verdict(
                ComplianceState::Overdue,
                RiskTier::High,
                None,
                "certificate cannot be confirmed as current".to_string(),
            );
            flag(&mut outcome, DataQualityWarning::ReceivedWithoutExpiry);
            outcome
        }
        CheckStatus::NotRequested | CheckStatus::Requested => verdict(
            ComplianceState::Overdue,
            RiskTier::High,
            None,
            format!(
                "aged {} or over with no DBS check requested",
                policy.minimum_age
            ),
        ),
    })
}

fn validate(record: &VettingRecord, now: NaiveDate) -> Result<NaiveDate, InvalidRecord> {
    let date_of_birth = record
        .date_of_birth
        .ok_or(InvalidRecord::MissingDateOfBirth)?;
    if date_of_birth > now {
        return Err(InvalidRecord::FutureDateOfBirth { date_of_birth, now });
    }

    if let (Some(issued_on), Some(expires_on)) =
        (record.certificate_issued_on, record.certificate_expires_on)
    {
        if expires_on < issued_on {
            return Err(InvalidRecord::ExpiryBeforeIssue {
                issued_on,
                expires_on,
            });
        }
    }

    if let Some(requested_on) = record.requested_on {
        if requested_on > now {
            return Err(InvalidRecord::RequestInFuture { requested_on, now });
        }
    }

    Ok(date_of_birth)
}

fn classify_certificate(
    expires_on: NaiveDate,
    now: NaiveDate,
    policy: &CompliancePolicy,
) -> Result<ComplianceVerdict, ClassificationError> {
    if expires_on < now {
        return Ok(verdict(
            ComplianceState::Expired,
            RiskTier::Critical,
            None,
            format!("certificate expired on {expires_on}"),
        ));
    }

    let days_remaining = (expires_on - now).num_days();
    if days_remaining <= i64::from(policy.expiring_soon_days) {
        return Ok(verdict(
            ComplianceState::AtRisk,
            RiskTier::Medium,
            Some(expires_on),
            format!("certificate expires in {days_remaining} day(s) on {expires_on}"),
        ));
    }

    let at_risk_from = expires_on
        .checked_sub_days(Days::new(u64::from(policy.expiring_soon_days)))
        .ok_or(ClassificationError::DateOutOfRange(expires_on))?;
    Ok(verdict(
        ComplianceState::Compliant,
        RiskTier::Low,
        Some(at_risk_from),
        format!("certificate valid until {expires_on}"),
    ))
}

fn classify_request(
    requested_on: Option<NaiveDate>,
    now: NaiveDate,
    policy: &CompliancePolicy,
) -> ComplianceVerdict {
    let Some(requested_on) = requested_on else {
        let mut outcome = verdict(
            ComplianceState::Overdue,
            RiskTier::High,
            None,
            "check requested on an unknown date".to_string(),
        );
        flag(&mut outcome, DataQualityWarning::RequestedWithoutDate);
        return outcome;
    };

    let elapsed = (now - requested_on).num_days();
    if elapsed >= i64::from(policy.overdue_after_days) {
        return verdict(
            ComplianceState::Overdue,
            RiskTier::High,
            None,
            format!(
                "requested {elapsed} day(s) ago on {requested_on}; response overdue after {} day(s)",
                policy.overdue_after_days
            ),
        );
    }

    // elapsed < overdue_after_days, so the deadline is after `now` and representable
    let overdue_on = requested_on
        .checked_add_days(Days::new(u64::from(policy.overdue_after_days)))
        .unwrap_or(NaiveDate::MAX);
    verdict(
        ComplianceState::PendingResponse,
        RiskTier::Low,
        Some(overdue_on),
        format!("requested on {requested_on}; awaiting certificate"),
    )
}

fn verdict(
    state: ComplianceState,
    risk_tier: RiskTier,
    next_review_date: Option<NaiveDate>,
    reason: String,
) -> ComplianceVerdict {
    ComplianceVerdict {
        state,
        risk_tier,
        next_review_date,
        reasons: vec![reason],
        warnings: Vec::new(),
    }
}

fn flag(verdict: &mut ComplianceVerdict, warning: DataQualityWarning) {
    verdict.reasons.push(warning.to_string());
    verdict.warnings.push(warning);
}
