use super::super::coverage::{validate_history_submission, TimelineCoverageEngine};
use super::super::vetting::{classify, ComplianceState};
use super::domain::{PersonFile, PersonReview, ReviewError, ReviewSettings};
use super::report::{ComplianceReport, RejectedRecord};
use chrono::NaiveDate;
use tracing::{debug, warn};

/// Classify one person and, once vetting applies to them, measure their address history.
pub fn review_person(
    person: &PersonFile,
    now: NaiveDate,
    settings: &ReviewSettings,
) -> Result<PersonReview, ReviewError> {
    let verdict = classify(&person.vetting, now, &settings.policy)?;

    let coverage = match (&person.residences, verdict.state) {
        (_, ComplianceState::NotApplicableYet) | (None, _) => None,
        (Some(residences), _) => {
            let engine = TimelineCoverageEngine::new(settings.coverage.clone());
            Some(engine.compute_default(residences, now)?)
        }
    };

    let history_blocker = coverage.as_ref().and_then(|coverage| {
        validate_history_submission(coverage, person.history_explanation.as_deref())
            .err()
            .map(|err| err.to_string())
    });

    Ok(PersonReview {
        member_id: person.member_id.clone(),
        display_name: person.display_name.clone(),
        role: person.role,
        verdict,
        coverage,
        history_blocker,
    })
}

/// Review every person independently; a rejected record never sinks the batch.
pub fn evaluate_roster(
    people: &[PersonFile],
    now: NaiveDate,
    settings: &ReviewSettings,
) -> ComplianceReport {
    let mut report = ComplianceReport::new(now);

    for person in people {
        match review_person(person, now, settings) {
            Ok(review) => {
                for warning in &review.verdict.warnings {
                    warn!(member = %person.member_id, %warning, "vetting record needs correction");
                }
                report.reviews.push(review);
            }
            Err(err) => {
                warn!(member = %person.member_id, error = %err, "vetting record rejected");
                report.rejected.push(RejectedRecord {
                    member_id: person.member_id.clone(),
                    display_name: person.display_name.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    debug!(
        reviewed = report.reviews.len(),
        rejected = report.rejected.len(),
        %now,
        "roster evaluated"
    );
    report
}
