use crate::cli::{ClassifyArgs, CoverageArgs, DashboardArgs};
use chrono::{Local, NaiveDate};
use childminder_compliance::config::AppConfig;
use childminder_compliance::error::AppError;
use childminder_compliance::workflows::coverage::{
    validate_history_submission, CoverageResult, TimelineCoverageEngine,
};
use childminder_compliance::workflows::household::{
    attach_addresses, evaluate_roster, parse_addresses, parse_roster, ComplianceDashboard,
};
use childminder_compliance::workflows::vetting::{
    ComplianceClassifier, ComplianceVerdict, VettingRecord,
};
use std::fs::File;
use std::io::BufReader;

pub(crate) fn run_coverage(args: CoverageArgs) -> Result<(), AppError> {
    let CoverageArgs {
        periods,
        window_years,
        as_of,
        explanation,
    } = args;

    let settings = AppConfig::load()?.review;
    let engine = TimelineCoverageEngine::new(settings.coverage);
    let window_years = window_years.unwrap_or(engine.config().window_years);
    let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());

    let coverage = engine.compute(&periods, window_years, as_of)?;
    render_coverage(&coverage, window_years, as_of);

    match validate_history_submission(&coverage, explanation.as_deref()) {
        Ok(()) => println!("\nSubmission: accepted"),
        Err(err) => println!("\nSubmission: blocked ({err})"),
    }

    Ok(())
}

pub(crate) fn run_classify(args: ClassifyArgs) -> Result<(), AppError> {
    let ClassifyArgs {
        status,
        dob,
        requested_on,
        issued_on,
        expires_on,
        suggest_expiry,
        today,
    } = args;

    let classifier = ComplianceClassifier::new(AppConfig::load()?.review.policy);
    let mut record = VettingRecord::new(status, dob);
    record.requested_on = requested_on;
    record.certificate_issued_on = issued_on;
    record.certificate_expires_on = expires_on;
    if suggest_expiry {
        record = record.with_suggested_expiry(classifier.policy());
    }

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let verdict = classifier.classify(&record, today)?;
    render_verdict(&record, &verdict, today);

    Ok(())
}

pub(crate) fn run_dashboard(args: DashboardArgs) -> Result<(), AppError> {
    let DashboardArgs {
        roster,
        addresses,
        today,
        horizon_days,
    } = args;

    let settings = AppConfig::load()?.review;
    let mut people = parse_roster(BufReader::new(File::open(&roster)?))?;
    if let Some(path) = addresses {
        let histories = parse_addresses(BufReader::new(File::open(&path)?))?;
        attach_addresses(&mut people, histories);
    }

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let report = evaluate_roster(&people, today, &settings);
    let dashboard = report.summary(horizon_days.unwrap_or(settings.horizon_days));
    render_dashboard(&dashboard, roster.display().to_string());

    Ok(())
}

fn render_coverage(coverage: &CoverageResult, window_years: u32, as_of: NaiveDate) {
    println!("Address history coverage ({window_years} year window to {as_of})");
    println!(
        "- {} of {} days covered ({:.1}%) | fully covered: {}",
        coverage.covered_days,
        coverage.required_days,
        coverage.coverage_ratio() * 100.0,
        if coverage.is_fully_covered { "yes" } else { "no" }
    );

    println!("Addresses within the window:");
    if coverage.merged_periods.is_empty() {
        println!("  (none)");
    }
    for period in &coverage.merged_periods {
        println!("  - {} to {}", period.start, period.end);
    }

    if coverage.gaps.is_empty() {
        println!("No gaps.");
        return;
    }
    println!("Gaps to explain:");
    for gap in &coverage.gaps {
        println!("  - {} to {} ({} days)", gap.start, gap.end, gap.days());
    }
}

fn render_verdict(record: &VettingRecord, verdict: &ComplianceVerdict, today: NaiveDate) {
    println!("DBS vetting status as of {today}");
    println!("- Check status: {}", record.check_status.label());
    if let Some(expires_on) = record.certificate_expires_on {
        println!("- Certificate expires: {expires_on}");
    }
    println!("- Verdict: {}", verdict.summary());
    for reason in &verdict.reasons {
        println!("  - {reason}");
    }
}

fn render_dashboard(dashboard: &ComplianceDashboard, source: String) {
    println!(
        "Household compliance dashboard ({source}, evaluated {})",
        dashboard.evaluated_on
    );
    println!("- {} people on the roster", dashboard.total_people);

    println!("Risk tiers:");
    for entry in &dashboard.risk_tiers {
        println!("  - {}: {}", entry.tier_label, entry.count);
    }

    println!("States:");
    for entry in &dashboard.states {
        println!("  - {}: {}", entry.state_label, entry.count);
    }

    if !dashboard.attention.is_empty() {
        println!("\nNeeds attention:");
        for entry in &dashboard.attention {
            println!(
                "  - [{}] {} ({}) {}",
                entry.tier_label, entry.display_name, entry.role_label, entry.state_label
            );
            for reason in &entry.reasons {
                println!("      {reason}");
            }
        }
    }

    if !dashboard.review_schedule.is_empty() {
        println!("\nUpcoming reviews:");
        for entry in &dashboard.review_schedule {
            println!(
                "  - {} {} in {} day(s) ({})",
                entry.review_on, entry.display_name, entry.days_until, entry.state_label
            );
        }
    }

    if !dashboard.coverage_gaps.is_empty() {
        println!("\nAddress history gaps:");
        for entry in &dashboard.coverage_gaps {
            println!(
                "  - {}: {} gap(s), {} day(s), {:.1}% covered",
                entry.display_name, entry.gap_count, entry.gap_days, entry.covered_pct
            );
        }
    }

    if !dashboard.rejected.is_empty() {
        println!("\nRejected records:");
        for record in &dashboard.rejected {
            println!("  - {} ({}): {}", record.display_name, record.member_id, record.error);
        }
    }
}
