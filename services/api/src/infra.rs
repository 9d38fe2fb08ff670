use childminder_compliance::workflows::calendar::{calendar_day, parse_day};
use childminder_compliance::workflows::coverage::{PeriodEnd, ResidencePeriod};
use childminder_compliance::workflows::household::ReviewSettings;
use childminder_compliance::workflows::vetting::CheckStatus;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) settings: Arc<ReviewSettings>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    parse_day(raw)
}

pub(crate) fn parse_status(raw: &str) -> Result<CheckStatus, String> {
    CheckStatus::parse(raw).ok_or_else(|| {
        format!("unknown check status '{raw}' (expected not-requested, requested, received or expired)")
    })
}

/// Parse `START..END` where `END` may be `present` for the current address.
pub(crate) fn parse_period(raw: &str) -> Result<ResidencePeriod, String> {
    let (start, end) = raw
        .split_once("..")
        .ok_or_else(|| format!("period '{raw}' must look like START..END or START..present"))?;

    let start = parse_day(start)?;
    let end = end.trim();
    let end = if end.eq_ignore_ascii_case("present") {
        PeriodEnd::Present
    } else {
        let day = calendar_day(end)
            .ok_or_else(|| format!("failed to parse '{end}' as YYYY-MM-DD or 'present'"))?;
        PeriodEnd::On(day)
    };

    Ok(ResidencePeriod { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn periods_parse_closed_and_current_addresses() {
        assert_eq!(
            parse_period("2019-01-01..2021-06-01"),
            Ok(ResidencePeriod::new(day(2019, 1, 1), day(2021, 6, 1)))
        );
        assert_eq!(
            parse_period("2021-07-01..Present"),
            Ok(ResidencePeriod::ongoing(day(2021, 7, 1)))
        );
        assert!(parse_period("2021-07-01").is_err());
        assert!(parse_period("2021-07-01..soon").is_err());
    }

    #[test]
    fn statuses_accept_export_spellings() {
        assert_eq!(parse_status("Not requested"), Ok(CheckStatus::NotRequested));
        assert!(parse_status("lost").is_err());
    }
}
