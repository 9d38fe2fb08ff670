use chrono::NaiveDate;
use childminder_compliance::workflows::coverage::{
    compute_coverage, CoverageConfig, CoverageError, DateRange, PeriodEnd, ResidencePeriod,
    TimelineCoverageEngine,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn as_of() -> NaiveDate {
    day(2024, 1, 1)
}

#[test]
fn one_month_break_between_addresses_is_a_gap() {
    let periods = [
        ResidencePeriod::new(day(2019, 1, 1), day(2021, 6, 1)),
        ResidencePeriod::ongoing(day(2021, 7, 1)),
    ];

    let result = compute_coverage(&periods, 5, as_of()).expect("coverage computes");

    assert_eq!(
        result.gaps,
        vec![DateRange {
            start: day(2021, 6, 1),
            end: day(2021, 7, 1),
        }]
    );
    assert_eq!(result.gaps[0].days(), 30);
    assert_eq!(result.covered_days, 1796);
    assert_eq!(result.required_days, 1826);
    assert!(!result.is_fully_covered);
    assert_eq!(result.merged_periods.len(), 2);
    assert_eq!(result.merged_periods[1].end, PeriodEnd::Present);
}

#[test]
fn empty_history_is_one_window_sized_gap() {
    let result = compute_coverage(&[], 5, as_of()).expect("coverage computes");

    assert!(result.merged_periods.is_empty());
    assert_eq!(
        result.gaps,
        vec![DateRange {
            start: day(2019, 1, 1),
            end: as_of(),
        }]
    );
    assert_eq!(result.covered_days, 0);
    assert!(!result.is_fully_covered);
}

#[test]
fn long_standing_address_is_clamped_to_the_window() {
    let periods = [ResidencePeriod::ongoing(day(2001, 9, 14))];

    let result = compute_coverage(&periods, 5, as_of()).expect("coverage computes");

    assert!(result.gaps.is_empty());
    assert!(result.is_fully_covered);
    assert_eq!(result.covered_days, result.required_days);
    assert_eq!(
        result.merged_periods,
        vec![ResidencePeriod::ongoing(day(2019, 1, 1))]
    );
}

#[test]
fn exact_window_history_is_fully_covered() {
    let periods = [
        ResidencePeriod::new(day(2019, 1, 1), day(2020, 2, 29)),
        ResidencePeriod::new(day(2020, 2, 29), day(2022, 8, 15)),
        ResidencePeriod::new(day(2022, 8, 15), as_of()),
    ];

    let result = compute_coverage(&periods, 5, as_of()).expect("coverage computes");

    assert!(result.gaps.is_empty());
    assert_eq!(result.covered_days, result.required_days);
    assert!(result.is_fully_covered);
}

#[test]
fn month_end_to_month_start_moves_are_contiguous() {
    let periods = [
        ResidencePeriod::ongoing(day(2021, 6, 1)),
        ResidencePeriod::new(day(2019, 1, 1), day(2021, 5, 31)),
    ];

    let result = compute_coverage(&periods, 5, as_of()).expect("coverage computes");

    assert!(result.gaps.is_empty());
    assert!(result.is_fully_covered);
    assert_eq!(
        result.merged_periods,
        vec![ResidencePeriod::ongoing(day(2019, 1, 1))]
    );
}

#[test]
fn two_day_break_is_a_gap() {
    let periods = [
        ResidencePeriod::new(day(2019, 1, 1), day(2021, 5, 30)),
        ResidencePeriod::ongoing(day(2021, 6, 1)),
    ];

    let result = compute_coverage(&periods, 5, as_of()).expect("coverage computes");

    assert_eq!(result.gaps.len(), 1);
    assert_eq!(result.gaps[0].days(), 2);
    assert!(!result.is_fully_covered);
}

#[test]
fn zero_length_period_never_fills_a_gap() {
    let periods = [
        ResidencePeriod::new(day(2019, 1, 1), day(2021, 6, 1)),
        ResidencePeriod::new(day(2021, 6, 15), day(2021, 6, 15)),
        ResidencePeriod::ongoing(day(2021, 7, 1)),
    ];

    let result = compute_coverage(&periods, 5, as_of()).expect("coverage computes");

    assert_eq!(result.merged_periods.len(), 2);
    assert_eq!(result.gaps.len(), 1);
    assert_eq!(result.gaps[0].days(), 30);
}

#[test]
fn future_dates_are_clamped_to_as_of() {
    let periods = [
        ResidencePeriod::new(day(2018, 1, 1), day(2030, 1, 1)),
        ResidencePeriod::new(day(2024, 6, 1), day(2025, 1, 1)),
    ];

    let result = compute_coverage(&periods, 5, as_of()).expect("coverage computes");

    assert_eq!(
        result.merged_periods,
        vec![ResidencePeriod::new(day(2019, 1, 1), as_of())]
    );
    assert_eq!(result.covered_days, result.required_days);
    assert!(result.is_fully_covered);
}

#[test]
fn history_before_the_window_is_ignored() {
    let periods = [
        ResidencePeriod::new(day(2010, 1, 1), day(2012, 1, 1)),
        ResidencePeriod::ongoing(day(2018, 12, 1)),
    ];

    let result = compute_coverage(&periods, 5, as_of()).expect("coverage computes");

    assert!(result.gaps.is_empty());
    assert_eq!(result.merged_periods.len(), 1);
    assert!(result.is_fully_covered);
}

#[test]
fn overlapping_unordered_duplicates_merge_without_gaining_days() {
    let periods = [
        ResidencePeriod::new(day(2020, 1, 1), day(2020, 6, 1)),
        ResidencePeriod::new(day(2019, 3, 1), day(2020, 3, 1)),
        ResidencePeriod::new(day(2019, 6, 1), day(2019, 9, 1)),
        ResidencePeriod::new(day(2019, 3, 1), day(2020, 3, 1)),
        ResidencePeriod::new(day(2022, 1, 1), day(2023, 1, 1)),
    ];

    let result = compute_coverage(&periods, 5, as_of()).expect("coverage computes");

    assert_eq!(
        result.merged_periods,
        vec![
            ResidencePeriod::new(day(2019, 3, 1), day(2020, 6, 1)),
            ResidencePeriod::new(day(2022, 1, 1), day(2023, 1, 1)),
        ]
    );
    for pair in result.merged_periods.windows(2) {
        let previous_end = pair[0].end.date().expect("closed period");
        assert!(previous_end < pair[1].start);
    }

    let union_days = (day(2020, 6, 1) - day(2019, 3, 1)).num_days()
        + (day(2023, 1, 1) - day(2022, 1, 1)).num_days();
    assert_eq!(result.covered_days, union_days);
    assert_eq!(
        result.covered_days + result.gap_days(),
        result.required_days
    );
}

#[test]
fn repeated_calls_are_identical() {
    let periods = [
        ResidencePeriod::new(day(2019, 1, 1), day(2021, 6, 1)),
        ResidencePeriod::ongoing(day(2021, 7, 1)),
    ];

    let first = compute_coverage(&periods, 5, as_of()).expect("coverage computes");
    let second = compute_coverage(&periods, 5, as_of()).expect("coverage computes");
    assert_eq!(first, second);
}

#[test]
fn full_coverage_tolerance_is_explicit() {
    // window 2023-01-01..2024-01-01 (365 days); each edge is one day short
    let periods = [ResidencePeriod::new(day(2023, 1, 2), day(2023, 12, 31))];

    let default = compute_coverage(&periods, 1, as_of()).expect("coverage computes");
    assert!(default.gaps.is_empty());
    assert_eq!(default.covered_days, 363);
    assert_eq!(default.required_days, 365);
    assert!(default.coverage_ratio() >= 0.99);
    assert!(default.is_fully_covered);

    let strict = TimelineCoverageEngine::new(CoverageConfig::new(1, 0.995))
        .compute(&periods, 1, as_of())
        .expect("coverage computes");
    assert!(strict.gaps.is_empty());
    assert!(!strict.is_fully_covered);
}

#[test]
fn engine_defaults_to_configured_window() {
    let engine = TimelineCoverageEngine::new(CoverageConfig::new(3, 0.99));
    let periods = [ResidencePeriod::ongoing(day(2020, 6, 1))];

    let result = engine
        .compute_default(&periods, as_of())
        .expect("coverage computes");
    assert!(result.is_fully_covered);
    assert_eq!(result.required_days, (as_of() - day(2021, 1, 1)).num_days());
}

#[test]
fn malformed_timelines_are_rejected() {
    assert_eq!(
        compute_coverage(&[], 0, as_of()),
        Err(CoverageError::InvalidWindow { window_years: 0 })
    );

    let backwards = [ResidencePeriod::new(day(2021, 1, 1), day(2020, 1, 1))];
    assert_eq!(
        compute_coverage(&backwards, 5, as_of()),
        Err(CoverageError::NonChronological {
            start: day(2021, 1, 1),
            end: day(2020, 1, 1),
        })
    );

    let two_current = [
        ResidencePeriod::ongoing(day(2019, 1, 1)),
        ResidencePeriod::ongoing(day(2021, 1, 1)),
    ];
    assert_eq!(
        compute_coverage(&two_current, 5, as_of()),
        Err(CoverageError::MultiplePresent { count: 2 })
    );

    let stale_current = [
        ResidencePeriod::ongoing(day(2019, 1, 1)),
        ResidencePeriod::new(day(2021, 1, 1), day(2022, 1, 1)),
    ];
    assert_eq!(
        compute_coverage(&stale_current, 5, as_of()),
        Err(CoverageError::PresentNotMostRecent {
            present_start: day(2019, 1, 1),
            later_start: day(2021, 1, 1),
        })
    );
}

#[test]
fn periods_deserialize_from_form_payloads() {
    let periods: Vec<ResidencePeriod> = serde_json::from_str(
        r#"[
            { "start": "2019-01-01T10:15:00+00:00", "end": "2021-06-01" },
            { "start": "2021-07-01", "end": "present" }
        ]"#,
    )
    .expect("periods parse");

    assert_eq!(periods[0].start, day(2019, 1, 1));
    assert_eq!(periods[1].end, PeriodEnd::Present);
    assert_eq!(
        serde_json::to_value(periods[1]).expect("serializes")["end"],
        "present"
    );
}
