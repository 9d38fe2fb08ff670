use super::super::calendar::{deserialize_day, parse_day};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// End of a declared residence: a concrete day, or still living there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodEnd {
    On(NaiveDate),
    Present,
}

impl PeriodEnd {
    pub const fn date(self) -> Option<NaiveDate> {
        match self {
            Self::On(date) => Some(date),
            Self::Present => None,
        }
    }
}

impl fmt::Display for PeriodEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On(date) => write!(f, "{date}"),
            Self::Present => f.write_str("present"),
        }
    }
}

impl Serialize for PeriodEnd {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PeriodEnd {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.trim().eq_ignore_ascii_case("present") {
            return Ok(Self::Present);
        }
        parse_day(&raw)
            .map(Self::On)
            .map_err(serde::de::Error::custom)
    }
}

/// One declared address in a person's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResidencePeriod {
    #[serde(deserialize_with = "deserialize_day")]
    pub start: NaiveDate,
    pub end: PeriodEnd,
}

impl ResidencePeriod {
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end: PeriodEnd::On(end),
        }
    }

    pub const fn ongoing(start: NaiveDate) -> Self {
        Self {
            start,
            end: PeriodEnd::Present,
        }
    }

    pub const fn is_present(&self) -> bool {
        matches!(self.end, PeriodEnd::Present)
    }

    /// Concrete end as of `as_of`; nobody lives somewhere beyond today.
    pub(crate) fn resolved_end(&self, as_of: NaiveDate) -> NaiveDate {
        match self.end {
            PeriodEnd::On(date) => date.min(as_of),
            PeriodEnd::Present => as_of,
        }
    }
}

/// Half-open span of days; `days()` is the day difference between the bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Derived view of a residence history against its required window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageResult {
    pub merged_periods: Vec<ResidencePeriod>,
    pub gaps: Vec<DateRange>,
    pub covered_days: i64,
    pub required_days: i64,
    pub is_fully_covered: bool,
}

impl CoverageResult {
    pub fn coverage_ratio(&self) -> f64 {
        if self.required_days <= 0 {
            return 0.0;
        }
        self.covered_days as f64 / self.required_days as f64
    }

    pub fn gap_days(&self) -> i64 {
        self.gaps.iter().map(DateRange::days).sum()
    }
}

const DEFAULT_WINDOW_YEARS: u32 = 5;
const DEFAULT_FULL_COVERAGE_RATIO: f64 = 0.99;

/// Dials for the coverage engine.
///
/// `full_coverage_ratio` is the share of the window a gap-free history must account for
/// before it counts as complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageConfig {
    pub window_years: u32,
    pub full_coverage_ratio: f64,
}

impl CoverageConfig {
    pub fn new(window_years: u32, full_coverage_ratio: f64) -> Self {
        let window_years = if window_years == 0 {
            DEFAULT_WINDOW_YEARS
        } else {
            window_years
        };
        let full_coverage_ratio = if full_coverage_ratio.is_finite()
            && full_coverage_ratio > 0.0
            && full_coverage_ratio <= 1.0
        {
            full_coverage_ratio
        } else {
            DEFAULT_FULL_COVERAGE_RATIO
        };

        Self {
            window_years,
            full_coverage_ratio,
        }
    }
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_YEARS, DEFAULT_FULL_COVERAGE_RATIO)
    }
}

/// Rejections raised before any coverage is computed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoverageError {
    #[error("coverage window must span at least one year (got {window_years})")]
    InvalidWindow { window_years: u32 },
    #[error("a {window_years} year window ending {as_of} falls outside the supported calendar")]
    WindowOutOfRange { as_of: NaiveDate, window_years: u32 },
    #[error("residence period ends ({end}) before it starts ({start})")]
    NonChronological { start: NaiveDate, end: NaiveDate },
    #[error("only one residence may run to the present (found {count})")]
    MultiplePresent { count: usize },
    #[error("current residence from {present_start} is older than a later declared move on {later_start}")]
    PresentNotMostRecent {
        present_start: NaiveDate,
        later_start: NaiveDate,
    },
}
