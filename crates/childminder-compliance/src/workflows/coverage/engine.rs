use super::super::calendar::years_before;
use super::domain::{
    CoverageConfig, CoverageError, CoverageResult, DateRange, PeriodEnd, ResidencePeriod,
};
use chrono::NaiveDate;

/// Moves declared as "left 31 May, arrived 1 June" are one day apart and still continuous.
const CONTIGUITY_TOLERANCE_DAYS: i64 = 1;

/// Stateless engine measuring a residence history against a trailing window.
#[derive(Debug, Clone, Default)]
pub struct TimelineCoverageEngine {
    config: CoverageConfig,
}

#[derive(Debug, Clone, Copy)]
struct Span {
    start: NaiveDate,
    end: NaiveDate,
    open: bool,
}

impl TimelineCoverageEngine {
    pub fn new(config: CoverageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CoverageConfig {
        &self.config
    }

    /// Compute coverage using the configured default window.
    pub fn compute_default(
        &self,
        periods: &[ResidencePeriod],
        as_of: NaiveDate,
    ) -> Result<CoverageResult, CoverageError> {
        self.compute(periods, self.config.window_years, as_of)
    }

    pub fn compute(
        &self,
        periods: &[ResidencePeriod],
        window_years: u32,
        as_of: NaiveDate,
    ) -> Result<CoverageResult, CoverageError> {
        if window_years == 0 {
            return Err(CoverageError::InvalidWindow { window_years });
        }
        validate_timeline(periods)?;

        let window_start = years_before(as_of, window_years).ok_or(
            CoverageError::WindowOutOfRange {
                as_of,
                window_years,
            },
        )?;

        let within_window: Vec<Span> = merge_spans(periods, as_of)
            .into_iter()
            .filter_map(|span| clip_to_window(span, window_start))
            .collect();

        let gaps = find_gaps(&within_window, window_start, as_of);
        let covered_days: i64 = within_window
            .iter()
            .map(|span| (span.end - span.start).num_days())
            .sum();
        let required_days = (as_of - window_start).num_days();

        let ratio = covered_days as f64 / required_days as f64;
        let is_fully_covered = gaps.is_empty() && ratio >= self.config.full_coverage_ratio;

        let merged_periods = within_window
            .iter()
            .map(|span| ResidencePeriod {
                start: span.start,
                end: if span.open {
                    PeriodEnd::Present
                } else {
                    PeriodEnd::On(span.end)
                },
            })
            .collect();

        Ok(CoverageResult {
            merged_periods,
            gaps,
            covered_days,
            required_days,
            is_fully_covered,
        })
    }
}

/// Coverage with the default tolerance; the form screens call this on every edit.
pub fn compute_coverage(
    periods: &[ResidencePeriod],
    window_years: u32,
    as_of: NaiveDate,
) -> Result<CoverageResult, CoverageError> {
    TimelineCoverageEngine::default().compute(periods, window_years, as_of)
}

fn validate_timeline(periods: &[ResidencePeriod]) -> Result<(), CoverageError> {
    for period in periods {
        if let PeriodEnd::On(end) = period.end {
            if end < period.start {
                return Err(CoverageError::NonChronological {
                    start: period.start,
                    end,
                });
            }
        }
    }

    let mut present = periods.iter().filter(|period| period.is_present());
    let Some(current) = present.next() else {
        return Ok(());
    };

    let count = 1 + present.count();
    if count > 1 {
        return Err(CoverageError::MultiplePresent { count });
    }

    match periods
        .iter()
        .map(|period| period.start)
        .filter(|start| *start > current.start)
        .max()
    {
        Some(later_start) => Err(CoverageError::PresentNotMostRecent {
            present_start: current.start,
            later_start,
        }),
        None => Ok(()),
    }
}

fn merge_spans(periods: &[ResidencePeriod], as_of: NaiveDate) -> Vec<Span> {
    let mut spans: Vec<Span> = periods
        .iter()
        .map(|period| Span {
            start: period.start,
            end: period.resolved_end(as_of),
            open: period.is_present(),
        })
        // zero-length or entirely future declarations cover nothing
        .filter(|span| span.start < span.end)
        .collect();
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));

    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(current) if (span.start - current.end).num_days() <= CONTIGUITY_TOLERANCE_DAYS => {
                if span.end > current.end {
                    current.end = span.end;
                    current.open = span.open;
                } else if span.end == current.end {
                    current.open |= span.open;
                }
            }
            _ => merged.push(span),
        }
    }

    merged
}

fn clip_to_window(span: Span, window_start: NaiveDate) -> Option<Span> {
    if span.end <= window_start {
        return None;
    }

    Some(Span {
        start: span.start.max(window_start),
        ..span
    })
}

fn find_gaps(spans: &[Span], window_start: NaiveDate, as_of: NaiveDate) -> Vec<DateRange> {
    let mut gaps = Vec::new();
    let mut cursor = window_start;

    for span in spans {
        if (span.start - cursor).num_days() > CONTIGUITY_TOLERANCE_DAYS {
            gaps.push(DateRange {
                start: cursor,
                end: span.start,
            });
        }
        cursor = cursor.max(span.end);
    }

    if (as_of - cursor).num_days() > CONTIGUITY_TOLERANCE_DAYS {
        gaps.push(DateRange {
            start: cursor,
            end: as_of,
        });
    }

    gaps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn merge_treats_one_day_apart_as_contiguous() {
        let as_of = day(2024, 1, 1);
        let periods = [
            ResidencePeriod::new(day(2020, 6, 1), day(2021, 1, 1)),
            ResidencePeriod::new(day(2019, 1, 1), day(2020, 5, 31)),
            ResidencePeriod::new(day(2021, 1, 3), day(2022, 1, 1)),
        ];

        let merged = merge_spans(&periods, as_of);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].start, day(2019, 1, 1));
        assert_eq!(merged[0].end, day(2021, 1, 1));
        assert_eq!(merged[1].start, day(2021, 1, 3));
    }

    #[test]
    fn present_flag_follows_the_latest_end() {
        let as_of = day(2024, 1, 1);
        let periods = [
            ResidencePeriod::new(day(2020, 1, 1), day(2030, 1, 1)),
            ResidencePeriod::ongoing(day(2022, 1, 1)),
        ];

        let merged = merge_spans(&periods, as_of);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].end, as_of);
        assert!(merged[0].open);
    }

    #[test]
    fn trailing_shortfall_within_tolerance_is_not_a_gap() {
        let spans = [Span {
            start: day(2019, 1, 1),
            end: day(2023, 12, 31),
            open: false,
        }];
        assert!(find_gaps(&spans, day(2019, 1, 1), day(2024, 1, 1)).is_empty());
        assert_eq!(
            find_gaps(&spans, day(2019, 1, 1), day(2024, 1, 2)),
            vec![DateRange {
                start: day(2023, 12, 31),
                end: day(2024, 1, 2),
            }]
        );
    }
}
