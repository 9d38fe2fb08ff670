use chrono::{DateTime, Months, NaiveDate};
use serde::{Deserialize, Deserializer};

/// Reduce a raw form value to a calendar day.
///
/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp. Timestamps keep the day as written in
/// their own offset, so a `00:30+01:00` entry is not pulled back to the previous UTC day.
pub fn calendar_day(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
}

pub fn parse_day(raw: &str) -> Result<NaiveDate, String> {
    calendar_day(raw).ok_or_else(|| {
        format!("failed to parse '{raw}' as a calendar day (YYYY-MM-DD or RFC 3339)")
    })
}

pub fn deserialize_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_day(&raw).map_err(serde::de::Error::custom)
}

/// Blank strings and nulls both read as "not captured".
pub fn deserialize_optional_day<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.filter(|value| !value.trim().is_empty())
        .map(|value| parse_day(&value).map_err(serde::de::Error::custom))
        .transpose()
}

/// Anniversary arithmetic in whole calendar months; 29 February lands on 28 February in
/// non-leap years.
pub fn years_after(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(years.checked_mul(12)?))
}

pub fn years_before(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    date.checked_sub_months(Months::new(years.checked_mul(12)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn timestamps_keep_their_local_day() {
        assert_eq!(
            calendar_day("2024-03-01T00:30:00+01:00"),
            Some(day(2024, 3, 1))
        );
        assert_eq!(
            calendar_day("2024-03-01T23:59:59Z"),
            Some(day(2024, 3, 1))
        );
        assert_eq!(calendar_day(" 2024-03-01 "), Some(day(2024, 3, 1)));
        assert_eq!(calendar_day("   "), None);
        assert!(parse_day("01/03/2024").is_err());
    }

    #[test]
    fn leap_day_anniversaries_clamp_to_month_end() {
        assert_eq!(years_after(day(2008, 2, 29), 16), Some(day(2024, 2, 29)));
        assert_eq!(years_after(day(2008, 2, 29), 15), Some(day(2023, 2, 28)));
        assert_eq!(years_before(day(2024, 2, 29), 5), Some(day(2019, 2, 28)));
    }
}
