use chrono::{Days, Months, NaiveDate};

use crate::workflows::vetting::domain::{CheckStatus, VettingRecord};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date")
}

pub(super) fn days_after(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).expect("in range")
}

pub(super) fn days_before(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).expect("in range")
}

pub(super) fn years_before(date: NaiveDate, years: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(years * 12))
        .expect("in range")
}

pub(super) fn years_after(date: NaiveDate, years: u32) -> NaiveDate {
    date.checked_add_months(Months::new(years * 12))
        .expect("in range")
}

pub(super) fn adult() -> NaiveDate {
    years_before(today(), 34)
}

pub(super) fn received(expires_on: NaiveDate) -> VettingRecord {
    VettingRecord {
        certificate_issued_on: Some(years_before(expires_on, 3)),
        certificate_expires_on: Some(expires_on),
        ..VettingRecord::new(CheckStatus::Received, adult())
    }
}

pub(super) fn requested(requested_on: NaiveDate) -> VettingRecord {
    VettingRecord {
        requested_on: Some(requested_on),
        ..VettingRecord::new(CheckStatus::Requested, adult())
    }
}
