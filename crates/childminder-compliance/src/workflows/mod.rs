pub mod calendar;
pub mod coverage;
pub mod household;
pub mod vetting;
