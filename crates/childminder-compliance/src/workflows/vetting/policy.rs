use super::super::calendar::years_after;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_EXPIRING_SOON_DAYS: u32 = 90;
pub(crate) const DEFAULT_OVERDUE_AFTER_DAYS: u32 = 28;
pub(crate) const DEFAULT_MINIMUM_AGE: u32 = 16;
pub(crate) const DEFAULT_CERTIFICATE_VALIDITY_YEARS: u32 = 3;

/// Thresholds shared by every screen that derives a DBS status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompliancePolicy {
    /// Days before expiry at which a certificate becomes at risk.
    pub expiring_soon_days: u32,
    /// Days an outstanding request may wait before it is overdue.
    pub overdue_after_days: u32,
    /// Age from which a household member must be vetted.
    pub minimum_age: u32,
    /// Only feeds the expiry suggestion for newly issued certificates.
    pub certificate_validity_years: u32,
}

impl CompliancePolicy {
    pub fn suggested_expiry(&self, issued_on: NaiveDate) -> Option<NaiveDate> {
        years_after(issued_on, self.certificate_validity_years)
    }
}

impl Default for CompliancePolicy {
    fn default() -> Self {
        Self {
            expiring_soon_days: DEFAULT_EXPIRING_SOON_DAYS,
            overdue_after_days: DEFAULT_OVERDUE_AFTER_DAYS,
            minimum_age: DEFAULT_MINIMUM_AGE,
            certificate_validity_years: DEFAULT_CERTIFICATE_VALIDITY_YEARS,
        }
    }
}
