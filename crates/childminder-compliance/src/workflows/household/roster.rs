use super::super::calendar::calendar_day;
use super::super::coverage::{PeriodEnd, ResidencePeriod};
use super::super::vetting::{CheckStatus, VettingRecord};
use super::domain::{HouseholdRole, MemberId, PersonFile};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::io::Read;

#[derive(Debug, thiserror::Error)]
pub enum RosterImportError {
    #[error("failed to read roster CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: '{value}' in column '{column}' is not a calendar day")]
    InvalidDate {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("row {row}: unknown check status '{value}'")]
    UnknownStatus { row: usize, value: String },
    #[error("row {row}: unknown household role '{value}'")]
    UnknownRole { row: usize, value: String },
}

/// Parse a household roster export into person files without address histories.
///
/// Expected headers: `Member ID, Name, Role, Date of Birth, Check Status, Requested On,
/// Issued On, Expires On`. Blank cells are read as "not captured".
pub fn parse_roster<R: Read>(reader: R) -> Result<Vec<PersonFile>, RosterImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut people = Vec::new();

    for (index, record) in csv_reader.deserialize::<RosterRow>().enumerate() {
        let row = index + 2;
        people.push(record?.into_person(row)?);
    }

    Ok(people)
}

/// Parse an address history export (`Member ID, From, To`) keyed by member.
///
/// `To` may be blank or `present` for the current address.
pub fn parse_addresses<R: Read>(
    reader: R,
) -> Result<BTreeMap<MemberId, Vec<ResidencePeriod>>, RosterImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut histories: BTreeMap<MemberId, Vec<ResidencePeriod>> = BTreeMap::new();

    for (index, record) in csv_reader.deserialize::<AddressRow>().enumerate() {
        let row = index + 2;
        let address = record?;
        let start = required_day(row, "From", &address.from)?;
        let end = match address.to.as_deref() {
            None => PeriodEnd::Present,
            Some(value) if value.eq_ignore_ascii_case("present") => PeriodEnd::Present,
            Some(value) => PeriodEnd::On(required_day(row, "To", value)?),
        };

        histories
            .entry(MemberId(address.member_id))
            .or_default()
            .push(ResidencePeriod { start, end });
    }

    Ok(histories)
}

/// Attach imported address histories; people absent from the export keep `None`.
pub fn attach_addresses(
    people: &mut [PersonFile],
    mut histories: BTreeMap<MemberId, Vec<ResidencePeriod>>,
) {
    for person in people {
        if let Some(residences) = histories.remove(&person.member_id) {
            person.residences = Some(residences);
        }
    }
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Member ID")]
    member_id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Role")]
    role: String,
    #[serde(
        rename = "Date of Birth",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    date_of_birth: Option<String>,
    #[serde(rename = "Check Status", default)]
    check_status: String,
    #[serde(
        rename = "Requested On",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    requested_on: Option<String>,
    #[serde(
        rename = "Issued On",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    issued_on: Option<String>,
    #[serde(
        rename = "Expires On",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    expires_on: Option<String>,
}

impl RosterRow {
    fn into_person(self, row: usize) -> Result<PersonFile, RosterImportError> {
        let role = HouseholdRole::parse(&self.role).ok_or_else(|| {
            RosterImportError::UnknownRole {
                row,
                value: self.role.clone(),
            }
        })?;
        let check_status = CheckStatus::parse(&self.check_status).ok_or_else(|| {
            RosterImportError::UnknownStatus {
                row,
                value: self.check_status.clone(),
            }
        })?;

        let vetting = VettingRecord {
            check_status,
            certificate_issued_on: optional_day(row, "Issued On", self.issued_on)?,
            certificate_expires_on: optional_day(row, "Expires On", self.expires_on)?,
            date_of_birth: optional_day(row, "Date of Birth", self.date_of_birth)?,
            requested_on: optional_day(row, "Requested On", self.requested_on)?,
        };

        Ok(PersonFile {
            member_id: MemberId(self.member_id),
            display_name: self.name,
            role,
            vetting,
            residences: None,
            history_explanation: None,
        })
    }
}

#[derive(Debug, Deserialize)]
struct AddressRow {
    #[serde(rename = "Member ID")]
    member_id: String,
    #[serde(rename = "From")]
    from: String,
    #[serde(rename = "To", default, deserialize_with = "empty_string_as_none")]
    to: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn required_day(row: usize, column: &'static str, value: &str) -> Result<NaiveDate, RosterImportError> {
    calendar_day(value).ok_or_else(|| RosterImportError::InvalidDate {
        row,
        column,
        value: value.to_string(),
    })
}

fn optional_day(
    row: usize,
    column: &'static str,
    value: Option<String>,
) -> Result<Option<NaiveDate>, RosterImportError> {
    value
        .map(|value| required_day(row, column, &value))
        .transpose()
}
