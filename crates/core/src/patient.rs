//! Patient resolution.
//!
//! A request-creation session is made for one patient: either the insured main
//! member or one of their registered dependents. The directory service hands
//! over a [`MemberRecord`] with loosely-typed age and gender fields; this module
//! resolves it once into an immutable [`Patient`] with a single representation
//! of "unknown" for each attribute.

use crate::digits::{age_on, extract_age_number, parse_birth_date};
use chrono::NaiveDate;
use rx_types::{Gender, MemberSource};
use serde::{Deserialize, Serialize};

/// Directory record for the selected main member or family member.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MemberRecord {
    #[serde(default)]
    pub name: String,

    /// Already-computed age, when the directory provides one.
    #[serde(default)]
    pub age: Option<u32>,

    /// Free-form age text such as `"25 years"` or `"٢٥ سنة"`.
    #[serde(default)]
    pub age_text: Option<String>,

    /// Birth date (`YYYY-MM-DD` or `DD/MM/YYYY`).
    #[serde(default)]
    pub birth_date: Option<String>,

    /// Gender code as stored by the directory.
    #[serde(default)]
    pub gender: Option<String>,

    #[serde(default)]
    pub source: MemberSource,
}

/// The patient a request is being created for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub display_name: String,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub source_kind: MemberSource,
}

impl Patient {
    pub fn new(
        display_name: impl Into<String>,
        age: Option<u32>,
        gender: Option<Gender>,
        source_kind: MemberSource,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            age,
            gender,
            source_kind,
        }
    }

    /// Resolve a directory record into a patient.
    ///
    /// Age precedence: the numeric `age`, then digits found in `age_text`, then
    /// completed years from `birth_date` at `today`. Anything unparseable
    /// resolves to unknown rather than failing.
    pub fn resolve(record: &MemberRecord, today: NaiveDate) -> Self {
        let age = record
            .age
            .or_else(|| extract_age_number(record.age_text.as_deref()))
            .or_else(|| {
                record
                    .birth_date
                    .as_deref()
                    .and_then(parse_birth_date)
                    .and_then(|dob| age_on(dob, today))
            });

        let gender = record.gender.as_deref().and_then(parse_gender_code);

        if age.is_none() {
            tracing::debug!(name = %record.name, "patient age could not be resolved");
        }

        Self {
            display_name: record.name.trim().to_string(),
            age,
            gender,
            source_kind: record.source,
        }
    }
}

/// Map a directory gender code to a [`Gender`].
///
/// Accepts `MALE`/`FEMALE`, the single-letter codes, and the Arabic words.
pub fn parse_gender_code(code: &str) -> Option<Gender> {
    let code = code.trim();
    if let Some(gender) = Gender::from_tag(code) {
        return Some(gender);
    }

    match code.to_ascii_uppercase().as_str() {
        "M" => Some(Gender::Male),
        "F" => Some(Gender::Female),
        "ذكر" => Some(Gender::Male),
        "أنثى" | "انثى" | "انثي" => Some(Gender::Female),
        _ => None,
    }
}
