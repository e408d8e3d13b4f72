//! Request-creation session documents.
//!
//! A session document gathers what the portal collects on one request-creation
//! screen: the selected patient record, the chosen specialization's restrictions,
//! the candidate catalog items and, optionally, the dosage orders filled in so far.
//!
//! Responsibilities:
//! - Define a strict wire model (unknown keys rejected) for YAML and JSON input
//! - Translate wire tags into domain types, failing on tags that would otherwise
//!   silently widen a restriction
//! - Run the eligibility evaluation and order finalisation over the parsed session
//!
//! A structurally malformed document (for example `items` that is not a list) is a
//! caller contract violation and fails with [`EngineError::Translation`].

use crate::catalog::CatalogItem;
use crate::order::{DosageOrder, PrescriptionLine};
use crate::patient::{MemberRecord, Patient};
use crate::quantity::QuantityCalculator;
use crate::restriction::{evaluate_eligibility, EligibilityOutcome, SpecializationRestriction};
use crate::{EngineError, EngineResult};
use chrono::NaiveDate;
use rx_types::{Gender, GenderRule, ItemKind, NonEmptyText, PharmaceuticalForm};
use serde::{Deserialize, Serialize};

// ============================================================================
// Wire model
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SessionWire {
    patient: MemberRecord,
    #[serde(default)]
    specialization: Option<SpecializationWire>,
    #[serde(default)]
    items: Vec<CatalogItemWire>,
    #[serde(default)]
    orders: Vec<OrderWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SpecializationWire {
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    allowed_genders: Option<Vec<String>>,
    #[serde(default)]
    min_age: Option<u32>,
    #[serde(default)]
    max_age: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct CatalogItemWire {
    name: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    form: Option<String>,
    #[serde(default)]
    allowed_genders: Option<Vec<String>>,
    #[serde(default)]
    min_age: Option<u32>,
    #[serde(default)]
    max_age: Option<u32>,
    #[serde(default)]
    quantity_available: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct OrderWire {
    item: String,
    #[serde(default)]
    form: Option<String>,
    #[serde(default)]
    dosage: Option<f64>,
    #[serde(default)]
    times_per_day: Option<f64>,
    #[serde(default)]
    duration: Option<f64>,
}

// ============================================================================
// Translation
// ============================================================================

fn genders_from_wire(tags: Option<Vec<String>>, at: &str) -> EngineResult<Option<Vec<Gender>>> {
    let Some(tags) = tags else {
        return Ok(None);
    };

    let mut genders = Vec::with_capacity(tags.len());
    for tag in tags {
        let gender = Gender::from_tag(&tag).ok_or_else(|| {
            EngineError::Translation(format!("{at}: unknown gender '{tag}'"))
        })?;
        if !genders.contains(&gender) {
            genders.push(gender);
        }
    }
    Ok(Some(genders))
}

fn form_from_wire(tag: Option<String>, at: &str) -> Option<PharmaceuticalForm> {
    let tag = tag.filter(|t| !t.trim().is_empty())?;
    let form = PharmaceuticalForm::from_tag(&tag);
    if form.is_none() {
        // Unrecognised forms fall back to name inference.
        tracing::debug!(at, tag = %tag, "unrecognised form tag");
    }
    form
}

impl SpecializationWire {
    fn into_domain(self) -> EngineResult<SpecializationRestriction> {
        let gender = match self.gender.filter(|g| !g.trim().is_empty()) {
            None => None,
            Some(tag) => Some(GenderRule::from_tag(&tag).ok_or_else(|| {
                EngineError::Translation(format!("specialization.gender: unknown gender '{tag}'"))
            })?),
        };

        Ok(SpecializationRestriction {
            gender,
            allowed_genders: genders_from_wire(
                self.allowed_genders,
                "specialization.allowedGenders",
            )?,
            min_age: self.min_age,
            max_age: self.max_age,
        })
    }
}

impl CatalogItemWire {
    fn into_domain(self, index: usize) -> EngineResult<CatalogItem> {
        let name = NonEmptyText::new(&self.name)
            .map_err(|e| EngineError::Translation(format!("items.{index}.name: {e}")))?;

        let kind = match self.kind {
            None => ItemKind::default(),
            Some(tag) => ItemKind::from_tag(&tag).ok_or_else(|| {
                EngineError::Translation(format!("items.{index}.kind: unknown kind '{tag}'"))
            })?,
        };

        Ok(CatalogItem {
            name,
            kind,
            form: form_from_wire(self.form, &format!("items.{index}.form")),
            allowed_genders: genders_from_wire(
                self.allowed_genders,
                &format!("items.{index}.allowedGenders"),
            )?,
            min_age: self.min_age,
            max_age: self.max_age,
            quantity_available: self.quantity_available.unwrap_or(0.0),
        })
    }
}

// ============================================================================
// Public session operations
// ============================================================================

/// Serialisation format of a session document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Pick a format from a file extension; anything other than `json` is YAML.
    pub fn from_extension(ext: Option<&str>) -> Self {
        match ext.map(str::to_ascii_lowercase).as_deref() {
            Some("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

/// A dosage order addressed to a catalog item by name.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedOrder {
    pub item: String,
    pub order: DosageOrder,
}

/// A parsed request-creation session.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub patient: Patient,
    pub specialization: Option<SpecializationRestriction>,
    pub items: Vec<CatalogItem>,
    pub orders: Vec<NamedOrder>,
}

impl Session {
    /// Parse a session document, resolving the patient's age at `today`.
    ///
    /// This uses `serde_path_to_error` to report the path (e.g. `items.2.minAge`)
    /// of the first field that does not match the wire schema.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Translation`] if:
    /// - the document does not match the schema (wrong types, unknown keys),
    /// - an item name is blank,
    /// - a gender or item-kind tag is not recognised.
    pub fn parse(text: &str, format: DocumentFormat, today: NaiveDate) -> EngineResult<Self> {
        let parsed = match format {
            DocumentFormat::Yaml => {
                let de = serde_yaml::Deserializer::from_str(text);
                serde_path_to_error::deserialize::<_, SessionWire>(de)
                    .map_err(|err| schema_mismatch(err.path().to_string(), err.into_inner()))
            }
            DocumentFormat::Json => {
                let mut de = serde_json::Deserializer::from_str(text);
                serde_path_to_error::deserialize::<_, SessionWire>(&mut de)
                    .map_err(|err| schema_mismatch(err.path().to_string(), err.into_inner()))
            }
        };
        let wire = parsed?;

        let patient = Patient::resolve(&wire.patient, today);
        let specialization = wire
            .specialization
            .map(SpecializationWire::into_domain)
            .transpose()?;
        let items = wire
            .items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| item.into_domain(idx))
            .collect::<EngineResult<Vec<_>>>()?;
        let orders = wire
            .orders
            .into_iter()
            .enumerate()
            .map(|(idx, o)| NamedOrder {
                item: o.item.trim().to_string(),
                order: DosageOrder {
                    form: form_from_wire(o.form, &format!("orders.{idx}.form")),
                    dosage: o.dosage,
                    times_per_day: o.times_per_day,
                    duration: o.duration,
                },
            })
            .collect();

        Ok(Self {
            patient,
            specialization,
            items,
            orders,
        })
    }

    /// Run both eligibility stages over the session's items.
    pub fn evaluate(&self) -> EligibilityOutcome {
        evaluate_eligibility(&self.patient, self.specialization.as_ref(), &self.items)
    }

    /// Finalise every order whose item is eligible.
    ///
    /// Orders naming an item that is not in the eligible list are skipped.
    pub fn prescription_lines(
        &self,
        outcome: &EligibilityOutcome,
        calculator: &QuantityCalculator,
    ) -> Vec<PrescriptionLine> {
        self.orders
            .iter()
            .filter_map(|named| {
                let item = outcome
                    .items()
                    .iter()
                    .find(|i| i.name.as_str() == named.item);
                if item.is_none() {
                    tracing::warn!(item = %named.item, "order skipped: item is not eligible");
                }
                item.map(|item| named.order.finalize(item, calculator))
            })
            .collect()
    }
}

/// Render engine output (an outcome, prescription lines) as YAML or JSON text.
pub fn render<T: Serialize>(value: &T, format: DocumentFormat) -> EngineResult<String> {
    match format {
        DocumentFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        DocumentFormat::Json => Ok(serde_json::to_string_pretty(value)?),
    }
}

fn schema_mismatch(path: String, source: impl std::fmt::Display) -> EngineError {
    let path = if path.is_empty() || path == "." {
        "<root>".to_string()
    } else {
        path
    };
    EngineError::Translation(format!("session schema mismatch at {path}: {source}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date")
    }

    const PEDIATRIC_SESSION: &str = r#"patient:
  name: Yusuf
  birthDate: 2019-04-02
  gender: M
  source: FAMILY_MEMBER

specialization:
  gender: ALL
  maxAge: 14

items:
  - name: Brufen syrup 100ml
    quantityAvailable: 100
  - name: Adult multivitamin tablets
    minAge: 18
  - name: Fucidin cream
    form: CREAM
  - name: Complete blood count
    kind: LAB_TEST

orders:
  - item: Brufen syrup 100ml
    dosage: 5
    timesPerDay: 3
  - item: Adult multivitamin tablets
    dosage: 1
    timesPerDay: 1
    duration: 30
"#;

    #[test]
    fn parses_and_evaluates_yaml_session() {
        let session = Session::parse(PEDIATRIC_SESSION, DocumentFormat::Yaml, today())
            .expect("valid session");
        assert_eq!(session.patient.age, Some(7));
        assert_eq!(session.patient.gender, Some(Gender::Male));
        assert_eq!(session.items.len(), 4);
        assert_eq!(session.items[2].form, Some(PharmaceuticalForm::Cream));
        assert_eq!(session.items[3].kind, ItemKind::LabTest);

        let outcome = session.evaluate();
        assert!(outcome.is_eligible());
        let names: Vec<_> = outcome.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Brufen syrup 100ml", "Fucidin cream", "Complete blood count"]
        );
        assert_eq!(outcome.total(), 4);
    }

    #[test]
    fn orders_for_ineligible_items_are_skipped() {
        let session = Session::parse(PEDIATRIC_SESSION, DocumentFormat::Yaml, today())
            .expect("valid session");
        let outcome = session.evaluate();
        let lines = session.prescription_lines(&outcome, &QuantityCalculator::default());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].item_name, "Brufen syrup 100ml");
        assert_eq!(lines[0].duration, Some(6.0));
    }

    #[test]
    fn failed_specialization_check_reports_reason() {
        let doc = r#"{
            "patient": {"name": "Huda", "age": 30, "gender": "FEMALE"},
            "specialization": {"maxAge": 14},
            "items": [{"name": "Panadol tablets"}]
        }"#;
        let session = Session::parse(doc, DocumentFormat::Json, today()).expect("valid session");
        let outcome = session.evaluate();
        assert!(outcome.items().is_empty());
        assert!(outcome.reason().expect("reason").contains("Huda is 30 years old"));
    }

    #[test]
    fn items_that_are_not_a_list_fail_fast() {
        let doc = r#"patient:
  name: A
items:
  name: not-a-list
"#;
        let err = Session::parse(doc, DocumentFormat::Yaml, today()).expect_err("malformed");
        match err {
            EngineError::Translation(msg) => assert!(msg.contains("items"), "{msg}"),
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_keys_are_rejected_with_path() {
        let doc = r#"{"patient": {"name": "A"}, "items": [{"name": "X", "colour": "red"}]}"#;
        let err = Session::parse(doc, DocumentFormat::Json, today()).expect_err("unknown key");
        match err {
            EngineError::Translation(msg) => {
                assert!(msg.contains("items"), "{msg}");
                assert!(msg.contains("colour"), "{msg}");
            }
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_gender_tag_in_restriction_is_an_error() {
        let doc = r#"patient: {name: A}
items:
  - name: X
    allowedGenders: [FEMALE, OTHER]
"#;
        let err = Session::parse(doc, DocumentFormat::Yaml, today()).expect_err("bad gender");
        assert!(matches!(
            err,
            EngineError::Translation(msg) if msg.contains("items.0.allowedGenders")
        ));
    }

    #[test]
    fn blank_item_name_is_an_error() {
        let doc = r#"{"patient": {}, "items": [{"name": "   "}]}"#;
        let err = Session::parse(doc, DocumentFormat::Json, today()).expect_err("blank name");
        assert!(matches!(err, EngineError::Translation(msg) if msg.contains("items.0.name")));
    }

    #[test]
    fn unrecognised_form_tag_falls_back_to_name() {
        let doc = r#"{"patient": {}, "items": [{"name": "Otrivin drops", "form": "SPRAY?"}]}"#;
        let session = Session::parse(doc, DocumentFormat::Json, today()).expect("valid session");
        assert_eq!(session.items[0].form, None);
        assert_eq!(session.items[0].resolved_form(), Some(PharmaceuticalForm::Drops));
    }

    #[test]
    fn renders_lines_as_json_and_yaml() {
        let session = Session::parse(PEDIATRIC_SESSION, DocumentFormat::Yaml, today())
            .expect("valid session");
        let lines = session.prescription_lines(&session.evaluate(), &QuantityCalculator::default());

        let json = render(&lines, DocumentFormat::Json).expect("render json");
        assert!(json.contains("\"itemName\": \"Brufen syrup 100ml\""));
        assert!(json.contains("\"form\": \"SYRUP\""));

        let yaml = render(&lines, DocumentFormat::Yaml).expect("render yaml");
        assert!(yaml.contains("itemName: Brufen syrup 100ml"));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(DocumentFormat::from_extension(Some("JSON")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_extension(Some("yml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_extension(None), DocumentFormat::Yaml);
    }
}
