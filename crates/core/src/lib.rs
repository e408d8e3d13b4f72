//! # Rx Core
//!
//! Prescription eligibility and dosage calculation engine for the insurance portal.
//!
//! This crate decides which catalog items (medicines, lab tests, radiology exams) may be
//! requested for a patient and computes the quantity or treatment duration of medication
//! orders:
//! - Numeric normalisation of localised (Arabic-Indic) digits and free-text ages
//! - Pharmaceutical form inference from bilingual item names
//! - Dosage input presentation (labels, helper text, per-day vs per-dose)
//! - Two-stage restriction checks: specialization rules, then per-item rules
//! - Quantity and duration arithmetic per pharmaceutical form
//!
//! Every engine function is a pure computation over its arguments. Insufficient input is
//! reported as `None` or an empty list, and a failed specialization check as an
//! [`EligibilityOutcome::Ineligible`] carrying a reason. [`EngineError`] is reserved for
//! malformed documents and invalid configuration.
//!
//! **No I/O**: loading session files, reading the environment and printing belong in `rx-cli`.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod digits;
pub mod error;
pub mod form;
pub mod order;
pub mod patient;
pub mod presentation;
pub mod quantity;
pub mod restriction;
pub mod session;

pub use catalog::CatalogItem;
pub use config::EngineConfig;
pub use digits::{age_on, extract_age_number, parse_birth_date, to_latin_digits};
pub use error::{EngineError, EngineResult};
pub use form::{detect_form_from_name, resolve_form, FORM_RULES};
pub use order::{DosageOrder, PrescriptionLine};
pub use patient::{parse_gender_code, MemberRecord, Patient};
pub use presentation::{
    get_dosage_helper_text, get_dosage_label, get_dosage_placeholder, is_dosage_per_day,
    is_liquid_medicine, DosagePresentation,
};
pub use quantity::{calculate_duration, calculate_required_quantity, QuantityCalculator};
pub use restriction::{
    check_specialization, evaluate_eligibility, filter_items, item_admits, AgeBounds,
    EligibilityOutcome, FilteredItems, RestrictionFailure, SpecializationRestriction,
};
pub use session::{render, DocumentFormat, NamedOrder, Session};

// Re-export the shared vocabulary so callers need a single dependency.
pub use rx_types::{
    Gender, GenderRule, ItemKind, Language, MemberSource, NonEmptyText, PharmaceuticalForm,
    TextError,
};
