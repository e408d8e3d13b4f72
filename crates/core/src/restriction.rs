//! Eligibility checks against specialization and item restrictions.
//!
//! Evaluation is two-stage and fail-closed:
//!
//! 1. The specialization's gender and age rules are checked against the patient.
//!    The first failing rule ends evaluation with a human-readable reason and an
//!    empty item list.
//! 2. Each catalog item is checked against its own gender and age restrictions.
//!    Items that fail are dropped silently; the caller shows "N of M".
//!
//! An unknown patient attribute never satisfies a restriction on that attribute.

use crate::catalog::CatalogItem;
use crate::constants::UNNAMED_PATIENT;
use crate::patient::Patient;
use rx_types::{Gender, GenderRule};
use serde::Serialize;
use std::fmt;

/// Inclusive age bounds. An absent bound imposes no constraint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeBounds {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl AgeBounds {
    pub fn new(min: Option<u32>, max: Option<u32>) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, age: u32) -> bool {
        self.min.map_or(true, |min| age >= min) && self.max.map_or(true, |max| age <= max)
    }

    /// Whether a patient with `age` satisfies these bounds. Unknown age only
    /// satisfies unbounded restrictions.
    pub fn admits(&self, age: Option<u32>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        age.is_some_and(|age| self.contains(age))
    }
}

impl fmt::Display for AgeBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => write!(f, "aged {min} to {max}"),
            (Some(min), None) => write!(f, "aged {min} or older"),
            (None, Some(max)) => write!(f, "aged {max} or younger"),
            (None, None) => f.write_str("of any age"),
        }
    }
}

/// Whether `gender` is admitted by an optional allowed-gender set. `None` and
/// empty sets are unrestricted; an unknown gender never matches a real set.
fn gender_admitted(allowed: Option<&[Gender]>, gender: Option<Gender>) -> bool {
    match allowed {
        None | Some([]) => true,
        Some(set) => gender.is_some_and(|g| set.contains(&g)),
    }
}

/// Restriction rules attached to a medical specialization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecializationRestriction {
    pub gender: Option<GenderRule>,
    pub allowed_genders: Option<Vec<Gender>>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
}

impl SpecializationRestriction {
    pub fn age_bounds(&self) -> AgeBounds {
        AgeBounds::new(self.min_age, self.max_age)
    }
}

/// Why a patient failed a specialization-level check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RestrictionFailure {
    GenderMismatch {
        patient: String,
        required: Gender,
        actual: Option<Gender>,
    },
    GenderNotAllowed {
        patient: String,
        allowed: Vec<Gender>,
        actual: Option<Gender>,
    },
    AgeUnknown {
        patient: String,
        bounds: AgeBounds,
    },
    AgeOutOfBounds {
        patient: String,
        age: u32,
        bounds: AgeBounds,
    },
}

fn gender_or_unknown(gender: Option<Gender>) -> String {
    gender.map_or_else(|| "unknown".to_string(), |g| g.to_string())
}

impl fmt::Display for RestrictionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestrictionFailure::GenderMismatch {
                patient,
                required,
                actual,
            } => write!(
                f,
                "{patient} cannot be served under this specialization: it is limited to {required} patients and the patient's gender is {}.",
                gender_or_unknown(*actual)
            ),
            RestrictionFailure::GenderNotAllowed {
                patient,
                allowed,
                actual,
            } => {
                let allowed = allowed
                    .iter()
                    .map(Gender::to_string)
                    .collect::<Vec<_>>()
                    .join(" or ");
                write!(
                    f,
                    "{patient} cannot be served under this specialization: it is limited to {allowed} patients and the patient's gender is {}.",
                    gender_or_unknown(*actual)
                )
            }
            RestrictionFailure::AgeUnknown { patient, bounds } => write!(
                f,
                "{patient}'s age is unknown, but this specialization is limited to patients {bounds}."
            ),
            RestrictionFailure::AgeOutOfBounds {
                patient,
                age,
                bounds,
            } => write!(
                f,
                "{patient} is {age} years old, but this specialization is limited to patients {bounds}."
            ),
        }
    }
}

/// Check the specialization-level rules against the patient.
///
/// Rules are evaluated in order (single gender, allowed gender set, age) and the
/// first failure is returned.
pub fn check_specialization(
    patient: &Patient,
    restriction: &SpecializationRestriction,
) -> Result<(), RestrictionFailure> {
    let name = if patient.display_name.is_empty() {
        UNNAMED_PATIENT.to_string()
    } else {
        patient.display_name.clone()
    };

    if let Some(required) = restriction.gender.and_then(GenderRule::required) {
        if patient.gender != Some(required) {
            return Err(RestrictionFailure::GenderMismatch {
                patient: name,
                required,
                actual: patient.gender,
            });
        }
    }

    if let Some(allowed) = restriction.allowed_genders.as_deref() {
        if !gender_admitted(Some(allowed), patient.gender) {
            return Err(RestrictionFailure::GenderNotAllowed {
                patient: name,
                allowed: allowed.to_vec(),
                actual: patient.gender,
            });
        }
    }

    let bounds = restriction.age_bounds();
    if !bounds.is_unbounded() {
        match patient.age {
            None => return Err(RestrictionFailure::AgeUnknown { patient: name, bounds }),
            Some(age) if !bounds.contains(age) => {
                return Err(RestrictionFailure::AgeOutOfBounds {
                    patient: name,
                    age,
                    bounds,
                })
            }
            Some(_) => {}
        }
    }

    Ok(())
}

/// Whether a single item's own restrictions admit the patient.
pub fn item_admits(item: &CatalogItem, patient: &Patient) -> bool {
    gender_admitted(item.allowed_genders.as_deref(), patient.gender)
        && item.age_bounds().admits(patient.age)
}

/// Items that passed their own restrictions, with the size of the input list.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredItems {
    pub items: Vec<CatalogItem>,
    pub total: usize,
}

impl FilteredItems {
    pub fn shown(&self) -> usize {
        self.items.len()
    }
}

/// Filter catalog items by their own gender and age restrictions.
pub fn filter_items(items: &[CatalogItem], patient: &Patient) -> FilteredItems {
    let kept = items
        .iter()
        .filter(|item| {
            let ok = item_admits(item, patient);
            if !ok {
                tracing::debug!(item = %item.name, "item excluded by its own restrictions");
            }
            ok
        })
        .cloned()
        .collect();

    FilteredItems {
        items: kept,
        total: items.len(),
    }
}

/// Result of a full eligibility evaluation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum EligibilityOutcome {
    /// Specialization rules passed; `items` are those admitted by their own rules.
    Eligible { items: Vec<CatalogItem>, total: usize },
    /// Specialization rules failed; no items are offered.
    Ineligible { reason: String, total: usize },
}

impl EligibilityOutcome {
    pub fn is_eligible(&self) -> bool {
        matches!(self, EligibilityOutcome::Eligible { .. })
    }

    /// Eligible items; empty when ineligible.
    pub fn items(&self) -> &[CatalogItem] {
        match self {
            EligibilityOutcome::Eligible { items, .. } => items,
            EligibilityOutcome::Ineligible { .. } => &[],
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            EligibilityOutcome::Eligible { .. } => None,
            EligibilityOutcome::Ineligible { reason, .. } => Some(reason.as_str()),
        }
    }

    /// Number of catalog items before any filtering.
    pub fn total(&self) -> usize {
        match self {
            EligibilityOutcome::Eligible { total, .. }
            | EligibilityOutcome::Ineligible { total, .. } => *total,
        }
    }
}

/// Run both stages: specialization rules (if any), then per-item rules.
pub fn evaluate_eligibility(
    patient: &Patient,
    specialization: Option<&SpecializationRestriction>,
    items: &[CatalogItem],
) -> EligibilityOutcome {
    if let Some(restriction) = specialization {
        if let Err(failure) = check_specialization(patient, restriction) {
            let reason = failure.to_string();
            tracing::info!(%reason, "specialization restriction failed");
            return EligibilityOutcome::Ineligible {
                reason,
                total: items.len(),
            };
        }
    }

    let FilteredItems { items, total } = filter_items(items, patient);
    EligibilityOutcome::Eligible { items, total }
}
