//! Catalog items: medicines, lab tests and radiology exams.

use crate::restriction::AgeBounds;
use rx_types::{Gender, ItemKind, NonEmptyText, PharmaceuticalForm};
use serde::Serialize;

/// A prescribable entry from the external catalog.
///
/// Read-only reference data. `form` is only meaningful for medicines and may be
/// absent, in which case it is inferred from `name` when needed.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub name: NonEmptyText,
    pub kind: ItemKind,
    pub form: Option<PharmaceuticalForm>,
    /// `None` or an empty list means no gender restriction.
    pub allowed_genders: Option<Vec<Gender>>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
    pub quantity_available: f64,
}

impl CatalogItem {
    /// An unrestricted medicine with no stock figure.
    pub fn medicine(name: NonEmptyText, form: Option<PharmaceuticalForm>) -> Self {
        Self {
            name,
            kind: ItemKind::Medicine,
            form,
            allowed_genders: None,
            min_age: None,
            max_age: None,
            quantity_available: 0.0,
        }
    }

    pub fn with_allowed_genders(mut self, genders: Vec<Gender>) -> Self {
        self.allowed_genders = Some(genders);
        self
    }

    pub fn with_age_bounds(mut self, min_age: Option<u32>, max_age: Option<u32>) -> Self {
        self.min_age = min_age;
        self.max_age = max_age;
        self
    }

    pub fn with_quantity_available(mut self, quantity: f64) -> Self {
        self.quantity_available = quantity;
        self
    }

    pub fn age_bounds(&self) -> AgeBounds {
        AgeBounds::new(self.min_age, self.max_age)
    }

    /// The item's form, falling back to inference from its name for medicines.
    pub fn resolved_form(&self) -> Option<PharmaceuticalForm> {
        if self.kind != ItemKind::Medicine {
            return None;
        }
        crate::form::resolve_form(self.form, Some(self.name.as_str()))
    }
}
