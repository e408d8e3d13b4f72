//! Per-item medication orders and the payload line they produce.

use crate::catalog::CatalogItem;
use crate::quantity::QuantityCalculator;
use rx_types::{ItemKind, PharmaceuticalForm};
use serde::{Deserialize, Serialize};

/// Dosage schedule entered by the clinician for one selected item.
///
/// Every field is optional until the order is finalised.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DosageOrder {
    #[serde(default)]
    pub form: Option<PharmaceuticalForm>,
    #[serde(default)]
    pub dosage: Option<f64>,
    #[serde(default)]
    pub times_per_day: Option<f64>,
    /// Treatment duration in days.
    #[serde(default)]
    pub duration: Option<f64>,
}

/// Figures submitted to the request-creation API for one item.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionLine {
    pub item_name: String,
    pub kind: ItemKind,
    pub form: Option<PharmaceuticalForm>,
    pub dosage: Option<f64>,
    pub times_per_day: Option<f64>,
    pub duration: Option<f64>,
    pub quantity: Option<f64>,
}

impl DosageOrder {
    pub fn new(dosage: Option<f64>, times_per_day: Option<f64>, duration: Option<f64>) -> Self {
        Self {
            form: None,
            dosage,
            times_per_day,
            duration,
        }
    }

    /// Compute the payload line for `item`.
    ///
    /// The form is the order's own, else the item's tag, else inferred from the
    /// item name. A missing duration is derived from the item's available
    /// package quantity. Lab tests and radiology exams carry no dosage
    /// arithmetic and are passed through with a quantity of one.
    pub fn finalize(
        &self,
        item: &CatalogItem,
        calculator: &QuantityCalculator,
    ) -> PrescriptionLine {
        if item.kind != ItemKind::Medicine {
            return PrescriptionLine {
                item_name: item.name.to_string(),
                kind: item.kind,
                form: None,
                dosage: None,
                times_per_day: None,
                duration: None,
                quantity: Some(1.0),
            };
        }

        let form: Option<PharmaceuticalForm> = self.form.or_else(|| item.resolved_form());

        let duration = self.duration.or_else(|| {
            calculator
                .duration(item.quantity_available, self.dosage, self.times_per_day)
                .map(f64::from)
        });

        let quantity =
            calculator.required_quantity(form, self.dosage, self.times_per_day, duration);
        if quantity.is_none() {
            tracing::debug!(item = %item.name, "order has insufficient input for a quantity");
        }

        PrescriptionLine {
            item_name: item.name.to_string(),
            kind: item.kind,
            form,
            dosage: self.dosage,
            times_per_day: self.times_per_day,
            duration,
            quantity,
        }
    }
}
