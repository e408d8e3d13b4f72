//! Quantity and treatment-duration arithmetic for medication orders.
//!
//! All inputs are optional because the clinician fills the order incrementally.
//! A missing, zero, negative or NaN input that a formula needs yields `None`;
//! nothing here panics or divides by zero.

use crate::config::EngineConfig;
use crate::constants::DEFAULT_CREAM_APPLICATIONS_PER_TUBE;
use rx_types::PharmaceuticalForm;

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

/// Days of treatment that `available_quantity` covers at `dosage × times_per_day`
/// per day, rounded down. Never returns zero.
pub fn calculate_duration(
    available_quantity: f64,
    dosage: Option<f64>,
    times_per_day: Option<f64>,
) -> Option<u32> {
    // Each factor must be positive on its own.
    let daily = positive(dosage)? * positive(times_per_day)?;
    let daily = positive(Some(daily))?;
    let available = positive(Some(available_quantity))?;

    let days = (available / daily).floor();
    if days < 1.0 {
        return None;
    }
    Some(days.min(f64::from(u32::MAX)) as u32)
}

/// Required quantity for an order using the default cream policy.
///
/// See [`QuantityCalculator::required_quantity`].
pub fn calculate_required_quantity(
    form: Option<PharmaceuticalForm>,
    dosage: Option<f64>,
    times_per_day: Option<f64>,
    duration: Option<f64>,
) -> Option<f64> {
    required_quantity_with(
        DEFAULT_CREAM_APPLICATIONS_PER_TUBE,
        form,
        dosage,
        times_per_day,
        duration,
    )
}

fn required_quantity_with(
    applications_per_tube: u32,
    form: Option<PharmaceuticalForm>,
    dosage: Option<f64>,
    times_per_day: Option<f64>,
    duration: Option<f64>,
) -> Option<f64> {
    use PharmaceuticalForm::*;

    let duration = positive(duration)?;

    match form {
        Some(Tablet | Capsule) => Some(positive(dosage)? * positive(times_per_day)? * duration),
        // Dosage is injections per administration day.
        Some(Injection) => Some(positive(dosage)? * duration),
        // Bottle count is decided by server-side inventory rules; report the duration.
        Some(Syrup | Liquid | Drops) => Some(duration),
        Some(Cream | Ointment) => {
            let applications = duration * positive(times_per_day)?;
            Some((applications / f64::from(applications_per_tube.max(1))).ceil())
        }
        None => match (positive(dosage), positive(times_per_day)) {
            (Some(d), Some(t)) => Some(d * t * duration),
            _ => Some(duration),
        },
    }
}

/// Quantity arithmetic bound to an [`EngineConfig`].
#[derive(Clone, Debug, Default)]
pub struct QuantityCalculator {
    cfg: std::sync::Arc<EngineConfig>,
}

impl QuantityCalculator {
    pub fn new(cfg: std::sync::Arc<EngineConfig>) -> Self {
        Self { cfg }
    }

    /// Treatment days covered by the available quantity.
    pub fn duration(
        &self,
        available_quantity: f64,
        dosage: Option<f64>,
        times_per_day: Option<f64>,
    ) -> Option<u32> {
        calculate_duration(available_quantity, dosage, times_per_day)
    }

    /// Quantity to dispense for `duration` days.
    ///
    /// Per form:
    /// - tablet/capsule: `dosage × times_per_day × duration`
    /// - injection: `dosage × duration`
    /// - syrup/liquid/drops: `duration` (unit count left to the server)
    /// - cream/ointment: `ceil(duration × times_per_day / applications_per_tube)`
    /// - unknown: tablet formula when dosage and frequency are positive, else `duration`
    ///
    /// Returns `None` when `duration` is not positive or a required input is missing.
    pub fn required_quantity(
        &self,
        form: Option<PharmaceuticalForm>,
        dosage: Option<f64>,
        times_per_day: Option<f64>,
        duration: Option<f64>,
    ) -> Option<f64> {
        required_quantity_with(
            self.cfg.cream_applications_per_tube(),
            form,
            dosage,
            times_per_day,
            duration,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rx_types::Language;
    use std::sync::Arc;
    use PharmaceuticalForm::*;

    #[test]
    fn duration_divides_stock_by_daily_use() {
        assert_eq!(calculate_duration(30.0, Some(1.0), Some(2.0)), Some(15));
        assert_eq!(calculate_duration(31.0, Some(1.0), Some(2.0)), Some(15));
        assert_eq!(calculate_duration(100.0, Some(5.0), Some(3.0)), Some(6));
    }

    #[test]
    fn duration_guards_non_positive_inputs() {
        assert_eq!(calculate_duration(0.0, Some(1.0), Some(2.0)), None);
        assert_eq!(calculate_duration(30.0, Some(0.0), Some(2.0)), None);
        assert_eq!(calculate_duration(30.0, Some(1.0), None), None);
        assert_eq!(calculate_duration(-5.0, Some(1.0), Some(1.0)), None);
        assert_eq!(calculate_duration(f64::NAN, Some(1.0), Some(1.0)), None);
        assert_eq!(calculate_duration(30.0, Some(-1.0), Some(-2.0)), None);
    }

    #[test]
    fn duration_is_never_zero() {
        assert_eq!(calculate_duration(1.0, Some(1.0), Some(2.0)), None);
    }

    fn q(
        form: Option<PharmaceuticalForm>,
        dosage: Option<f64>,
        times_per_day: Option<f64>,
        duration: Option<f64>,
    ) -> Option<f64> {
        calculate_required_quantity(form, dosage, times_per_day, duration)
    }

    #[test]
    fn tablets_and_capsules_multiply_everything() {
        assert_eq!(q(Some(Tablet), Some(1.0), Some(3.0), Some(5.0)), Some(15.0));
        assert_eq!(q(Some(Capsule), Some(2.0), Some(2.0), Some(7.0)), Some(28.0));
        assert_eq!(q(Some(Tablet), None, Some(3.0), Some(5.0)), None);
        assert_eq!(q(Some(Tablet), Some(1.0), Some(0.0), Some(5.0)), None);
    }

    #[test]
    fn injections_ignore_frequency() {
        assert_eq!(q(Some(Injection), Some(1.0), None, Some(5.0)), Some(5.0));
        assert_eq!(q(Some(Injection), Some(1.0), Some(9.0), Some(5.0)), Some(5.0));
        assert_eq!(q(Some(Injection), None, Some(1.0), Some(5.0)), None);
    }

    #[test]
    fn liquids_and_drops_report_duration() {
        for form in [Syrup, Liquid, Drops] {
            assert_eq!(q(Some(form), Some(10.0), Some(3.0), Some(7.0)), Some(7.0));
            assert_eq!(q(Some(form), None, None, Some(7.0)), Some(7.0));
        }
    }

    #[test]
    fn creams_round_tube_count_up() {
        assert_eq!(q(Some(Cream), None, Some(2.0), Some(7.0)), Some(2.0));
        assert_eq!(q(Some(Ointment), None, Some(1.0), Some(8.0)), Some(2.0));
        assert_eq!(q(Some(Cream), Some(5.0), Some(1.0), Some(1.0)), Some(1.0));
        assert_eq!(q(Some(Cream), None, None, Some(7.0)), None);
    }

    #[test]
    fn unknown_form_falls_back() {
        assert_eq!(q(None, Some(2.0), Some(2.0), Some(3.0)), Some(12.0));
        assert_eq!(q(None, Some(2.0), None, Some(3.0)), Some(3.0));
        assert_eq!(q(None, None, None, Some(3.0)), Some(3.0));
    }

    #[test]
    fn non_positive_duration_yields_nothing() {
        for form in PharmaceuticalForm::ALL.map(Some).into_iter().chain([None]) {
            assert_eq!(calculate_required_quantity(form, Some(1.0), Some(1.0), Some(0.0)), None);
            assert_eq!(calculate_required_quantity(form, Some(1.0), Some(1.0), None), None);
            assert_eq!(calculate_required_quantity(form, Some(1.0), Some(1.0), Some(-3.0)), None);
        }
    }

    #[test]
    fn calculator_uses_configured_tube_policy() {
        let cfg = EngineConfig::new(14, Language::En).expect("valid config");
        let calc = QuantityCalculator::new(Arc::new(cfg));
        assert_eq!(calc.required_quantity(Some(Cream), None, Some(2.0), Some(7.0)), Some(1.0));
        assert_eq!(calc.required_quantity(Some(Cream), None, Some(2.0), Some(8.0)), Some(2.0));

        let default_calc = QuantityCalculator::default();
        assert_eq!(
            default_calc.required_quantity(Some(Cream), None, Some(2.0), Some(7.0)),
            Some(2.0)
        );
        assert_eq!(default_calc.duration(30.0, Some(1.0), Some(2.0)), Some(15));
    }

    proptest! {
        #[test]
        fn duration_is_positive_or_absent(
            available in -100.0f64..10_000.0,
            dosage in -5.0f64..50.0,
            times in -2.0f64..10.0,
        ) {
            let result = calculate_duration(available, Some(dosage), Some(times));
            if let Some(days) = result {
                prop_assert!(days >= 1);
                prop_assert!(f64::from(days) * dosage * times <= available + 1e-9);
            }
            prop_assert_eq!(result, calculate_duration(available, Some(dosage), Some(times)));
        }

        #[test]
        fn required_quantity_is_pure(
            form_idx in 0usize..9,
            dosage in proptest::option::of(-2.0f64..10.0),
            times in proptest::option::of(-2.0f64..6.0),
            duration in proptest::option::of(-5.0f64..60.0),
        ) {
            let form = PharmaceuticalForm::ALL.get(form_idx).copied();
            let first = calculate_required_quantity(form, dosage, times, duration);
            let second = calculate_required_quantity(form, dosage, times, duration);
            prop_assert_eq!(first, second);
            if let Some(q) = first {
                prop_assert!(q > 0.0);
            }
        }
    }
}
