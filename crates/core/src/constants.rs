//! Constants used throughout the engine.
//!
//! Policy values that a domain owner may need to tune are surfaced through
//! [`EngineConfig`](crate::EngineConfig); the defaults live here.

/// Cream/ointment applications assumed per tube when estimating a tube count.
///
/// Observed behaviour of the portal (`ceil(duration * times_per_day / 7)`); the
/// per-tube basis has not been confirmed with the formulary owner.
pub const DEFAULT_CREAM_APPLICATIONS_PER_TUBE: u32 = 7;

/// Environment variable overriding [`DEFAULT_CREAM_APPLICATIONS_PER_TUBE`].
pub const CREAM_APPLICATIONS_PER_TUBE_ENV: &str = "RX_CREAM_APPLICATIONS_PER_TUBE";

/// Environment variable selecting the presentation language (`en` or `ar`).
pub const LANGUAGE_ENV: &str = "RX_LANGUAGE";

/// Label used in restriction messages when the patient has no display name.
pub const UNNAMED_PATIENT: &str = "The patient";
