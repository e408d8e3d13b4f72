//! Engine runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into engine services. The engine never reads process-wide environment variables
//! itself; front ends resolve raw values (from flags, `.env` or the environment) and hand
//! them to the parsing helpers below.

use crate::constants::DEFAULT_CREAM_APPLICATIONS_PER_TUBE;
use crate::{EngineError, EngineResult};
use rx_types::Language;

/// Engine configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    cream_applications_per_tube: u32,
    language: Language,
}

impl EngineConfig {
    /// Create a new `EngineConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] if `cream_applications_per_tube` is zero.
    pub fn new(cream_applications_per_tube: u32, language: Language) -> EngineResult<Self> {
        if cream_applications_per_tube == 0 {
            return Err(EngineError::InvalidInput(
                "cream_applications_per_tube must be greater than zero".into(),
            ));
        }

        Ok(Self {
            cream_applications_per_tube,
            language,
        })
    }

    pub fn cream_applications_per_tube(&self) -> u32 {
        self.cream_applications_per_tube
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cream_applications_per_tube: DEFAULT_CREAM_APPLICATIONS_PER_TUBE,
            language: Language::default(),
        }
    }
}

/// Parse the cream applications-per-tube policy from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default policy.
pub fn cream_applications_per_tube_from_env_value(value: Option<String>) -> EngineResult<u32> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let Some(raw) = value else {
        return Ok(DEFAULT_CREAM_APPLICATIONS_PER_TUBE);
    };

    match raw.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(EngineError::InvalidInput(format!(
            "cream applications per tube must be a positive integer, got '{raw}'"
        ))),
    }
}

/// Parse the presentation language from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns English.
pub fn language_from_env_value(value: Option<String>) -> EngineResult<Language> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(Language::default()),
        Some(raw) => Language::from_tag(&raw).ok_or_else(|| {
            EngineError::InvalidInput(format!("unsupported language '{raw}' (expected en or ar)"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_weekly_tube_policy() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.cream_applications_per_tube(), 7);
        assert_eq!(cfg.language(), Language::En);
    }

    #[test]
    fn new_rejects_zero_applications_per_tube() {
        let err = EngineConfig::new(0, Language::En).expect_err("zero rejected");
        assert!(matches!(err, EngineError::InvalidInput(msg) if msg.contains("greater than zero")));
    }

    #[test]
    fn applications_per_tube_falls_back_to_default_when_blank() {
        assert_eq!(cream_applications_per_tube_from_env_value(None).unwrap(), 7);
        assert_eq!(
            cream_applications_per_tube_from_env_value(Some("  ".into())).unwrap(),
            7
        );
        assert_eq!(
            cream_applications_per_tube_from_env_value(Some(" 14 ".into())).unwrap(),
            14
        );
    }

    #[test]
    fn applications_per_tube_rejects_garbage() {
        for raw in ["0", "-3", "seven", "2.5"] {
            let err = cream_applications_per_tube_from_env_value(Some(raw.into()))
                .expect_err("should reject");
            assert!(matches!(err, EngineError::InvalidInput(_)), "{raw}");
        }
    }

    #[test]
    fn language_parses_known_tags() {
        assert_eq!(language_from_env_value(None).unwrap(), Language::En);
        assert_eq!(language_from_env_value(Some("AR".into())).unwrap(), Language::Ar);
        let err = language_from_env_value(Some("fr".into())).expect_err("unsupported");
        assert!(matches!(err, EngineError::InvalidInput(msg) if msg.contains("fr")));
    }
}
