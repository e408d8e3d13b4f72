/// Errors raised for caller contract violations.
///
/// Business outcomes (ineligible patient, missing dosage input, unparseable age)
/// are never errors; they are `None`, an empty list or an
/// [`EligibilityOutcome::Ineligible`](crate::EligibilityOutcome) value.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("translation error: {0}")]
    Translation(String),

    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
