use thiserror::Error;

/// Typed error hierarchy for the optimizer core.
///
/// The evaluation and selection functions themselves are total and never
/// return errors; this type covers the configuration surface (policy table
/// loading) and lets callers propagate with `?`.
#[derive(Debug, Error)]
pub enum OptimizerError {
    #[error("policy config: {0}")]
    Config(String),

    #[error("{0}")]
    Io(String),
}

/// Serialize as a plain string so consumers that surface errors to a UI
/// receive a single `"error message"` string.
impl serde::Serialize for OptimizerError {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl From<std::io::Error> for OptimizerError {
    fn from(e: std::io::Error) -> Self {
        OptimizerError::Io(e.to_string())
    }
}
