use serde::Serialize;

/// App-wide error type. Every fallible function returns `Result<T, AppError>`.
///
/// The taxonomy matters for the analysis flow: `ContractViolation` (the model
/// answered, but not in the agreed diagnostic shape) must stay distinguishable
/// from `Transport` (the call never completed) and `Upstream` (the provider
/// answered with an error status) even though the user sees the same generic
/// failure message for all three.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream model error ({status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Contract violation: {0}")]
    ContractViolation(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Stable machine-readable tag, used for log fields and serialization.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::Transport(_) => "transport",
            AppError::Upstream { .. } => "upstream",
            AppError::ContractViolation(_) => "contract_violation",
            AppError::Serde(_) => "serde",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
        }
    }
}

/// Serializes as `{ error: "...", kind: "..." }` for frontend consumption.
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("AppError", 2)?;
        s.serialize_field("error", &self.to_string())?;
        s.serialize_field("kind", self.kind())?;
        s.end()
    }
}
