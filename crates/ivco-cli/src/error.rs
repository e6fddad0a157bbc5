use ivco_core::{DomainError, PipelineError, ProviderId, UpstreamError, ValidationError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<PipelineError> for CliError {
    fn from(error: PipelineError) -> Self {
        match error {
            PipelineError::InsufficientData { reason } => Self::InsufficientData(reason),
            PipelineError::Domain(error) => Self::Domain(error),
            PipelineError::Upstream(error) => Self::Upstream(error),
        }
    }
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::InvalidInput(_) => 2,
            Self::Domain(_) => 3,
            Self::Upstream(_) => 4,
            Self::InsufficientData(_) => 5,
            Self::Config(_) => 6,
            Self::Serialization(_) => 10,
            Self::Io(_) => 10,
        }
    }

    /// Stable machine-readable code for the envelope `errors` array.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::InvalidInput(_) => "validation",
            Self::Domain(error) => error.code(),
            Self::Upstream(error) => error.code(),
            Self::InsufficientData(_) => "insufficient_data",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
            Self::Io(_) => "io",
        }
    }

    pub const fn provider(&self) -> Option<ProviderId> {
        match self {
            Self::Upstream(_) => Some(ProviderId::Fmp),
            _ => None,
        }
    }
}
