use thiserror::Error;

/// Validation and contract errors exposed by `ivco-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,
    #[error("ticker length {len} exceeds max {max}")]
    TickerTooLong { len: usize, max: usize },
    #[error("ticker must start with an ASCII letter or digit: '{ch}'")]
    TickerInvalidStart { ch: char },
    #[error("ticker contains invalid character '{ch}' at index {index}")]
    TickerInvalidChar { ch: char, index: usize },

    #[error("reality coefficient must look like YEAR=FACTOR: '{value}'")]
    InvalidRealityCoefficient { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("trace_id must be 32 hex characters")]
    InvalidTraceId,
    #[error("source_chain must contain at least one source")]
    EmptySourceChain,

    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Arithmetic that the valuation engine refuses to carry out.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("growth series needs at least 2 points, got {len}")]
    InsufficientSeries { len: usize },

    #[error("elapsed years must be positive, got {years} ({start_year} -> {end_year})")]
    NonPositiveElapsedYears {
        start_year: i32,
        end_year: i32,
        years: i32,
    },

    #[error("field '{field}' must be finite")]
    NonFinite { field: &'static str },

    #[error(
        "terminal value undefined: discount_rate ({discount_rate}) must exceed stage3_cagr ({stage3_cagr})"
    )]
    TerminalGrowthNotBelowDiscount {
        discount_rate: f64,
        stage3_cagr: f64,
    },

    #[error("discount_rate must be greater than -1, got {value}")]
    InvalidDiscountRate { value: f64 },

    #[error("stage '{stage}' horizon must be at least one year")]
    EmptyHorizon { stage: &'static str },

    #[error("stage '{stage}' horizon of {years} years exceeds max {max}")]
    HorizonTooLong {
        stage: &'static str,
        years: u32,
        max: u32,
    },

    #[error("{operation} overflows a 64-bit integer")]
    Overflow { operation: &'static str },

    #[error("share_par_value must be positive, got {value}")]
    NonPositiveParValue { value: i64 },

    #[error("share count must be positive, got {value}")]
    NonPositiveShares { value: f64 },
}

impl DomainError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InsufficientSeries { .. } => "domain.insufficient_series",
            Self::NonPositiveElapsedYears { .. } => "domain.non_positive_elapsed_years",
            Self::NonFinite { .. } => "domain.non_finite",
            Self::TerminalGrowthNotBelowDiscount { .. } => "domain.terminal_growth",
            Self::InvalidDiscountRate { .. } => "domain.discount_rate",
            Self::EmptyHorizon { .. } => "domain.empty_horizon",
            Self::HorizonTooLong { .. } => "domain.horizon_too_long",
            Self::Overflow { .. } => "domain.overflow",
            Self::NonPositiveParValue { .. } => "domain.par_value",
            Self::NonPositiveShares { .. } => "domain.non_positive_shares",
        }
    }
}

/// Failures raised while talking to a statement provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("FMP_API_KEY not set; get a free key at financialmodelingprep.com")]
    MissingApiKey,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("upstream returned status {status} for {endpoint}")]
    Status { endpoint: String, status: u16 },

    #[error("malformed {endpoint} response: {message}")]
    Malformed { endpoint: String, message: String },
}

impl UpstreamError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingApiKey => "upstream.missing_api_key",
            Self::Transport(_) => "upstream.transport",
            Self::Status { .. } => "upstream.status",
            Self::Malformed { .. } => "upstream.malformed",
        }
    }
}

/// Errors surfaced by the composed fetch → valuation pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("insufficient data: {reason}")]
    InsufficientData { reason: String },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl PipelineError {
    pub fn insufficient(reason: impl Into<String>) -> Self {
        Self::InsufficientData {
            reason: reason.into(),
        }
    }
}
