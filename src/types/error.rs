use thiserror::Error;

/// finops-lens error types
#[derive(Error, Debug)]
pub enum FinopsError {
    /// Failed to parse a snapshot or recorded payload
    #[error("parse error: {0}")]
    Parse(String),

    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("config error: {0}")]
    Config(String),

    /// A data source reported a deployment problem rather than cloud noise
    #[error("misconfigured source {source_name}: {message}")]
    Misconfigured {
        source_name: String,
        message: String,
    },

    /// Export formatting failed
    #[error("export error: {0}")]
    Export(String),
}

/// Result type alias for finops-lens
pub type Result<T> = std::result::Result<T, FinopsError>;

/// Outcome of a single data source call (analyzer, advisor, billing, region).
///
/// Everything except `Misconfigured` is expected operational noise and is
/// absorbed by the aggregator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("not enabled: {0}")]
    NotEnabled(String),

    #[error("throttled: {0}")]
    Throttled(String),

    #[error("unavailable: {0}")]
    Unavailable(String),

    #[error("misconfigured: {0}")]
    Misconfigured(String),
}

impl SourceError {
    /// True for failures the pipeline degrades around instead of raising.
    pub fn is_operational(&self) -> bool {
        !matches!(self, SourceError::Misconfigured(_))
    }
}
