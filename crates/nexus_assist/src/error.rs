//! Error types for the assistant layer.

use thiserror::Error;

/// Result type alias for gateway calls.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Why a generation request produced no usable text.
///
/// Every variant means the same thing to the orchestration layer: generation
/// is unavailable and the fallback text is used. The variants exist so the
/// cause reads well in logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Backend unreachable: {0}")]
    Transport(String),

    #[error("Backend returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed backend response: {0}")]
    Malformed(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Gateway setup failed: {0}")]
    Setup(String),
}

/// Errors raised while resolving assistant configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
