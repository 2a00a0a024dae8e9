//! Error types for the Tether interpreter.

use thiserror::Error;

/// Main error type for Tether operations.
#[derive(Error, Debug)]
pub enum TetherError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Classification error: {0}")]
    Classify(#[from] ClassifyError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Precondition failure: commands execute within exactly one scope.
    #[error("No scope selected. Pick a scope such as Work or Personal before running commands.")]
    NoScope,
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Classification errors raised by the AI path.
///
/// Every variant is recoverable: the classifier chain logs the error and
/// falls through to the next classifier. Nothing here reaches the end user.
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("No API credential configured")]
    MissingCredential,

    #[error("Transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Empty completion reply")]
    EmptyReply,

    #[error("Malformed completion reply: {0}")]
    MalformedReply(String),

    #[error("All classifiers failed")]
    Exhausted,
}

/// Entity-store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Tether operations.
pub type Result<T> = std::result::Result<T, TetherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TetherError::Config(ConfigError::MissingField("ai.model".to_string()));
        assert!(err.to_string().contains("ai.model"));
    }

    #[test]
    fn test_error_conversion() {
        let store_err = StoreError::NotFound("event abc".to_string());
        let err: TetherError = store_err.into();
        assert!(matches!(err, TetherError::Store(_)));
    }
}
