//! Error types shared by the balance sources

use thiserror::Error;

/// Error type for balance source operations
#[derive(Error, Debug)]
pub enum BalanceError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Missing field in response: {0}")]
    MissingField(String),

    #[error("Source error ({source_name}): {message}")]
    Source { source_name: String, message: String },

    #[error("{0} environment variable not set")]
    MissingEnv(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Input(String),
}

impl BalanceError {
    pub fn api(msg: impl Into<String>) -> Self {
        BalanceError::Api(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        BalanceError::Network(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        BalanceError::Auth(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        BalanceError::Parse(msg.into())
    }

    pub fn missing_field(path: impl Into<String>) -> Self {
        BalanceError::MissingField(path.into())
    }

    pub fn source(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        BalanceError::Source {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn missing_env(var: impl Into<String>) -> Self {
        BalanceError::MissingEnv(var.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        BalanceError::Config(msg.into())
    }

    pub fn input(msg: impl Into<String>) -> Self {
        BalanceError::Input(msg.into())
    }

    /// Whether this error comes from absent or malformed local configuration
    pub fn is_config(&self) -> bool {
        matches!(self, BalanceError::MissingEnv(_) | BalanceError::Config(_))
    }
}

/// Result type alias for balance source operations
pub type BalanceResult<T> = Result<T, BalanceError>;
