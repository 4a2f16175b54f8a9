//! Error types for patient intake.

use std::time::Duration;

use uuid::Uuid;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// A submission attempt that failed before a response could be read.
///
/// The message text is what error classification matches against, so
/// transports should put the full cause chain into it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Request(String),
}

/// Registration lifecycle errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("Registration {0} not found")]
    NotFound(Uuid),

    #[error("Registration {id} already in state {state}, cannot submit again")]
    AlreadySubmitted { id: Uuid, state: String },

    #[error("Registration {id} cannot transition from {from} to {to}")]
    InvalidTransition { id: Uuid, from: String, to: String },
}

/// Dialogue tool errors.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Tool {name} not found")]
    NotFound { name: String },

    #[error("Tool {name} execution failed: {reason}")]
    ExecutionFailed { name: String, reason: String },

    #[error("Invalid parameters for tool {name}: {reason}")]
    InvalidParameters { name: String, reason: String },
}

/// Result type alias for patient intake.
pub type Result<T> = std::result::Result<T, Error>;
