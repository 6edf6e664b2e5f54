//! Error types and handling for toolsmith core

use thiserror::Error;

/// Result type alias for toolsmith operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for toolsmith core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// LLM client errors
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Tool loading and execution errors
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    /// Remote tool-call transport errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for field '{field}': {value}")]
    InvalidValue { field: String, value: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid configuration format")]
    InvalidFormat,
}

/// LLM client errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {message}")]
    Network { message: String },
}

/// Tool loading and execution errors
///
/// `NotFound` covers a missing manifest file, `LoadFailed` a manifest that
/// cannot be parsed, `ContractViolation` a broken naming contract or a
/// dangling handler reference, `InvalidParameters` structured-input decoding.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool file not found: {path}")]
    NotFound { path: String },

    #[error("Failed to load tool manifest {path}: {message}")]
    LoadFailed { path: String, message: String },

    #[error("Tool contract violation: {message}")]
    ContractViolation { message: String },

    #[error("Invalid tool parameters: {message}")]
    InvalidParameters { message: String },

    #[error("Tool execution failed: {name} - {message}")]
    ExecutionFailed { name: String, message: String },

    #[error("Tool timeout: {name}")]
    Timeout { name: String },
}

/// Remote tool-call transport errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Tool server unreachable: {message}")]
    Unreachable { message: String },

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Generic(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Generic(msg.to_string())
    }
}
