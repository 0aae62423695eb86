//! Error types for the Snowflake MCP Server.
//!
//! This module defines all error types using `thiserror`. Tool handlers keep
//! structured errors internally and render them to text only at the tool
//! boundary, so a failed call still produces a normal text response.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnowflakeError {
    #[error("Connection failed: {message}")]
    Connection { message: String },

    #[error("{message}")]
    Query {
        message: String,
        /// Snowflake error code (e.g. "390100" for incorrect credentials)
        code: Option<String>,
    },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SnowflakeError {
    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error without a Snowflake error code.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
            code: None,
        }
    }

    /// Create a query error carrying the Snowflake error code.
    pub fn query_with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
            code: Some(code.into()),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Snowflake error code, if the warehouse reported one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Query { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

/// Convert reqwest errors to SnowflakeError.
///
/// Transport-level failures (DNS, TCP, TLS, timeouts) map to `Connection`;
/// everything else surfaces as `Internal`.
impl From<reqwest::Error> for SnowflakeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            SnowflakeError::connection(err.to_string())
        } else if err.is_status() {
            SnowflakeError::query(err.to_string())
        } else {
            SnowflakeError::internal(err.to_string())
        }
    }
}

/// Result type alias for warehouse operations.
pub type SnowflakeResult<T> = Result<T, SnowflakeError>;
