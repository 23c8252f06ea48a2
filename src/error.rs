//! Error types for quiet-hn
//!
//! Two failure classes matter to callers:
//! - [`LookupError`] - a single feed or item request failed. Per-item lookup
//!   failures are swallowed by the collector and only cost a story slot.
//! - [`Error::Aggregation`] - the ranked ID list itself could not be loaded,
//!   so the whole request is unservable.
//!
//! The rest of this module maps errors onto HTTP responses for the API.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::types::ItemId;

/// Result type alias for quiet-hn operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for quiet-hn
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "fetch.worker_count")
        key: Option<String>,
    },

    /// A single lookup against the feed failed
    ///
    /// The service never returns this; it lets direct [`ItemSource`](crate::ItemSource)
    /// callers propagate a [`LookupError`] with `?`.
    #[error("lookup failed: {0}")]
    Lookup(#[from] LookupError),

    /// The ranked ID list could not be loaded, so no stories can be served
    #[error("failed to load top stories: {0}")]
    Aggregation(#[source] LookupError),

    /// The worker pool has been shut down and no longer accepts jobs
    #[error("shutdown in progress: worker pool is not accepting jobs")]
    ShuttingDown,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

/// Failure of one request against the feed (ranked list or item detail)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    /// Transport-level failure (connect, timeout, reset)
    #[error("network error: {0}")]
    Network(String),

    /// The feed answered with a non-success status
    #[error("unexpected status {status} from {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// The response body could not be decoded
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The feed has no item with this ID
    #[error("item {0} not found")]
    NotFound(ItemId),
}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            LookupError::Malformed(e.to_string())
        } else if let Some(status) = e.status() {
            LookupError::Status {
                status: status.as_u16(),
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
            }
        } else {
            LookupError::Network(e.to_string())
        }
    }
}

/// API error response format
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "upstream_unavailable",
///     "message": "failed to load top stories: network error: ..."
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "validation_error")
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context about the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create a "validation error" error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }

    /// Create an "internal server error"
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            Error::Config { .. } => 400,

            // The feed is an upstream dependency
            Error::Aggregation(_) => 502,
            Error::Lookup(LookupError::NotFound(_)) => 404,
            Error::Lookup(_) => 502,

            Error::ShuttingDown => 503,

            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Aggregation(_) => "upstream_unavailable",
            Error::Lookup(e) => match e {
                LookupError::Network(_) => "network_error",
                LookupError::Status { .. } => "upstream_status",
                LookupError::Malformed(_) => "malformed_response",
                LookupError::NotFound(_) => "item_not_found",
            },
            Error::ShuttingDown => "shutting_down",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        let details = match &error {
            Error::Config { key: Some(key), .. } => Some(serde_json::json!({ "key": key })),
            Error::Lookup(LookupError::NotFound(id)) => Some(serde_json::json!({
                "item_id": id,
            })),
            Error::Aggregation(LookupError::Status { status, url })
            | Error::Lookup(LookupError::Status { status, url }) => Some(serde_json::json!({
                "upstream_status": status,
                "url": url,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
