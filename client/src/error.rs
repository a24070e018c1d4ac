//! Client error types

use shared::error::ErrorCode;
use thiserror::Error;

/// Client error type
///
/// `is_retryable` encodes the workflow policy: transport failures, timeouts
/// and 5xx responses may be retried by the user; 4xx responses are terminal
/// for the attempt. Nothing retries automatically.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport failed
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Server returned a status-coded error payload
    #[error("API error ({status}): {message}")]
    Api {
        code: ErrorCode,
        status: u16,
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// True when a user-initiated retry is worth offering.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout => true,
            Self::Api { status, .. } => *status >= 500,
            Self::InvalidResponse(_) => false,
        }
    }

    /// True when the server reported the resource gone (404).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Http(e)
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_policy_follows_status_class() {
        let server_err = ClientError::Api {
            code: ErrorCode::InternalError,
            status: 500,
            message: "boom".into(),
        };
        assert!(server_err.is_retryable());

        let validation = ClientError::Api {
            code: ErrorCode::RequiredField,
            status: 400,
            message: "time is required".into(),
        };
        assert!(!validation.is_retryable());

        assert!(ClientError::Timeout.is_retryable());
        assert!(!ClientError::InvalidResponse("bad json".into()).is_retryable());
    }

    #[test]
    fn not_found_detection() {
        let gone = ClientError::Api {
            code: ErrorCode::OrderNotFound,
            status: 404,
            message: "Order not found".into(),
        };
        assert!(gone.is_not_found());
        assert!(!gone.is_retryable());
        assert!(!ClientError::Timeout.is_not_found());
    }
}
