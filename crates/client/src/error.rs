//! Client error types.
//!
//! All API operations return `Result<T, ApiError>`. Server-side rejections
//! carry the parsed error body so callers can render the server's own
//! message; transport and decoding failures wrap the underlying error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when talking to the PayMall API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or protocol-level request failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded.
    #[error("invalid response body: {0}")]
    Parse(#[from] serde_json::Error),

    /// The server rejected the request with a non-success status.
    #[error("API error {status}: {}", payload.message())]
    Api {
        /// HTTP status code of the rejection.
        status: u16,
        /// Parsed error body, or the default payload if none was provided.
        payload: ErrorPayload,
    },

    /// The session could not be renewed; the caller must sign in again.
    ///
    /// Surfaced only when the silent token refresh itself fails. A plain
    /// 401 on a regular endpoint is recovered internally and never reaches
    /// the caller as this variant unless the refresh call was rejected.
    #[error("session expired, sign in again")]
    SessionExpired,

    /// Rejected locally before any request was made: cart quantities must
    /// be at least 1.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The client was constructed with invalid settings.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl ApiError {
    /// HTTP status of a server-side rejection, if this error carries one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Error body returned by the PayMall API.
///
/// Django REST Framework is not consistent about the field name: permission
/// and auth failures use `detail`, the cart/order views use `error`, and a
/// few handlers use `message`. All three are captured; [`Self::message`]
/// picks whichever is present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// DRF's standard rejection field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Used by the cart and order views.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Used by a handful of legacy handlers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorPayload {
    /// The server-provided message, or a generic fallback.
    #[must_use]
    pub fn message(&self) -> &str {
        self.detail
            .as_deref()
            .or(self.error.as_deref())
            .or(self.message.as_deref())
            .unwrap_or("request failed")
    }

    /// Build a payload from a bare message string.
    #[must_use]
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            detail: None,
            error: Some(message.into()),
            message: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Api {
            status: 400,
            payload: ErrorPayload::from_message("Insufficient stock"),
        };
        assert_eq!(err.to_string(), "API error 400: Insufficient stock");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_session_expired_display() {
        assert_eq!(
            ApiError::SessionExpired.to_string(),
            "session expired, sign in again"
        );
        assert_eq!(ApiError::SessionExpired.status(), None);
    }

    #[test]
    fn test_payload_field_precedence() {
        let payload: ErrorPayload =
            serde_json::from_str(r#"{"detail": "Not found", "error": "other"}"#).unwrap();
        assert_eq!(payload.message(), "Not found");

        let payload: ErrorPayload = serde_json::from_str(r#"{"error": "Empty cart"}"#).unwrap();
        assert_eq!(payload.message(), "Empty cart");
    }

    #[test]
    fn test_payload_fallback_message() {
        let payload = ErrorPayload::default();
        assert_eq!(payload.message(), "request failed");
    }

    #[test]
    fn test_payload_ignores_unknown_fields() {
        let payload: ErrorPayload =
            serde_json::from_str(r#"{"error": "bad", "code": "stock_exhausted"}"#).unwrap();
        assert_eq!(payload.message(), "bad");
    }
}
