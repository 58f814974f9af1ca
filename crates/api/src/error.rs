//! Error normalisation.

use bazaar_core::{NETWORK_ERROR_MESSAGE, TIMEOUT_MESSAGE, status_message};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Every way a backend call can fail.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never got a response.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The configured timeout elapsed.
    #[error("request timed out")]
    Timeout,

    /// The backend rejected the bearer token (or none was sent).
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// Any other non-success response, or a 2xx with `success: false`.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        data: Option<Value>,
    },

    /// The response body was not what we expected.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The request could not be built (bad URL, bad header, bad MIME type).
    #[error("invalid request: {0}")]
    Request(String),
}

impl ApiError {
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err)
        }
    }

    /// Build the error for a failed response from its status and body.
    ///
    /// The message is taken from the body's `message` (or `error`) field, or
    /// from the static status table when the backend sent none.
    pub(crate) fn from_response(status: u16, body: &Value) -> Self {
        let message = ["message", "error"]
            .into_iter()
            .filter_map(|key| body.get(key).and_then(Value::as_str))
            .map(str::trim)
            .find(|m| !m.is_empty())
            .map_or_else(|| status_message(status).to_string(), str::to_string);

        if status == 401 {
            return Self::Unauthorized { message };
        }

        let data = body.get("data").filter(|d| !d.is_null()).cloned();
        Self::Http {
            status,
            message,
            data,
        }
    }

    /// HTTP status, when a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text safe to show the user.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            Self::Timeout => TIMEOUT_MESSAGE.to_string(),
            Self::Unauthorized { message } | Self::Http { message, .. } => message.clone(),
            Self::Decode(_) | Self::Request(_) => status_message(500).to_string(),
        }
    }

    /// Extra payload the backend attached to the error.
    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        match self {
            Self::Http { data, .. } => data.as_ref(),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Whether the failure is ours or the backend's rather than the user's:
    /// transport, decoding, or a 5xx.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout | Self::Decode(_) | Self::Request(_) => true,
            Self::Http { status, .. } => *status >= 500,
            Self::Unauthorized { .. } => false,
        }
    }

    /// The uniform failure shape.
    #[must_use]
    pub fn into_body(self) -> ErrorBody {
        ErrorBody {
            success: false,
            status: self.status(),
            message: self.message(),
            data: match self {
                Self::Http { data, .. } => data,
                _ => None,
            },
        }
    }
}

/// `{ success: false, status?, message, data? }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}
