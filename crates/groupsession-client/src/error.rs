//! Error types for the GroupSession client

use thiserror::Error;

/// Fallback text when no better description of a failure exists
pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// Errors that can occur when using the GroupSession client
///
/// Only [`GroupSessionClient::new`](crate::GroupSessionClient::new) returns
/// these to the caller. Inside the request pipeline they are folded into a
/// `{success: false, error}` envelope by [`ClientError::failure_message`].
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration rejected before any request was made
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Header name or value cannot be sent over HTTP
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Request timeout
    #[error("Request timed out")]
    Timeout,

    /// Server answered with an error status and no result envelope
    #[error("Request failed with status code {status}")]
    Api {
        /// HTTP status code
        status: u16,
        /// `message` field of the response body, if it had one
        message: Option<String>,
    },

    /// Success status but the body is not a result envelope
    #[error("Invalid response: {source}")]
    InvalidResponse {
        /// `message` field of the response body, if it had one
        message: Option<String>,
        source: serde_json::Error,
    },
}

impl ClientError {
    /// Classify a transport error, keeping timeouts distinct
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }

    /// Text for the `error` field of a failure envelope
    ///
    /// Transport and response errors prefer the `message` the server put in
    /// the body, then their own description. Anything raised before the
    /// request reached the transport is reported as [`UNKNOWN_ERROR`].
    #[must_use]
    pub fn failure_message(&self) -> String {
        let message = match self {
            Self::Api { message, .. } | Self::InvalidResponse { message, .. } => message
                .as_deref()
                .filter(|m| !m.trim().is_empty())
                .map_or_else(|| self.to_string(), str::to_owned),
            Self::Http(_) | Self::Timeout => self.to_string(),
            Self::Json(_) | Self::Url(_) | Self::InvalidConfig(_) | Self::InvalidHeader(_) => {
                return UNKNOWN_ERROR.to_string();
            }
        };

        if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        }
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
