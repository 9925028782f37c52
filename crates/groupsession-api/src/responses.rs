//! Response types for the API
//!
//! Every server response is wrapped in a result envelope. `success` is the
//! only required field; a body without it is not an envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T = Value> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Build a `{success: false, error}` envelope
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Human-readable failure text, preferring `error` over `message`
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<T>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Total matching records on the server (absent on failure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u64>,
}

impl<T> PaginatedResponse<T> {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
            total_count: None,
            page: None,
            page_size: None,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }

    /// Records on this page, empty when the call failed
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.data.as_deref().unwrap_or_default()
    }
}

/// Payload of a login call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
