//! The response envelope.

use serde::{Deserialize, Serialize};

/// Uniform envelope for every API response.
///
/// `result` is always present on the wire; failures carry `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub result: Option<T>,
    pub message: String,
}

impl<T> ApiEnvelope<T> {
    /// Wraps a successful result.
    pub fn ok(result: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            result: Some(result),
            message: message.into(),
        }
    }
}

impl ApiEnvelope<serde_json::Value> {
    /// Wraps a failure message with a null result.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            message: message.into(),
        }
    }
}
