// Response object written back to the caller

use crate::sequencer::orchestrator::AggregateResult;
use serde::{Deserialize, Serialize};

/// `success` plus either `message` or `error`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }

    pub fn to_json(&self) -> String {
        // Only strings and a bool, serialization cannot fail
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!("{{\"success\":{}}}", self.success)
        })
    }
}

impl From<&AggregateResult> for SendResponse {
    fn from(result: &AggregateResult) -> Self {
        match result.failure_message() {
            Some(error) => Self::failure(error),
            None if result.is_success() => Self::ok(result.summary()),
            None => Self::failure("Failed to create clip in Ableton"),
        }
    }
}
