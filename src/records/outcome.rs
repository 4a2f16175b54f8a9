//! Submission outcomes and the JSON shape relayed to the dialogue layer.

use serde::{Deserialize, Serialize};

use crate::registration::validate::describe_missing;

/// Result of one `submit` call.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// The record was incomplete; nothing was sent.
    ValidationFailed { missing_fields: Vec<String> },
    /// The records API accepted the record.
    Submitted { response: serde_json::Value },
    /// Delivery failed. `is_network_error` is set when every attempt failed
    /// on connectivity and the retry budget ran out.
    SubmissionFailed {
        message: String,
        is_network_error: bool,
    },
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Submitted { .. })
    }

    pub fn is_network_error(&self) -> bool {
        matches!(
            self,
            Self::SubmissionFailed {
                is_network_error: true,
                ..
            }
        )
    }

    /// Error text to show the user, if the outcome is a failure.
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::ValidationFailed { missing_fields } => Some(describe_missing(missing_fields)),
            Self::Submitted { .. } => None,
            Self::SubmissionFailed { message, .. } => Some(message.clone()),
        }
    }

    /// Short label for logs and status views.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ValidationFailed { .. } => "validation_failed",
            Self::Submitted { .. } => "submitted",
            Self::SubmissionFailed { .. } => "submission_failed",
        }
    }

    /// Convert to the wire shape the dialogue layer relays to the user.
    pub fn to_response(&self) -> SubmissionResponse {
        match self {
            Self::ValidationFailed { missing_fields } => SubmissionResponse {
                success: false,
                error: Some(describe_missing(missing_fields)),
                is_network_error: None,
                missing_fields: missing_fields.clone(),
                response: None,
            },
            Self::Submitted { response } => SubmissionResponse {
                success: true,
                error: None,
                is_network_error: None,
                missing_fields: Vec::new(),
                response: Some(response.clone()),
            },
            Self::SubmissionFailed {
                message,
                is_network_error,
            } => SubmissionResponse {
                success: false,
                error: Some(message.clone()),
                is_network_error: Some(*is_network_error),
                missing_fields: Vec::new(),
                response: None,
            },
        }
    }
}

/// `{success, error?, isNetworkError?, response?}` as seen by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_network_error: Option<bool>,
    /// Paths of blank fields when validation failed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<serde_json::Value>,
}

impl From<&SubmissionOutcome> for SubmissionResponse {
    fn from(outcome: &SubmissionOutcome) -> Self {
        outcome.to_response()
    }
}
