//! JSON bodies exchanged between the server and its clients.

use serde::{Deserialize, Serialize};

use crate::Tally;
use crate::submission::Assessment;

pub const VALIDATION_FAILED: &str = "Validation failed";
pub const INVALID_JSON: &str = "Invalid JSON format";
pub const NO_RESPONSES: &str = "No survey responses found.";
pub const FETCH_FAILED: &str = "Failed to fetch survey responses.";

/// File name of the CSV export of all stored responses.
pub const EXPORT_FILENAME: &str = "survey_responses.csv";

/// Body of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub result: String,
    pub description: String,
    pub counts: Tally,
}

impl From<&Assessment> for SubmitResponse {
    fn from(assessment: &Assessment) -> Self {
        Self {
            result: assessment.classification.label.clone(),
            description: assessment.classification.description.clone(),
            counts: assessment.tally,
        }
    }
}

/// Error body: `{ "error": .. }`, with `details` for validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Vec::new(),
        }
    }

    pub fn validation(details: Vec<String>) -> Self {
        Self {
            error: VALIDATION_FAILED.to_string(),
            details,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.error == VALIDATION_FAILED
    }
}

/// Informational body: `{ "message": .. }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}
