//! The submission boundary: payload decoding, validation, assembly of the
//! response record and persistence.
//!
//! A submission travels as one flat JSON object holding the answers under
//! `q<index>` keys next to the personal info fields:
//!
//! ```json
//! { "q0": "a", "q1": "c", "name": "Asha", "gender": "Female",
//!   "phone": "9876543210", "email": "asha@example.com", "city": "Surat" }
//! ```

use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::validate::validate_all;
use crate::{
    AnswerKey, AnswerSet, Choice, Classification, Field, PersonalInfo, ResponseRecord,
    ResponseStore, StoreError, Tally, classify,
};

/// Message reported to the respondent when the record could not be saved.
pub const PERSISTENCE_FAILURE: &str = "Failed to save your result. Please try again.";

/// The request body is not a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid JSON format: {reason}")]
pub struct MalformedPayload {
    reason: String,
}

impl MalformedPayload {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// A submission rejected by validation. Nothing was persisted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Validation failed")]
pub struct Rejection {
    messages: Vec<String>,
}

impl Rejection {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    /// Every failure, in check order.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

/// Error type for [`submit`] and [`submit_json`].
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Malformed(#[from] MalformedPayload),

    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("{PERSISTENCE_FAILURE}")]
    Persistence(#[source] StoreError),
}

impl SubmitError {
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

/// Answers and personal info as submitted, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    answers: AnswerSet,
    /// Answer keys whose value is not one of the choice letters.
    invalid_answers: Vec<(AnswerKey, String)>,
    info: PersonalInfo,
}

impl Submission {
    pub fn new(answers: AnswerSet, info: PersonalInfo) -> Self {
        Self {
            answers,
            invalid_answers: Vec::new(),
            info,
        }
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn info(&self) -> &PersonalInfo {
        &self.info
    }

    /// Decode a request body.
    pub fn from_slice(body: &[u8]) -> Result<Self, MalformedPayload> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| MalformedPayload::new(e.to_string()))?;
        Self::from_value(value)
    }

    /// Decode a JSON value. Only objects are submissions.
    ///
    /// Non-string values count as missing. Keys that are neither answer keys
    /// nor personal info fields are ignored.
    pub fn from_value(value: Value) -> Result<Self, MalformedPayload> {
        let Value::Object(map) = value else {
            return Err(MalformedPayload::new("expected a JSON object"));
        };

        let mut submission = Self::default();
        for (key, value) in map {
            let Value::String(text) = value else {
                tracing::debug!(%key, "ignoring non-string submission value");
                continue;
            };
            if let Some(answer_key) = AnswerKey::parse(&key) {
                match Choice::from_letter(&text) {
                    Some(choice) => {
                        submission.answers.record(answer_key.index(), choice);
                    }
                    None => submission.invalid_answers.push((answer_key, text)),
                }
            } else if let Some(field) = Field::from_key(&key) {
                submission.info.set(field, text);
            } else {
                tracing::debug!(%key, "ignoring unknown submission key");
            }
        }
        submission.invalid_answers.sort_by_key(|(key, _)| *key);
        Ok(submission)
    }

    /// The flat JSON object sent to the submission endpoint.
    pub fn to_value(&self) -> Value {
        // Serialization of strings into a map cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for Submission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer
            .serialize_map(Some(self.answers.len() + self.invalid_answers.len() + 5))?;
        for (key, choice) in self.answers.keyed() {
            map.serialize_entry(&key.to_string(), choice.letter())?;
        }
        for (key, raw) in &self.invalid_answers {
            map.serialize_entry(&key.to_string(), raw)?;
        }
        for field in Field::ALL {
            map.serialize_entry(field.key(), self.info.get(field))?;
        }
        map.end()
    }
}

/// A validated submission, ready to be stored and reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub record: ResponseRecord,
    pub tally: Tally,
    pub classification: Classification,
}

/// Validate a submission against a questionnaire of `question_count`
/// questions and build its record.
///
/// All failures are collected: field errors first, then unanswered
/// questions, then invalid and unknown answers.
pub fn assemble(
    submission: &Submission,
    question_count: usize,
    timestamp: DateTime<Utc>,
) -> Result<Assessment, Rejection> {
    let mut messages: Vec<String> = validate_all(&submission.info)
        .iter()
        .map(ToString::to_string)
        .collect();

    let invalid: Vec<usize> = submission
        .invalid_answers
        .iter()
        .map(|(key, _)| key.index())
        .collect();
    messages.extend(
        submission
            .answers
            .missing(question_count)
            .into_iter()
            .filter(|index| !invalid.contains(index))
            .map(|index| format!("Question {} has not been answered.", index + 1)),
    );
    messages.extend(
        submission
            .invalid_answers
            .iter()
            .map(|(key, raw)| format!("Answer '{raw}' for {key} must be a, b or c.")),
    );
    messages.extend(
        submission
            .answers
            .keyed()
            .filter(|(key, _)| key.index() >= question_count)
            .map(|(key, _)| format!("{key} does not match any question.")),
    );

    if !messages.is_empty() {
        return Err(Rejection::new(messages));
    }

    let tally = submission.answers.tally();
    let classification = classify(&tally);
    let info = submission.info.trimmed();
    let record = ResponseRecord {
        timestamp,
        name: info.name,
        gender: info.gender,
        phone: info.phone,
        email: info.email,
        city: info.city,
        scores: tally.summary(),
        result: classification.label.clone(),
        description: classification.description.clone(),
    };

    Ok(Assessment {
        record,
        tally,
        classification,
    })
}

/// Assemble a submission and persist its record.
pub async fn submit(
    store: &dyn ResponseStore,
    submission: &Submission,
    question_count: usize,
) -> Result<Assessment, SubmitError> {
    let assessment = assemble(submission, question_count, Utc::now())?;
    store.insert(&assessment.record).await.map_err(|err| {
        tracing::error!(error = %err, store = store.label(), "failed to persist survey response");
        SubmitError::Persistence(err)
    })?;
    tracing::info!(
        result = %assessment.classification.label,
        scores = %assessment.record.scores,
        "survey response stored"
    );
    Ok(assessment)
}

/// Decode a raw request body, then [`submit`] it.
pub async fn submit_json(
    store: &dyn ResponseStore,
    body: &[u8],
    question_count: usize,
) -> Result<Assessment, SubmitError> {
    let submission = Submission::from_slice(body)?;
    submit(store, &submission, question_count).await
}
