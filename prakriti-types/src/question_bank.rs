use serde::{Deserialize, Serialize};

use crate::{Question, QuestionSource, SourceError};

/// The ordered, fixed list of questions a respondent goes through.
///
/// Serializes as `{ "questions": [ .. ] }`, the body of the question
/// endpoint, so a bank can be loaded from the same JSON it is served as.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Create a question bank with the given questions.
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Parse a bank from its JSON representation.
    ///
    /// Rejects banks without questions and questions without exactly
    /// three options.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        let bank: Self = serde_json::from_str(json)?;
        if bank.is_empty() {
            return Err(SourceError::Empty);
        }
        Ok(bank)
    }

    /// Get the questions.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Get the question at `index`.
    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Check if the bank has any questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Get the number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn into_questions(self) -> Vec<Question> {
        self.questions
    }
}

impl QuestionSource for QuestionBank {
    fn load(&self) -> Result<QuestionBank, SourceError> {
        Ok(self.clone())
    }
}
