use serde::{Deserialize, Serialize};

use crate::Choice;

/// Every question offers exactly this many options.
pub const OPTIONS_PER_QUESTION: usize = 3;

/// A single question of the questionnaire.
///
/// The options map to the answer buckets by position: the first option is
/// `Choice::A`, the second `Choice::B`, the third `Choice::C`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The prompt text shown to the respondent.
    #[serde(rename = "question")]
    text: String,

    /// The three option texts, in bucket order.
    options: [String; OPTIONS_PER_QUESTION],
}

impl Question {
    /// Create a new question.
    pub fn new(
        text: impl Into<String>,
        options: [impl Into<String>; OPTIONS_PER_QUESTION],
    ) -> Self {
        Self {
            text: text.into(),
            options: options.map(Into::into),
        }
    }

    /// Get the prompt text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the option texts in bucket order.
    pub fn options(&self) -> &[String; OPTIONS_PER_QUESTION] {
        &self.options
    }

    /// Get the text of the option behind a choice.
    pub fn option(&self, choice: Choice) -> &str {
        &self.options[choice.position()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_by_choice() {
        let question = Question::new("Appetite?", ["irregular", "sharp", "slow"]);
        assert_eq!(question.option(Choice::A), "irregular");
        assert_eq!(question.option(Choice::C), "slow");
    }

    #[test]
    fn wire_shape() {
        let question = Question::new("Skin?", ["dry", "warm", "oily"]);
        let json = serde_json::to_value(&question).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "question": "Skin?", "options": ["dry", "warm", "oily"] })
        );
    }

    #[test]
    fn rejects_wrong_option_count() {
        let parsed: Result<Question, _> =
            serde_json::from_str(r#"{ "question": "Hair?", "options": ["thin", "fine"] }"#);
        assert!(parsed.is_err());
    }
}
