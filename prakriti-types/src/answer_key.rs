use std::fmt;
use std::str::FromStr;

/// Prefix shared by every answer key on the wire.
const PREFIX: char = 'q';

/// The key under which an answer travels in a submission, e.g. `"q7"`.
///
/// Keys are the question index prefixed with `q`. Parsing is strict:
/// `"q"`, `"q-1"`, `"q07x"` and `"Q7"` are not answer keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnswerKey {
    index: usize,
}

impl AnswerKey {
    /// Create a key for the question at `index`.
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    /// The zero-based question index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Try to read an answer key from a submission field name.
    pub fn parse(key: &str) -> Option<Self> {
        let digits = key.strip_prefix(PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(Self::new)
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", PREFIX, self.index)
    }
}

impl From<usize> for AnswerKey {
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

/// Error returned when a string is not an answer key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not an answer key (expected q<index>)")]
pub struct NotAnAnswerKey(pub String);

impl FromStr for AnswerKey {
    type Err = NotAnAnswerKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| NotAnAnswerKey(s.to_string()))
    }
}
