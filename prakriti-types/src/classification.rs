use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Dosha;

/// The constitution a respondent was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constitution {
    /// One dosha reached the dominance threshold.
    Single(Dosha),

    /// No dosha dominated; the two highest-ranked doshas, highest first.
    Blend(Dosha, Dosha),
}

impl Constitution {
    /// The label shown to the respondent and stored with the record,
    /// e.g. `"Vata"` or `"Pitta-Kapha"`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Constitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(dosha) => write!(f, "{dosha}"),
            Self::Blend(first, second) => write!(f, "{first}-{second}"),
        }
    }
}

/// A classification outcome: label plus descriptive text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    pub description: String,
}

impl Classification {
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        assert_eq!(Constitution::Single(Dosha::Kapha).label(), "Kapha");
        assert_eq!(
            Constitution::Blend(Dosha::Pitta, Dosha::Vata).label(),
            "Pitta-Vata"
        );
    }
}
