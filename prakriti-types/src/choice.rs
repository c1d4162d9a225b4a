use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three options of a question, identified by position.
///
/// On the wire a choice is the lowercase letter `"a"`, `"b"` or `"c"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    A,
    B,
    C,
}

impl Choice {
    /// All choices in option order.
    pub const ALL: [Choice; 3] = [Choice::A, Choice::B, Choice::C];

    /// The choice for the option at `position` (0, 1 or 2).
    pub fn from_position(position: usize) -> Option<Self> {
        Self::ALL.get(position).copied()
    }

    /// The option position this choice refers to.
    pub fn position(&self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
        }
    }

    /// Parse the wire letter. Only the exact lowercase letters are accepted.
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "a" => Some(Self::A),
            "b" => Some(Self::B),
            "c" => Some(Self::C),
            _ => None,
        }
    }

    /// The wire letter.
    pub fn letter(&self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::C => "c",
        }
    }

    /// The constitution this choice counts towards.
    pub fn dosha(&self) -> Dosha {
        match self {
            Self::A => Dosha::Vata,
            Self::B => Dosha::Pitta,
            Self::C => Dosha::Kapha,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// The three constitutions a respondent is scored against.
///
/// Declaration order (Vata, Pitta, Kapha) is the fixed tie-break order
/// used when ranking tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dosha {
    Vata,
    Pitta,
    Kapha,
}

impl Dosha {
    /// All doshas in tie-break order.
    pub const ALL: [Dosha; 3] = [Dosha::Vata, Dosha::Pitta, Dosha::Kapha];

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Vata => "Vata",
            Self::Pitta => "Pitta",
            Self::Kapha => "Kapha",
        }
    }
}

impl fmt::Display for Dosha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_map_to_letters() {
        for (position, letter) in ["a", "b", "c"].into_iter().enumerate() {
            let choice = Choice::from_position(position).unwrap();
            assert_eq!(choice.letter(), letter);
            assert_eq!(choice.position(), position);
            assert_eq!(Choice::from_letter(letter), Some(choice));
        }
        assert!(Choice::from_position(3).is_none());
    }

    #[test]
    fn letters_are_case_sensitive() {
        assert!(Choice::from_letter("A").is_none());
        assert!(Choice::from_letter("").is_none());
        assert!(Choice::from_letter("d").is_none());
    }

    #[test]
    fn choice_maps_to_dosha() {
        assert_eq!(Choice::A.dosha(), Dosha::Vata);
        assert_eq!(Choice::B.dosha(), Dosha::Pitta);
        assert_eq!(Choice::C.dosha(), Dosha::Kapha);
    }

    #[test]
    fn serde_uses_lowercase_letters() {
        assert_eq!(serde_json::to_string(&Choice::B).unwrap(), "\"b\"");
        let parsed: Choice = serde_json::from_str("\"c\"").unwrap();
        assert_eq!(parsed, Choice::C);
    }
}
