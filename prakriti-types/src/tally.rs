use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Choice, Dosha};

/// Answer counts per constitution.
///
/// Serializes as `{ "vata": .., "pitta": .., "kapha": .. }`, the `counts`
/// object returned by the submission endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tally {
    pub vata: u32,
    pub pitta: u32,
    pub kapha: u32,
}

impl Tally {
    pub fn new(vata: u32, pitta: u32, kapha: u32) -> Self {
        Self { vata, pitta, kapha }
    }

    /// Count one more answer.
    pub fn add(&mut self, choice: Choice) {
        match choice.dosha() {
            Dosha::Vata => self.vata += 1,
            Dosha::Pitta => self.pitta += 1,
            Dosha::Kapha => self.kapha += 1,
        }
    }

    pub fn count(&self, dosha: Dosha) -> u32 {
        match dosha {
            Dosha::Vata => self.vata,
            Dosha::Pitta => self.pitta,
            Dosha::Kapha => self.kapha,
        }
    }

    /// Total number of counted answers.
    pub fn total(&self) -> u32 {
        self.vata + self.pitta + self.kapha
    }

    /// Doshas ordered by count, highest first.
    ///
    /// Equal counts keep the fixed order Vata, Pitta, Kapha.
    pub fn ranked(&self) -> [(Dosha, u32); 3] {
        let mut ranked = Dosha::ALL.map(|dosha| (dosha, self.count(dosha)));
        // stable: ties stay in declaration order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Human-readable summary stored with each record, e.g.
    /// `"Vata: 15, Pitta: 3, Kapha: 2"`.
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}, {}: {}, {}: {}",
            Dosha::Vata,
            self.vata,
            Dosha::Pitta,
            self.pitta,
            Dosha::Kapha,
            self.kapha
        )
    }
}

impl FromIterator<Choice> for Tally {
    fn from_iter<T: IntoIterator<Item = Choice>>(iter: T) -> Self {
        let mut tally = Tally::default();
        for choice in iter {
            tally.add(choice);
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_format() {
        assert_eq!(Tally::new(15, 3, 2).summary(), "Vata: 15, Pitta: 3, Kapha: 2");
    }

    #[test]
    fn ranked_orders_by_count() {
        let ranked = Tally::new(2, 9, 5).ranked();
        assert_eq!(ranked[0], (Dosha::Pitta, 9));
        assert_eq!(ranked[1], (Dosha::Kapha, 5));
        assert_eq!(ranked[2], (Dosha::Vata, 2));
    }

    #[test]
    fn ranked_breaks_ties_vata_pitta_kapha() {
        let ranked = Tally::new(4, 4, 4).ranked();
        assert_eq!(ranked.map(|(d, _)| d), [Dosha::Vata, Dosha::Pitta, Dosha::Kapha]);

        let ranked = Tally::new(1, 6, 6).ranked();
        assert_eq!(ranked.map(|(d, _)| d), [Dosha::Pitta, Dosha::Kapha, Dosha::Vata]);
    }

    #[test]
    fn serializes_as_counts_object() {
        let json = serde_json::to_value(Tally::new(1, 2, 3)).unwrap();
        assert_eq!(json, serde_json::json!({ "vata": 1, "pitta": 2, "kapha": 3 }));
    }
}
