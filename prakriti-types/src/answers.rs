use std::collections::BTreeMap;

use crate::{AnswerKey, Choice, Tally};

/// The answers given so far, keyed by question index.
///
/// Answering a question again overwrites the earlier choice, so every
/// question contributes at most one answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet {
    values: BTreeMap<usize, Choice>,
}

impl AnswerSet {
    /// Create a new empty answer set.
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Record the answer for a question, returning the previous answer if any.
    pub fn record(&mut self, index: usize, choice: Choice) -> Option<Choice> {
        self.values.insert(index, choice)
    }

    /// Get the answer for a question.
    pub fn get(&self, index: usize) -> Option<Choice> {
        self.values.get(&index).copied()
    }

    /// Check if a question has been answered.
    pub fn contains(&self, index: usize) -> bool {
        self.values.contains_key(&index)
    }

    /// Remove the answer for a question.
    pub fn remove(&mut self, index: usize) -> Option<Choice> {
        self.values.remove(&index)
    }

    /// Forget all answers.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Iterate over `(index, choice)` pairs in question order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Choice)> + '_ {
        self.values.iter().map(|(index, choice)| (*index, *choice))
    }

    /// Iterate over answers with their wire keys (`q0`, `q1`, ...).
    pub fn keyed(&self) -> impl Iterator<Item = (AnswerKey, Choice)> + '_ {
        self.iter().map(|(index, choice)| (AnswerKey::new(index), choice))
    }

    /// Get the number of answered questions.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if nothing has been answered.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Count the answers per bucket.
    pub fn tally(&self) -> Tally {
        self.values.values().copied().collect()
    }

    /// Question indices below `total` that have no answer yet.
    pub fn missing(&self, total: usize) -> Vec<usize> {
        (0..total).filter(|index| !self.contains(*index)).collect()
    }

    /// Check if every question below `total` has an answer.
    pub fn is_complete(&self, total: usize) -> bool {
        (0..total).all(|index| self.contains(index))
    }
}

impl FromIterator<(usize, Choice)> for AnswerSet {
    fn from_iter<T: IntoIterator<Item = (usize, Choice)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for AnswerSet {
    type Item = (usize, Choice);
    type IntoIter = std::collections::btree_map::IntoIter<usize, Choice>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_overwrites() {
        let mut answers = AnswerSet::new();
        assert_eq!(answers.record(0, Choice::A), None);
        assert_eq!(answers.record(0, Choice::C), Some(Choice::A));
        assert_eq!(answers.len(), 1);
        assert_eq!(answers.get(0), Some(Choice::C));
    }

    #[test]
    fn tally_sums_to_answer_count() {
        let answers: AnswerSet = [
            (0, Choice::A),
            (1, Choice::B),
            (2, Choice::A),
            (3, Choice::C),
            (4, Choice::A),
        ]
        .into_iter()
        .collect();

        let tally = answers.tally();
        assert_eq!(tally.vata, 3);
        assert_eq!(tally.pitta, 1);
        assert_eq!(tally.kapha, 1);
        assert_eq!(tally.total() as usize, answers.len());
    }

    #[test]
    fn missing_and_complete() {
        let answers: AnswerSet = [(0, Choice::A), (2, Choice::B)].into_iter().collect();
        assert_eq!(answers.missing(4), vec![1, 3]);
        assert!(!answers.is_complete(3));
        assert!(answers.is_complete(1));
        assert!(AnswerSet::new().is_complete(0));
    }

    #[test]
    fn keyed_uses_wire_keys_in_order() {
        let answers: AnswerSet = [(10, Choice::B), (2, Choice::A)].into_iter().collect();
        let keys: Vec<_> = answers.keyed().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["q2", "q10"]);
    }
}
