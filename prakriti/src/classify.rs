//! Mapping from answer tallies to a constitution.

use crate::{Classification, Constitution, Dosha, Tally};

/// A dosha with at least this many answers is dominant on its own.
pub const DOMINANCE_THRESHOLD: u32 = 15;

/// Determine the constitution for a tally.
///
/// A dosha reaching [`DOMINANCE_THRESHOLD`] wins outright, checked in the
/// order Vata, Pitta, Kapha. Otherwise the two highest counts form a blend,
/// with ties resolved in that same order.
pub fn constitution(tally: &Tally) -> Constitution {
    if let Some(dosha) = Dosha::ALL
        .into_iter()
        .find(|dosha| tally.count(*dosha) >= DOMINANCE_THRESHOLD)
    {
        return Constitution::Single(dosha);
    }
    let [(first, _), (second, _), _] = tally.ranked();
    Constitution::Blend(first, second)
}

/// Label and description for a tally.
pub fn classify(tally: &Tally) -> Classification {
    let constitution = constitution(tally);
    Classification::new(constitution.label(), describe(constitution))
}

/// The text shown to the respondent for a constitution.
pub fn describe(constitution: Constitution) -> String {
    match constitution {
        Constitution::Single(Dosha::Vata) => {
            "Your constitution is Vata. You are active, quick and creative.".to_string()
        }
        Constitution::Single(Dosha::Pitta) => "Your constitution is Pitta. You are intelligent, \
             ambitious and have a natural capacity for leadership."
            .to_string(),
        Constitution::Single(Dosha::Kapha) => {
            "Your constitution is Kapha. You are calm, steady and kind.".to_string()
        }
        Constitution::Blend(first, second) => {
            format!("Your constitution is a blend of {first} and {second}.")
        }
    }
}
