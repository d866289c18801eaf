use serde::{Deserialize, Serialize};

use crate::models::snapshot::CharacterRow;

/// Roster-wide sums over the members that have a character snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterTotals {
    pub members: usize,
    pub attack: i64,
    pub defence: i64,
    pub total_level: i64,
    /// Mean level rounded to one decimal; 0.0 for an empty roster.
    pub average_level: f64,
}

impl RosterTotals {
    pub fn from_characters<'a>(characters: impl IntoIterator<Item = &'a CharacterRow>) -> Self {
        let mut totals = characters
            .into_iter()
            .fold(Self::default(), |mut acc, c| {
                acc.members += 1;
                acc.attack += i64::from(c.attack);
                acc.defence += i64::from(c.defence);
                acc.total_level += i64::from(c.level);
                acc
            });
        totals.average_level = if totals.members == 0 {
            0.0
        } else {
            round_to_tenth(totals.total_level as f64 / totals.members as f64)
        };
        totals
    }
}

/// Rounds to one decimal place, ties to even (10.25 -> 10.2, 10.75 -> 10.8).
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}
