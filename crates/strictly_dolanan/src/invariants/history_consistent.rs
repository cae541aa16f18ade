//! History consistency: replaying the move history rebuilds the board's ownership.

use super::super::{Match, PlayerId};
use super::Invariant;
use std::collections::HashSet;

/// Invariant: every owned cell has exactly one history record, and every
/// record names an owned cell whose value equals the pion combination that
/// produced it.
///
/// Together with write-once cells this also gives ownership monotonicity:
/// a record is never removed, so its cell can never be released.
pub struct HistoryConsistentInvariant;

impl Invariant<Match> for HistoryConsistentInvariant {
    fn holds(game: &Match) -> bool {
        let board = game.board();
        let variant = game.variant();
        let mut seen = HashSet::new();

        for record in game.history() {
            if !seen.insert(record.coord) {
                return false;
            }
            let Some(cell) = board.get(record.coord) else {
                return false;
            };
            if cell.owner() != Some(record.player)
                || cell.value() != record.value
                || variant.combine_columns(record.pions[0], record.pions[1]) != record.value
            {
                return false;
            }
        }

        let owned: usize = PlayerId::ALL.iter().map(|&p| board.owned_count(p)).sum();
        owned == game.history().len()
    }

    fn description() -> &'static str {
        "History records match the owned cells and their values"
    }
}
