//! Pion count invariant: each player's placed count equals their owned cells.

use super::super::{Match, PlayerId};
use super::Invariant;

/// Invariant: `pions_on_board` of each player equals the cells they own.
pub struct PionCountInvariant;

impl Invariant<Match> for PionCountInvariant {
    fn holds(game: &Match) -> bool {
        PlayerId::ALL.iter().all(|&id| {
            game.player(id).pions_on_board() as usize == game.board().owned_count(id)
        })
    }

    fn description() -> &'static str {
        "Placed pion counts match owned cells"
    }
}
