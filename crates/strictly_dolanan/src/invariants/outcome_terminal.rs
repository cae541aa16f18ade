//! Outcome invariant: an outcome exists exactly when the round is finished.

use super::super::{Match, Outcome, Phase, WinReason};
use super::Invariant;

/// Invariant: `outcome` is set iff the phase is `Finished`, and win cells
/// are only present for a four-in-a-row win.
pub struct OutcomeTerminalInvariant;

impl Invariant<Match> for OutcomeTerminalInvariant {
    fn holds(game: &Match) -> bool {
        let finished = game.phase() == Phase::Finished;
        if game.outcome().is_some() != finished {
            return false;
        }
        let four_in_a_row = matches!(
            game.outcome(),
            Some(Outcome::Winner {
                reason: WinReason::FourInARow,
                ..
            })
        );
        game.win_cells().is_empty() != four_in_a_row
    }

    fn description() -> &'static str {
        "Outcome is set exactly when the round is finished"
    }
}
