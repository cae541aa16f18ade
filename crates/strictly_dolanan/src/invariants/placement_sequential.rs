//! Placement invariant: pions are placed one at a time, in order.

use super::super::{Match, Phase};
use super::Invariant;

/// Invariant: the placement step counts the placed pions (0, 1 or 2), and
/// the turn phases are only reachable once both pions are down.
pub struct PlacementSequentialInvariant;

impl Invariant<Match> for PlacementSequentialInvariant {
    fn holds(game: &Match) -> bool {
        let step = game.placement_step();
        let placed = game.pions().iter().filter(|p| p.is_some()).count();
        if step > 2 || placed != usize::from(step) {
            return false;
        }
        match game.phase() {
            Phase::Coin => step == 0,
            Phase::MovePion | Phase::PlaceBoard => step == 2,
            Phase::Placement | Phase::Finished => true,
        }
    }

    fn description() -> &'static str {
        "Pion placement is sequential (0 → 1 → 2)"
    }
}
