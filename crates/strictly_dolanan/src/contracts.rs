//! Contract-based validation for match commands.
//!
//! Contracts define correctness through preconditions and postconditions.
//! Preconditions are always checked and reject a command before anything
//! is mutated. Postconditions run in debug builds after the mutation.

use super::action::MoveError;
use super::invariants::{InvariantSet, MatchInvariants};
use super::{Coord, Match, Phase, PlayerId};
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// A contract defines preconditions and postconditions for state transitions.
///
/// - Precondition: {P(state, action)} must hold before applying the action
/// - Postcondition: {Q(before, after)} must hold after applying it
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), MoveError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), MoveError>;
}

// ─────────────────────────────────────────────────────────────
//  Actions
// ─────────────────────────────────────────────────────────────

/// Put a pion on the selector track during placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialPion {
    /// Requested row; the second pion always lands in the remaining row.
    pub row: PlayerId,
    /// Column on the track.
    pub column: usize,
}

/// Shift a pion to another column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PionShift {
    /// Row whose pion moves.
    pub row: PlayerId,
    /// Destination column.
    pub column: usize,
}

/// Claim a board cell for the current player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellClaim {
    /// Cell to claim.
    pub coord: Coord,
}

// ─────────────────────────────────────────────────────────────
//  Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the round is still undecided.
pub struct RoundUndecided;

impl RoundUndecided {
    /// Checks the precondition.
    #[instrument(skip(game))]
    pub fn check(game: &Match) -> Result<(), MoveError> {
        if game.outcome().is_some() {
            Err(MoveError::GameOver)
        } else {
            Ok(())
        }
    }
}

/// Precondition: the match is in the given phase.
pub struct InPhase;

impl InPhase {
    /// Checks the precondition.
    #[instrument(skip(game))]
    pub fn check(game: &Match, expected: Phase) -> Result<(), MoveError> {
        RoundUndecided::check(game)?;
        if game.phase() != expected {
            Err(MoveError::WrongPhase {
                expected,
                actual: game.phase(),
            })
        } else {
            Ok(())
        }
    }
}

/// Precondition: the column exists on the selector track.
pub struct ColumnOnTrack;

impl ColumnOnTrack {
    /// Checks the precondition.
    #[instrument(skip(game))]
    pub fn check(game: &Match, column: usize) -> Result<(), MoveError> {
        if column >= game.variant().columns() {
            Err(MoveError::ColumnOutOfRange(column))
        } else {
            Ok(())
        }
    }
}

/// Precondition: the second pion keeps the combination inside the value range.
pub struct PlacementReachable;

impl PlacementReachable {
    /// Checks the precondition.
    #[instrument(skip(game))]
    pub fn check(game: &Match, column: usize) -> Result<(), MoveError> {
        if game.disabled_columns_for_placement().contains(&column) {
            Err(MoveError::ColumnDisabled(column))
        } else {
            Ok(())
        }
    }
}

/// Precondition: the current player may move this row's pion.
///
/// Normally only the own row; on the first turn after placement the coin
/// winner may move either.
pub struct MoverOwnsPion;

impl MoverOwnsPion {
    /// Checks the precondition.
    #[instrument(skip(game))]
    pub fn check(game: &Match, row: PlayerId) -> Result<(), MoveError> {
        let player = game.current_player();
        if game.is_first_turn() || row == player {
            Ok(())
        } else {
            Err(MoveError::NotYourPion { player, row })
        }
    }
}

/// Precondition: the pion actually leaves its column.
pub struct LeavesColumn;

impl LeavesColumn {
    /// Checks the precondition.
    #[instrument(skip(game))]
    pub fn check(game: &Match, row: PlayerId, column: usize) -> Result<(), MoveError> {
        match game.player(row).pion() {
            None => Err(MoveError::PionMissing(row)),
            Some(current) if current == column => Err(MoveError::SameColumn(column)),
            Some(_) => Ok(()),
        }
    }
}

/// Precondition: the destination keeps the combination inside the value range.
pub struct ShiftReachable;

impl ShiftReachable {
    /// Checks the precondition.
    #[instrument(skip(game))]
    pub fn check(game: &Match, row: PlayerId, column: usize) -> Result<(), MoveError> {
        let other = row.opponent();
        let other_column = game
            .player(other)
            .pion()
            .ok_or(MoveError::PionMissing(other))?;
        if game.variant().is_reachable(column, other_column) {
            Ok(())
        } else {
            Err(MoveError::ColumnDisabled(column))
        }
    }
}

/// Precondition: the cell is on the board, free and holds the combined value.
pub struct CellClaimable;

impl CellClaimable {
    /// Checks the precondition.
    #[instrument(skip(game))]
    pub fn check(game: &Match, coord: Coord) -> Result<(), MoveError> {
        let cell = game
            .board()
            .get(coord)
            .ok_or(MoveError::CellOutOfRange(coord))?;
        if !cell.is_free() {
            return Err(MoveError::CellOwned(coord));
        }
        let expected = game
            .combined_value()
            .ok_or(MoveError::PionMissing(game.current_player()))?;
        if cell.value() != expected {
            return Err(MoveError::ValueMismatch {
                coord,
                expected,
                actual: cell.value(),
            });
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Command Contracts
// ─────────────────────────────────────────────────────────────

/// Contract for placing a pion during the placement phase.
///
/// Preconditions: placement phase, column on the track, and for the second
/// pion a reachable combination.
pub struct PlacementContract;

impl Contract<Match, InitialPion> for PlacementContract {
    fn pre(game: &Match, action: &InitialPion) -> Result<(), MoveError> {
        InPhase::check(game, Phase::Placement)?;
        ColumnOnTrack::check(game, action.column)?;
        PlacementReachable::check(game, action.column)?;
        Ok(())
    }

    fn post(before: &Match, after: &Match) -> Result<(), MoveError> {
        if after.placement_step() != before.placement_step() + 1 {
            return Err(MoveError::InvariantViolation(
                "Placement step did not advance by one".to_string(),
            ));
        }
        check_invariants(after)
    }
}

/// Contract for moving a pion.
///
/// Preconditions: move-pion phase, undecided round, column on the track,
/// mover allowed, column changes, combination reachable.
pub struct PionShiftContract;

impl Contract<Match, PionShift> for PionShiftContract {
    fn pre(game: &Match, action: &PionShift) -> Result<(), MoveError> {
        InPhase::check(game, Phase::MovePion)?;
        ColumnOnTrack::check(game, action.column)?;
        MoverOwnsPion::check(game, action.row)?;
        LeavesColumn::check(game, action.row, action.column)?;
        ShiftReachable::check(game, action.row, action.column)?;
        Ok(())
    }

    fn post(before: &Match, after: &Match) -> Result<(), MoveError> {
        if after.history().len() != before.history().len() {
            return Err(MoveError::InvariantViolation(
                "Moving a pion changed the history".to_string(),
            ));
        }
        check_invariants(after)
    }
}

/// Contract for claiming a board cell.
///
/// Postconditions: ownership only grows and the history is append-only.
pub struct CellClaimContract;

impl Contract<Match, CellClaim> for CellClaimContract {
    fn pre(game: &Match, action: &CellClaim) -> Result<(), MoveError> {
        InPhase::check(game, Phase::PlaceBoard)?;
        CellClaimable::check(game, action.coord)?;
        Ok(())
    }

    fn post(before: &Match, after: &Match) -> Result<(), MoveError> {
        if !ownership_grew(before, after) {
            return Err(MoveError::InvariantViolation(
                "Cell ownership is not monotonic".to_string(),
            ));
        }
        if after.history().len() != before.history().len() + 1
            || !after.history().starts_with(before.history())
        {
            return Err(MoveError::InvariantViolation(
                "History is not append-only".to_string(),
            ));
        }
        check_invariants(after)
    }
}

/// Returns true if every cell owned in `before` has the same owner in `after`.
#[instrument(skip(before, after))]
pub fn ownership_grew(before: &Match, after: &Match) -> bool {
    before.board().iter().all(|(coord, cell)| match cell.owner() {
        Some(owner) => after.board().owner_at(coord) == Some(owner),
        None => true,
    })
}

/// Verifies the full invariant set, folding violations into one error.
pub fn check_invariants(game: &Match) -> Result<(), MoveError> {
    MatchInvariants::check_all(game).map_err(|violations| {
        let descriptions = violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        warn!(%descriptions, "Postcondition failed");
        MoveError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ready_sum_match;

    #[test]
    fn test_claim_precondition_accepts_matching_cell() {
        let game = ready_sum_match();
        let claim = CellClaim {
            coord: Coord::new(0, 9),
        };
        assert!(CellClaimContract::pre(&game, &claim).is_ok());
    }

    #[test]
    fn test_claim_precondition_rejects_wrong_value() {
        let game = ready_sum_match();
        let claim = CellClaim {
            coord: Coord::new(0, 0),
        };
        assert_eq!(
            CellClaimContract::pre(&game, &claim),
            Err(MoveError::ValueMismatch {
                coord: Coord::new(0, 0),
                expected: 11,
                actual: 2,
            })
        );
    }

    #[test]
    fn test_shift_precondition_wrong_phase() {
        let game = ready_sum_match();
        let shift = PionShift {
            row: PlayerId::One,
            column: 4,
        };
        assert!(matches!(
            PionShiftContract::pre(&game, &shift),
            Err(MoveError::WrongPhase {
                expected: Phase::MovePion,
                actual: Phase::PlaceBoard,
            })
        ));
    }

    #[test]
    fn test_shift_precondition_rejects_foreign_row() {
        let mut game = ready_sum_match();
        game.place_on_board(Coord::new(0, 9)).unwrap();
        let shift = PionShift {
            row: PlayerId::One,
            column: 4,
        };
        assert_eq!(
            PionShiftContract::pre(&game, &shift),
            Err(MoveError::NotYourPion {
                player: PlayerId::Two,
                row: PlayerId::One,
            })
        );
    }

    #[test]
    fn test_postcondition_holds_after_claim() {
        let before = ready_sum_match();
        let mut after = before.clone();
        after.place_on_board(Coord::new(0, 9)).unwrap();
        assert!(CellClaimContract::post(&before, &after).is_ok());
    }

    #[test]
    fn test_postcondition_detects_released_cell() {
        let mut before = ready_sum_match();
        before.place_on_board(Coord::new(0, 9)).unwrap();
        let after = ready_sum_match();
        assert!(!ownership_grew(&before, &after));
        assert!(CellClaimContract::post(&before, &after).is_err());
    }
}
