//! First-class command results and the command error type.
//!
//! Every mutating command on a match returns one of these values on success
//! or a [`MoveError`] on rejection. A rejected command never mutates state.

use super::rules::AutoGameOver;
use super::{CoinSide, Coord, Phase, PlayerId};
use serde::{Deserialize, Serialize};

/// Result of the opening coin toss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoinToss {
    /// Seat that called the coin.
    pub caller: PlayerId,
    /// Side the caller picked.
    pub call: CoinSide,
    /// Side that came up.
    pub result: CoinSide,
    /// Seat that places both pions and moves first.
    pub winner: PlayerId,
}

/// The value a turn must satisfy and where it can be satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Combined value of both pions.
    pub combined: u8,
    /// Free cells holding the combined value.
    pub candidates: Vec<Coord>,
    /// Set when no candidate exists and the round was resolved on the spot.
    pub stalemate: Option<AutoGameOver>,
}

impl Target {
    /// Returns true if the round ended because nothing matched.
    pub fn is_stalemate(&self) -> bool {
        self.stalemate.is_some()
    }
}

/// Result of placing a pion during the placement phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PionPlacement {
    /// First pion placed; the other row is still empty.
    First {
        /// Row that received the pion.
        row: PlayerId,
        /// Column of the pion.
        column: usize,
    },
    /// Second pion placed; the coin winner now claims a cell.
    Complete {
        /// Row that received the pion (forced to the remaining row).
        row: PlayerId,
        /// Column of the pion.
        column: usize,
        /// Value the coin winner must claim.
        target: Target,
    },
}

/// Result of moving a pion along its selector row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PionMove {
    /// Row whose pion moved.
    pub row: PlayerId,
    /// Column the pion left.
    pub from: usize,
    /// Column the pion moved to.
    pub to: usize,
    /// Value the mover must now claim.
    pub target: Target,
}

/// Result of claiming a cell on the main board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardPlacement {
    /// The claim completed a run.
    Won {
        /// Winning seat.
        winner: PlayerId,
        /// Cells forming the run.
        cells: Vec<Coord>,
    },
    /// Play passes to the next seat.
    Continue {
        /// Seat that must move next.
        next: PlayerId,
    },
}

/// One successful board placement with the pion positions that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Seat that claimed the cell.
    pub player: PlayerId,
    /// Claimed cell.
    pub coord: Coord,
    /// Value of the cell (the combined value at the time).
    pub value: u8,
    /// Pion columns of rows one and two when the claim was made.
    pub pions: [usize; 2],
}

impl std::fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} = {} (pions {}, {})",
            self.player,
            self.coord,
            self.value,
            self.pions[0] + 1,
            self.pions[1] + 1
        )
    }
}

/// Error that can occur when validating or applying a command.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The command is not legal in the current phase.
    #[display("Expected phase {}, but the match is in {}", expected, actual)]
    WrongPhase {
        /// Phase the command needs.
        expected: Phase,
        /// Phase the match is in.
        actual: Phase,
    },

    /// The round is already decided.
    #[display("Game is already over")]
    GameOver,

    /// The coin was already tossed this round.
    #[display("Coin has already been tossed")]
    CoinAlreadyTossed,

    /// Placement cannot start before the coin toss.
    #[display("Coin has not been tossed yet")]
    CoinNotTossed,

    /// Selector column outside the track.
    #[display("Column {} is outside the selector track", _0)]
    ColumnOutOfRange(usize),

    /// A pion must leave its current column.
    #[display("Pion is already in column {}", _0)]
    SameColumn(usize),

    /// The column would push the combined value past the board's range.
    #[display("Column {} would exceed the board's value range", _0)]
    ColumnDisabled(usize),

    /// The seat may not move this row's pion now.
    #[display("{} may not move the {} pion", player, row)]
    NotYourPion {
        /// Seat attempting the move.
        player: PlayerId,
        /// Row of the pion.
        row: PlayerId,
    },

    /// The seat is not the one to act.
    #[display("It's not {}'s turn", _0)]
    NotYourTurn(PlayerId),

    /// Board coordinate outside the grid.
    #[display("Cell {} is outside the board", _0)]
    CellOutOfRange(Coord),

    /// The cell has already been claimed.
    #[display("Cell {} is already owned", _0)]
    CellOwned(Coord),

    /// The cell does not hold the combined value.
    #[display("Cell {} holds {}, expected {}", coord, actual, expected)]
    ValueMismatch {
        /// Targeted cell.
        coord: Coord,
        /// Combined value.
        expected: u8,
        /// Cell value.
        actual: u8,
    },

    /// A pion needed for the command has not been placed.
    #[display("{} has no pion on the selector track", _0)]
    PionMissing(PlayerId),

    /// An invariant was violated (postcondition failure).
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}
