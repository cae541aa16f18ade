//! Turn phases, match modes and outcomes.

use super::PlayerId;
use serde::{Deserialize, Serialize};

/// Phase of the turn protocol.
///
/// `Coin → Placement → MovePion ⇄ PlaceBoard → Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Phase {
    /// Waiting for the coin toss.
    Coin,
    /// Coin winner is placing both pions.
    Placement,
    /// Current player must move a pion.
    MovePion,
    /// Current player must claim a cell matching the combined value.
    PlaceBoard,
    /// Round decided; no further moves accepted.
    Finished,
}

/// Who sits in seat two.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Two humans sharing the device.
    #[default]
    Pvp,
    /// Seat two is played by the move selector.
    Ai,
}

/// Side of the coin.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CoinSide {
    /// Heads.
    Head,
    /// Tails.
    Tail,
}

impl CoinSide {
    /// The other side.
    pub fn flip(self) -> Self {
        match self {
            CoinSide::Head => CoinSide::Tail,
            CoinSide::Tail => CoinSide::Head,
        }
    }
}

/// Why a round was won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum WinReason {
    /// Four contiguous cells.
    FourInARow,
    /// Opponent picked a dead-end value while a live one existed.
    AutoLose,
    /// Opponent's turn clock ran out.
    Timeout,
    /// Declared by an external collaborator.
    Forfeit,
}

/// Outcome of a decided round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// A player won.
    Winner {
        /// The winning seat.
        player: PlayerId,
        /// How the round was won.
        reason: WinReason,
    },
    /// Nobody can continue.
    Draw,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            Outcome::Winner { player, .. } => Some(*player),
            Outcome::Draw => None,
        }
    }

    /// Returns true if the round was a draw.
    pub fn is_draw(&self) -> bool {
        matches!(self, Outcome::Draw)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner { player, reason } => write!(f, "{} wins ({})", player, reason),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}
