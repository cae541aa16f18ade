//! Serializable view of a match for presentation layers and replays.

use super::action::MoveRecord;
use super::{Board, Coord, Match, Mode, Outcome, Phase, PlayerId, Variant};
use serde::{Deserialize, Serialize};

/// Public state of one seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Display name.
    pub name: String,
    /// Pion column, if placed.
    pub pion: Option<usize>,
    /// Cells claimed so far.
    pub pions_on_board: u32,
}

/// Everything a renderer needs to draw a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    /// Game variant.
    pub variant: Variant,
    /// Match mode.
    pub mode: Mode,
    /// Board values and owners.
    pub board: Board,
    /// Both seats in order.
    pub players: [PlayerSnapshot; 2],
    /// Seat to act.
    pub current: PlayerId,
    /// Current phase.
    pub phase: Phase,
    /// Coin toss winner.
    pub coin_winner: Option<PlayerId>,
    /// Combined value of the pions.
    pub combined: Option<u8>,
    /// Outcome, once decided.
    pub outcome: Option<Outcome>,
    /// Winning run.
    pub win_cells: Vec<Coord>,
    /// Board placements in order.
    pub history: Vec<MoveRecord>,
}

impl From<&Match> for MatchSnapshot {
    fn from(game: &Match) -> Self {
        let seat = |id: PlayerId| {
            let player = game.player(id);
            PlayerSnapshot {
                name: player.name().to_string(),
                pion: player.pion(),
                pions_on_board: player.pions_on_board(),
            }
        };
        Self {
            variant: game.variant(),
            mode: game.mode(),
            board: game.board().clone(),
            players: [seat(PlayerId::One), seat(PlayerId::Two)],
            current: game.current_player(),
            phase: game.phase(),
            coin_winner: game.coin_winner(),
            combined: game.combined_value(),
            outcome: game.outcome(),
            win_cells: game.win_cells().to_vec(),
            history: game.history().to_vec(),
        }
    }
}

impl MatchSnapshot {
    /// Serializes the snapshot as JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parses a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
