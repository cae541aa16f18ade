//! Strictly Dolanan - the core of Dolanan Matematika.
//!
//! Two players race to claim four board cells in a row. Each turn's target
//! value is the sum (or product) of two pions on a shared selector track, so
//! every move is a bit of arithmetic.
//!
//! # Architecture
//!
//! - **Variant**: the combine operator and the value domain of the board
//! - **Match**: caller-owned aggregate holding one round, with a
//!   command/query surface validated by contracts
//! - **Rules**: pure win and dead-end evaluation shared by the match and the AI
//! - **AI**: difficulty-driven heuristic move selection
//! - **Session**: round ids, rematches, series score, deferred AI actions
//!
//! # Example
//!
//! ```
//! use strictly_dolanan::{CoinSide, Match, MatchConfig, Mode, PlayerId, Variant};
//!
//! let config = MatchConfig::new(Variant::Sum, Mode::Pvp).with_seed(7);
//! let mut game = Match::new(&config);
//! let toss = game.coin_toss(PlayerId::One, CoinSide::Head)?;
//! game.set_placement_phase()?;
//! game.place_initial_pion(toss.winner, 4)?;
//! game.place_initial_pion(toss.winner.opponent(), 5)?;
//! assert_eq!(game.combined_value(), Some(11));
//! # Ok::<(), strictly_dolanan::MoveError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod action;
mod config;
mod game;
mod phases;
mod session;
mod snapshot;
mod types;
mod variant;

#[cfg(test)]
mod testing;

pub mod ai;
pub mod contracts;
pub mod invariants;
pub mod rules;

// Crate-level exports - Variant
pub use variant::{BOARD_SIZE, VALID_PRODUCTS, Variant, WIN_LENGTH};

// Crate-level exports - Domain types
pub use types::{Board, Cell, CommittedPlacement, Coord, Player, PlayerColor, PlayerId};

// Crate-level exports - Phases and outcomes
pub use phases::{CoinSide, Mode, Outcome, Phase, WinReason};

// Crate-level exports - Command results
pub use action::{
    BoardPlacement, CoinToss, MoveError, MoveRecord, PionMove, PionPlacement, Target,
};

// Crate-level exports - Match
pub use game::{Match, TimeoutEffect};

// Crate-level exports - Configuration
pub use config::{ConfigError, MatchConfig, TimeoutPolicy};

// Crate-level exports - Snapshot
pub use snapshot::{MatchSnapshot, PlayerSnapshot};

// Crate-level exports - Session management
pub use session::{PendingAiAction, RoundId, SeriesScore, Session};

// Crate-level exports - AI
pub use ai::{AiMove, AiTurn, Difficulty, MoveSelector};
