//! Heuristic move selection.
//!
//! Scoring is driven by an immutable [`DifficultyProfile`] chosen through the
//! closed [`Difficulty`] enum. Randomness comes from the selector's own seeded
//! RNG, never from global state.

mod evaluate;
mod profile;
mod selector;

pub use evaluate::{center_bonus, evaluate_move, score_move};
pub use profile::{Difficulty, DifficultyProfile, EASY, HARD, Lookahead, NORMAL};
pub use selector::{AiMove, AiTurn, MoveSelector};
