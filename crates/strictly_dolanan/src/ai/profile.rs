//! Difficulty levels and their immutable weight tables.

use serde::{Deserialize, Serialize};

/// AI strength.
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
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    /// Loose blocking, wide random sampling.
    Easy,
    /// The classic weights.
    #[default]
    Normal,
    /// Classic weights plus a one-ply look at the opponent's reply.
    Hard,
}

impl Difficulty {
    /// The weight table for this level.
    pub fn profile(self) -> &'static DifficultyProfile {
        match self {
            Difficulty::Easy => &EASY,
            Difficulty::Normal => &NORMAL,
            Difficulty::Hard => &HARD,
        }
    }
}

/// One-ply lookahead settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lookahead {
    /// Only the best `candidates` moves are examined further.
    pub candidates: usize,
    /// Weight of the opponent's best reply subtracted from a move's score.
    pub reply_weight: f64,
}

/// Scoring weights for one difficulty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Score of a move that completes a run.
    pub win_score: f64,
    /// Bonus for taking a cell that would complete the opponent's run.
    pub block_bonus: f64,
    /// Own streak bonus for streaks of at least 1, 2 and 3.
    pub own_streak: [f64; 3],
    /// Opponent streak bonus for streaks of at least 1, 2 and 3.
    pub opp_streak: [f64; 3],
    /// Multiplier of the center-distance bonus.
    pub center_weight: f64,
    /// Upper bound of the uniform noise added to each score.
    pub jitter: f64,
    /// Moves are sampled uniformly from the best `top_k`.
    pub top_k: usize,
    /// Chance of picking a random opening column instead of the preferred one.
    pub opening_randomness: f64,
    /// Reply lookahead, if any.
    pub lookahead: Option<Lookahead>,
}

/// Easy: half-hearted blocking and plenty of noise.
pub const EASY: DifficultyProfile = DifficultyProfile {
    win_score: 100_000.0,
    block_bonus: 5_000.0,
    own_streak: [30.0, 200.0, 2_000.0],
    opp_streak: [10.0, 100.0, 1_000.0],
    center_weight: 2.0,
    jitter: 400.0,
    top_k: 5,
    opening_randomness: 0.6,
    lookahead: None,
};

/// Normal.
pub const NORMAL: DifficultyProfile = DifficultyProfile {
    win_score: 100_000.0,
    block_bonus: 50_000.0,
    own_streak: [50.0, 500.0, 5_000.0],
    opp_streak: [20.0, 300.0, 8_000.0],
    center_weight: 5.0,
    jitter: 10.0,
    top_k: 2,
    opening_randomness: 0.3,
    lookahead: None,
};

/// Hard.
pub const HARD: DifficultyProfile = DifficultyProfile {
    win_score: 100_000.0,
    block_bonus: 50_000.0,
    own_streak: [50.0, 500.0, 5_000.0],
    opp_streak: [20.0, 300.0, 8_000.0],
    center_weight: 5.0,
    jitter: 2.0,
    top_k: 1,
    opening_randomness: 0.1,
    lookahead: Some(Lookahead {
        candidates: 8,
        reply_weight: 0.6,
    }),
};
