//! Series management: rounds, rematches, the running score and deferred AI turns.

use super::action::MoveError;
use super::ai::{AiTurn, MoveSelector};
use super::{Match, MatchConfig, Mode, Outcome, PlayerId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Monotonically increasing round identifier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("round {}", _0)]
pub struct RoundId(pub u64);

impl RoundId {
    fn next(self) -> Self {
        RoundId(self.0 + 1)
    }
}

/// Wins per seat and draws across a series of rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesScore {
    /// Wins of seats one and two.
    pub wins: [u32; 2],
    /// Drawn rounds.
    pub draws: u32,
}

impl SeriesScore {
    /// Adds one decided round.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome.winner() {
            Some(player) => self.wins[player.index()] += 1,
            None => self.draws += 1,
        }
    }

    /// Wins of one seat.
    pub fn wins_of(&self, player: PlayerId) -> u32 {
        self.wins[player.index()]
    }

    /// Rounds counted so far.
    pub fn rounds(&self) -> u32 {
        self.wins[0] + self.wins[1] + self.draws
    }
}

impl std::fmt::Display for SeriesScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {} ({} draws)",
            self.wins[0], self.wins[1], self.draws
        )
    }
}

/// Ticket for an AI action scheduled for later (e.g. after an animation).
///
/// It remembers the round it was issued in and is discarded if a rematch
/// happened in the meantime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAiAction {
    round: RoundId,
}

impl PendingAiAction {
    /// Round the action was scheduled in.
    pub fn round(&self) -> RoundId {
        self.round
    }
}

/// A series of rounds played with one configuration.
#[derive(Debug, Clone)]
pub struct Session {
    config: MatchConfig,
    round: RoundId,
    game: Match,
    score: SeriesScore,
    tallied: bool,
    ai: Option<MoveSelector>,
}

impl Session {
    /// Starts a series with its first round.
    #[instrument(skip(config), fields(mode = %config.mode(), variant = %config.variant()))]
    pub fn new(config: MatchConfig) -> Self {
        let round = RoundId(1);
        let game = Match::new(&round_config(&config, round));
        let ai = (config.mode() == Mode::Ai).then(|| {
            MoveSelector::new(
                PlayerId::Two,
                config.difficulty(),
                config.seed().map(|s| s.wrapping_mul(31).wrapping_add(7)),
            )
        });
        info!(%round, "Session started");
        Self {
            config,
            round,
            game,
            score: SeriesScore::default(),
            tallied: false,
            ai,
        }
    }

    /// Configuration shared by every round.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Current round.
    pub fn round(&self) -> RoundId {
        self.round
    }

    /// The running match.
    pub fn game(&self) -> &Match {
        &self.game
    }

    /// The running match, for issuing commands.
    pub fn game_mut(&mut self) -> &mut Match {
        &mut self.game
    }

    /// Score including the current round once it is decided.
    pub fn series_score(&self) -> SeriesScore {
        let mut score = self.score;
        if let Some(outcome) = self.game.outcome().filter(|_| !self.tallied) {
            score.record(outcome);
        }
        score
    }

    /// Clears the score, including the current round's result.
    #[instrument(skip(self), fields(round = %self.round))]
    pub fn reset_series_score(&mut self) {
        self.score = SeriesScore::default();
        self.tallied = self.game.is_finished();
        info!("Series score reset");
    }

    /// Abandons or closes the current round and starts a fresh one.
    ///
    /// A decided round is counted once. Pending AI actions from the old
    /// round become stale.
    #[instrument(skip(self), fields(round = %self.round))]
    pub fn rematch(&mut self) -> RoundId {
        if let Some(outcome) = self.game.outcome().filter(|_| !self.tallied) {
            self.score.record(outcome);
        }
        self.round = self.round.next();
        self.game = Match::new(&round_config(&self.config, self.round));
        self.tallied = false;
        info!(next = %self.round, score = %self.score, "Rematch");
        self.round
    }

    /// Schedules the AI's next action if the AI must act now.
    pub fn defer_ai_action(&self) -> Option<PendingAiAction> {
        (self.ai.is_some() && self.game.is_ai_turn()).then_some(PendingAiAction {
            round: self.round,
        })
    }

    /// Runs a deferred AI action.
    ///
    /// Returns `None` without touching the match when the action belongs to
    /// an earlier round or no AI seat exists.
    #[instrument(skip(self), fields(round = %self.round))]
    pub fn run_deferred(&mut self, action: PendingAiAction) -> Option<Result<AiTurn, MoveError>> {
        if action.round != self.round {
            debug!(scheduled = %action.round, "Discarding stale AI action");
            return None;
        }
        let Some(ai) = self.ai.as_mut() else {
            warn!("Deferred AI action without an AI seat");
            return None;
        };
        Some(ai.play(&mut self.game))
    }
}

/// Per-round configuration: a fixed seed advances with the round so rematches differ.
fn round_config(config: &MatchConfig, round: RoundId) -> MatchConfig {
    match config.seed() {
        Some(seed) => config.clone().with_seed(seed.wrapping_add(round.0)),
        None => config.clone(),
    }
}
