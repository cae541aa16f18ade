//! The match aggregate: one round of Dolanan Matematika.
//!
//! A [`Match`] owns everything a round needs (board, players, phase, history)
//! and exposes a command/query surface. Commands validate through the
//! contracts before touching state, so a rejected command never mutates.

use super::action::{
    BoardPlacement, CoinToss, MoveError, MoveRecord, PionMove, PionPlacement, Target,
};
use super::ai::Difficulty;
use super::config::{MatchConfig, TimeoutPolicy};
use super::contracts::{
    CellClaim, CellClaimContract, Contract, InPhase, InitialPion, PionShift, PionShiftContract,
    PlacementContract, RoundUndecided,
};
use super::rules::{self, AutoGameOver};
use super::snapshot::MatchSnapshot;
use super::{Board, CoinSide, Coord, Mode, Outcome, Phase, Player, PlayerId, Variant, WinReason};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// What a turn timeout did to the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutEffect {
    /// The timed-out player lost.
    Forfeit(Outcome),
    /// The turn passed to the given player.
    Skip {
        /// Seat now to act.
        next: PlayerId,
    },
    /// Nothing happened: the round is over or it was not that player's turn.
    Ignored,
}

/// One round of the game, owned by the caller.
#[derive(Debug, Clone)]
pub struct Match {
    pub(crate) variant: Variant,
    pub(crate) mode: Mode,
    pub(crate) players: [Player; 2],
    pub(crate) current: PlayerId,
    pub(crate) phase: Phase,
    pub(crate) coin_winner: Option<PlayerId>,
    pub(crate) board: Board,
    pub(crate) placement_step: u8,
    pub(crate) is_first_turn: bool,
    pub(crate) outcome: Option<Outcome>,
    pub(crate) win_cells: Vec<Coord>,
    pub(crate) history: Vec<MoveRecord>,
    pub(crate) time_limit_secs: u32,
    pub(crate) difficulty: Difficulty,
    pub(crate) timeout_policy: TimeoutPolicy,
    pub(crate) rng: StdRng,
}

impl Match {
    /// Creates a match with a freshly generated board, waiting for the coin toss.
    ///
    /// The board and the coin draw from the configured seed, or from entropy
    /// when none is set.
    #[instrument(skip(config), fields(variant = %config.variant(), mode = %config.mode()))]
    pub fn new(config: &MatchConfig) -> Self {
        let mut rng = match config.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let board = Board::generate(config.variant(), &mut rng);
        Self::assemble(config, board, rng)
    }

    /// Creates a match on a prepared board.
    #[instrument(skip(config, board), fields(variant = %config.variant()))]
    pub fn with_board(config: &MatchConfig, board: Board) -> Self {
        let rng = match config.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::assemble(config, board, rng)
    }

    fn assemble(config: &MatchConfig, board: Board, rng: StdRng) -> Self {
        let [one, two] = config.player_names();
        info!(
            player_one = %one,
            player_two = %two,
            time_limit = config.time_limit_secs(),
            difficulty = %config.difficulty(),
            "Match created"
        );
        Self {
            variant: config.variant(),
            mode: config.mode(),
            players: [Player::new(PlayerId::One, one), Player::new(PlayerId::Two, two)],
            current: PlayerId::One,
            phase: Phase::Coin,
            coin_winner: None,
            board,
            placement_step: 0,
            is_first_turn: false,
            outcome: None,
            win_cells: Vec::new(),
            history: Vec::new(),
            time_limit_secs: config.time_limit_secs(),
            difficulty: config.difficulty(),
            timeout_policy: config.timeout_policy(),
            rng,
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Commands
    // ─────────────────────────────────────────────────────────────

    /// Tosses the coin: `caller` calls `call`, the match RNG flips.
    #[instrument(skip(self))]
    pub fn coin_toss(&mut self, caller: PlayerId, call: CoinSide) -> Result<CoinToss, MoveError> {
        self.ensure_coin_pending()?;
        let result = if self.rng.random_bool(0.5) {
            CoinSide::Head
        } else {
            CoinSide::Tail
        };
        self.settle_coin_toss(caller, call, result)
    }

    /// Records a coin toss flipped outside the core.
    #[instrument(skip(self))]
    pub fn settle_coin_toss(
        &mut self,
        caller: PlayerId,
        call: CoinSide,
        result: CoinSide,
    ) -> Result<CoinToss, MoveError> {
        self.ensure_coin_pending()?;
        let winner = if call == result {
            caller
        } else {
            caller.opponent()
        };
        self.coin_winner = Some(winner);
        self.current = winner;
        info!(%caller, %call, %result, %winner, "Coin toss decided");
        Ok(CoinToss {
            caller,
            call,
            result,
            winner,
        })
    }

    fn ensure_coin_pending(&self) -> Result<(), MoveError> {
        InPhase::check(self, Phase::Coin)
            .inspect_err(|e| warn!(error = %e, "Coin toss rejected"))?;
        if self.coin_winner.is_some() {
            warn!("Coin toss rejected: already tossed");
            return Err(MoveError::CoinAlreadyTossed);
        }
        Ok(())
    }

    /// Moves from the coin screen to pion placement.
    #[instrument(skip(self))]
    pub fn set_placement_phase(&mut self) -> Result<(), MoveError> {
        InPhase::check(self, Phase::Coin)
            .inspect_err(|e| warn!(error = %e, "Placement start rejected"))?;
        let winner = self.coin_winner.ok_or_else(|| {
            warn!("Placement start rejected: coin not tossed");
            MoveError::CoinNotTossed
        })?;
        self.current = winner;
        self.phase = Phase::Placement;
        debug!(%winner, "Placement phase started");
        Ok(())
    }

    /// Places one of the two pions during placement.
    ///
    /// The first pion goes to the requested row. The second is forced into
    /// the remaining row whatever `row` says. Once both are down the coin
    /// winner must claim a cell for the combined value; if none exists the
    /// round is resolved immediately.
    #[instrument(skip(self))]
    pub fn place_initial_pion(
        &mut self,
        row: PlayerId,
        column: usize,
    ) -> Result<PionPlacement, MoveError> {
        let action = InitialPion { row, column };
        PlacementContract::pre(self, &action)
            .inspect_err(|e| warn!(error = %e, "Pion placement rejected"))?;

        #[cfg(debug_assertions)]
        let before = self.clone();

        let row = match self.placement_step {
            0 => row,
            _ => self.unplaced_rows().first().copied().unwrap_or(row),
        };
        self.players[row.index()].set_pion(column);
        self.placement_step += 1;

        let result = if self.placement_step < 2 {
            debug!(%row, column, "First pion placed");
            PionPlacement::First { row, column }
        } else {
            let winner = self.coin_winner.ok_or(MoveError::CoinNotTossed)?;
            self.current = winner;
            self.is_first_turn = true;
            self.phase = Phase::PlaceBoard;
            let target = self.resolve_target()?;
            info!(%row, column, combined = target.combined, "Placement complete");
            PionPlacement::Complete {
                row,
                column,
                target,
            }
        };

        #[cfg(debug_assertions)]
        PlacementContract::post(&before, self)?;

        Ok(result)
    }

    /// Moves `row`'s pion to `column` and returns the value to claim.
    #[instrument(skip(self))]
    pub fn move_pion(&mut self, row: PlayerId, column: usize) -> Result<PionMove, MoveError> {
        let action = PionShift { row, column };
        PionShiftContract::pre(self, &action)
            .inspect_err(|e| warn!(error = %e, "Pion move rejected"))?;

        #[cfg(debug_assertions)]
        let before = self.clone();

        let from = self.players[row.index()]
            .pion()
            .ok_or(MoveError::PionMissing(row))?;
        self.players[row.index()].set_pion(column);
        self.phase = Phase::PlaceBoard;
        let target = self.resolve_target()?;
        debug!(%row, from, to = column, combined = target.combined, "Pion moved");

        #[cfg(debug_assertions)]
        PionShiftContract::post(&before, self)?;

        Ok(PionMove {
            row,
            from,
            to: column,
            target,
        })
    }

    /// Claims `coord` for the current player.
    #[instrument(skip(self))]
    pub fn place_on_board(&mut self, coord: Coord) -> Result<BoardPlacement, MoveError> {
        let action = CellClaim { coord };
        CellClaimContract::pre(self, &action)
            .inspect_err(|e| warn!(error = %e, "Board placement rejected"))?;

        #[cfg(debug_assertions)]
        let before = self.clone();

        let player = self.current;
        let pions = self.placed_pions()?;
        let value = self.variant.combine_columns(pions[0], pions[1]);

        let winning_cells = {
            let placement = self.board.claim(coord, player)?;
            rules::check_win(&placement)
        };
        self.players[player.index()].record_placement();
        self.history.push(MoveRecord {
            player,
            coord,
            value,
            pions,
        });

        let result = match winning_cells {
            Some(cells) => {
                self.win_cells = cells.clone();
                self.finish(Outcome::Winner {
                    player,
                    reason: WinReason::FourInARow,
                });
                BoardPlacement::Won {
                    winner: player,
                    cells,
                }
            }
            None => {
                self.advance_turn();
                debug!(%player, %coord, value, next = %self.current, "Cell claimed");
                BoardPlacement::Continue { next: self.current }
            }
        };

        #[cfg(debug_assertions)]
        CellClaimContract::post(&before, self)?;

        Ok(result)
    }

    /// Passes the turn without claiming a cell.
    #[instrument(skip(self))]
    pub fn skip_turn(&mut self) -> Result<PlayerId, MoveError> {
        RoundUndecided::check(self).inspect_err(|e| warn!(error = %e, "Skip rejected"))?;
        if !matches!(self.phase, Phase::MovePion | Phase::PlaceBoard) {
            warn!(phase = %self.phase, "Skip rejected");
            return Err(MoveError::WrongPhase {
                expected: Phase::MovePion,
                actual: self.phase,
            });
        }
        let skipped = self.current;
        self.advance_turn();
        debug!(%skipped, next = %self.current, "Turn skipped");
        Ok(self.current)
    }

    /// Declares a winner. Rejected once the round is decided.
    #[instrument(skip(self))]
    pub fn set_winner(
        &mut self,
        player: PlayerId,
        reason: WinReason,
    ) -> Result<Outcome, MoveError> {
        RoundUndecided::check(self).inspect_err(|e| warn!(error = %e, "Winner rejected"))?;
        let outcome = Outcome::Winner { player, reason };
        self.finish(outcome);
        Ok(outcome)
    }

    /// Declares a draw. Rejected once the round is decided.
    #[instrument(skip(self))]
    pub fn set_draw(&mut self) -> Result<Outcome, MoveError> {
        RoundUndecided::check(self).inspect_err(|e| warn!(error = %e, "Draw rejected"))?;
        self.finish(Outcome::Draw);
        Ok(Outcome::Draw)
    }

    /// Applies the timeout policy for `player`'s expired clock.
    ///
    /// Only the first call for the player to act has an effect.
    #[instrument(skip(self))]
    pub fn time_out(&mut self, player: PlayerId) -> TimeoutEffect {
        let acting = matches!(
            self.phase,
            Phase::Placement | Phase::MovePion | Phase::PlaceBoard
        );
        if self.outcome.is_some() || !acting || player != self.current {
            debug!(%player, phase = %self.phase, "Stale timeout ignored");
            return TimeoutEffect::Ignored;
        }

        match self.timeout_policy {
            TimeoutPolicy::Forfeit => {
                let outcome = Outcome::Winner {
                    player: player.opponent(),
                    reason: WinReason::Timeout,
                };
                self.finish(outcome);
                TimeoutEffect::Forfeit(outcome)
            }
            TimeoutPolicy::SkipTurn if self.phase != Phase::Placement => {
                self.advance_turn();
                info!(%player, next = %self.current, "Turn skipped on timeout");
                TimeoutEffect::Skip { next: self.current }
            }
            TimeoutPolicy::SkipTurn => {
                debug!(%player, "Timeout during placement ignored");
                TimeoutEffect::Ignored
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Internal transitions
    // ─────────────────────────────────────────────────────────────

    fn advance_turn(&mut self) {
        self.current = self.current.opponent();
        self.is_first_turn = false;
        self.phase = Phase::MovePion;
    }

    fn finish(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
        self.phase = Phase::Finished;
        info!(%outcome, "Round finished");
    }

    fn placed_pions(&self) -> Result<[usize; 2], MoveError> {
        let one = self.players[0].pion().ok_or(MoveError::PionMissing(PlayerId::One))?;
        let two = self.players[1].pion().ok_or(MoveError::PionMissing(PlayerId::Two))?;
        Ok([one, two])
    }

    /// Computes the current target and ends the round if it is a dead end.
    fn resolve_target(&mut self) -> Result<Target, MoveError> {
        let pions = self.placed_pions()?;
        let combined = self.variant.combine_columns(pions[0], pions[1]);
        let candidates = self.board.cells_with_value(combined);
        let stalemate = if candidates.is_empty() {
            let resolution = rules::check_auto_game_over(
                &self.board,
                self.variant,
                pions,
                self.is_first_turn,
                self.current,
            );
            let outcome = match resolution {
                AutoGameOver::AutoLose { winner, .. } => Outcome::Winner {
                    player: winner,
                    reason: WinReason::AutoLose,
                },
                AutoGameOver::Draw => Outcome::Draw,
            };
            warn!(combined, player = %self.current, ?resolution, "No free cell for combined value");
            self.finish(outcome);
            Some(resolution)
        } else {
            None
        };
        Ok(Target {
            combined,
            candidates,
            stalemate,
        })
    }

    // ─────────────────────────────────────────────────────────────
    //  Queries
    // ─────────────────────────────────────────────────────────────

    /// Game variant.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Match mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The main board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Both players, in seat order.
    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    /// One player's record.
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    /// Seat to act.
    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Outcome, once the round is decided.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Winning seat, if any.
    pub fn winner(&self) -> Option<PlayerId> {
        self.outcome.and_then(|o| o.winner())
    }

    /// Returns true once the round is decided.
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Cells of the winning run (empty unless won by four in a row).
    pub fn win_cells(&self) -> &[Coord] {
        &self.win_cells
    }

    /// Append-only record of board placements.
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Seat that won the coin toss.
    pub fn coin_winner(&self) -> Option<PlayerId> {
        self.coin_winner
    }

    /// Pions placed so far (0, 1 or 2).
    pub fn placement_step(&self) -> u8 {
        self.placement_step
    }

    /// Returns true until the coin winner's first claim after placement.
    pub fn is_first_turn(&self) -> bool {
        self.is_first_turn
    }

    /// Pion columns of rows one and two.
    pub fn pions(&self) -> [Option<usize>; 2] {
        [self.players[0].pion(), self.players[1].pion()]
    }

    /// Rows still waiting for a pion.
    pub fn unplaced_rows(&self) -> Vec<PlayerId> {
        PlayerId::ALL
            .into_iter()
            .filter(|&id| self.player(id).pion().is_none())
            .collect()
    }

    /// Combined value of both pions; `None` until both are placed.
    pub fn combined_value(&self) -> Option<u8> {
        match self.pions() {
            [Some(a), Some(b)] => Some(self.variant.combine_columns(a, b)),
            _ => None,
        }
    }

    /// Free cells holding the combined value.
    #[instrument(skip(self))]
    pub fn candidate_cells(&self) -> Vec<Coord> {
        self.combined_value()
            .map(|value| self.board.cells_with_value(value))
            .unwrap_or_default()
    }

    /// Columns `row`'s pion may not move to.
    pub fn disabled_columns(&self, row: PlayerId) -> Vec<usize> {
        rules::disabled_columns(self.variant, self.pions(), row)
    }

    /// Columns the next placement pion may not take.
    pub fn disabled_columns_for_placement(&self) -> Vec<usize> {
        let first = match self.placement_step {
            1 => self.pions().into_iter().flatten().next(),
            _ => None,
        };
        rules::disabled_columns_for_placement(self.variant, first)
    }

    /// Dead-end resolution for `player` at the current pion positions.
    ///
    /// `None` until both pions are placed.
    pub fn check_auto_game_over(&self, player: PlayerId) -> Option<AutoGameOver> {
        let pions = self.placed_pions().ok()?;
        Some(rules::check_auto_game_over(
            &self.board,
            self.variant,
            pions,
            self.is_first_turn,
            player,
        ))
    }

    /// Returns true when the AI seat must act.
    pub fn is_ai_turn(&self) -> bool {
        self.mode == Mode::Ai
            && self.current == PlayerId::Two
            && self.outcome.is_none()
            && matches!(
                self.phase,
                Phase::Placement | Phase::MovePion | Phase::PlaceBoard
            )
    }

    /// Per-turn clock; `None` when unlimited.
    pub fn time_limit(&self) -> Option<Duration> {
        (self.time_limit_secs > 0).then(|| Duration::from_secs(u64::from(self.time_limit_secs)))
    }

    /// Configured AI difficulty.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Configured timeout policy.
    pub fn timeout_policy(&self) -> TimeoutPolicy {
        self.timeout_policy
    }

    /// Serialisable view of the match.
    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot::from(self)
    }
}
