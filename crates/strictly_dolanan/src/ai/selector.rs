//! Move selection and the AI turn driver.

use super::evaluate::{evaluate_move, score_move};
use super::{Difficulty, DifficultyProfile};
use crate::action::{BoardPlacement, MoveError, PionMove, PionPlacement};
use crate::rules::{disabled_columns_for_placement, legal_columns};
use crate::{Board, CoinSide, Coord, Match, Phase, PlayerId, Variant};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument};

/// The selector's decision for a move-pion turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AiMove {
    /// Move the pion to `column`, then claim `cell`.
    Play {
        /// Destination column of the AI's pion.
        column: usize,
        /// Cell to claim afterwards.
        cell: Coord,
        /// Score the choice was ranked by.
        score: f64,
    },
    /// No legal column leads to a free cell; move here and let the round resolve.
    NoMoves {
        /// Next legal column after the current one, cyclically.
        fallback_column: usize,
    },
}

/// Everything the AI did during one call to [`MoveSelector::play`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiTurn {
    /// Pions placed during the placement phase.
    pub placements: Vec<PionPlacement>,
    /// Pion move, when the turn started in move-pion.
    pub pion_move: Option<PionMove>,
    /// Cell claim, unless the round ended first.
    pub claim: Option<BoardPlacement>,
}

#[derive(Debug, Clone, Copy)]
struct Scored {
    column: usize,
    cell: Coord,
    score: f64,
}

/// Heuristic player for one seat.
#[derive(Debug, Clone)]
pub struct MoveSelector {
    seat: PlayerId,
    difficulty: Difficulty,
    rng: StdRng,
}

impl MoveSelector {
    /// Creates a selector for `seat`, seeded for reproducibility when `seed` is set.
    #[instrument]
    pub fn new(seat: PlayerId, difficulty: Difficulty, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            seat,
            difficulty,
            rng,
        }
    }

    /// Seat this selector plays.
    pub fn seat(&self) -> PlayerId {
        self.seat
    }

    /// Difficulty in use.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    fn profile(&self) -> &'static DifficultyProfile {
        self.difficulty.profile()
    }

    /// Picks a coin side uniformly.
    pub fn choose_coin_side(&mut self) -> CoinSide {
        if self.rng.random_bool(0.5) {
            CoinSide::Head
        } else {
            CoinSide::Tail
        }
    }

    /// Picks a column for a pion during placement.
    ///
    /// Center-first preference, minus columns the first pion rules out;
    /// with the profile's opening randomness, a random column from the
    /// variant's opening range instead.
    #[instrument(skip(self))]
    pub fn choose_initial_placement(
        &mut self,
        variant: Variant,
        first_column: Option<usize>,
    ) -> usize {
        let disabled = disabled_columns_for_placement(variant, first_column);

        if self.rng.random_bool(self.profile().opening_randomness) {
            let range: Vec<usize> = variant
                .opening_range()
                .filter(|c| !disabled.contains(c))
                .collect();
            if let Some(&column) = range.choose(&mut self.rng) {
                return column;
            }
        }

        variant
            .preferred_columns()
            .iter()
            .copied()
            .find(|c| !disabled.contains(c))
            .unwrap_or(0)
    }

    /// Picks the cell to claim among `candidates`.
    #[instrument(skip(self, board, candidates), fields(candidates = candidates.len()))]
    pub fn choose_placement(&mut self, board: &Board, candidates: &[Coord]) -> Option<Coord> {
        let profile = self.profile();
        let seat = self.seat;
        let scored: Vec<Scored> = candidates
            .iter()
            .map(|&cell| Scored {
                column: 0,
                cell,
                score: evaluate_move(board, cell, seat, profile, &mut self.rng),
            })
            .collect();
        self.pick(scored).map(|s| s.cell)
    }

    /// Picks a pion column and cell for a move-pion turn.
    ///
    /// Only the selector's own row is considered.
    #[instrument(skip(self, game), fields(seat = %self.seat))]
    pub fn choose_move(&mut self, game: &Match) -> Result<AiMove, MoveError> {
        let variant = game.variant();
        let pions = game.pions();
        let own = pions[self.seat.index()].ok_or(MoveError::PionMissing(self.seat))?;
        let other = pions[self.seat.opponent().index()]
            .ok_or(MoveError::PionMissing(self.seat.opponent()))?;
        let board = game.board();
        let profile = self.profile();
        let seat = self.seat;
        let columns = legal_columns(variant, pions, seat);

        let mut scored = Vec::new();
        for &column in &columns {
            let value = variant.combine_columns(column, other);
            for cell in board.cells_with_value(value) {
                let score = evaluate_move(board, cell, seat, profile, &mut self.rng);
                scored.push(Scored {
                    column,
                    cell,
                    score,
                });
            }
        }

        if let Some(lookahead) = profile.lookahead {
            scored.sort_by(|a, b| b.score.total_cmp(&a.score));
            scored.truncate(lookahead.candidates);
            for entry in &mut scored {
                if entry.score < profile.win_score {
                    let reply = best_reply(
                        board,
                        variant,
                        entry.column,
                        other,
                        entry.cell,
                        seat,
                        profile,
                    );
                    entry.score -= lookahead.reply_weight * reply;
                }
            }
        }

        match self.pick(scored) {
            Some(choice) => {
                debug!(
                    column = choice.column,
                    cell = %choice.cell,
                    score = choice.score,
                    "AI move chosen"
                );
                Ok(AiMove::Play {
                    column: choice.column,
                    cell: choice.cell,
                    score: choice.score,
                })
            }
            None => {
                let k = variant.columns();
                let fallback_column = (1..=k)
                    .map(|step| (own + step) % k)
                    .find(|c| columns.contains(c))
                    .unwrap_or((own + 1) % k);
                info!(fallback_column, "No legal move for AI");
                Ok(AiMove::NoMoves { fallback_column })
            }
        }
    }

    /// Samples from the best `top_k` entries; deterministic for `top_k == 1`.
    fn pick(&mut self, mut scored: Vec<Scored>) -> Option<Scored> {
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(self.profile().top_k.max(1));
        scored.choose(&mut self.rng).copied()
    }

    /// Performs whatever the seat must do now.
    ///
    /// In placement both pions are placed (own row first) and the first
    /// cell claimed. In move-pion the pion moves and a cell is claimed. In
    /// place-board only the claim is made.
    #[instrument(skip(self, game), fields(seat = %self.seat, phase = %game.phase()))]
    pub fn play(&mut self, game: &mut Match) -> Result<AiTurn, MoveError> {
        if game.is_finished() {
            return Err(MoveError::GameOver);
        }
        if game.current_player() != self.seat {
            return Err(MoveError::NotYourTurn(self.seat));
        }

        let mut turn = AiTurn::default();
        match game.phase() {
            Phase::Placement => {
                while game.phase() == Phase::Placement {
                    let rows = game.unplaced_rows();
                    let row = if rows.contains(&self.seat) {
                        self.seat
                    } else {
                        self.seat.opponent()
                    };
                    let first = game.pions().into_iter().flatten().next();
                    let column = self.choose_initial_placement(game.variant(), first);
                    turn.placements.push(game.place_initial_pion(row, column)?);
                }
                self.claim_if_open(game, &mut turn)?;
            }
            Phase::PlaceBoard => self.claim_if_open(game, &mut turn)?,
            Phase::MovePion => match self.choose_move(game)? {
                AiMove::Play { column, cell, .. } => {
                    turn.pion_move = Some(game.move_pion(self.seat, column)?);
                    if !game.is_finished() {
                        turn.claim = Some(game.place_on_board(cell)?);
                    }
                }
                AiMove::NoMoves { fallback_column } => {
                    turn.pion_move = Some(game.move_pion(self.seat, fallback_column)?);
                }
            },
            actual => {
                return Err(MoveError::WrongPhase {
                    expected: Phase::MovePion,
                    actual,
                });
            }
        }
        Ok(turn)
    }

    fn claim_if_open(&mut self, game: &mut Match, turn: &mut AiTurn) -> Result<(), MoveError> {
        if game.is_finished() || game.phase() != Phase::PlaceBoard {
            return Ok(());
        }
        let candidates = game.candidate_cells();
        if let Some(cell) = self.choose_placement(game.board(), &candidates) {
            turn.claim = Some(game.place_on_board(cell)?);
        }
        Ok(())
    }
}

/// Opponent's best deterministic score after `seat` moves to `column` and claims `cell`.
fn best_reply(
    board: &Board,
    variant: Variant,
    column: usize,
    other: usize,
    cell: Coord,
    seat: PlayerId,
    profile: &DifficultyProfile,
) -> f64 {
    let mut after = board.clone();
    if after.claim(cell, seat).is_err() {
        return 0.0;
    }
    let opponent = seat.opponent();
    let mut pions = [None; 2];
    pions[seat.index()] = Some(column);
    pions[opponent.index()] = Some(other);

    legal_columns(variant, pions, opponent)
        .into_iter()
        .flat_map(|reply| after.cells_with_value(variant.combine_columns(column, reply)))
        .map(|reply_cell| score_move(&after, reply_cell, opponent, profile))
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ready_match, ready_sum_match};
    use crate::{MatchConfig, Mode};

    #[test]
    fn test_initial_placement_respects_disabled_columns() {
        let mut selector = MoveSelector::new(PlayerId::Two, Difficulty::Easy, Some(4));
        for _ in 0..200 {
            let column = selector.choose_initial_placement(Variant::Sum, Some(9));
            assert!(column < 8);
        }
    }

    #[test]
    fn test_hard_opening_prefers_center() {
        let mut selector = MoveSelector::new(PlayerId::Two, Difficulty::Hard, Some(8));
        let picks: Vec<usize> = (0..50)
            .map(|_| selector.choose_initial_placement(Variant::Product, None))
            .collect();
        assert!(picks.iter().all(|c| (1..=6).contains(c) || *c == 4));
        assert!(picks.iter().filter(|&&c| c == 4).count() > 25);
    }

    #[test]
    fn test_choose_move_is_legal() {
        let mut game = ready_sum_match();
        game.place_on_board(Coord::new(0, 9)).unwrap();
        let mut selector = MoveSelector::new(PlayerId::Two, Difficulty::Normal, Some(1));
        match selector.choose_move(&game).unwrap() {
            AiMove::Play { column, cell, .. } => {
                assert_ne!(column, 6);
                let value = game.variant().combine_columns(3, column);
                assert_eq!(game.board().get(cell).map(|c| c.value()), Some(value));
                assert!(game.board().owner_at(cell).is_none());
            }
            AiMove::NoMoves { .. } => panic!("moves exist"),
        }
    }

    #[test]
    fn test_takes_the_winning_cell() {
        let mut game = ready_sum_match();
        game.place_on_board(Coord::new(0, 9)).unwrap();
        // Player two gets three in a row ending next to the 12 at (4, 4),
        // reachable by moving their pion to column 7 (4 + 8). The other end
        // of the run is taken by player one.
        game.board.claim(Coord::new(4, 0), PlayerId::One).unwrap();
        for col in 1..4 {
            game.board.claim(Coord::new(4, col), PlayerId::Two).unwrap();
        }
        let mut selector = MoveSelector::new(PlayerId::Two, Difficulty::Hard, Some(2));
        assert_eq!(
            selector.choose_move(&game).unwrap(),
            AiMove::Play {
                column: 7,
                cell: Coord::new(4, 4),
                score: 100_000.0,
            }
        );
    }

    /// Sum board of 18s with a 7 at the center, a 12 in the corner and a 4
    /// that would finish player one's run along the bottom row. Player one's
    /// pion sits on column 5 (6), player two's on column 3 (4).
    fn lookahead_match() -> Match {
        let mut values = vec![18u8; 100];
        values[44] = 7;
        values[0] = 12;
        values[93] = 4;
        let board = Board::from_values(10, &values).unwrap();
        let config = MatchConfig::new(Variant::Sum, Mode::Pvp).with_seed(3);
        let mut game = Match::with_board(&config, board);
        for col in 0..3 {
            game.board.claim(Coord::new(9, col), PlayerId::One).unwrap();
        }
        game.players[0].set_pion(5);
        game.players[1].set_pion(3);
        game.phase = Phase::MovePion;
        game.current = PlayerId::Two;
        game
    }

    #[test]
    fn test_hard_avoids_handing_over_a_win() {
        let game = lookahead_match();
        for seed in 0..50 {
            let mut selector = MoveSelector::new(PlayerId::Two, Difficulty::Hard, Some(seed));
            match selector.choose_move(&game).unwrap() {
                AiMove::Play { column, cell, .. } => {
                    assert_eq!((column, cell), (5, Coord::new(0, 0)), "seed {seed}");
                }
                AiMove::NoMoves { .. } => panic!("moves exist"),
            }
        }
    }

    #[test]
    fn test_static_score_prefers_the_center() {
        let game = lookahead_match();
        let profile = Difficulty::Hard.profile();
        let center = score_move(game.board(), Coord::new(4, 4), PlayerId::Two, profile);
        let corner = score_move(game.board(), Coord::new(0, 0), PlayerId::Two, profile);
        assert!(center > corner);

        let reply = best_reply(
            game.board(),
            Variant::Sum,
            0,
            5,
            Coord::new(4, 4),
            PlayerId::Two,
            profile,
        );
        assert_eq!(reply, profile.win_score);
    }

    #[test]
    fn test_play_full_turn() {
        let mut game = ready_sum_match();
        game.place_on_board(Coord::new(0, 9)).unwrap();
        let mut selector = MoveSelector::new(PlayerId::Two, Difficulty::Normal, Some(6));
        let turn = selector.play(&mut game).unwrap();
        assert!(turn.pion_move.is_some());
        assert!(turn.claim.is_some());
        assert_eq!(game.history().len(), 2);
        assert_eq!(game.current_player(), PlayerId::One);
    }

    #[test]
    fn test_play_rejects_out_of_turn() {
        let mut game = ready_sum_match();
        let mut selector = MoveSelector::new(PlayerId::Two, Difficulty::Normal, Some(6));
        assert_eq!(
            selector.play(&mut game),
            Err(MoveError::NotYourTurn(PlayerId::Two))
        );
    }

    #[test]
    fn test_play_placement_places_own_row_first() {
        let config = MatchConfig::new(Variant::Sum, Mode::Ai).with_seed(12);
        let mut game = Match::with_board(&config, crate::testing::sum_board());
        game.settle_coin_toss(PlayerId::One, CoinSide::Tail, CoinSide::Head)
            .unwrap();
        game.set_placement_phase().unwrap();
        let mut selector = MoveSelector::new(PlayerId::Two, Difficulty::Hard, Some(3));
        let turn = selector.play(&mut game).unwrap();
        assert_eq!(turn.placements.len(), 2);
        assert!(matches!(
            turn.placements[0],
            PionPlacement::First { row: PlayerId::Two, .. }
        ));
        assert!(game.is_finished() || game.history().len() == 1);
    }

    #[test]
    fn test_no_moves_falls_back() {
        let config = MatchConfig::new(Variant::Sum, Mode::Pvp).with_seed(1);
        let mut game = ready_match(&config);
        game.place_on_board(Coord::new(0, 9)).unwrap();
        // Claim every remaining cell for player one behind the match's back.
        let coords: Vec<Coord> = game
            .board()
            .iter()
            .filter(|(_, c)| c.is_free())
            .map(|(coord, _)| coord)
            .collect();
        for coord in coords {
            game.board.claim(coord, PlayerId::One).unwrap();
        }
        let mut selector = MoveSelector::new(PlayerId::Two, Difficulty::Easy, Some(1));
        assert_eq!(
            selector.choose_move(&game).unwrap(),
            AiMove::NoMoves { fallback_column: 7 }
        );
    }
}
