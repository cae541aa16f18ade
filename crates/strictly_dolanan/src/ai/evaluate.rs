//! Static evaluation of a single cell claim.

use super::DifficultyProfile;
use crate::rules::{count_streaks, would_complete_run};
use crate::{Board, Coord, PlayerId};
use rand::Rng;

/// Tiered bonus for a streak length: index 0 for ≥1, 1 for ≥2, 2 for ≥3.
fn streak_bonus(streak: usize, tiers: &[f64; 3]) -> f64 {
    match streak {
        0 => 0.0,
        1 => tiers[0],
        2 => tiers[1],
        _ => tiers[2],
    }
}

/// Bonus for cells near the middle of the board.
pub fn center_bonus(board: &Board, coord: Coord, weight: f64) -> f64 {
    let middle = (board.size() as f64 - 1.0) / 2.0;
    let distance = (coord.row as f64 - middle).abs() + (coord.col as f64 - middle).abs();
    (10.0 - distance).max(0.0) * weight
}

/// Deterministic part of [`evaluate_move`].
pub fn score_move(
    board: &Board,
    coord: Coord,
    player: PlayerId,
    profile: &DifficultyProfile,
) -> f64 {
    if would_complete_run(board, coord, player) {
        return profile.win_score;
    }

    let opponent = player.opponent();
    let mut score = 0.0;
    if would_complete_run(board, coord, opponent) {
        score += profile.block_bonus;
    }
    score += count_streaks(board, coord, player)
        .iter()
        .map(|&s| streak_bonus(s, &profile.own_streak))
        .sum::<f64>();
    score += count_streaks(board, coord, opponent)
        .iter()
        .map(|&s| streak_bonus(s, &profile.opp_streak))
        .sum::<f64>();
    score + center_bonus(board, coord, profile.center_weight)
}

/// Scores `player` claiming the free cell at `coord`.
///
/// A completed run scores exactly `win_score`. Otherwise the score adds the
/// block bonus, streak tiers for both sides, the center bonus and up to
/// `jitter` of noise.
pub fn evaluate_move<R: Rng + ?Sized>(
    board: &Board,
    coord: Coord,
    player: PlayerId,
    profile: &DifficultyProfile,
    rng: &mut R,
) -> f64 {
    let score = score_move(board, coord, player, profile);
    if score >= profile.win_score {
        return score;
    }
    score + rng.random::<f64>() * profile.jitter
}
