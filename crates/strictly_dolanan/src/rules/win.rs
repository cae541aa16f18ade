//! Win detection: runs of four along the four board axes.

use super::super::variant::WIN_LENGTH;
use super::super::{Board, CommittedPlacement, Coord, PlayerId};
use tracing::instrument;

/// Horizontal, vertical, and both diagonals.
pub const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Cells owned by `player` contiguous with `origin` along one axis.
///
/// Scans forward then backward, at most `WIN_LENGTH - 1` steps each way.
/// The origin itself is not included.
fn run_along(
    board: &Board,
    origin: Coord,
    player: PlayerId,
    (dr, dc): (isize, isize),
) -> Vec<Coord> {
    let mut cells = Vec::new();
    for sign in [1, -1] {
        for step in 1..WIN_LENGTH as isize {
            match origin.offset(dr * sign, dc * sign, step, board.size()) {
                Some(next) if board.owner_at(next) == Some(player) => cells.push(next),
                _ => break,
            }
        }
    }
    cells
}

/// Checks whether a committed placement completed a run.
///
/// Returns the contiguous owned cells (including the placed one) of the
/// first axis reaching [`WIN_LENGTH`], or `None`.
#[instrument(skip(placement), fields(coord = %placement.coord(), player = %placement.player()))]
pub fn check_win(placement: &CommittedPlacement<'_>) -> Option<Vec<Coord>> {
    let board = placement.board();
    DIRECTIONS.into_iter().find_map(|direction| {
        let mut cells = vec![placement.coord()];
        cells.extend(run_along(board, placement.coord(), placement.player(), direction));
        (cells.len() >= WIN_LENGTH).then_some(cells)
    })
}

/// Length of the `player` streak touching `coord` on each axis, excluding `coord`.
pub fn count_streaks(board: &Board, coord: Coord, player: PlayerId) -> [usize; 4] {
    DIRECTIONS.map(|direction| run_along(board, coord, player, direction).len())
}

/// Returns true if claiming the (free) cell at `coord` would give `player` a run.
///
/// This is the lookahead oracle: it reads only the neighbours, never the
/// target cell, so it is safe to ask before anything is committed.
pub fn would_complete_run(board: &Board, coord: Coord, player: PlayerId) -> bool {
    count_streaks(board, coord, player)
        .iter()
        .any(|streak| streak + 1 >= WIN_LENGTH)
}
