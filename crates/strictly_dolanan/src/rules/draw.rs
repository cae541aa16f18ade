//! Dead-end detection: auto-lose or draw when a combined value has no free cell.

use super::super::{Board, PlayerId, Variant};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Resolution of a turn whose combined value matches no free cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AutoGameOver {
    /// The stuck player had a live alternative and forfeits.
    AutoLose {
        /// Player who picked the dead end.
        loser: PlayerId,
        /// Their opponent.
        winner: PlayerId,
    },
    /// No alternative existed for anyone.
    Draw,
}

/// Returns true if moving `row`'s pion to some other column yields a free cell.
///
/// The pion's current column is skipped; the other row's pion stays put.
#[instrument(skip(board))]
pub fn has_alternative_column(
    board: &Board,
    variant: Variant,
    pions: [usize; 2],
    row: PlayerId,
) -> bool {
    let own = pions[row.index()];
    let other = pions[row.opponent().index()];
    (0..variant.columns())
        .filter(|&column| column != own)
        .filter(|&column| variant.is_reachable(column, other))
        .any(|column| board.has_free_value(variant.combine_columns(column, other)))
}

/// Decides the round after `player` ended up with a value nobody can claim.
///
/// On the first turn after placement the coin winner could have shifted
/// either pion, so both rows are searched. Later only the player's own row
/// counts. Any live alternative makes it the player's loss; otherwise draw.
#[instrument(skip(board))]
pub fn check_auto_game_over(
    board: &Board,
    variant: Variant,
    pions: [usize; 2],
    first_turn: bool,
    player: PlayerId,
) -> AutoGameOver {
    let rows: &[PlayerId] = if first_turn {
        &PlayerId::ALL
    } else {
        std::slice::from_ref(&player)
    };

    let escapable = rows
        .iter()
        .any(|&row| has_alternative_column(board, variant, pions, row));

    let resolution = if escapable {
        AutoGameOver::AutoLose {
            loser: player,
            winner: player.opponent(),
        }
    } else {
        AutoGameOver::Draw
    };
    debug!(?resolution, "Resolved dead-end value");
    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Coord;

    #[test]
    fn test_first_turn_checks_both_rows() {
        // Pions at magnitudes 1 and 10: row one can only reach 12..=18,
        // row two reaches 2..=10.
        let board = Board::filled(10, 5);
        let pions = [0, 9];
        assert!(!has_alternative_column(&board, Variant::Sum, pions, PlayerId::One));
        assert!(has_alternative_column(&board, Variant::Sum, pions, PlayerId::Two));

        assert_eq!(
            check_auto_game_over(&board, Variant::Sum, pions, true, PlayerId::One),
            AutoGameOver::AutoLose {
                loser: PlayerId::One,
                winner: PlayerId::Two,
            }
        );
        // Later turns only consider the stuck player's own row.
        assert_eq!(
            check_auto_game_over(&board, Variant::Sum, pions, false, PlayerId::One),
            AutoGameOver::Draw
        );
    }

    #[test]
    fn test_full_board_is_a_draw() {
        let mut board = Board::filled(10, 6);
        for row in 0..10 {
            for col in 0..10 {
                let owner = if (row + col) % 2 == 0 {
                    PlayerId::One
                } else {
                    PlayerId::Two
                };
                board.claim(Coord::new(row, col), owner).unwrap();
            }
        }
        for variant in [Variant::Sum, Variant::Product] {
            for player in PlayerId::ALL {
                assert_eq!(
                    check_auto_game_over(&board, variant, [2, 3], true, player),
                    AutoGameOver::Draw
                );
                assert_eq!(
                    check_auto_game_over(&board, variant, [2, 3], false, player),
                    AutoGameOver::Draw
                );
            }
        }
    }

    #[test]
    fn test_current_column_is_not_an_alternative() {
        // Pions at 2 and 6 already make 12 in the product variant, so the
        // current columns are no escape. Only row one can reach the lone 24.
        let mut values = vec![12u8; 100];
        values[57] = 24;
        let board = Board::from_values(10, &values).unwrap();
        assert!(!has_alternative_column(&board, Variant::Product, [1, 5], PlayerId::Two));
        assert!(has_alternative_column(&board, Variant::Product, [1, 5], PlayerId::One));
    }

    #[test]
    fn test_overflowing_columns_are_skipped() {
        // 19 and 20 cannot exist on a sum board; a stray 20 must not count.
        let mut values = vec![2u8; 100];
        values[0] = 20;
        let board = Board::from_values(10, &values).unwrap();
        assert!(!has_alternative_column(&board, Variant::Sum, [9, 8], PlayerId::Two));
    }
}
