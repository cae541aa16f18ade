//! End-to-end scenarios through the public command surface.

use strictly_dolanan::{
    Board, BoardPlacement, CoinSide, Coord, Match, MatchConfig, Mode, MoveError, Outcome, Phase,
    PionPlacement, PlayerId, Variant, WinReason, rules::AutoGameOver,
};

fn sum_board() -> Board {
    let values: Vec<u8> = (0..100).map(|i| 2 + (i % 17) as u8).collect();
    Board::from_values(10, &values).expect("100 values")
}

fn opened(variant: Variant, board: Board, coin_winner: PlayerId) -> Match {
    let config = MatchConfig::new(variant, Mode::Pvp).with_seed(1);
    let mut game = Match::with_board(&config, board);
    let result = if coin_winner == PlayerId::One {
        CoinSide::Head
    } else {
        CoinSide::Tail
    };
    game.settle_coin_toss(PlayerId::One, CoinSide::Head, result)
        .unwrap();
    game.set_placement_phase().unwrap();
    game
}

#[test]
fn test_sum_scenario_head_head() {
    let mut game = opened(Variant::Sum, sum_board(), PlayerId::One);
    assert_eq!(game.coin_winner(), Some(PlayerId::One));

    game.place_initial_pion(PlayerId::One, 3).unwrap();
    let placement = game.place_initial_pion(PlayerId::Two, 6).unwrap();
    let PionPlacement::Complete { target, .. } = placement else {
        panic!("second pion completes placement");
    };
    assert_eq!(target.combined, 11);
    assert!(target.candidates.contains(&Coord::new(0, 9)));
    assert_eq!(game.phase(), Phase::PlaceBoard);
    assert_eq!(game.current_player(), PlayerId::One);

    let result = game.place_on_board(Coord::new(0, 9)).unwrap();
    assert_eq!(result, BoardPlacement::Continue { next: PlayerId::Two });
    assert_eq!(game.current_player(), PlayerId::Two);
    assert_eq!(game.phase(), Phase::MovePion);
    assert_eq!(game.board().owner_at(Coord::new(0, 9)), Some(PlayerId::One));
    assert_eq!(game.player(PlayerId::One).pions_on_board(), 1);
}

#[test]
fn test_later_turn_auto_lose() {
    // Only 8s. Player two moves to magnitude 5 and gets 9; column 3 would
    // have kept 8, so the dead end is their loss.
    let mut game = opened(Variant::Sum, Board::filled(10, 8), PlayerId::One);
    game.place_initial_pion(PlayerId::One, 3).unwrap();
    game.place_initial_pion(PlayerId::Two, 3).unwrap();
    game.place_on_board(Coord::new(0, 0)).unwrap();

    let moved = game.move_pion(PlayerId::Two, 4).unwrap();
    assert_eq!(moved.target.combined, 9);
    assert!(moved.target.is_stalemate());
    assert_eq!(
        game.outcome(),
        Some(Outcome::Winner {
            player: PlayerId::One,
            reason: WinReason::AutoLose,
        })
    );
    assert_eq!(game.phase(), Phase::Finished);
}

#[test]
fn test_win_detection_through_the_match() {
    // Row r holds 2 + r, so the combined value picks the row.
    let values: Vec<u8> = (0..100).map(|i| 2 + (i / 10) as u8).collect();
    let board = Board::from_values(10, &values).unwrap();
    let mut game = opened(Variant::Sum, board, PlayerId::One);
    game.place_initial_pion(PlayerId::One, 0).unwrap();
    game.place_initial_pion(PlayerId::Two, 0).unwrap();

    // Combined 2 → row 0. One takes (0, 0).
    game.place_on_board(Coord::new(0, 0)).unwrap();
    // Two moves to column 1 → 3 → row 1.
    game.move_pion(PlayerId::Two, 1).unwrap();
    game.place_on_board(Coord::new(1, 0)).unwrap();
    // One moves to column 1 → 2 + 2 = 4 → row 2; alternate back and forth.
    game.move_pion(PlayerId::One, 1).unwrap();
    game.place_on_board(Coord::new(2, 0)).unwrap();
    game.move_pion(PlayerId::Two, 0).unwrap();
    game.place_on_board(Coord::new(1, 1)).unwrap();
    game.move_pion(PlayerId::One, 0).unwrap();
    game.place_on_board(Coord::new(0, 1)).unwrap();
    game.move_pion(PlayerId::Two, 1).unwrap();
    game.place_on_board(Coord::new(1, 2)).unwrap();
    game.move_pion(PlayerId::One, 1).unwrap();
    game.place_on_board(Coord::new(2, 1)).unwrap();
    game.move_pion(PlayerId::Two, 0).unwrap();
    let result = game.place_on_board(Coord::new(1, 3)).unwrap();

    let BoardPlacement::Won { winner, mut cells } = result else {
        panic!("row 1 is complete");
    };
    cells.sort();
    assert_eq!(winner, PlayerId::Two);
    assert_eq!(
        cells,
        vec![Coord::new(1, 0), Coord::new(1, 1), Coord::new(1, 2), Coord::new(1, 3)]
    );
    assert_eq!(game.win_cells().len(), 4);
    assert_eq!(game.phase(), Phase::Finished);
    assert_eq!(game.move_pion(PlayerId::One, 0), Err(MoveError::GameOver));
}

#[test]
fn test_auto_lose_symmetry() {
    // Only 5s on the board. Pions at magnitudes 1 and 10 make 11; row one
    // cannot escape (12..=18) but row two can (2..=10). On the first turn
    // both rows count, so the coin winner loses either way.
    for winner in PlayerId::ALL {
        let mut game = opened(Variant::Sum, Board::filled(10, 5), winner);
        game.place_initial_pion(PlayerId::One, 0).unwrap();
        let placement = game.place_initial_pion(PlayerId::Two, 9).unwrap();

        let PionPlacement::Complete { target, .. } = placement else {
            panic!("second pion completes placement");
        };
        assert_eq!(target.combined, 11);
        assert!(target.candidates.is_empty());
        assert_eq!(
            target.stalemate,
            Some(AutoGameOver::AutoLose {
                loser: winner,
                winner: winner.opponent(),
            })
        );
        assert_eq!(game.winner(), Some(winner.opponent()));
        assert_eq!(
            game.check_auto_game_over(winner),
            Some(AutoGameOver::AutoLose {
                loser: winner,
                winner: winner.opponent(),
            })
        );
    }
}

#[test]
fn test_full_board_draw() {
    // A single-cell board: the opener takes it, and whatever the next player
    // does there is nothing left to claim anywhere.
    let board = Board::from_values(1, &[2]).unwrap();
    let mut game = opened(Variant::Sum, board, PlayerId::One);
    game.place_initial_pion(PlayerId::One, 0).unwrap();
    game.place_initial_pion(PlayerId::Two, 0).unwrap();
    game.place_on_board(Coord::new(0, 0)).unwrap();
    assert!(game.board().is_full());

    let moved = game.move_pion(PlayerId::Two, 4).unwrap();
    assert_eq!(moved.target.stalemate, Some(AutoGameOver::Draw));
    assert_eq!(game.outcome(), Some(Outcome::Draw));
    assert_eq!(game.phase(), Phase::Finished);
}

#[test]
fn test_product_round() {
    // All 12s: 3 × 4 or 2 × 6.
    let mut game = opened(Variant::Product, Board::filled(10, 12), PlayerId::Two);
    assert_eq!(game.current_player(), PlayerId::Two);
    game.place_initial_pion(PlayerId::Two, 2).unwrap();
    assert!(game.disabled_columns_for_placement().is_empty());
    game.place_initial_pion(PlayerId::Two, 3).unwrap();
    assert_eq!(game.pions(), [Some(3), Some(2)]);
    assert_eq!(game.combined_value(), Some(12));
    assert_eq!(game.candidate_cells().len(), 100);

    game.place_on_board(Coord::new(5, 5)).unwrap();
    assert_eq!(game.disabled_columns(PlayerId::One), vec![3]);
    assert_eq!(
        game.move_pion(PlayerId::One, 9),
        Err(MoveError::ColumnOutOfRange(9))
    );
    // 6 × 3 = 18 exists nowhere, while column 3 would have worked.
    let moved = game.move_pion(PlayerId::One, 5).unwrap();
    assert_eq!(moved.target.combined, 18);
    assert!(moved.target.is_stalemate());
}

#[test]
fn test_move_pion_ownership_rules() {
    let mut game = opened(Variant::Sum, sum_board(), PlayerId::One);
    game.place_initial_pion(PlayerId::One, 3).unwrap();
    game.place_initial_pion(PlayerId::Two, 6).unwrap();
    game.place_on_board(Coord::new(0, 9)).unwrap();

    assert_eq!(
        game.move_pion(PlayerId::One, 4),
        Err(MoveError::NotYourPion {
            player: PlayerId::Two,
            row: PlayerId::One,
        })
    );
    assert_eq!(game.move_pion(PlayerId::Two, 6), Err(MoveError::SameColumn(6)));
    assert_eq!(
        game.place_on_board(Coord::new(2, 6)),
        Err(MoveError::WrongPhase {
            expected: Phase::PlaceBoard,
            actual: Phase::MovePion,
        })
    );
}
