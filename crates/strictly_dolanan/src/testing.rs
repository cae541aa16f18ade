//! Shared fixtures for unit tests.

use crate::{Board, CoinSide, Match, MatchConfig, Mode, PlayerId, Variant};

/// Sum board with value `2 + (i % 17)` at row-major index `i`.
///
/// The value 11 sits at (0, 9), (2, 6), (4, 3), (6, 0), (7, 7) and (9, 4).
pub fn sum_board() -> Board {
    let values: Vec<u8> = (0..100).map(|i| 2 + (i % 17) as u8).collect();
    Board::from_values(10, &values).expect("100 values")
}

/// Sum match on [`sum_board`]: player one wins the toss and places row one
/// at column 3 and row two at column 6, so player one must claim an 11.
pub fn ready_match(config: &MatchConfig) -> Match {
    let mut game = Match::with_board(config, sum_board());
    game.settle_coin_toss(PlayerId::One, CoinSide::Head, CoinSide::Head)
        .expect("toss");
    game.set_placement_phase().expect("placement");
    game.place_initial_pion(PlayerId::One, 3).expect("first pion");
    game.place_initial_pion(PlayerId::Two, 6).expect("second pion");
    game
}

/// [`ready_match`] with a seeded player-vs-player config.
pub fn ready_sum_match() -> Match {
    ready_match(&MatchConfig::new(Variant::Sum, Mode::Pvp).with_seed(5))
}
