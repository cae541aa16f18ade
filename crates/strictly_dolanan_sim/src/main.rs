//! Dolanan Sim - headless AI-vs-AI rounds on top of `strictly_dolanan`.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use strictly_dolanan::{
    Difficulty, Match, MatchConfig, Mode, MoveSelector, PlayerId, Session, Variant,
};
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;

/// Upper bound on AI actions per round; every action claims a cell or ends the round.
const MAX_ACTIONS: usize = 256;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Series {
            config,
            games,
            variant,
            difficulty_one,
            difficulty_two,
            seed,
        } => {
            let mut base = match config {
                Some(path) => MatchConfig::from_file(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => MatchConfig::default(),
            };
            if let Some(variant) = variant {
                base = base.with_variant(variant);
            }
            if let Some(seed) = seed {
                base = base.with_seed(seed);
            }
            run_series(base, games, [difficulty_one, difficulty_two])
        }
        Command::Replay {
            variant,
            difficulty,
            seed,
            json,
        } => run_replay(variant, difficulty, seed, json),
    }
}

/// Plays out the current round of `game` with one selector per seat.
#[instrument(skip_all)]
fn play_round(game: &mut Match, players: &mut [MoveSelector; 2]) -> Result<()> {
    let call = players[0].choose_coin_side();
    let toss = game.coin_toss(PlayerId::One, call)?;
    debug!(winner = %toss.winner, "Coin toss");
    game.set_placement_phase()?;

    let mut actions = 0;
    while !game.is_finished() {
        anyhow::ensure!(actions < MAX_ACTIONS, "round did not terminate");
        let seat = game.current_player();
        players[seat.index()].play(game)?;
        actions += 1;
    }
    Ok(())
}

fn selectors(difficulties: [Difficulty; 2], seed: Option<u64>) -> [MoveSelector; 2] {
    [
        MoveSelector::new(PlayerId::One, difficulties[0], seed.map(|s| s ^ 0x9e37)),
        MoveSelector::new(PlayerId::Two, difficulties[1], seed.map(|s| s ^ 0x79b9)),
    ]
}

#[instrument(skip(config), fields(variant = %config.variant()))]
fn run_series(config: MatchConfig, games: u32, difficulties: [Difficulty; 2]) -> Result<()> {
    info!(games, one = %difficulties[0], two = %difficulties[1], "Starting series");
    let mut players = selectors(difficulties, config.seed());
    let mut session = Session::new(config);

    for _ in 0..games {
        play_round(session.game_mut(), &mut players)?;
        debug!(round = %session.round(), outcome = ?session.game().outcome(), "Round finished");
        session.rematch();
    }

    let score = session.series_score();
    info!(%score, "Series finished");
    println!(
        "{} ({}) vs {} ({}): {}",
        PlayerId::One,
        difficulties[0],
        PlayerId::Two,
        difficulties[1],
        score
    );
    Ok(())
}

#[instrument]
fn run_replay(variant: Variant, difficulty: Difficulty, seed: u64, json: bool) -> Result<()> {
    let config = MatchConfig::new(variant, Mode::Pvp).with_seed(seed);
    let mut game = Match::new(&config);
    let mut players = selectors([difficulty, difficulty], Some(seed));
    play_round(&mut game, &mut players)?;

    if json {
        println!("{}", game.snapshot().to_json()?);
        return Ok(());
    }

    println!("{}", game.board().display());
    println!();
    for (turn, record) in game.history().iter().enumerate() {
        println!("{:>3}. {}", turn + 1, record);
    }
    if let Some(outcome) = game.outcome() {
        println!("{}", outcome);
    }
    Ok(())
}
