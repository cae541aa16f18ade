//! Command-line interface for the self-play harness.

use clap::{Parser, Subcommand};
use strictly_dolanan::{Difficulty, Variant};

/// Dolanan Matematika self-play harness
#[derive(Parser, Debug)]
#[command(name = "dolanan-sim")]
#[command(about = "Pits the Dolanan Matematika AI against itself", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a series of AI-vs-AI rounds and print the score
    Series {
        /// Match configuration file (TOML); flags below override it
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Number of rounds
        #[arg(short, long, default_value = "100")]
        games: u32,

        /// Game variant (sum or product)
        #[arg(long)]
        variant: Option<Variant>,

        /// Difficulty of seat one
        #[arg(long, default_value = "normal")]
        difficulty_one: Difficulty,

        /// Difficulty of seat two
        #[arg(long, default_value = "normal")]
        difficulty_two: Difficulty,

        /// Base seed for boards and both AIs
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Play a single round and print the final board and move list
    Replay {
        /// Game variant (sum or product)
        #[arg(long, default_value = "sum")]
        variant: Variant,

        /// Difficulty of both seats
        #[arg(long, default_value = "normal")]
        difficulty: Difficulty,

        /// Seed for the board and both AIs
        #[arg(long, default_value = "1")]
        seed: u64,

        /// Print the final snapshot as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}
