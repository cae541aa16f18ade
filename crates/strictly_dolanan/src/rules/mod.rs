//! Game rules for Dolanan Matematika.
//!
//! This module contains pure functions for evaluating game state
//! according to the rules. Rules are separated from match state
//! so the state machine, the contracts and the AI can share them.

pub mod columns;
pub mod draw;
pub mod win;

pub use columns::{disabled_columns, disabled_columns_for_placement, legal_columns};
pub use draw::{AutoGameOver, check_auto_game_over, has_alternative_column};
pub use win::{DIRECTIONS, check_win, count_streaks, would_complete_run};
