//! Match configuration.

use super::ai::Difficulty;
use super::{Mode, Variant};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// What happens when a player's turn clock runs out.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TimeoutPolicy {
    /// The player forfeits; the opponent wins.
    #[default]
    Forfeit,
    /// The turn passes to the opponent.
    SkipTurn,
}

/// Settings for one match, reused across rematches.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Sum or product variant.
    #[serde(default)]
    #[getter(copy)]
    variant: Variant,

    /// Player-vs-player or player-vs-AI.
    #[serde(default)]
    #[getter(copy)]
    mode: Mode,

    /// Name for seat one.
    #[serde(default)]
    player_one: Option<String>,

    /// Name for seat two.
    #[serde(default)]
    player_two: Option<String>,

    /// Seconds per turn; 0 disables the clock.
    #[serde(default = "default_time_limit")]
    #[getter(copy)]
    time_limit_secs: u32,

    /// AI strength.
    #[serde(default)]
    #[getter(copy)]
    difficulty: Difficulty,

    /// Behavior on turn timeout.
    #[serde(default)]
    #[getter(copy)]
    timeout_policy: TimeoutPolicy,

    /// Seed for board generation, coin tosses and the AI; entropy when absent.
    #[serde(default)]
    #[getter(copy)]
    seed: Option<u64>,
}

#[instrument]
fn default_time_limit() -> u32 {
    30
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::new(Variant::default(), Mode::default())
    }
}

impl MatchConfig {
    /// Creates a configuration with default names, clock and difficulty.
    #[instrument]
    pub fn new(variant: Variant, mode: Mode) -> Self {
        Self {
            variant,
            mode,
            player_one: None,
            player_two: None,
            time_limit_secs: default_time_limit(),
            difficulty: Difficulty::default(),
            timeout_policy: TimeoutPolicy::default(),
            seed: None,
        }
    }

    /// Sets both display names; blank names fall back to the defaults.
    pub fn with_names(mut self, one: impl Into<String>, two: impl Into<String>) -> Self {
        self.player_one = Some(one.into());
        self.player_two = Some(two.into());
        self
    }

    /// Switches the variant, keeping every other setting.
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Sets the per-turn clock in seconds (0 = unlimited).
    pub fn with_time_limit(mut self, secs: u32) -> Self {
        self.time_limit_secs = secs;
        self
    }

    /// Sets the AI difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Sets the timeout policy.
    pub fn with_timeout_policy(mut self, policy: TimeoutPolicy) -> Self {
        self.timeout_policy = policy;
        self
    }

    /// Fixes the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Display names for both seats, with defaults applied.
    pub fn player_names(&self) -> [String; 2] {
        let pick = |name: &Option<String>, fallback: &str| {
            name.as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .unwrap_or(fallback)
                .to_string()
        };
        let second = match self.mode {
            Mode::Ai => "AI",
            Mode::Pvp => "Player 2",
        };
        [
            pick(&self.player_one, "Player 1"),
            pick(&self.player_two, second),
        ]
    }

    /// Parses configuration from a TOML string.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml_str(&content)?;
        info!(variant = %config.variant, mode = %config.mode, "Config loaded successfully");
        Ok(config)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = MatchConfig::from_toml_str("").unwrap();
        assert_eq!(config, MatchConfig::default());
        assert_eq!(config.time_limit_secs(), 30);
        assert_eq!(config.player_names(), ["Player 1".to_string(), "Player 2".to_string()]);
    }

    #[test]
    fn test_full_toml() {
        let config = MatchConfig::from_toml_str(
            r#"
            variant = "product"
            mode = "ai"
            player_one = "Sari"
            time_limit_secs = 0
            difficulty = "hard"
            timeout_policy = "skip-turn"
            seed = 11
            "#,
        )
        .unwrap();
        assert_eq!(config.variant(), Variant::Product);
        assert_eq!(config.mode(), Mode::Ai);
        assert_eq!(config.difficulty(), Difficulty::Hard);
        assert_eq!(config.timeout_policy(), TimeoutPolicy::SkipTurn);
        assert_eq!(config.seed(), Some(11));
        assert_eq!(config.player_names(), ["Sari".to_string(), "AI".to_string()]);
    }

    #[test]
    fn test_blank_names_fall_back() {
        let config = MatchConfig::new(Variant::Sum, Mode::Pvp).with_names("  ", "Budi");
        assert_eq!(config.player_names(), ["Player 1".to_string(), "Budi".to_string()]);

        let switched = config.clone().with_variant(Variant::Product);
        assert_eq!(switched.variant(), Variant::Product);
        assert_eq!(switched.player_names(), config.player_names());
    }

    #[test]
    fn test_invalid_toml_reports_error() {
        let err = MatchConfig::from_toml_str("variant = \"division\"").unwrap_err();
        assert!(err.message.contains("Failed to parse config"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "variant = \"sum\"\ndifficulty = \"easy\"").unwrap();
        let config = MatchConfig::from_file(file.path()).unwrap();
        assert_eq!(config.difficulty(), Difficulty::Easy);

        assert!(MatchConfig::from_file("/definitely/not/here.toml").is_err());
    }
}
