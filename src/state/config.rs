//! Match configuration.
//!
//! Owned by the setup collaborator and handed to the engine once per match.
//! Can be built in code or read from JSON; every field except the player count
//! and pool has a default.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, GameError};
use super::player::{normalize_name, MAX_PLAYERS};
use super::sequence::{validate_pool, Symbol};
use super::theme::Theme;

/// Game length offered at setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Four levels.
    #[default]
    Mini,
    /// Eight levels.
    Full,
}

impl GameMode {
    pub fn max_levels(&self) -> u32 {
        match self {
            Self::Mini => 4,
            Self::Full => 8,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mini => "mini",
            Self::Full => "full",
        }
    }
}

/// Durations of every timed behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Seconds on the turn clock.
    pub turn_seconds: u32,
    /// Length of one turn-clock tick.
    pub tick_ms: u64,
    /// Pause after a non-improving move before the turn passes.
    pub move_absorb_ms: u64,
    /// How long the next player is announced.
    pub turn_announce_ms: u64,
    /// How long a score change stays visible.
    pub point_change_ms: u64,
    /// How long swapped positions stay highlighted.
    pub swap_highlight_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            turn_seconds: 30,
            tick_ms: 1000,
            move_absorb_ms: 500,
            turn_announce_ms: 2500,
            point_change_ms: 1500,
            swap_highlight_ms: 300,
        }
    }
}

impl Timings {
    /// Turn budget and tick interval must be positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.turn_seconds == 0 {
            return Err(ConfigError::InvalidTiming {
                field: "turn_seconds",
            });
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::InvalidTiming { field: "tick_ms" });
        }
        Ok(())
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn move_absorb(&self) -> Duration {
        Duration::from_millis(self.move_absorb_ms)
    }

    pub fn turn_announce(&self) -> Duration {
        Duration::from_millis(self.turn_announce_ms)
    }

    pub fn point_change(&self) -> Duration {
        Duration::from_millis(self.point_change_ms)
    }

    pub fn swap_highlight(&self) -> Duration {
        Duration::from_millis(self.swap_highlight_ms)
    }
}

fn default_max_levels() -> u32 {
    GameMode::default().max_levels()
}

/// Everything `start_game` needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub num_players: usize,

    /// Symbols levels are drawn from.
    pub pool: Vec<Symbol>,

    #[serde(default = "default_max_levels")]
    pub max_levels: u32,

    /// One per player; blank entries get a default name.
    #[serde(default)]
    pub player_names: Vec<String>,

    #[serde(default)]
    pub timings: Timings,
}

impl GameConfig {
    /// Config with default names, mode and timings.
    pub fn new(num_players: usize, pool: Vec<Symbol>) -> Self {
        Self {
            num_players,
            pool,
            max_levels: default_max_levels(),
            player_names: vec![String::new(); num_players],
            timings: Timings::default(),
        }
    }

    /// Config drawing from a built-in theme.
    pub fn from_theme(num_players: usize, theme: &Theme, mode: GameMode) -> Self {
        Self::new(num_players, theme.pool()).with_mode(mode)
    }

    /// Parse a JSON config document.
    ///
    /// A document without `player_names` seats everyone under a default name.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let mut config: Self = serde_json::from_str(json).map_err(|e| {
            GameError::from(ConfigError::Parse {
                reason: e.to_string(),
            })
        })?;
        if config.player_names.is_empty() {
            config.player_names = vec![String::new(); config.num_players];
        }
        Ok(config)
    }

    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.max_levels = mode.max_levels();
        self
    }

    pub fn with_max_levels(mut self, max_levels: u32) -> Self {
        self.max_levels = max_levels;
        self
    }

    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.player_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    /// Names to seat, with blanks replaced by defaults.
    pub fn resolved_names(&self) -> Vec<String> {
        self.player_names
            .iter()
            .enumerate()
            .map(|(slot, name)| normalize_name(slot, name))
            .collect()
    }

    /// Check the config before a match starts.
    pub fn validate(&self) -> Result<(), GameError> {
        if !(1..=MAX_PLAYERS).contains(&self.num_players) {
            return Err(ConfigError::PlayerCount {
                count: self.num_players,
                max: MAX_PLAYERS,
            }
            .into());
        }

        if self.player_names.len() != self.num_players {
            return Err(ConfigError::NameCount {
                expected: self.num_players,
                got: self.player_names.len(),
            }
            .into());
        }

        if self.max_levels == 0 {
            return Err(ConfigError::NoLevels.into());
        }

        self.timings.validate()?;
        validate_pool(&self.pool)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::error::PoolError;
    use crate::state::sequence::pool_of;
    use pretty_assertions::assert_eq;

    fn pool() -> Vec<Symbol> {
        pool_of(["A", "B", "C", "D", "E", "F", "G", "H"])
    }

    #[test]
    fn test_defaults() {
        let config = GameConfig::new(2, pool());
        assert_eq!(config.max_levels, 4);
        assert_eq!(config.timings, Timings::default());
        assert_eq!(config.resolved_names(), vec!["Player 1", "Player 2"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_modes() {
        let config = GameConfig::from_theme(1, Theme::default_theme(), GameMode::Full);
        assert_eq!(config.max_levels, 8);
        assert_eq!(config.pool.len(), Theme::default_theme().symbols.len());
    }

    #[test]
    fn test_player_count_bounds() {
        for count in [0, 5] {
            let err = GameConfig::new(count, pool()).validate().unwrap_err();
            assert_eq!(
                err,
                GameError::InvalidConfig(ConfigError::PlayerCount { count, max: 4 })
            );
        }
        for count in 1..=4 {
            assert!(GameConfig::new(count, pool()).validate().is_ok());
        }
    }

    #[test]
    fn test_name_count_mismatch() {
        let err = GameConfig::new(3, pool())
            .with_names(["a", "b"])
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidConfig(ConfigError::NameCount {
                expected: 3,
                got: 2
            })
        );
    }

    #[test]
    fn test_blank_names_resolved() {
        let config = GameConfig::new(3, pool()).with_names(["Ada", " ", "Lin "]);
        assert_eq!(config.resolved_names(), vec!["Ada", "Player 2", "Lin"]);
    }

    #[test]
    fn test_invalid_pool_and_levels() {
        let err = GameConfig::new(1, Vec::new()).validate().unwrap_err();
        assert_eq!(err, GameError::InvalidPool(PoolError::Empty));

        let err = GameConfig::new(1, pool())
            .with_max_levels(0)
            .validate()
            .unwrap_err();
        assert_eq!(err, GameError::InvalidConfig(ConfigError::NoLevels));
    }

    #[test]
    fn test_zero_timings_rejected() {
        let err = GameConfig::new(2, pool())
            .with_timings(Timings {
                turn_seconds: 0,
                ..Timings::default()
            })
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidConfig(ConfigError::InvalidTiming {
                field: "turn_seconds"
            })
        );

        let err = GameConfig::new(2, pool())
            .with_timings(Timings {
                tick_ms: 0,
                ..Timings::default()
            })
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidConfig(ConfigError::InvalidTiming { field: "tick_ms" })
        );

        // Zero cosmetic delays are fine.
        let config = GameConfig::new(2, pool()).with_timings(Timings {
            point_change_ms: 0,
            swap_highlight_ms: 0,
            ..Timings::default()
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_zero_turn_rejected() {
        let config = GameConfig::from_json(
            r#"{"num_players": 2, "pool": ["A", "B", "C"], "timings": {"turn_seconds": 0}}"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidConfig(ConfigError::InvalidTiming { .. }))
        ));
    }

    #[test]
    fn test_from_json() {
        let config = GameConfig::from_json(
            r#"{
                "num_players": 2,
                "pool": ["A", "B", "C", "D"],
                "player_names": ["Ada", ""],
                "timings": { "turn_seconds": 20 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.num_players, 2);
        assert_eq!(config.pool, pool_of(["A", "B", "C", "D"]));
        assert_eq!(config.max_levels, 4);
        assert_eq!(config.timings.turn_seconds, 20);
        assert_eq!(config.timings.turn_announce_ms, 2500);
        assert_eq!(config.resolved_names(), vec!["Ada", "Player 2"]);
    }

    #[test]
    fn test_from_json_without_names() {
        let config = GameConfig::from_json(r#"{"num_players": 3, "pool": ["A", "B", "C"]}"#)
            .unwrap();
        assert_eq!(
            config.resolved_names(),
            vec!["Player 1", "Player 2", "Player 3"]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_malformed() {
        let err = GameConfig::from_json("{\"pool\": []}").unwrap_err();
        assert!(matches!(
            err,
            GameError::InvalidConfig(ConfigError::Parse { .. })
        ));
    }
}
