//! State management module for Reorder.
//!
//! This module provides the match engine and everything it is built from:
//!
//! - `sequence` - Symbols, level generation and correctness counting
//! - `scoring` - Points for moves and solved levels
//! - `clock` - Logical timeline of scheduled events and the turn countdown
//! - `player` - Player slots and scores
//! - `config` - Match configuration, modes and timings
//! - `theme` - Built-in symbol pools
//! - `game` - The engine and the match state machine
//! - `snapshot` - Read-only view handed to renderers
//! - `summary` - Final standings
//! - `error` - Error types
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                            GameEngine                                │
//! │                                                                      │
//! │  intents ──▶ ┌──────────────────────────────┐ ──▶ MatchSnapshot ──▶  │
//! │  start_game  │          MatchState          │     subscribers        │
//! │  swap/select │                              │                        │
//! │  advance_lvl │  Roster     TurnClock        │                        │
//! │  restart     │  secret / player order       │                        │
//! │              └──────────────────────────────┘                        │
//! │                    ▲                 │                               │
//! │         TimedEvent │                 │ schedule / cancel             │
//! │                    │                 ▼                               │
//! │  advance(dt) ──▶ ┌──────────────────────────────┐                    │
//! │                  │  Scheduler (logical time)    │                    │
//! │                  └──────────────────────────────┘                    │
//! │                                                                      │
//! │  LevelGenerator ──▶ LevelLayout { secret, start }                    │
//! │  ScoringPolicy  ──▶ +10 / -5 per position, 200 + 100·level bonus     │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use std::time::Duration;
//! use reorder_state::state::{GameConfig, GameEngine, Theme};
//!
//! let mut engine = GameEngine::seeded(7);
//! let config = GameConfig::new(2, Theme::default_theme().pool());
//! let snapshot = engine.start_game(config).unwrap();
//! assert_eq!(snapshot.turn_time_remaining, 30);
//!
//! engine.advance(Duration::from_secs(3));
//! assert_eq!(engine.snapshot().unwrap().turn_time_remaining, 27);
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod game;
pub mod player;
pub mod scoring;
pub mod sequence;
pub mod snapshot;
pub mod summary;
pub mod theme;

// Re-export commonly used types
pub use clock::{ClockTick, Scheduler, TimedEvent, TimerHandle, TurnClock};
pub use config::{GameConfig, GameMode, Timings};
pub use error::{ConfigError, GameError, IllegalMove, PoolError};
pub use game::{GameEngine, MatchPhase, MatchState, MoveResult, SubscriptionId, SwapOutcome};
pub use player::{PlayerState, Roster, MAX_PLAYERS};
pub use scoring::{evaluate_level_bonus, evaluate_move};
pub use sequence::{
    correct_positions, generate_level, pool_of, LevelGenerator, LevelLayout, ShuffledLevels,
    Symbol, BASE_SEQUENCE_LENGTH,
};
pub use snapshot::{MatchSnapshot, PointChange, TurnChange};
pub use summary::{standings, StandingEntry, Standings};
pub use theme::{Theme, THEMES};
