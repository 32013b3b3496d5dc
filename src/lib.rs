//! Reorder State Library
//!
//! This crate provides the game logic for Reorder, a turn-based puzzle where
//! players swap symbols until they match a hidden order.
//!
//! # Overview
//!
//! The state module provides:
//!
//! - **Level Generation** - Each level draws a secret order from a symbol pool
//!   and starts the board from an arrangement with nothing in place.
//!
//! - **Scoring** - Points for every position gained or lost, and a bonus that
//!   grows with the level for the player who solves it.
//!
//! - **Turn Management** - Up to four players share the board. A turn ends when
//!   a move makes no progress or the turn clock runs out.
//!
//! - **Match Engine** - One authoritative match, driven by intents and by
//!   timed events on a logical clock.
//!
//! # Design Principles
//!
//! 1. **Intents are validated** - Illegal moves are rejected with clear errors
//!    and leave the match untouched.
//!
//! 2. **Time is explicit** - Nothing happens between calls. Callers move time
//!    with `advance`, and scheduled events fire in order.
//!
//! 3. **No rendering** - This crate is pure state. Renderers read snapshots.
//!
//! 4. **Serialization-ready** - Snapshots and configs convert to and from JSON.
//!
//! # Example
//!
//! ```rust
//! use reorder_state::state::{GameConfig, GameEngine, GameMode, MatchPhase, Theme};
//!
//! let mut engine = GameEngine::seeded(42);
//! let config = GameConfig::from_theme(1, Theme::default_theme(), GameMode::Mini)
//!     .with_names(["Ada"]);
//!
//! let snapshot = engine.start_game(config).unwrap();
//! assert_eq!(snapshot.sequence_length, 3);
//! assert_eq!(snapshot.correct_count, 0);
//! assert_eq!(snapshot.phase, MatchPhase::InProgress);
//!
//! // Nothing starts in place, so the first swap cannot lose points.
//! let outcome = engine.swap(0, 1).unwrap();
//! assert!(outcome.delta >= 0);
//! ```

pub mod state;

// Re-export everything from state module at crate root
pub use state::*;
