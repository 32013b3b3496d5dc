//! Error taxonomy for the puzzle engine.
//!
//! Win and level completion are ordinary outcomes and never show up here.

use derive_more::{Display, Error};

use super::game::MatchPhase;

/// Malformed `start_game` arguments. The game does not start.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ConfigError {
    /// Player count outside 1..=4.
    #[display("Player count must be between 1 and {}, got {}", max, count)]
    PlayerCount { count: usize, max: usize },

    /// Number of names does not match the player count.
    #[display("Expected {} player names, got {}", expected, got)]
    NameCount { expected: usize, got: usize },

    /// A match needs at least one level.
    #[display("Game length must be at least one level")]
    NoLevels,

    /// A timing that must be positive is zero.
    #[display("Timing {} must be greater than zero", field)]
    InvalidTiming { field: &'static str },

    /// The configuration document could not be parsed.
    #[display("Malformed configuration: {}", reason)]
    Parse { reason: String },
}

/// The symbol pool cannot produce a level.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum PoolError {
    #[display("Symbol pool is empty")]
    Empty,

    /// Drawing without replacement needs distinct symbols.
    #[display("Symbol pool contains {:?} more than once", symbol)]
    DuplicateSymbol { symbol: String },
}

/// A swap or select intent that cannot be applied.
///
/// Recovered locally by callers: the intent is dropped and state is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum IllegalMove {
    #[display("Cannot swap a position with itself")]
    SameIndex,

    #[display("Position {} is out of range for {} items", index, len)]
    OutOfRange { index: usize, len: usize },

    #[display("Board is locked")]
    BoardLocked,

    #[display("Moves are only accepted while a level is in progress")]
    NotInProgress,
}

/// Engine errors.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum GameError {
    #[display("Invalid game configuration: {}", _0)]
    InvalidConfig(ConfigError),

    #[display("Invalid symbol pool: {}", _0)]
    InvalidPool(PoolError),

    #[display("Illegal move: {}", _0)]
    IllegalMove(IllegalMove),

    /// Intent not valid in the current phase (e.g. advancing an unfinished level).
    #[display("Cannot {} while match is {}", action, phase.as_str())]
    InvalidStatus {
        action: &'static str,
        phase: MatchPhase,
    },

    #[display("No match is running")]
    NoActiveMatch,
}

impl GameError {
    /// Whether the error is a dropped move rather than a caller bug.
    pub fn is_illegal_move(&self) -> bool {
        matches!(self, Self::IllegalMove(_))
    }
}

impl From<ConfigError> for GameError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfig(err)
    }
}

impl From<PoolError> for GameError {
    fn from(err: PoolError) -> Self {
        Self::InvalidPool(err)
    }
}

impl From<IllegalMove> for GameError {
    fn from(err: IllegalMove) -> Self {
        Self::IllegalMove(err)
    }
}
