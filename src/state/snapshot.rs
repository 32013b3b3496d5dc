//! Read-only view of a running match.
//!
//! This is everything a renderer needs. The secret order is deliberately
//! absent; only how many positions are correct is shared.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::game::MatchPhase;
use super::player::PlayerState;
use super::sequence::Symbol;

/// A score change to float above the player's score for a moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PointChange {
    pub player: usize,
    pub value: i32,
    /// Increments with every change so repeated equal values still re-render.
    pub serial: u64,
}

/// Turn change being announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurnChange {
    pub next_player: usize,
}

/// Snapshot of a match after an intent or timed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSnapshot {
    pub level: u32,
    pub max_levels: u32,
    pub sequence_length: usize,
    pub player_order: Vec<Symbol>,
    pub correct_count: usize,
    pub players: Vec<PlayerState>,
    pub active_player: usize,
    pub board_locked: bool,
    pub turn_time_remaining: u32,
    pub phase: MatchPhase,
    pub winner: Option<usize>,
    pub pending_turn_change: Option<TurnChange>,
    pub selected_index: Option<usize>,
    pub swapped_indices: Option<(usize, usize)>,
    pub point_change: Option<PointChange>,
    pub started_at: DateTime<Utc>,
    pub level_started_at: DateTime<Utc>,
}

impl MatchSnapshot {
    pub fn game_over(&self) -> bool {
        self.phase == MatchPhase::GameOver
    }

    pub fn is_multiplayer(&self) -> bool {
        self.players.len() > 1
    }

    pub fn active(&self) -> Option<&PlayerState> {
        self.players.get(self.active_player)
    }

    pub fn scores(&self) -> Vec<i32> {
        self.players.iter().map(|p| p.score).collect()
    }

    /// Whether a move from the active player would be accepted.
    pub fn accepts_moves(&self) -> bool {
        self.phase.is_active() && !self.board_locked
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
