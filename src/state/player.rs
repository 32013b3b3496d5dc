//! Players and their scores.
//!
//! Slots are fixed for the whole match: slot `i` is always the same person,
//! the turn order is slot order, and scores only move through scoring deltas.

use serde::Serialize;

/// Most players sharing one board.
pub const MAX_PLAYERS: usize = 4;

/// Name used when a player leaves theirs blank.
pub fn default_name(slot: usize) -> String {
    format!("Player {}", slot + 1)
}

/// Trim a name, falling back to the slot default when blank.
pub fn normalize_name(slot: usize, raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        default_name(slot)
    } else {
        trimmed.to_string()
    }
}

/// A player in the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerState {
    pub name: String,
    pub score: i32,
}

impl PlayerState {
    pub fn new(name: String) -> Self {
        Self { name, score: 0 }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "score": self.score
        })
    }
}

/// Players in slot order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    players: Vec<PlayerState>,
}

impl Roster {
    /// Build a roster with zeroed scores; blank names get defaults.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let players = names
            .iter()
            .enumerate()
            .map(|(slot, name)| PlayerState::new(normalize_name(slot, name.as_ref())))
            .collect();
        Self { players }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn is_multiplayer(&self) -> bool {
        self.players.len() > 1
    }

    pub fn get(&self, slot: usize) -> Option<&PlayerState> {
        self.players.get(slot)
    }

    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    /// Slot that plays after `slot`.
    pub fn next_after(&self, slot: usize) -> usize {
        if self.players.is_empty() {
            return 0;
        }
        (slot + 1) % self.players.len()
    }

    /// Apply a score delta. Returns the new score, or None for an unknown slot.
    pub fn add_points(&mut self, slot: usize, delta: i32) -> Option<i32> {
        let player = self.players.get_mut(slot)?;
        player.score += delta;
        Some(player.score)
    }

    pub fn scores(&self) -> Vec<i32> {
        self.players.iter().map(|p| p.score).collect()
    }
}
