//! End-of-match standings.
//!
//! Pure aggregation over final scores; nothing here feeds back into play.

use serde::Serialize;

use super::player::PlayerState;

/// One row of the final scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandingEntry {
    pub slot: usize,
    pub name: String,
    pub score: i32,
}

/// Final scoreboard in slot order, with the winning slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standings {
    pub entries: Vec<StandingEntry>,
    pub top_score: i32,
    /// Every slot holding the top score.
    pub winners: Vec<usize>,
    pub is_tie: bool,
}

/// Rank final scores. Several players sharing the maximum is a tie.
pub fn standings(players: &[PlayerState]) -> Standings {
    let entries: Vec<StandingEntry> = players
        .iter()
        .enumerate()
        .map(|(slot, p)| StandingEntry {
            slot,
            name: p.name.clone(),
            score: p.score,
        })
        .collect();

    let top_score = entries.iter().map(|e| e.score).max().unwrap_or(0);
    let winners: Vec<usize> = entries
        .iter()
        .filter(|e| e.score == top_score)
        .map(|e| e.slot)
        .collect();
    let is_tie = winners.len() > 1;

    Standings {
        entries,
        top_score,
        winners,
        is_tie,
    }
}

impl Standings {
    /// Sole winner, if there is one.
    pub fn winner(&self) -> Option<&StandingEntry> {
        match self.winners.as_slice() {
            [slot] => self.entries.get(*slot),
            _ => None,
        }
    }

    pub fn winner_names(&self) -> Vec<&str> {
        self.winners
            .iter()
            .filter_map(|slot| self.entries.get(*slot))
            .map(|e| e.name.as_str())
            .collect()
    }

    /// Game-over banner text.
    pub fn headline(&self) -> String {
        if self.entries.len() == 1 {
            return "Game Complete!".to_string();
        }
        if self.is_tie {
            return "It's a Tie!".to_string();
        }
        match self.winner() {
            Some(entry) => format!("{} Wins the Game!", entry.name),
            None => "Game Complete!".to_string(),
        }
    }

    /// Line under the banner.
    pub fn declaration(&self) -> String {
        if self.entries.len() == 1 {
            return format!("Final Score: {}", self.top_score);
        }
        if self.is_tie {
            return format!("Players {} win!", self.winner_names().join(" & "));
        }
        "Congratulations!".to_string()
    }
}
