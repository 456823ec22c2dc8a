//! High score leaderboard
//!
//! Tracks the top 10 end-of-session scores. Storage is the host's concern;
//! the board round-trips through JSON.

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Unix timestamp (ms) when achieved, supplied by the host
    pub timestamp: f64,
}

/// High score leaderboard (sorted descending by score)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Index a score would take; equal scores keep their earlier rank
    fn slot(&self, score: u64) -> Option<usize> {
        if score == 0 {
            return None;
        }
        let slot = self.entries.partition_point(|e| e.score >= score);
        (slot < MAX_HIGH_SCORES).then_some(slot)
    }

    pub fn qualifies(&self, score: u64) -> bool {
        self.slot(score).is_some()
    }

    /// Add a score if it qualifies; returns the rank achieved (1-indexed)
    pub fn add_score(&mut self, score: u64, level: u32, timestamp: f64) -> Option<usize> {
        let slot = self.slot(score)?;
        self.entries.insert(
            slot,
            HighScoreEntry {
                score,
                level,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);

        log::info!("High score {score} (level {level}) ranked #{}", slot + 1);
        Some(slot + 1)
    }

    /// Enter the final score if this batch of events ends the session
    pub fn record_game_over(&mut self, events: &[GameEvent], level: u32, timestamp: f64) -> Option<usize> {
        let score = events.iter().find_map(|event| match event {
            GameEvent::GameOver { score } => Some(*score),
            _ => None,
        })?;
        self.add_score(score, level, timestamp)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut scores: HighScores = serde_json::from_str(json)?;
        // Stored boards may have been edited by hand
        scores
            .entries
            .sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        Ok(scores)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
