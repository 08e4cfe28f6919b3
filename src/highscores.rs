//! High score leaderboard system
//!
//! Persisted as JSON, tracks the top 10 story-level results.

use std::cmp::Reverse;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Level score
    pub score: u64,
    /// Level name
    pub level: String,
    /// Food eaten during the run
    pub food_eaten: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rank a run would take (1-indexed), or None if it misses the board.
    ///
    /// Equal scores rank the run that ate less food first; full ties keep
    /// the earlier entry ahead.
    pub fn potential_rank(&self, score: u64, food_eaten: u32) -> Option<usize> {
        if score == 0 {
            return None;
        }
        let rank = self
            .entries
            .iter()
            .position(|e| (score, Reverse(food_eaten)) > (e.score, Reverse(e.food_eaten)))
            .unwrap_or(self.entries.len());
        (rank < MAX_HIGH_SCORES).then_some(rank + 1)
    }

    pub fn qualifies(&self, score: u64, food_eaten: u32) -> bool {
        self.potential_rank(score, food_eaten).is_some()
    }

    /// Record a run if it makes the board; returns the rank achieved
    pub fn add_score(
        &mut self,
        score: u64,
        level: &str,
        food_eaten: u32,
        timestamp: f64,
    ) -> Option<usize> {
        let rank = self.potential_rank(score, food_eaten)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                score,
                level: level.to_string(),
                food_eaten,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Best entry for one level
    pub fn best_for_level(&self, level: &str) -> Option<&HighScoreEntry> {
        self.entries.iter().find(|e| e.level == level)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from a JSON file, starting fresh if missing or unreadable
    pub fn load_from(path: &Path) -> Self {
        if let Ok(json) = std::fs::read_to_string(path) {
            match serde_json::from_str::<HighScores>(&json) {
                Ok(scores) => {
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
                Err(e) => log::warn!("Ignoring unreadable high scores {}: {}", path.display(), e),
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores as JSON
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}
