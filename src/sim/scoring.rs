//! Path-efficiency scoring for eaten food

use serde::{Deserialize, Serialize};

/// Distance bookkeeping for one live food instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FoodTileDistanceTracking {
    /// Manhattan distance from the head when the food spawned
    pub original: u32,
    /// Tiles the head has moved since then
    pub travelled: u32,
}

impl FoodTileDistanceTracking {
    pub fn new(original: u32) -> Self {
        Self {
            original,
            travelled: 0,
        }
    }
}

/// Score awarded for one eaten food
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base_score: u32,
    pub bonus_path_score: u32,
    pub perfect_path_score: u32,
    pub total_score: u32,
}

/// Stateless scoring rules
pub struct ScoringEngine;

impl ScoringEngine {
    /// Score a food eaten after `tracking.travelled` tiles when the direct
    /// route was `tracking.original` tiles.
    ///
    /// The bonus decays linearly from `base` at an optimal path to zero at
    /// twice the optimal length; the perfect bonus needs an optimal path.
    pub fn score(base: u32, tracking: FoodTileDistanceTracking) -> ScoreBreakdown {
        let original = tracking.original as u64;
        let travelled = tracking.travelled as u64;
        let base_wide = base as u64;

        let bonus_path_score = if original == 0 {
            base_wide
        } else if travelled <= 2 * original {
            // floor(base * (1 - (t - o) / o)) == floor(base * (2o - t) / o), clamped to base
            (base_wide * (2 * original - travelled) / original).min(base_wide)
        } else {
            0
        };
        let perfect_path_score = if travelled <= original { base_wide } else { 0 };

        ScoreBreakdown {
            base_score: base,
            bonus_path_score: bonus_path_score as u32,
            perfect_path_score: perfect_path_score as u32,
            total_score: (base_wide + bonus_path_score + perfect_path_score) as u32,
        }
    }
}
