//! Sound effect identifiers
//!
//! The simulation only names the sounds a tick triggered; playback and
//! mixing belong to the platform audio layer.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Food eaten
    Eat,
    /// Queued growth applied
    Grow,
    /// Shrinking food eaten
    Shrink,
    /// Head ran into a barrier or the body
    HitBarrier,
    /// Hazard struck the head
    HazardStrike,
    /// Food appeared
    FoodSpawn,
    /// Hazard appeared
    HazardSpawn,
    /// Health ran out
    Death,
    /// Win condition met
    LevelComplete,
}

impl SoundEffect {
    /// Stable asset id used by the audio layer to look up the sample
    pub fn asset_id(&self) -> &'static str {
        match self {
            SoundEffect::Eat => "eat",
            SoundEffect::Grow => "grow",
            SoundEffect::Shrink => "shrink",
            SoundEffect::HitBarrier => "hit_barrier",
            SoundEffect::HazardStrike => "hazard_strike",
            SoundEffect::FoodSpawn => "food_spawn",
            SoundEffect::HazardSpawn => "hazard_spawn",
            SoundEffect::Death => "death",
            SoundEffect::LevelComplete => "level_complete",
        }
    }
}
