//! Story Snake - tile-based snake story mode core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (chain movement, spawning, scoring, tick loop)
//! - `settings`: Player preferences applied when a level starts
//! - `highscores`: Story-mode leaderboard
//! - `audio`: Sound effect identifiers emitted by the simulation

pub mod audio;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use audio::SoundEffect;
pub use highscores::HighScores;
pub use settings::{Settings, SpeedPreset};

use glam::IVec2;

/// Game configuration constants
pub mod consts {
    /// Reference simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Spawn chance rolls happen at most once per this many ticks (1 second)
    pub const CHANCE_ROLL_INTERVAL_TICKS: u64 = TICK_RATE as u64;
    /// A struck hazard lingers this many ticks before despawning (1 second)
    pub const HAZARD_STRIKE_DESPAWN_TICKS: u64 = TICK_RATE as u64;
    /// Health lost when the head runs into a barrier or the body
    pub const DEFAULT_BARRIER_DAMAGE: i32 = 1;
    /// Shortest legal chain (head + tail)
    pub const MIN_CHAIN_LENGTH: usize = 2;
    /// Chance rolls draw from 0..CHANCE_ROLL_RANGE
    pub const CHANCE_ROLL_RANGE: u32 = 100;
    /// Longest field side `Map::bordered` will build
    pub const MAX_FIELD_SIDE: i32 = 4096;
}

/// Manhattan distance between two tiles
#[inline]
pub fn manhattan(a: IVec2, b: IVec2) -> u32 {
    let d = (a - b).abs();
    (d.x + d.y) as u32
}

/// Convert whole seconds to ticks at the reference rate
#[inline]
pub fn secs_to_ticks(secs: u32) -> u64 {
    secs as u64 * consts::TICK_RATE as u64
}
