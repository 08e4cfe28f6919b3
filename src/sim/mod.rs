//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed 60-tick reference rate only
//! - Injected RNG only (never seeded from the clock)
//! - Stable iteration order (definition order, then instance id)
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod chain;
pub mod direction;
pub mod level;
pub mod map;
pub mod scoring;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autopilot::steer;
pub use chain::{ChainError, Segment, SegmentKind, SnakeChain};
pub use direction::Direction;
pub use level::{
    FoodDefinition, HazardDefinition, LevelDefinition, LevelError, SpawnRules, SpawnTrigger,
    StartDefinition, WinCondition,
};
pub use map::Map;
pub use scoring::{FoodTileDistanceTracking, ScoreBreakdown, ScoringEngine};
pub use spawn::{Instance, InstanceId, InstanceIds, SpawnContext, SpawnTracker, TrackerRole};
pub use state::{LevelPhase, LevelStats, StoryGameLoop};
pub use tick::{FoodEaten, HazardStrike, SimError, TickInput, TickResult};
