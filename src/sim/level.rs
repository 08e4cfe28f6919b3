//! Level definitions consumed by the story loop
//!
//! Definitions arrive already parsed (a loader collaborator builds them from
//! level files). `LevelDefinition::validate` only checks the contracts the
//! simulation relies on.

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::chain::SnakeChain;
use super::direction::Direction;
use super::map::Map;
use crate::consts::{CHANCE_ROLL_RANGE, DEFAULT_BARRIER_DAMAGE, MIN_CHAIN_LENGTH};

/// When a spawn tracker becomes eligible to roll for a new instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnTrigger {
    /// First eligible after `initial_delay_secs`, then every `interval_secs` after the last spawn
    OnTimer {
        initial_delay_secs: u32,
        interval_secs: u32,
    },
    /// Eligible once the chain is at least `length` long, rate-limited by `interval_secs`
    OnLengthReached { length: usize, interval_secs: u32 },
    /// Food only: refill whenever the population drops to zero
    OnDespawn,
}

/// Spawn behaviour shared by food and hazard definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRules {
    pub trigger: SpawnTrigger,
    /// A roll in 0..100 spawns when it is <= this value
    pub chance_percent: u32,
    /// Maximum live instances at once
    pub max_spawns: usize,
    /// Eligible floor id range (inclusive)
    pub min_floor_id: u16,
    pub max_floor_id: u16,
    /// Instances despawn on their own after this long
    #[serde(default)]
    pub lifetime_secs: Option<u32>,
}

impl SpawnRules {
    pub fn accepts_floor(&self, floor_id: u16) -> bool {
        (self.min_floor_id..=self.max_floor_id).contains(&floor_id)
    }
}

/// A food type and how it spawns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodDefinition {
    pub food_type: u16,
    pub spawn: SpawnRules,
    /// Segments gained when eaten; negative values shrink the snake
    pub growth: i32,
    pub base_score: u32,
}

/// A hazard type and how it spawns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardDefinition {
    pub hazard_type: u16,
    pub spawn: SpawnRules,
    /// Health removed per strike
    pub damage: i32,
}

/// Starting chain placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartDefinition {
    pub position: IVec2,
    /// Direction the body trails away from the head
    pub direction: Direction,
    pub length: usize,
}

impl StartDefinition {
    pub fn build_chain(&self) -> Result<SnakeChain, LevelError> {
        SnakeChain::new(self.position, self.direction, self.length).map_err(|_| {
            if self.direction.is_none() {
                LevelError::StartDirection
            } else {
                LevelError::StartLength {
                    length: self.length,
                }
            }
        })
    }
}

/// Level completion predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinCondition {
    FoodEaten(u32),
    LengthReached(usize),
    TimeSurvived { secs: u32 },
}

fn default_barrier_damage() -> i32 {
    DEFAULT_BARRIER_DAMAGE
}

/// Everything the story loop needs to run one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub name: String,
    pub map: Map,
    pub foods: Vec<FoodDefinition>,
    pub hazards: Vec<HazardDefinition>,
    pub start: StartDefinition,
    pub starting_health: i32,
    /// Movement speed at the 60-tick reference rate
    pub tiles_per_second: f32,
    pub win: WinCondition,
    #[serde(default = "default_barrier_damage")]
    pub barrier_damage: i32,
}

/// Reasons a level definition is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LevelError {
    #[error("field size {width}x{height} is empty")]
    EmptyField { width: i32, height: i32 },
    #[error("field size {width}x{height} is too large")]
    FieldTooLarge { width: i32, height: i32 },
    #[error("{grid} grid has {actual} tiles, expected {expected}")]
    GridSize {
        grid: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("start length {length} is below {}", MIN_CHAIN_LENGTH)]
    StartLength { length: usize },
    #[error("start direction must not be None")]
    StartDirection,
    #[error("starting chain tile ({x}, {y}) is outside the field or on a barrier")]
    StartBlocked { x: i32, y: i32 },
    #[error("tiles per second must be positive, got {0}")]
    Speed(f32),
    #[error("starting health must be positive, got {0}")]
    StartingHealth(i32),
    #[error("{kind} definition {index}: chance {chance} exceeds {}", CHANCE_ROLL_RANGE)]
    Chance {
        kind: &'static str,
        index: usize,
        chance: u32,
    },
    #[error("{kind} definition {index}: max spawns must be at least 1")]
    MaxSpawns { kind: &'static str, index: usize },
    #[error("{kind} definition {index}: floor range {min}..={max} is inverted")]
    FloorRange {
        kind: &'static str,
        index: usize,
        min: u16,
        max: u16,
    },
    #[error("hazard definition {index}: OnDespawn trigger is only valid for food")]
    HazardOnDespawn { index: usize },
    #[error("win condition target must be non-zero")]
    WinTarget,
}

impl LevelDefinition {
    /// Check every contract the simulation assumes
    pub fn validate(&self) -> Result<(), LevelError> {
        self.map.check_grid()?;
        if !(self.tiles_per_second > 0.0 && self.tiles_per_second.is_finite()) {
            return Err(LevelError::Speed(self.tiles_per_second));
        }
        if self.starting_health <= 0 {
            return Err(LevelError::StartingHealth(self.starting_health));
        }

        let chain = self.start.build_chain()?;
        if let Some(seg) = chain
            .segments()
            .iter()
            .find(|s| self.map.is_barrier(s.pos))
        {
            return Err(LevelError::StartBlocked {
                x: seg.pos.x,
                y: seg.pos.y,
            });
        }

        for (index, food) in self.foods.iter().enumerate() {
            validate_rules("food", index, &food.spawn)?;
        }
        for (index, hazard) in self.hazards.iter().enumerate() {
            validate_rules("hazard", index, &hazard.spawn)?;
            if hazard.spawn.trigger == SpawnTrigger::OnDespawn {
                return Err(LevelError::HazardOnDespawn { index });
            }
        }

        let zero_target = match self.win {
            WinCondition::FoodEaten(n) => n == 0,
            WinCondition::LengthReached(n) => n == 0,
            WinCondition::TimeSurvived { secs } => secs == 0,
        };
        if zero_target {
            return Err(LevelError::WinTarget);
        }

        Ok(())
    }
}

fn validate_rules(kind: &'static str, index: usize, rules: &SpawnRules) -> Result<(), LevelError> {
    if rules.chance_percent > CHANCE_ROLL_RANGE {
        return Err(LevelError::Chance {
            kind,
            index,
            chance: rules.chance_percent,
        });
    }
    if rules.max_spawns == 0 {
        return Err(LevelError::MaxSpawns { kind, index });
    }
    if rules.min_floor_id > rules.max_floor_id {
        return Err(LevelError::FloorRange {
            kind,
            index,
            min: rules.min_floor_id,
            max: rules.max_floor_id,
        });
    }
    Ok(())
}
