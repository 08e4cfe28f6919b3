//! Story level state
//!
//! Everything one running level owns. The per-tick update lives in `tick.rs`.

use std::collections::{BTreeMap, VecDeque};

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::chain::SnakeChain;
use super::direction::Direction;
use super::level::{FoodDefinition, HazardDefinition, LevelDefinition, LevelError, WinCondition};
use super::map::Map;
use super::scoring::FoodTileDistanceTracking;
use super::spawn::{Instance, InstanceId, InstanceIds, SpawnTracker, TrackerRole};
use crate::consts::TICK_RATE;
use crate::secs_to_ticks;
use crate::settings::Settings;

/// Current phase of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelPhase {
    /// Active gameplay
    Playing,
    /// Paused by the player; ticks are ignored
    Paused,
    /// Health ran out or the snake shrank away
    Lost,
    /// A chain invariant broke; the level cannot continue
    Faulted,
}

/// Running totals for the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelStats {
    pub ticks: u64,
    pub steps: u64,
    pub food_eaten: u32,
    pub score: u64,
    pub hazard_strikes: u32,
    pub barrier_hits: u32,
}

/// A food definition and the tracker spawning it
#[derive(Debug, Clone)]
pub(crate) struct FoodSpawner {
    pub definition: FoodDefinition,
    pub tracker: SpawnTracker,
}

/// A hazard definition and the tracker spawning it
#[derive(Debug, Clone)]
pub(crate) struct HazardSpawner {
    pub definition: HazardDefinition,
    pub tracker: SpawnTracker,
}

/// One running story level: chain, map, spawners, input queue, health and score
#[derive(Debug, Clone)]
pub struct StoryGameLoop<R = Pcg32> {
    pub(crate) name: String,
    pub(crate) map: Map,
    pub(crate) chain: SnakeChain,
    pub(crate) foods: Vec<FoodSpawner>,
    pub(crate) hazards: Vec<HazardSpawner>,
    pub(crate) win: WinCondition,
    /// Pending directions, oldest first
    pub(crate) input_queue: VecDeque<Direction>,
    pub(crate) frame_accumulator: f32,
    /// Ticks per movement step (60 / tiles per second)
    pub(crate) frames_per_step: f32,
    pub(crate) health: i32,
    pub(crate) max_health: i32,
    pub(crate) barrier_damage: i32,
    /// Growth owed from eaten food, applied one segment per step
    pub(crate) pending_growth: u32,
    pub(crate) distances: BTreeMap<InstanceId, FoodTileDistanceTracking>,
    pub(crate) ids: InstanceIds,
    pub(crate) rng: R,
    pub(crate) phase: LevelPhase,
    pub(crate) stats: LevelStats,
    pub(crate) completed: bool,
    pub(crate) sound_effects: bool,
    pub(crate) time_ticks: u64,
}

impl StoryGameLoop<Pcg32> {
    /// Start a level with a seeded PCG stream
    pub fn with_seed(
        level: &LevelDefinition,
        settings: &Settings,
        seed: u64,
    ) -> Result<Self, LevelError> {
        Self::new(level, settings, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> StoryGameLoop<R> {
    /// Start a level. Every random draw the level makes comes from `rng`.
    pub fn new(level: &LevelDefinition, settings: &Settings, rng: R) -> Result<Self, LevelError> {
        level.validate()?;
        let chain = level.start.build_chain()?;

        // At most one step per tick
        let tiles_per_second = settings
            .effective_tiles_per_second(level.tiles_per_second)
            .min(TICK_RATE as f32);

        let foods = level
            .foods
            .iter()
            .map(|def| FoodSpawner {
                definition: def.clone(),
                tracker: SpawnTracker::new(TrackerRole::Food, def.food_type, def.spawn),
            })
            .collect();
        let hazards = level
            .hazards
            .iter()
            .map(|def| HazardSpawner {
                definition: def.clone(),
                tracker: SpawnTracker::new(TrackerRole::Hazard, def.hazard_type, def.spawn),
            })
            .collect();

        log::info!(
            "Level '{}' started: {}x{} field, {} food / {} hazard spawners, {:.2} tiles/s",
            level.name,
            level.map.width(),
            level.map.height(),
            level.foods.len(),
            level.hazards.len(),
            tiles_per_second
        );

        Ok(Self {
            name: level.name.clone(),
            map: level.map.clone(),
            chain,
            foods,
            hazards,
            win: level.win,
            input_queue: VecDeque::new(),
            frame_accumulator: 0.0,
            frames_per_step: TICK_RATE as f32 / tiles_per_second,
            health: level.starting_health,
            max_health: level.starting_health,
            barrier_damage: level.barrier_damage,
            pending_growth: 0,
            distances: BTreeMap::new(),
            ids: InstanceIds::new(),
            rng,
            phase: LevelPhase::Playing,
            stats: LevelStats::default(),
            completed: false,
            sound_effects: settings.sound_effects,
            time_ticks: 0,
        })
    }
}

impl<R> StoryGameLoop<R> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chain(&self) -> &SnakeChain {
        &self.chain
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    pub fn stats(&self) -> &LevelStats {
        &self.stats
    }

    pub fn pending_growth(&self) -> u32 {
        self.pending_growth
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn win_condition(&self) -> WinCondition {
        self.win
    }

    /// Directions still waiting to be applied, oldest first
    pub fn queued_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.input_queue.iter().copied()
    }

    /// Live food, in definition order then spawn order
    pub fn food_instances(&self) -> impl Iterator<Item = &Instance> + '_ {
        self.foods.iter().flat_map(|f| f.tracker.instances())
    }

    /// Live hazards, in definition order then spawn order
    pub fn hazard_instances(&self) -> impl Iterator<Item = &Instance> + '_ {
        self.hazards.iter().flat_map(|h| h.tracker.instances())
    }

    pub fn food_positions(&self) -> Vec<IVec2> {
        self.food_instances().map(|i| i.pos).collect()
    }

    /// Path bookkeeping for a live food instance
    pub fn distance_tracking(&self, id: InstanceId) -> Option<FoodTileDistanceTracking> {
        self.distances.get(&id).copied()
    }

    /// Whether the level's win condition currently holds.
    ///
    /// Campaign progression is up to the caller; the loop keeps running.
    pub fn is_level_complete(&self) -> bool {
        if matches!(self.phase, LevelPhase::Lost | LevelPhase::Faulted) {
            return false;
        }
        match self.win {
            WinCondition::FoodEaten(n) => self.stats.food_eaten >= n,
            WinCondition::LengthReached(n) => self.chain.len() >= n,
            WinCondition::TimeSurvived { secs } => self.time_ticks >= secs_to_ticks(secs),
        }
    }
}
