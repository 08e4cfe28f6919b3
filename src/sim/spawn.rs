//! Probabilistic spawn/despawn trackers for food and hazards
//!
//! One tracker per food or hazard definition. Each tick the tracker checks
//! its trigger, rolls its chance at most once per second, and picks a free
//! tile uniformly at random. All randomness comes from the caller's RNG.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::chain::SnakeChain;
use super::level::{SpawnRules, SpawnTrigger};
use super::map::Map;
use crate::consts::{CHANCE_ROLL_INTERVAL_TICKS, CHANCE_ROLL_RANGE, HAZARD_STRIKE_DESPAWN_TICKS};
use crate::secs_to_ticks;

pub type InstanceId = u32;

/// Monotonic instance id source shared by every tracker in a level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceIds {
    next: InstanceId,
}

impl Default for InstanceIds {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceIds {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn allocate(&mut self) -> InstanceId {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// A live food item or hazard on the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub id: InstanceId,
    pub type_tag: u16,
    pub pos: IVec2,
}

/// The trigger rules that differ between food and hazard trackers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackerRole {
    Food,
    Hazard,
}

impl TrackerRole {
    /// Food timers only re-arm once the field is clear of their instances;
    /// hazard timers keep firing regardless of population.
    fn timer_requires_empty(self) -> bool {
        matches!(self, TrackerRole::Food)
    }

    fn avoids_food(self) -> bool {
        matches!(self, TrackerRole::Food)
    }

    fn label(self) -> &'static str {
        match self {
            TrackerRole::Food => "food",
            TrackerRole::Hazard => "hazard",
        }
    }
}

/// Read-only view of the level used for eligibility and placement
pub struct SpawnContext<'a> {
    pub map: &'a Map,
    pub chain: &'a SnakeChain,
    /// Tiles holding live food from any tracker
    pub food: &'a [IVec2],
    pub now: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Live {
    instance: Instance,
    spawned_at: u64,
    struck_at: Option<u64>,
}

/// Spawn state machine for one food or hazard definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnTracker {
    role: TrackerRole,
    type_tag: u16,
    rules: SpawnRules,
    live: Vec<Live>,
    last_roll: Option<u64>,
    last_spawn: Option<u64>,
}

impl SpawnTracker {
    pub fn new(role: TrackerRole, type_tag: u16, rules: SpawnRules) -> Self {
        Self {
            role,
            type_tag,
            rules,
            live: Vec::new(),
            last_roll: None,
            last_spawn: None,
        }
    }

    pub fn role(&self) -> TrackerRole {
        self.role
    }

    pub fn type_tag(&self) -> u16 {
        self.type_tag
    }

    pub fn rules(&self) -> &SpawnRules {
        &self.rules
    }

    /// Live instances in spawn order
    pub fn instances(&self) -> impl Iterator<Item = &Instance> + '_ {
        self.live.iter().map(|l| &l.instance)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn occupies_position(&self, p: IVec2) -> bool {
        self.live.iter().any(|l| l.instance.pos == p)
    }

    /// Live, not yet struck instance at `p`
    pub fn instance_at(&self, p: IVec2) -> Option<&Instance> {
        self.live
            .iter()
            .find(|l| l.instance.pos == p && l.struck_at.is_none())
            .map(|l| &l.instance)
    }

    pub fn get(&self, id: InstanceId) -> Option<&Instance> {
        let found = self.live.iter().find(|l| l.instance.id == id);
        debug_assert!(found.is_some(), "stale {} instance id {id}", self.role.label());
        found.map(|l| &l.instance)
    }

    /// Remove an instance by id.
    ///
    /// Passing an id this tracker does not hold is a caller bug.
    pub fn despawn(&mut self, id: InstanceId) -> Option<Instance> {
        let index = self.live.iter().position(|l| l.instance.id == id);
        debug_assert!(index.is_some(), "stale {} instance id {id}", self.role.label());
        let removed = self.live.remove(index?).instance;
        log::debug!(
            "despawned {} {} at ({}, {})",
            self.role.label(),
            removed.id,
            removed.pos.x,
            removed.pos.y
        );
        Some(removed)
    }

    /// Mark every unstruck hazard under `head` as struck at `now`
    pub fn strike(&mut self, head: IVec2, now: u64) -> Vec<Instance> {
        let mut struck = Vec::new();
        for live in &mut self.live {
            if live.instance.pos == head && live.struck_at.is_none() {
                live.struck_at = Some(now);
                struck.push(live.instance);
            }
        }
        struck
    }

    /// Drop instances whose lifetime ran out, and hazards one second after striking
    pub fn expire(&mut self, now: u64) -> Vec<Instance> {
        let lifetime = self.rules.lifetime_secs.map(secs_to_ticks);
        let mut expired = Vec::new();
        self.live.retain(|l| {
            let timed_out = lifetime.is_some_and(|t| now.saturating_sub(l.spawned_at) >= t);
            let strike_done = l
                .struck_at
                .is_some_and(|t| now.saturating_sub(t) >= HAZARD_STRIKE_DESPAWN_TICKS);
            if timed_out || strike_done {
                expired.push(l.instance);
                false
            } else {
                true
            }
        });
        expired
    }

    /// Whether the trigger currently allows a chance roll
    pub fn is_eligible(&self, ctx: &SpawnContext<'_>) -> bool {
        if self.live.len() >= self.rules.max_spawns {
            return false;
        }
        let interval_elapsed = |interval_secs: u32| {
            self.last_spawn
                .is_none_or(|t| ctx.now.saturating_sub(t) >= secs_to_ticks(interval_secs))
        };

        match self.rules.trigger {
            SpawnTrigger::OnTimer {
                initial_delay_secs,
                interval_secs,
            } => {
                if self.role.timer_requires_empty() && !self.live.is_empty() {
                    return false;
                }
                match self.last_spawn {
                    None => ctx.now >= secs_to_ticks(initial_delay_secs),
                    Some(_) => interval_elapsed(interval_secs),
                }
            }
            SpawnTrigger::OnLengthReached {
                length,
                interval_secs,
            } => ctx.chain.len() >= length && interval_elapsed(interval_secs),
            // Hazard OnDespawn is also rejected by level validation
            SpawnTrigger::OnDespawn => self.role == TrackerRole::Food && self.live.is_empty(),
        }
    }

    /// Tiles a new instance may occupy right now
    pub fn candidate_tiles(&self, ctx: &SpawnContext<'_>) -> Vec<IVec2> {
        ctx.map
            .tiles()
            .filter(|&p| {
                !ctx.map.is_barrier(p)
                    && ctx.map.floor_at(p).is_some_and(|f| self.rules.accepts_floor(f))
                    && !ctx.chain.occupies_position(p)
                    && !(self.role.avoids_food() && ctx.food.contains(&p))
            })
            .collect()
    }

    /// Run one tick of the spawn state machine
    pub fn poll<R: Rng>(
        &mut self,
        ctx: &SpawnContext<'_>,
        ids: &mut InstanceIds,
        rng: &mut R,
    ) -> Option<Instance> {
        if !self.is_eligible(ctx) {
            return None;
        }
        if self
            .last_roll
            .is_some_and(|t| ctx.now.saturating_sub(t) < CHANCE_ROLL_INTERVAL_TICKS)
        {
            return None;
        }

        self.last_roll = Some(ctx.now);
        let roll = rng.random_range(0..CHANCE_ROLL_RANGE);
        if roll > self.rules.chance_percent {
            return None;
        }

        let candidates = self.candidate_tiles(ctx);
        if candidates.is_empty() {
            log::debug!(
                "{} type {} has no eligible tile, deferring",
                self.role.label(),
                self.type_tag
            );
            return None;
        }
        let pos = candidates[rng.random_range(0..candidates.len())];

        let instance = Instance {
            id: ids.allocate(),
            type_tag: self.type_tag,
            pos,
        };
        self.live.push(Live {
            instance,
            spawned_at: ctx.now,
            struck_at: None,
        });
        self.last_spawn = Some(ctx.now);
        log::debug!(
            "spawned {} {} (type {}) at ({}, {})",
            self.role.label(),
            instance.id,
            self.type_tag,
            pos.x,
            pos.y
        );
        Some(instance)
    }
}
