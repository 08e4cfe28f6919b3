//! Fixed-rate story tick
//!
//! One `update` per rendered frame at the 60-tick reference rate: poll the
//! spawners, queue input, and every `60 / tiles_per_second` ticks move the snake
//! one tile and resolve eating, strikes and collisions.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::chain::ChainError;
use super::direction::Direction;
use super::scoring::{FoodTileDistanceTracking, ScoreBreakdown, ScoringEngine};
use super::spawn::{Instance, SpawnContext};
use super::state::{LevelPhase, StoryGameLoop};
use crate::audio::SoundEffect;
use crate::manhattan;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Directions pressed since the previous tick, oldest first
    pub directions: Vec<Direction>,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    pub fn steer(d: Direction) -> Self {
        Self {
            directions: vec![d],
            ..Default::default()
        }
    }
}

/// A food item eaten this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodEaten {
    pub instance: Instance,
    pub score: ScoreBreakdown,
    pub growth: i32,
}

/// A hazard that hit the head this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardStrike {
    pub instance: Instance,
    pub damage: i32,
    pub health_after: i32,
}

/// Everything that happened during one tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickResult {
    pub tick: u64,
    /// Direction the snake moved in, `None` if it did not move
    pub moved: Direction,
    pub hit_barrier: bool,
    pub died: bool,
    pub grew: bool,
    pub shrank_below_minimum: bool,
    pub completed_level: bool,
    pub spawned_food: Vec<Instance>,
    pub spawned_hazards: Vec<Instance>,
    pub despawned_food: Vec<Instance>,
    pub despawned_hazards: Vec<Instance>,
    pub food_eaten: Vec<FoodEaten>,
    pub hazard_strikes: Vec<HazardStrike>,
    pub sounds: Vec<SoundEffect>,
}

/// Unrecoverable simulation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("snake chain invariant violated: {0}")]
    Chain(#[from] ChainError),
}

impl<R: Rng> StoryGameLoop<R> {
    /// Advance the level by one tick.
    ///
    /// An `Err` means the chain broke its invariants; the level is left in
    /// the `Faulted` phase and further updates do nothing.
    pub fn update(&mut self, input: &TickInput) -> Result<TickResult, SimError> {
        let mut result = TickResult {
            tick: self.time_ticks,
            ..Default::default()
        };

        if input.pause {
            match self.phase {
                LevelPhase::Playing => {
                    self.phase = LevelPhase::Paused;
                    return Ok(result);
                }
                LevelPhase::Paused => self.phase = LevelPhase::Playing,
                _ => {}
            }
        }

        // Don't tick if paused or the level is over
        match self.phase {
            LevelPhase::Paused | LevelPhase::Lost | LevelPhase::Faulted => return Ok(result),
            LevelPhase::Playing => {}
        }

        self.time_ticks += 1;
        self.stats.ticks = self.time_ticks;
        result.tick = self.time_ticks;

        self.poll_spawners(&mut result);

        self.input_queue.extend(input.directions.iter().copied());
        self.drop_unusable_inputs();

        self.frame_accumulator += 1.0;
        if self.frame_accumulator >= self.frames_per_step {
            self.frame_accumulator -= self.frames_per_step;
            if let Err(e) = self.step(&mut result) {
                self.phase = LevelPhase::Faulted;
                log::error!("Level '{}' faulted at tick {}: {}", self.name, self.time_ticks, e);
                return Err(e);
            }
        }

        if !self.completed && self.is_level_complete() {
            self.completed = true;
            result.completed_level = true;
            result.sounds.push(SoundEffect::LevelComplete);
            log::info!(
                "Level '{}' complete at tick {} (score {})",
                self.name,
                self.time_ticks,
                self.stats.score
            );
        }

        if !self.sound_effects {
            result.sounds.clear();
        }
        Ok(result)
    }

    /// Expire old instances, then give every tracker its chance to spawn
    fn poll_spawners(&mut self, result: &mut TickResult) {
        let now = self.time_ticks;

        for food in &mut self.foods {
            for expired in food.tracker.expire(now) {
                self.distances.remove(&expired.id);
                result.despawned_food.push(expired);
            }
        }
        for hazard in &mut self.hazards {
            result.despawned_hazards.extend(hazard.tracker.expire(now));
        }

        let head = self.chain.head_position();
        let mut food_tiles: Vec<IVec2> = self
            .foods
            .iter()
            .flat_map(|f| f.tracker.instances().map(|i| i.pos))
            .collect();

        for food in &mut self.foods {
            let ctx = SpawnContext {
                map: &self.map,
                chain: &self.chain,
                food: &food_tiles,
                now,
            };
            if let Some(instance) = food.tracker.poll(&ctx, &mut self.ids, &mut self.rng) {
                self.distances.insert(
                    instance.id,
                    FoodTileDistanceTracking::new(manhattan(head, instance.pos)),
                );
                food_tiles.push(instance.pos);
                result.spawned_food.push(instance);
                result.sounds.push(SoundEffect::FoodSpawn);
            }
        }

        for hazard in &mut self.hazards {
            let ctx = SpawnContext {
                map: &self.map,
                chain: &self.chain,
                food: &food_tiles,
                now,
            };
            if let Some(instance) = hazard.tracker.poll(&ctx, &mut self.ids, &mut self.rng) {
                result.spawned_hazards.push(instance);
                result.sounds.push(SoundEffect::HazardSpawn);
            }
        }
    }

    /// Drop redundant or illegal directions from the front of the queue
    fn drop_unusable_inputs(&mut self) {
        while let Some(&d) = self.input_queue.front() {
            if d == self.chain.head_direction() || !self.chain.is_valid_movement_direction(d) {
                self.input_queue.pop_front();
            } else {
                break;
            }
        }
    }

    /// One movement step: collide, or move/grow and resolve what the head landed on
    fn step(&mut self, result: &mut TickResult) -> Result<(), SimError> {
        let direction = self
            .input_queue
            .pop_front()
            .unwrap_or_else(|| self.chain.head_direction());
        let target = direction.step(self.chain.head_position());
        let growing = self.pending_growth > 0;

        // A moving tail frees its tile; a growing one stays put
        let hits_self = self.chain.body_occupies_position(target)
            || (growing && self.chain.tail().pos == target);
        if self.map.is_barrier(target) || hits_self {
            result.hit_barrier = true;
            result.sounds.push(SoundEffect::HitBarrier);
            self.stats.barrier_hits += 1;
            log::debug!(
                "Hit {} at ({}, {})",
                if hits_self { "body" } else { "barrier" },
                target.x,
                target.y
            );
            self.apply_damage(self.barrier_damage, result);
            return Ok(());
        }

        if growing {
            self.chain.grow_forward(direction)?;
            self.pending_growth -= 1;
            result.grew = true;
            result.sounds.push(SoundEffect::Grow);
        } else {
            self.chain.move_forward(direction)?;
        }
        result.moved = direction;
        self.stats.steps += 1;

        for tracking in self.distances.values_mut() {
            tracking.travelled += 1;
        }

        self.eat_food(result)?;
        self.strike_hazards(result);
        Ok(())
    }

    fn eat_food(&mut self, result: &mut TickResult) -> Result<(), SimError> {
        let head = self.chain.head_position();
        let mut growth_total = 0i32;

        for food in &mut self.foods {
            let Some(id) = food.tracker.instance_at(head).map(|i| i.id) else {
                continue;
            };
            let Some(instance) = food.tracker.despawn(id) else {
                continue;
            };
            let tracking = self.distances.remove(&id).unwrap_or_default();
            let score = ScoringEngine::score(food.definition.base_score, tracking);

            self.stats.food_eaten += 1;
            self.stats.score += score.total_score as u64;
            growth_total += food.definition.growth;
            log::debug!(
                "Ate food {} (type {}): {} points, path {}/{}",
                id,
                instance.type_tag,
                score.total_score,
                tracking.travelled,
                tracking.original
            );

            result.food_eaten.push(FoodEaten {
                instance,
                score,
                growth: food.definition.growth,
            });
            result.sounds.push(SoundEffect::Eat);
        }

        if growth_total > 0 {
            self.pending_growth += growth_total as u32;
        } else if growth_total < 0 {
            let wanted = growth_total.unsigned_abs() as usize;
            let removed = self.chain.shrink(wanted)?;
            result.sounds.push(SoundEffect::Shrink);
            if removed < wanted {
                result.shrank_below_minimum = true;
                self.lose(result);
            }
        }
        Ok(())
    }

    fn strike_hazards(&mut self, result: &mut TickResult) {
        let head = self.chain.head_position();
        let now = self.time_ticks;

        let mut strikes = Vec::new();
        for hazard in &mut self.hazards {
            for instance in hazard.tracker.strike(head, now) {
                strikes.push((instance, hazard.definition.damage));
            }
        }

        for (instance, damage) in strikes {
            self.stats.hazard_strikes += 1;
            result.sounds.push(SoundEffect::HazardStrike);
            self.apply_damage(damage, result);
            result.hazard_strikes.push(HazardStrike {
                instance,
                damage,
                health_after: self.health,
            });
        }
    }

    fn apply_damage(&mut self, amount: i32, result: &mut TickResult) {
        self.health = (self.health - amount).clamp(0, self.max_health);
        if self.health <= 0 {
            self.lose(result);
        }
    }

    fn lose(&mut self, result: &mut TickResult) {
        if self.phase == LevelPhase::Lost {
            return;
        }
        self.phase = LevelPhase::Lost;
        result.died = true;
        result.sounds.push(SoundEffect::Death);
        log::info!(
            "Level '{}' lost at tick {} (score {})",
            self.name,
            self.time_ticks,
            self.stats.score
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::level::fixtures::{basic_level, food_rules};
    use crate::sim::level::{FoodDefinition, HazardDefinition, LevelDefinition, SpawnTrigger, WinCondition};
    use crate::sim::map::Map;
    use crate::sim::steer;

    fn game(level: &LevelDefinition) -> StoryGameLoop {
        StoryGameLoop::with_seed(level, &Settings::default(), 12345).unwrap()
    }

    fn run(game: &mut StoryGameLoop, input: &TickInput, ticks: usize) -> Vec<TickResult> {
        (0..ticks).map(|_| game.update(input).unwrap()).collect()
    }

    /// Single eligible tile for a definition restricted to `floor_id`
    fn marked_level(tile: IVec2, floor_id: u16) -> LevelDefinition {
        let mut level = basic_level();
        level.map = Map::bordered(50, 25, 1, 1).with_floor(tile, floor_id);
        level
    }

    fn only_floor(mut rules: crate::sim::level::SpawnRules, floor_id: u16) -> crate::sim::level::SpawnRules {
        rules.min_floor_id = floor_id;
        rules.max_floor_id = floor_id;
        rules
    }

    #[test]
    fn test_scenario_one_tile_per_six_ticks() {
        let mut game = game(&basic_level());
        let up = TickInput::steer(Direction::Up);

        for tick in 1..=10u64 {
            let result = game.update(&up).unwrap();
            assert!(!result.hit_barrier);
            if tick == 6 {
                assert_eq!(result.moved, Direction::Up);
                assert_eq!(game.chain().head_position(), IVec2::new(25, 9));
            } else {
                assert_eq!(result.moved, Direction::None);
            }
        }
        assert_eq!(game.chain().head_position(), IVec2::new(25, 9));
        assert_eq!(game.stats().steps, 1);
    }

    #[test]
    fn test_fractional_speed_carries_over() {
        let mut level = basic_level();
        level.tiles_per_second = 40.0; // 1.5 ticks per step
        let mut game = game(&level);
        let moves: Vec<_> = run(&mut game, &TickInput::default(), 6)
            .iter()
            .map(|r| r.moved != Direction::None)
            .collect();
        assert_eq!(moves, vec![false, true, true, false, true, true]);
    }

    #[test]
    fn test_input_queue_buffers_and_filters() {
        let mut level = basic_level();
        level.tiles_per_second = 60.0;
        let mut game = game(&level);

        // Heading up: Down is a reversal, Up is redundant, Left is kept, then Down becomes legal
        let input = TickInput {
            directions: vec![Direction::Down, Direction::Up, Direction::Left, Direction::Down],
            pause: false,
        };
        let first = game.update(&input).unwrap();
        assert_eq!(first.moved, Direction::Left);
        assert_eq!(game.queued_directions().collect::<Vec<_>>(), vec![Direction::Down]);

        let second = game.update(&TickInput::default()).unwrap();
        assert_eq!(second.moved, Direction::Down);
        assert_eq!(game.chain().head_position(), IVec2::new(24, 11));

        // Empty queue: keep going
        let third = game.update(&TickInput::default()).unwrap();
        assert_eq!(third.moved, Direction::Down);
    }

    #[test]
    fn test_barrier_hits_drain_health() {
        let mut level = basic_level();
        level.tiles_per_second = 60.0;
        level.start.position = IVec2::new(25, 2);
        let mut game = game(&level);

        let results = run(&mut game, &TickInput::default(), 4);
        assert_eq!(results[0].moved, Direction::Up);
        assert!(results[1].hit_barrier && !results[1].died);
        assert_eq!(results[1].moved, Direction::None);
        assert_eq!(game.chain().head_position(), IVec2::new(25, 1));
        assert!(results[2].hit_barrier && !results[2].died);
        assert!(results[3].died);
        assert!(results[3].sounds.contains(&SoundEffect::Death));
        assert_eq!(game.health(), 0);
        assert_eq!(game.phase(), LevelPhase::Lost);

        // Nothing happens after the level is lost
        let after = game.update(&TickInput::default()).unwrap();
        assert_eq!(after.tick, 4);
        assert_eq!(after, TickResult { tick: 4, ..Default::default() });
    }

    #[test]
    fn test_running_into_body_is_a_barrier_hit() {
        let mut level = basic_level();
        level.tiles_per_second = 60.0;
        level.start.position = IVec2::new(10, 10);
        level.start.length = 5;
        let mut game = game(&level);

        assert_eq!(game.update(&TickInput::steer(Direction::Right)).unwrap().moved, Direction::Right);
        assert_eq!(game.update(&TickInput::steer(Direction::Down)).unwrap().moved, Direction::Down);
        let hit = game.update(&TickInput::steer(Direction::Left)).unwrap();
        assert!(hit.hit_barrier);
        assert_eq!(game.health(), 2);
        assert_eq!(game.chain().head_position(), IVec2::new(11, 11));
    }

    #[test]
    fn test_eating_scores_and_queues_growth() {
        let tile = IVec2::new(25, 5);
        let mut level = marked_level(tile, 2);
        level.foods.push(FoodDefinition {
            food_type: 4,
            spawn: only_floor(food_rules(SpawnTrigger::OnDespawn), 2),
            growth: 2,
            base_score: 10,
        });
        let mut game = game(&level);
        let results = run(&mut game, &TickInput::default(), 30);

        assert_eq!(results[0].spawned_food.len(), 1);
        let food = results[0].spawned_food[0];
        assert_eq!(food.pos, tile);
        assert_eq!(food.type_tag, 4);
        assert_eq!(
            game.distance_tracking(food.id).map(|t| t.original),
            None,
            "tracking is discarded once eaten"
        );

        let eaten = &results[29].food_eaten;
        assert_eq!(eaten.len(), 1);
        assert_eq!(eaten[0].instance, food);
        assert_eq!(eaten[0].score.total_score, 30);
        assert_eq!(game.stats().score, 30);
        assert_eq!(game.pending_growth(), 2);
        assert_eq!(game.chain().len(), 3);

        // Growth lands one segment per step
        let results = run(&mut game, &TickInput::default(), 18);
        assert!(results[5].grew);
        assert!(results[11].grew);
        assert!(!results[17].grew);
        assert_eq!(game.chain().len(), 5);
        assert_eq!(game.pending_growth(), 0);
        assert!(game.chain().check_invariants().is_ok());
    }

    #[test]
    fn test_distance_tracking_counts_steps() {
        let tile = IVec2::new(40, 20);
        let mut level = marked_level(tile, 2);
        level.foods.push(FoodDefinition {
            food_type: 0,
            spawn: only_floor(food_rules(SpawnTrigger::OnDespawn), 2),
            growth: 1,
            base_score: 10,
        });
        let mut game = game(&level);
        let first = game.update(&TickInput::default()).unwrap();
        let id = first.spawned_food[0].id;
        assert_eq!(
            game.distance_tracking(id),
            Some(FoodTileDistanceTracking { original: 25, travelled: 0 })
        );
        run(&mut game, &TickInput::default(), 11);
        assert_eq!(game.distance_tracking(id).map(|t| t.travelled), Some(2));
    }

    #[test]
    fn test_shrinking_below_minimum_loses_level() {
        let tile = IVec2::new(25, 9);
        let mut level = marked_level(tile, 2);
        level.foods.push(FoodDefinition {
            food_type: 9,
            spawn: only_floor(food_rules(SpawnTrigger::OnDespawn), 2),
            growth: -2,
            base_score: 1,
        });
        let mut game = game(&level);
        let results = run(&mut game, &TickInput::default(), 6);
        let last = &results[5];
        assert_eq!(last.food_eaten.len(), 1);
        assert!(last.shrank_below_minimum);
        assert!(last.died);
        assert_eq!(game.chain().len(), 2);
        assert_eq!(game.phase(), LevelPhase::Lost);
    }

    #[test]
    fn test_hazard_strikes_then_despawns_after_one_second() {
        let tile = IVec2::new(25, 8);
        let mut level = marked_level(tile, 3);
        level.hazards.push(HazardDefinition {
            hazard_type: 2,
            spawn: only_floor(
                food_rules(SpawnTrigger::OnTimer {
                    initial_delay_secs: 0,
                    interval_secs: 100,
                }),
                3,
            ),
            damage: 1,
        });
        let mut game = game(&level);

        let results = run(&mut game, &TickInput::default(), 12);
        let hazard = results[0].spawned_hazards[0];
        assert_eq!(hazard.pos, tile);
        let strike = &results[11];
        assert_eq!(strike.hazard_strikes.len(), 1);
        assert_eq!(strike.hazard_strikes[0].instance, hazard);
        assert_eq!(strike.hazard_strikes[0].health_after, 2);
        assert!(strike.sounds.contains(&SoundEffect::HazardStrike));

        // Turn away from the top wall and wait out the strike timer
        game.update(&TickInput::steer(Direction::Right)).unwrap();
        let results = run(&mut game, &TickInput::default(), 59);
        let despawn_tick = results
            .iter()
            .find(|r| !r.despawned_hazards.is_empty())
            .map(|r| r.tick);
        assert_eq!(despawn_tick, Some(72));
        assert_eq!(game.hazard_instances().count(), 0);
        assert_eq!(game.health(), 2);
    }

    #[test]
    fn test_food_lifetime_drops_tracking() {
        let tile = IVec2::new(40, 20);
        let mut level = marked_level(tile, 2);
        let mut rules = only_floor(food_rules(SpawnTrigger::OnDespawn), 2);
        rules.lifetime_secs = Some(1);
        level.foods.push(FoodDefinition {
            food_type: 0,
            spawn: rules,
            growth: 1,
            base_score: 5,
        });
        let mut game = game(&level);
        let results = run(&mut game, &TickInput::steer(Direction::Left), 61);
        let food = results[0].spawned_food[0];
        assert_eq!(food.pos, tile);

        // Spawned at tick 1, gone at tick 61; the refill roll is due the same tick
        assert!(results[59].despawned_food.is_empty());
        assert_eq!(results[60].despawned_food, vec![food]);
        assert_eq!(game.distance_tracking(food.id), None);
        assert_eq!(results[60].spawned_food.len(), 1);
        assert_ne!(results[60].spawned_food[0].id, food.id);
    }

    #[test]
    fn test_completed_level_reported_once() {
        let mut level = basic_level();
        level.tiles_per_second = 1.0;
        level.win = WinCondition::TimeSurvived { secs: 1 };
        let mut game = game(&level);
        let results = run(&mut game, &TickInput::default(), 90);
        let completions: Vec<_> = results
            .iter()
            .filter(|r| r.completed_level)
            .map(|r| r.tick)
            .collect();
        assert_eq!(completions, vec![60]);
        assert!(game.is_level_complete());
    }

    #[test]
    fn test_pause_freezes_time() {
        let mut game = game(&basic_level());
        game.update(&TickInput::default()).unwrap();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        game.update(&pause).unwrap();
        assert_eq!(game.phase(), LevelPhase::Paused);
        run(&mut game, &TickInput::steer(Direction::Left), 10);
        assert_eq!(game.time_ticks(), 1);
        assert_eq!(game.queued_directions().count(), 0);

        let resumed = game.update(&pause).unwrap();
        assert_eq!(game.phase(), LevelPhase::Playing);
        assert_eq!(resumed.tick, 2);
    }

    #[test]
    fn test_muted_settings_emit_no_sounds() {
        let mut level = basic_level();
        level.tiles_per_second = 60.0;
        level.start.position = IVec2::new(25, 1);
        level.start.direction = Direction::Down;
        let settings = Settings {
            sound_effects: false,
            ..Settings::default()
        };
        let mut game = StoryGameLoop::with_seed(&level, &settings, 1).unwrap();
        let hit = game.update(&TickInput::default()).unwrap();
        assert!(hit.hit_barrier);
        assert!(hit.sounds.is_empty());
    }

    fn busy_level() -> LevelDefinition {
        let mut level = basic_level();
        level.tiles_per_second = 12.0;
        level.starting_health = 50;
        level.win = WinCondition::FoodEaten(1000);
        let mut apple = food_rules(SpawnTrigger::OnDespawn);
        apple.chance_percent = 60;
        let mut berry = food_rules(SpawnTrigger::OnTimer {
            initial_delay_secs: 2,
            interval_secs: 3,
        });
        berry.chance_percent = 40;
        berry.lifetime_secs = Some(8);
        level.foods = vec![
            FoodDefinition {
                food_type: 0,
                spawn: apple,
                growth: 1,
                base_score: 10,
            },
            FoodDefinition {
                food_type: 1,
                spawn: berry,
                growth: 2,
                base_score: 25,
            },
        ];
        let mut spikes = food_rules(SpawnTrigger::OnTimer {
            initial_delay_secs: 1,
            interval_secs: 2,
        });
        spikes.max_spawns = 4;
        spikes.chance_percent = 50;
        spikes.lifetime_secs = Some(5);
        let mut rocks = food_rules(SpawnTrigger::OnLengthReached {
            length: 4,
            interval_secs: 1,
        });
        rocks.max_spawns = 3;
        level.hazards = vec![
            HazardDefinition {
                hazard_type: 0,
                spawn: spikes,
                damage: 1,
            },
            HazardDefinition {
                hazard_type: 1,
                spawn: rocks,
                damage: 2,
            },
        ];
        level
    }

    fn autopilot_input(game: &StoryGameLoop) -> TickInput {
        TickInput::steer(steer(game.chain(), game.map(), &game.food_positions()))
    }

    #[test]
    fn test_identical_seeds_produce_identical_records() {
        let level = busy_level();
        let record = |seed: u64| {
            let mut game = StoryGameLoop::with_seed(&level, &Settings::default(), seed).unwrap();
            let results: Vec<TickResult> = (0..1200)
                .map(|_| {
                    let input = autopilot_input(&game);
                    game.update(&input).unwrap()
                })
                .collect();
            serde_json::to_string(&results).unwrap()
        };
        let a = record(2024);
        let b = record(2024);
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_ne!(a, record(2025));
    }

    #[test]
    fn test_spawns_never_land_on_the_snake() {
        let level = busy_level();
        for seed in 0..8u64 {
            let mut game = StoryGameLoop::with_seed(&level, &Settings::default(), seed).unwrap();
            for _ in 0..900 {
                let before = game.chain().clone();
                let food_before = game.food_positions();
                let input = autopilot_input(&game);
                let result = game.update(&input).unwrap();
                let expired: Vec<_> = result.despawned_food.iter().map(|f| f.pos).collect();
                for spawned in result.spawned_food.iter().chain(&result.spawned_hazards) {
                    assert!(!before.occupies_position(spawned.pos), "seed {seed}: spawn on snake");
                    assert!(!game.map().is_barrier(spawned.pos));
                }
                for spawned in &result.spawned_food {
                    let still_there = food_before.contains(&spawned.pos) && !expired.contains(&spawned.pos);
                    assert!(!still_there, "seed {seed}: food on food");
                }
                assert!(game.chain().check_invariants().is_ok());
                if game.phase() != LevelPhase::Playing {
                    break;
                }
            }
        }
    }
}
