//! Story Snake headless runner
//!
//! Plays a built-in demo level with the autopilot and logs what happens.
//!
//! Usage: `story-snake [seed] [ticks]`

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::IVec2;

use story_snake::consts::TICK_RATE;
use story_snake::sim::{
    Direction, FoodDefinition, HazardDefinition, LevelDefinition, LevelPhase, Map, SpawnRules,
    SpawnTrigger, StartDefinition, StoryGameLoop, TickInput, WinCondition, steer,
};
use story_snake::{HighScores, Settings};

const SETTINGS_PATH: &str = "story_snake_settings.json";
const SCORES_PATH: &str = "story_snake_scores.json";

/// Floor ids used by the demo field
const GRASS: u16 = 1;
const SAND: u16 = 2;
const STONE: u16 = 3;

fn demo_level() -> LevelDefinition {
    let (width, height) = (50, 25);
    let mut map = Map::bordered(width, height, GRASS, STONE);
    // A sandy strip across the middle where hazards lurk
    for x in 1..width - 1 {
        for y in 11..14 {
            map = map.with_floor(IVec2::new(x, y), SAND);
        }
    }
    // Two pillars
    for y in 5..9 {
        map = map
            .with_barrier(IVec2::new(12, y), STONE)
            .with_barrier(IVec2::new(37, y), STONE);
    }

    let rules = |trigger, chance_percent, max_spawns, min_floor_id, max_floor_id, lifetime_secs| {
        SpawnRules {
            trigger,
            chance_percent,
            max_spawns,
            min_floor_id,
            max_floor_id,
            lifetime_secs,
        }
    };

    LevelDefinition {
        name: "Meadow".to_string(),
        map,
        foods: vec![
            FoodDefinition {
                food_type: 0,
                spawn: rules(SpawnTrigger::OnDespawn, 70, 1, GRASS, SAND, None),
                growth: 1,
                base_score: 10,
            },
            FoodDefinition {
                food_type: 1,
                spawn: rules(
                    SpawnTrigger::OnTimer {
                        initial_delay_secs: 5,
                        interval_secs: 8,
                    },
                    35,
                    1,
                    GRASS,
                    GRASS,
                    Some(6),
                ),
                growth: 3,
                base_score: 40,
            },
            FoodDefinition {
                food_type: 2,
                spawn: rules(
                    SpawnTrigger::OnLengthReached {
                        length: 8,
                        interval_secs: 10,
                    },
                    25,
                    1,
                    GRASS,
                    SAND,
                    Some(8),
                ),
                growth: -2,
                base_score: 15,
            },
        ],
        hazards: vec![HazardDefinition {
            hazard_type: 0,
            spawn: rules(
                SpawnTrigger::OnTimer {
                    initial_delay_secs: 3,
                    interval_secs: 4,
                },
                50,
                3,
                SAND,
                SAND,
                Some(10),
            ),
            damage: 1,
        }],
        start: StartDefinition {
            position: IVec2::new(25, 6),
            direction: Direction::Up,
            length: 3,
        },
        starting_health: 5,
        tiles_per_second: 8.0,
        win: WinCondition::FoodEaten(15),
        barrier_damage: 1,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5eed);
    let ticks = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(120 * TICK_RATE as u64);

    let settings = Settings::load_from(Path::new(SETTINGS_PATH));
    let level = demo_level();
    let mut game = match StoryGameLoop::with_seed(&level, &settings, seed) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Demo level rejected: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("Story Snake running with seed {} for {} ticks", seed, ticks);

    for _ in 0..ticks {
        let input = TickInput::steer(steer(game.chain(), game.map(), &game.food_positions()));
        let result = match game.update(&input) {
            Ok(result) => result,
            Err(e) => {
                log::error!("Simulation fault: {}", e);
                std::process::exit(2);
            }
        };

        for eaten in &result.food_eaten {
            log::info!(
                "tick {}: ate food type {} for {} points",
                result.tick,
                eaten.instance.type_tag,
                eaten.score.total_score
            );
        }
        for strike in &result.hazard_strikes {
            log::info!(
                "tick {}: hazard strike, health {}",
                result.tick,
                strike.health_after
            );
        }
        if !result.sounds.is_empty() {
            let ids: Vec<_> = result.sounds.iter().map(|s| s.asset_id()).collect();
            log::debug!("tick {}: sounds {:?}", result.tick, ids);
        }
        if result.completed_level || game.phase() != LevelPhase::Playing {
            break;
        }
    }

    let stats = *game.stats();
    println!(
        "{}: {} after {} ticks | score {} | food {} | length {} | health {}/{} | hits {} barrier, {} hazard",
        game.name(),
        if game.is_level_complete() {
            "complete"
        } else if game.phase() == LevelPhase::Lost {
            "lost"
        } else {
            "unfinished"
        },
        stats.ticks,
        stats.score,
        stats.food_eaten,
        game.chain().len(),
        game.health(),
        game.max_health(),
        stats.barrier_hits,
        stats.hazard_strikes
    );

    let mut scores = HighScores::load_from(Path::new(SCORES_PATH));
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0);
    if let Some(rank) = scores.add_score(stats.score, game.name(), stats.food_eaten, timestamp) {
        println!("New high score! Rank #{}", rank);
        if let Err(e) = scores.save_to(Path::new(SCORES_PATH)) {
            log::warn!("Could not save high scores: {}", e);
        }
    }
}
