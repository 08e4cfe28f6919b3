//! Demo steering
//!
//! Greedy pilot used by the headless runner and soak tests: head for the
//! nearest food, never turn into a barrier or the body when a safe tile exists.

use glam::IVec2;

use super::chain::SnakeChain;
use super::direction::Direction;
use super::map::Map;
use crate::manhattan;

/// Pick the next direction for `chain` given the live food tiles
pub fn steer(chain: &SnakeChain, map: &Map, food: &[IVec2]) -> Direction {
    let head = chain.head_position();
    let target = food.iter().copied().min_by_key(|&f| (manhattan(head, f), f.y, f.x));

    let safe = |d: Direction| {
        let next = d.step(head);
        chain.is_valid_movement_direction(d)
            && !map.is_barrier(next)
            && !chain.body_occupies_position(next)
    };

    // Prefer continuing straight on ties so the path stays smooth
    let mut options: Vec<Direction> = Direction::CARDINAL.into_iter().filter(|&d| safe(d)).collect();
    options.sort_by_key(|&d| d != chain.head_direction());

    let best = match target {
        Some(t) => options
            .iter()
            .copied()
            .min_by_key(|&d| manhattan(d.step(head), t)),
        None => options.first().copied(),
    };

    best.unwrap_or(chain.head_direction())
}
