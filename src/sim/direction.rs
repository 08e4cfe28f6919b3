//! Grid directions

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// A movement direction on the tile grid.
///
/// Screen convention: x grows to the right, y grows downward, so `Up` is (0, -1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    None,
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// The four real directions, in clockwise order
    pub const CARDINAL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit tile offset (`None` maps to zero)
    pub fn offset(self) -> IVec2 {
        match self {
            Direction::None => IVec2::ZERO,
            Direction::Up => IVec2::new(0, -1),
            Direction::Right => IVec2::new(1, 0),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
        }
    }

    /// The exact reverse (`None` stays `None`)
    pub fn opposite(self) -> Direction {
        match self {
            Direction::None => Direction::None,
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }

    pub fn is_none(self) -> bool {
        self == Direction::None
    }

    /// Direction of a unit step from `from` to `to`, if the tiles are orthogonal neighbours
    pub fn between(from: IVec2, to: IVec2) -> Option<Direction> {
        let delta = to - from;
        Self::CARDINAL.into_iter().find(|d| d.offset() == delta)
    }

    /// Tile reached by stepping once from `pos`
    #[inline]
    pub fn step(self, pos: IVec2) -> IVec2 {
        pos + self.offset()
    }
}
