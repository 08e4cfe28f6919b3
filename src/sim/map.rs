//! Static level geometry: floor and barrier tile ids

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::level::LevelError;
use crate::consts::MAX_FIELD_SIDE;

/// Immutable per-tile floor/barrier grid (row-major, `y * width + x`).
///
/// Barrier id 0 means passable. Tiles outside the grid behave as barriers.
/// Deserialization goes through [`Map::new`], so a decoded map always has
/// grids matching its size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MapData")]
pub struct Map {
    width: i32,
    height: i32,
    floor: Vec<u16>,
    barriers: Vec<u16>,
}

/// Wire shape of a map before its grids are checked
#[derive(Deserialize)]
struct MapData {
    width: i32,
    height: i32,
    floor: Vec<u16>,
    barriers: Vec<u16>,
}

impl TryFrom<MapData> for Map {
    type Error = LevelError;

    fn try_from(data: MapData) -> Result<Self, Self::Error> {
        Map::new(data.width, data.height, data.floor, data.barriers)
    }
}

/// Tile count for a `width` x `height` field, if it is non-empty and fits
fn tile_count(width: i32, height: i32) -> Result<usize, LevelError> {
    if width <= 0 || height <= 0 {
        return Err(LevelError::EmptyField { width, height });
    }
    width
        .checked_mul(height)
        .map(|n| n as usize)
        .ok_or(LevelError::FieldTooLarge { width, height })
}

impl Map {
    pub fn new(
        width: i32,
        height: i32,
        floor: Vec<u16>,
        barriers: Vec<u16>,
    ) -> Result<Self, LevelError> {
        let map = Self {
            width,
            height,
            floor,
            barriers,
        };
        map.check_grid()?;
        Ok(map)
    }

    /// Both grids hold exactly one id per tile of a non-empty field
    pub fn check_grid(&self) -> Result<(), LevelError> {
        let expected = tile_count(self.width, self.height)?;
        for (grid, actual) in [("floor", self.floor.len()), ("barrier", self.barriers.len())] {
            if actual != expected {
                return Err(LevelError::GridSize {
                    grid,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// A uniform floor surrounded by a one-tile barrier border.
    ///
    /// Each side is clamped to `1..=MAX_FIELD_SIDE`.
    pub fn bordered(width: i32, height: i32, floor_id: u16, barrier_id: u16) -> Self {
        let width = width.clamp(1, MAX_FIELD_SIDE);
        let height = height.clamp(1, MAX_FIELD_SIDE);
        let count = (width * height) as usize;
        let mut barriers = vec![0; count];
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                    barriers[(y * width + x) as usize] = barrier_id;
                }
            }
        }
        Self {
            width,
            height,
            floor: vec![floor_id; count],
            barriers,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, p: IVec2) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    fn index(&self, p: IVec2) -> Option<usize> {
        self.in_bounds(p)
            .then(|| (p.y * self.width + p.x) as usize)
    }

    pub fn floor_at(&self, p: IVec2) -> Option<u16> {
        self.index(p).map(|i| self.floor[i])
    }

    pub fn barrier_at(&self, p: IVec2) -> Option<u16> {
        self.index(p).map(|i| self.barriers[i])
    }

    /// True for barrier tiles and anything off the grid
    pub fn is_barrier(&self, p: IVec2) -> bool {
        self.barrier_at(p).is_none_or(|id| id != 0)
    }

    /// Every tile position in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = IVec2> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| IVec2::new(x, y)))
    }

    /// Set a barrier while building a level by hand
    pub fn with_barrier(mut self, p: IVec2, barrier_id: u16) -> Self {
        if let Some(i) = self.index(p) {
            self.barriers[i] = barrier_id;
        }
        self
    }

    /// Set a floor id while building a level by hand
    pub fn with_floor(mut self, p: IVec2, floor_id: u16) -> Self {
        if let Some(i) = self.index(p) {
            self.floor[i] = floor_id;
        }
        self
    }
}
