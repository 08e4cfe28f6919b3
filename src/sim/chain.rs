//! The snake body chain
//!
//! The chain is stored head-to-tail in one vector: index 0 is the head, the
//! last entry is the tail, everything between is body. Each segment keeps the
//! direction it moved in to reach its tile (`enter`) and the direction it will
//! move in to follow its head-ward neighbour (`exit`). Movement propagates those
//! directions tile by tile, so a renderer can pick straight/corner sprites from
//! the stored pair without looking at neighbours.

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::direction::Direction;
use crate::consts::MIN_CHAIN_LENGTH;
use crate::manhattan;

/// Which part of the chain a segment is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    Head,
    Body,
    Tail,
}

/// One tile of the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub pos: IVec2,
    /// Direction this segment moved in to reach `pos`
    pub enter: Direction,
    /// Direction this segment moves in next; equals the head-ward neighbour's `enter`
    pub exit: Direction,
}

/// Chain consistency failures. Any of these means movement logic is broken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("chain length {len} is below the minimum of {}", MIN_CHAIN_LENGTH)]
    TooShort { len: usize },
    #[error("segment {index} is not adjacent to its head-ward neighbour")]
    Discontiguous { index: usize },
    #[error("segment {index} exit direction does not match its head-ward neighbour's enter direction")]
    DirectionMismatch { index: usize },
    #[error("chain is not exactly one head, zero or more body segments and one tail")]
    Malformed,
    #[error("the chain cannot move in direction None")]
    InvalidDirection,
}

/// Ordered head/body/tail sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnakeChain {
    segments: Vec<Segment>,
}

impl SnakeChain {
    /// Build a straight chain.
    ///
    /// `trail` is the direction the body extends away from the head; the head
    /// faces the opposite way, so its first free move is `trail.opposite()`.
    pub fn new(head: IVec2, trail: Direction, length: usize) -> Result<Self, ChainError> {
        if length < MIN_CHAIN_LENGTH {
            return Err(ChainError::TooShort { len: length });
        }
        if trail.is_none() {
            return Err(ChainError::InvalidDirection);
        }

        let heading = trail.opposite();
        let segments = (0..length)
            .map(|i| Segment {
                kind: if i == 0 {
                    SegmentKind::Head
                } else if i == length - 1 {
                    SegmentKind::Tail
                } else {
                    SegmentKind::Body
                },
                pos: head + trail.offset() * i as i32,
                enter: heading,
                exit: heading,
            })
            .collect();

        let chain = Self { segments };
        chain.check_invariants()?;
        Ok(chain)
    }

    pub fn head(&self) -> &Segment {
        &self.segments[0]
    }

    pub fn tail(&self) -> &Segment {
        &self.segments[self.segments.len() - 1]
    }

    /// Body segments only, head-ward first
    pub fn body(&self) -> &[Segment] {
        &self.segments[1..self.segments.len() - 1]
    }

    /// All segments, head first
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Total length including head and tail
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; a chain has at least a head and a tail
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn head_position(&self) -> IVec2 {
        self.head().pos
    }

    /// The direction the head last moved in
    pub fn head_direction(&self) -> Direction {
        self.head().enter
    }

    /// False for `None` and for an instant reversal onto the first body tile
    pub fn is_valid_movement_direction(&self, d: Direction) -> bool {
        !d.is_none() && d != self.head_direction().opposite()
    }

    /// True if any segment (head, body or tail) sits at `p`
    pub fn occupies_position(&self, p: IVec2) -> bool {
        self.segments.iter().any(|s| s.pos == p)
    }

    /// True if a body segment (not head, not tail) sits at `p`
    pub fn body_occupies_position(&self, p: IVec2) -> bool {
        self.body().iter().any(|s| s.pos == p)
    }

    /// Slide the whole chain one tile forward; length is unchanged.
    pub fn move_forward(&mut self, d: Direction) -> Result<(), ChainError> {
        if d.is_none() {
            return Err(ChainError::InvalidDirection);
        }
        let end = self.segments.len();
        self.propagate(d, end);
        self.check_invariants()
    }

    /// Advance the head and keep the tail in place; length grows by one.
    pub fn grow_forward(&mut self, d: Direction) -> Result<(), ChainError> {
        if d.is_none() {
            return Err(ChainError::InvalidDirection);
        }
        let end = self.segments.len() - 1;
        let (pos, enter, exit) = self.propagate(d, end);
        self.segments.insert(
            end,
            Segment {
                kind: SegmentKind::Body,
                pos,
                enter,
                exit,
            },
        );
        self.check_invariants()
    }

    /// Remove up to `amount` segments from the tail end.
    ///
    /// The tail takes over the tile and directions of each removed body
    /// segment. Returns how many were removed; fewer than `amount` means the
    /// chain reached its minimum length.
    pub fn shrink(&mut self, amount: usize) -> Result<usize, ChainError> {
        let mut removed = 0;
        while removed < amount && self.segments.len() > MIN_CHAIN_LENGTH {
            let last_body = self.segments.len() - 2;
            let dropped = self.segments.remove(last_body);
            let tail = self.segments.last_mut().ok_or(ChainError::Malformed)?;
            tail.pos = dropped.pos;
            tail.enter = dropped.enter;
            tail.exit = dropped.exit;
            removed += 1;
        }
        self.check_invariants()?;
        Ok(removed)
    }

    /// Move the head by `d` and shift segments `1..end` into the tile of their
    /// head-ward neighbour. Returns the tile and directions vacated by the last
    /// shifted segment, plus the exit direction a follower there would need.
    fn propagate(&mut self, d: Direction, end: usize) -> (IVec2, Direction, Direction) {
        let head = &mut self.segments[0];
        let mut vacated_pos = head.pos;
        let mut vacated_enter = head.enter;
        head.pos = d.step(head.pos);
        head.enter = d;
        head.exit = d;

        let mut ahead_enter = d;
        for seg in &mut self.segments[1..end] {
            let (old_pos, old_enter) = (seg.pos, seg.enter);
            seg.pos = vacated_pos;
            seg.enter = vacated_enter;
            seg.exit = ahead_enter;
            ahead_enter = seg.enter;
            vacated_pos = old_pos;
            vacated_enter = old_enter;
        }

        (vacated_pos, vacated_enter, ahead_enter)
    }

    /// Verify length, shape, contiguity and direction continuity
    pub fn check_invariants(&self) -> Result<(), ChainError> {
        let len = self.segments.len();
        if len < MIN_CHAIN_LENGTH {
            return Err(ChainError::TooShort { len });
        }

        for (i, seg) in self.segments.iter().enumerate() {
            let expected = if i == 0 {
                SegmentKind::Head
            } else if i == len - 1 {
                SegmentKind::Tail
            } else {
                SegmentKind::Body
            };
            if seg.kind != expected {
                return Err(ChainError::Malformed);
            }
        }

        for (i, pair) in self.segments.windows(2).enumerate() {
            let (prev, curr) = (&pair[0], &pair[1]);
            if manhattan(prev.pos, curr.pos) > 1 {
                return Err(ChainError::Discontiguous { index: i + 1 });
            }
            if curr.exit != prev.enter {
                return Err(ChainError::DirectionMismatch { index: i + 1 });
            }
        }

        Ok(())
    }
}
