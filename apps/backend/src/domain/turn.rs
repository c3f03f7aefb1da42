//! Seat / turn math for a roster of `n` contiguous positions (0..n).
//!
//! Shared by the interpreter and the snapshot so every layer agrees on
//! who acts next.

use serde::{Serialize, Serializer};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Direction {
    /// +1: position increases.
    #[default]
    Forward,
    /// -1: position decreases.
    Backward,
}

impl Direction {
    #[inline]
    pub fn step(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Clients see the direction as +1 / -1.
impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.step() as i8)
    }
}

/// Next seat from `position` in `direction`, wrapping at both ends.
#[inline]
pub fn next_position(position: usize, direction: Direction, roster_size: usize) -> usize {
    if roster_size == 0 {
        return 0;
    }
    let next = position as i64 + direction.step();
    if next < 0 {
        roster_size - 1
    } else if next as usize > roster_size - 1 {
        0
    } else {
        next as usize
    }
}
