//! Steering input: buffers the next direction and rejects reversals

use log::trace;
use macroquad::prelude::KeyCode;
use shared::Direction;

/// Keys the buffer reacts to. Anything else is ignored.
pub const STEERING_KEYS: [KeyCode; 4] = [KeyCode::Up, KeyCode::Down, KeyCode::Left, KeyCode::Right];

pub fn direction_for_key(key: KeyCode) -> Option<Direction> {
    match key {
        KeyCode::Up => Some(Direction::Up),
        KeyCode::Down => Some(Direction::Down),
        KeyCode::Left => Some(Direction::Left),
        KeyCode::Right => Some(Direction::Right),
        _ => None,
    }
}

/// Holds the direction in effect on the server (`last_committed`) and the one
/// the next tick will send (`pending`).
///
/// A key is rejected when its direction is the opposite of `last_committed`,
/// not of `pending`, so two presses inside one tick cannot fold the snake
/// back onto itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionBuffer {
    last_committed: Direction,
    pending: Direction,
}

impl DirectionBuffer {
    pub fn new() -> Self {
        Self::starting_with(Direction::default())
    }

    pub fn starting_with(direction: Direction) -> Self {
        Self {
            last_committed: direction,
            pending: direction,
        }
    }

    /// Applies a key press. Returns whether `pending` was updated.
    pub fn on_key(&mut self, key: KeyCode) -> bool {
        let Some(direction) = direction_for_key(key) else {
            return false;
        };

        if direction == self.last_committed.opposite() {
            trace!("Ignoring reversal {} -> {}", self.last_committed, direction);
            return false;
        }

        self.pending = direction;
        true
    }

    /// The direction the next tick will send.
    pub fn current(&self) -> Direction {
        self.pending
    }

    pub fn last_committed(&self) -> Direction {
        self.last_committed
    }

    /// Called once the server accepts a move: `pending` becomes the committed
    /// direction.
    pub fn commit(&mut self) -> Direction {
        self.last_committed = self.pending;
        self.last_committed
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for DirectionBuffer {
    fn default() -> Self {
        Self::new()
    }
}
