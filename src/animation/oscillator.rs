// src/animation/oscillator.rs

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Ping-pong position bouncing between 0 and `max` in fixed steps.
///
/// A step that would cross a bound lands exactly on it, so the position never
/// leaves `[0, max]` even when `max` is not a multiple of the step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Oscillator {
    position: u32,
    step: u32,
    max: u32,
    direction: Direction,
}

impl Oscillator {
    pub fn new(step: u32, max: u32) -> Self {
        Self {
            position: 0,
            step,
            max,
            direction: Direction::Forward,
        }
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Moves one step and returns the new position.
    pub fn advance(&mut self) -> u32 {
        match self.direction {
            Direction::Forward => {
                self.position = self.position.saturating_add(self.step).min(self.max);
                if self.position == self.max {
                    self.direction = Direction::Backward;
                }
            }
            Direction::Backward => {
                self.position = self.position.saturating_sub(self.step);
                if self.position == 0 {
                    self.direction = Direction::Forward;
                }
            }
        }
        self.position
    }
}
