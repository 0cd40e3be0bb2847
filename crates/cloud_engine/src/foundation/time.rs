//! Frame timing
//!
//! Wind scrolling is driven by accumulated time, so the clock supports both
//! wall-clock ticking and fixed steps for reproducible offline renders.

use std::time::Instant;

/// Accumulating frame clock
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a clock at time zero
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Create a clock starting at the given time in seconds
    pub fn starting_at(seconds: f32) -> Self {
        Self {
            total_time: seconds,
            ..Self::new()
        }
    }

    /// Advance by the wall-clock time elapsed since the previous tick
    pub fn tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.advance(elapsed);
    }

    /// Advance by a fixed step in seconds
    pub fn advance(&mut self, delta_seconds: f32) {
        self.delta_time = delta_seconds.max(0.0);
        self.total_time += self.delta_time;
        self.frame_count += 1;
    }

    /// Seconds covered by the most recent step
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Seconds accumulated since the clock started
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of steps taken
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_steps_accumulate() {
        let mut clock = FrameClock::starting_at(1.0);
        clock.advance(0.5);
        clock.advance(0.25);
        assert_eq!(clock.total_time(), 1.75);
        assert_eq!(clock.delta_time(), 0.25);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_negative_steps_are_ignored() {
        let mut clock = FrameClock::new();
        clock.advance(-3.0);
        assert_eq!(clock.total_time(), 0.0);
    }
}
