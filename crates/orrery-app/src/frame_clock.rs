//! Per-frame timing with a clamp against runaway deltas.

use std::time::Instant;
use tracing::warn;

/// Maximum frame delta in seconds. A frame slower than this (breakpoints,
/// suspended laptop) advances the animation by the clamp instead of jumping.
pub const MAX_FRAME_DT: f32 = 0.25;

/// Measures the elapsed time between frames.
pub struct FrameClock {
    previous: Instant,
    frame_count: u64,
}

impl FrameClock {
    /// Create a clock starting from the current instant.
    pub fn new() -> Self {
        Self {
            previous: Instant::now(),
            frame_count: 0,
        }
    }

    /// Seconds since the last `tick`, clamped to [`MAX_FRAME_DT`].
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let mut dt = now.duration_since(self.previous).as_secs_f32();
        self.previous = now;
        self.frame_count += 1;

        if dt > MAX_FRAME_DT {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                dt * 1000.0,
                MAX_FRAME_DT * 1000.0
            );
            dt = MAX_FRAME_DT;
        }
        dt
    }

    /// Number of `tick` calls so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_tick_returns_elapsed_time() {
        let mut clock = FrameClock::new();
        std::thread::sleep(Duration::from_millis(10));
        let dt = clock.tick();
        assert!(dt >= 0.009, "dt too small: {dt}");
        assert!(dt <= MAX_FRAME_DT);
        assert_eq!(clock.frame_count(), 1);
    }

    #[test]
    fn test_long_pause_is_clamped() {
        let mut clock = FrameClock::new();
        clock.previous = Instant::now() - Duration::from_secs(5);
        let dt = clock.tick();
        assert_eq!(dt, MAX_FRAME_DT);
    }
}
