//! Per-frame timing from a monotonic clock.

use std::time::Instant;

/// Measures wall-clock time elapsed between frames.
///
/// Continuous camera motion is scaled by the value returned from [`tick`],
/// so the first tick reports 0.0 to keep startup cost out of the integration.
///
/// [`tick`]: FrameClock::tick
pub struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Returns seconds elapsed since the previous tick (0.0 on the first call)
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = match self.last {
            Some(prev) => now.duration_since(prev).as_secs_f32(),
            None => 0.0,
        };
        self.last = Some(now);
        elapsed
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
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(), 0.0);
    }

    #[test]
    fn tick_reports_elapsed_time() {
        let mut clock = FrameClock::new();
        clock.tick();
        sleep(Duration::from_millis(5));
        let dt = clock.tick();
        assert!(dt > 0.0);
        assert!(dt >= 0.005);
    }

    #[test]
    fn tick_is_relative_to_previous_tick() {
        let mut clock = FrameClock::new();
        clock.tick();
        sleep(Duration::from_millis(5));
        clock.tick();
        // A tick immediately after another should be near zero, not cumulative.
        let dt = clock.tick();
        assert!(dt < 0.005);
    }
}
