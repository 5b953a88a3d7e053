//=========================================================================
// Frame Clock
//
// Measures wall time between redraws and normalises it to 60 Hz frames
// (1.0 = one 60 Hz frame). Long stalls are clamped so a paused window
// does not teleport every animation on resume.
//
//=========================================================================

use std::time::{Duration, Instant};

use crate::core::geometry::{ms_to_frames, FRAME_MS};

/// Longest gap between frames that is reported as-is.
const MAX_ELAPSED_MS: f32 = 100.0;

pub(crate) struct FrameClock {
    last: Option<Instant>,
}

impl FrameClock {
    pub(crate) fn new() -> Self {
        Self { last: None }
    }

    /// Elapsed frames since the previous tick. The first tick reports one frame.
    pub(crate) fn tick(&mut self, now: Instant) -> f32 {
        let elapsed = match self.last.replace(now) {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::from_secs_f32(FRAME_MS / 1000.0),
        };
        elapsed_frames(elapsed)
    }
}

fn elapsed_frames(elapsed: Duration) -> f32 {
    let ms = (elapsed.as_secs_f32() * 1000.0).min(MAX_ELAPSED_MS);
    ms_to_frames(ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_one_frame() {
        let mut clock = FrameClock::new();
        assert!((clock.tick(Instant::now()) - 1.0).abs() < 1e-3);
    }

    #[test]
    fn elapsed_is_normalised_to_sixty_hertz() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick(start);

        let frames = clock.tick(start + Duration::from_millis(50));
        assert!((frames - 3.0).abs() < 1e-3, "50 ms is three frames, got {}", frames);
    }

    #[test]
    fn long_stalls_are_clamped() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick(start);

        let frames = clock.tick(start + Duration::from_secs(5));
        assert!((frames - 6.0).abs() < 1e-3);
    }
}
