//=========================================================================
// FPS Counter
//=========================================================================
//
// Diagnostics overlay owned directly by the scene registry. Counts frames
// and publishes a reading once per second of accumulated frame time.
//
//=========================================================================

use super::geometry::{frames_to_ms, Point};
use super::surface::RenderSurface;

/// Layer name the overlay attaches under.
pub const FPS_LAYER: &str = "fps-overlay";

const SAMPLE_WINDOW_MS: f32 = 1000.0;

#[derive(Debug, Default)]
pub struct FpsCounter {
    frames: u32,
    accumulated_ms: f32,
    reading: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one rendered frame.
    pub fn tick(&mut self, elapsed_frames: f32) {
        self.frames += 1;
        self.accumulated_ms += frames_to_ms(elapsed_frames);

        if self.accumulated_ms >= SAMPLE_WINDOW_MS {
            self.reading = self.frames;
            self.frames = 0;
            self.accumulated_ms = 0.0;
        }
    }

    /// Last published frames-per-second value.
    pub fn reading(&self) -> u32 {
        self.reading
    }

    pub fn label(&self) -> String {
        format!("FPS: {}", self.reading)
    }

    pub fn render(&self, surface: &mut dyn RenderSurface) {
        surface.draw_text(Point::new(10.0, 10.0), &self.label());
    }
}
