//=========================================================================
// Phoenix Flame Scene
//=========================================================================
//
// A small fire built from ten animated flame particles. Each particle
// plays a 26-frame sequence once while rising and swaying, then respawns
// at a random spot inside the spread with a fresh start frame.
//
// Coordinates are relative to the flame origin at the viewport centre.
//
//=========================================================================

use std::f32::consts::PI;

use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::geometry::{frames_to_ms, Point, Rect, Size};
use crate::core::scene::{HostContext, InitProgress, Scene, SceneContext, SceneFactory};
use crate::core::surface::RenderSurface;

pub const MAX_FLAMES: usize = 10;
pub const SEQUENCE_FRAMES: usize = 26;
pub const SPREAD: f32 = 150.0;

const FLAME_SIZE: Size = Size::new(64.0, 64.0);
const FLAME_COLOR: u32 = 0xFF8C_00FF;

//=== Flame ===============================================================

/// Explicit state of one flame particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Flame {
    pub position: Point,
    pub rotation: f32,
    pub base_scale: f32,
    pub rise_speed: f32,
    pub sine_freq: f32,
    pub sine_amp: f32,
    pub base_alpha: f32,
    pub scale: f32,
    pub alpha: f32,
    /// Fractional cursor into the frame sequence.
    pub frame: f32,
    pub animation_speed: f32,
}

impl Flame {
    fn spawn(rng: &mut StdRng, viewport: Size) -> Self {
        let base_scale = rng.gen_range(0.5..1.0);
        let base_alpha = rng.gen_range(0.7..1.0);

        Self {
            position: spawn_point(rng, viewport),
            rotation: rng.gen_range(0.0..PI),
            base_scale,
            rise_speed: rng.gen_range(0.3..0.7),
            sine_freq: rng.gen_range(0.001..0.003),
            sine_amp: rng.gen_range(0.2..0.5),
            base_alpha,
            scale: base_scale,
            alpha: base_alpha,
            frame: random_frame(rng),
            animation_speed: rng.gen_range(0.25..0.35),
        }
    }

    /// Restarts the sequence at a new spot, keeping the particle's character.
    fn respawn(&mut self, rng: &mut StdRng, viewport: Size) {
        self.position = spawn_point(rng, viewport);
        self.scale = self.base_scale * rng.gen_range(0.9..1.1);
        self.alpha = self.base_alpha * rng.gen_range(0.9..1.1);
        self.frame = random_frame(rng);
    }

    pub fn current_frame(&self) -> usize {
        (self.frame as usize).min(SEQUENCE_FRAMES - 1)
    }

    /// Advances the particle. Returns true when the sequence completed.
    fn advance(&mut self, elapsed_frames: f32, clock_ms: f32) -> bool {
        self.frame += self.animation_speed * elapsed_frames;
        if self.frame >= SEQUENCE_FRAMES as f32 {
            return true;
        }

        self.position.y -= self.rise_speed * elapsed_frames;
        self.position.x += (clock_ms * self.sine_freq).sin() * self.sine_amp * elapsed_frames;
        self.scale = self.base_scale * (1.0 + (clock_ms * 0.003).sin() * 0.1);
        self.alpha = self.base_alpha * (0.9 + (clock_ms * 0.004).sin() * 0.1);
        false
    }
}

fn spawn_point(rng: &mut StdRng, viewport: Size) -> Point {
    Point::new(
        rng.gen_range(-SPREAD / 2.0..SPREAD / 2.0),
        rng.gen_range(-SPREAD / 2.0..SPREAD / 2.0) + viewport.height / 2.0 - SPREAD,
    )
}

fn random_frame(rng: &mut StdRng) -> f32 {
    rng.gen_range(0..SEQUENCE_FRAMES) as f32
}

//=== PhoenixFlame ========================================================

pub struct PhoenixFlame {
    viewport: Size,
    rng: StdRng,
    flames: Vec<Flame>,
    clock_ms: f32,
    respawns: usize,
}

impl PhoenixFlame {
    pub fn new(viewport: Size, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            viewport,
            rng,
            flames: Vec::new(),
            clock_ms: 0.0,
            respawns: 0,
        }
    }

    pub fn factory(seed: Option<u64>) -> SceneFactory {
        Box::new(move |host: &HostContext| {
            Box::new(PhoenixFlame::new(host.viewport, seed)) as Box<dyn Scene>
        })
    }

    pub fn flames(&self) -> &[Flame] {
        &self.flames
    }

    pub fn respawns(&self) -> usize {
        self.respawns
    }

    /// Flame origin in screen space.
    pub fn origin(&self) -> Point {
        Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0)
    }
}

impl Scene for PhoenixFlame {
    fn on_init(&mut self, ctx: &mut SceneContext) -> InitProgress {
        self.viewport = ctx.viewport;
        self.flames = (0..MAX_FLAMES)
            .map(|_| Flame::spawn(&mut self.rng, self.viewport))
            .collect();
        InitProgress::Ready
    }

    fn on_update(&mut self, _ctx: &mut SceneContext, elapsed_frames: f32) {
        self.clock_ms += frames_to_ms(elapsed_frames);

        for flame in &mut self.flames {
            if flame.advance(elapsed_frames, self.clock_ms) {
                flame.respawn(&mut self.rng, self.viewport);
                self.respawns += 1;
                trace!(target: "scene", "Flame respawned at {:?}", flame.position);
            }
        }
    }

    fn on_resize(&mut self, width: f32, height: f32) {
        self.viewport = Size::new(width, height);
        for flame in &mut self.flames {
            flame.position = spawn_point(&mut self.rng, self.viewport);
        }
    }

    fn on_destroy(&mut self) {
        self.flames.clear();
    }

    fn render(&self, surface: &mut dyn RenderSurface) {
        let origin = self.origin();
        for flame in &self.flames {
            let size = Size::new(FLAME_SIZE.width * flame.scale, FLAME_SIZE.height * flame.scale);
            surface.draw_rect(Rect::centered(origin + flame.position, size), FLAME_COLOR);
        }
    }
}
