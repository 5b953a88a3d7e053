//=========================================================================
// Scene System
//=========================================================================
//
// Single-foreground-scene lifecycle and switching.
//
// Architecture:
//   SceneRegistry
//     ├─ factories: HashMap<String, SceneFactory>
//     ├─ pending: Option<SceneController>   (awaiting init)
//     ├─ active: Option<SceneController>    (frame-clock subscriber)
//     └─ overlay: Option<FpsCounter>
//
//   SceneController
//     ├─ state: Constructed → Initializing → Running → Destroyed
//     ├─ scene: Box<dyn Scene>
//     ├─ timers: TimerSet
//     └─ back_control: Option<BackControl>
//
// Flow:
//   tick() → poll pending init → SceneController::update() → Scene hooks
//          → drain switch requests
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::geometry::Size;
use crate::core::input::ShellInput;
use crate::core::surface::RenderSurface;
use crate::core::timer::{TimerId, TimerSet};

//=== Module Declarations =================================================

mod controller;
mod error;
mod registry;
mod switch_channel;

//=== Public API ==========================================================

pub use controller::{BackControl, SceneController};
pub use error::SceneError;
pub use registry::{SceneRegistry, SceneRegistryBuilder, UnknownScenePolicy, MENU_SCENE};
pub use switch_channel::{switch_channel, SwitchReceiver, SwitchRequest, SwitchSender};

//=== Lifecycle Types =====================================================

/// Lifecycle state of a scene controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    Constructed,
    Initializing,
    Running,
    Destroyed,
}

/// Result of one initialisation poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitProgress {
    /// Asynchronous setup still outstanding; poll again next frame.
    Pending,
    /// Setup complete; the scene may start running.
    Ready,
}

//=== Contexts ============================================================

/// Host information handed to scene factories.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostContext {
    pub viewport: Size,
}

/// Per-call context available to scene hooks.
pub struct SceneContext<'a> {
    /// Current viewport size.
    pub viewport: Size,
    /// Timers owned by the scene; cleared on destroy.
    pub timers: &'a mut TimerSet,
    /// Channel for requesting scene switches.
    pub requests: &'a SwitchSender,
}

/// Builds a fresh scene instance.
pub type SceneFactory = Box<dyn Fn(&HostContext) -> Box<dyn Scene> + Send>;

//=== Scene Trait =========================================================

/// Scene-specific behaviour driven by a [`SceneController`].
///
/// Only `on_init()` is required. It is polled once per frame until it
/// reports [`InitProgress::Ready`]; the remaining hooks run only while
/// the scene is running (except `on_resize`, which may arrive earlier).
///
/// ```rust
/// # use aetheric_showcase::prelude::*;
/// struct Splash;
///
/// impl Scene for Splash {
///     fn on_init(&mut self, _ctx: &mut SceneContext) -> InitProgress {
///         InitProgress::Ready
///     }
/// }
/// ```
pub trait Scene: Send {
    /// Performs (or continues) scene setup.
    fn on_init(&mut self, ctx: &mut SceneContext) -> InitProgress;

    /// Called once per frame with normalised elapsed frames.
    fn on_update(&mut self, _ctx: &mut SceneContext, _elapsed_frames: f32) {}

    /// Called when a timer scheduled through `ctx.timers` fires.
    fn on_timer(&mut self, _ctx: &mut SceneContext, _timer: TimerId) {}

    /// Called when the viewport changes. Must not assume init finished.
    fn on_resize(&mut self, _width: f32, _height: f32) {}

    /// Called for input not consumed by the scene chrome.
    fn on_input(&mut self, _ctx: &mut SceneContext, _input: &ShellInput) {}

    /// Releases scene-owned visuals.
    fn on_destroy(&mut self) {}

    /// Draws the scene.
    fn render(&self, _surface: &mut dyn RenderSurface) {}

    /// Whether the controller adds a back-to-menu control.
    fn has_back_control(&self) -> bool {
        true
    }
}
