//=========================================================================
// Scene Controller
//=========================================================================
//
// Uniform lifecycle wrapper around a scene implementation.
//
// State machine:
// ```text
//   Constructed ──begin_init()──> Initializing ──poll_init() = Ready──> Running
//        │                             │                                   │
//        └──────────────────────── destroy() ──────────────────────────────┴──> Destroyed
// ```
//
// The controller owns what every scene shares: its timers, the back
// control, and its attachment to the render surface. Contract violations
// (init twice, destroy twice, update after destroy) panic.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, info, trace};

//=== Internal Dependencies ===============================================

use super::{InitProgress, Scene, SceneContext, SceneState, SwitchSender};
use crate::core::geometry::{frames_to_ms, Point, Rect, Size};
use crate::core::input::{KeyCode, ShellInput};
use crate::core::surface::RenderSurface;
use crate::core::timer::TimerSet;

//=== BackControl =========================================================

/// "Back" button anchored to the top-right corner of the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackControl {
    bounds: Rect,
}

impl BackControl {
    pub const SIZE: Size = Size::new(100.0, 40.0);
    pub const MARGIN: f32 = 20.0;
    const COLOR: u32 = 0x2980_B9FF;

    pub fn anchored(viewport: Size) -> Self {
        let mut control = Self { bounds: Rect::default() };
        control.reanchor(viewport);
        control
    }

    pub fn reanchor(&mut self, viewport: Size) {
        self.bounds = Rect::new(
            viewport.width - Self::SIZE.width - Self::MARGIN,
            Self::MARGIN,
            Self::SIZE.width,
            Self::SIZE.height,
        );
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn hit(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    fn render(&self, surface: &mut dyn RenderSurface) {
        surface.draw_rect(self.bounds, Self::COLOR);
        surface.draw_text(self.bounds.center(), "Back");
    }
}

//=== SceneController =====================================================

pub struct SceneController {
    id: String,
    state: SceneState,
    scene: Box<dyn Scene>,
    timers: TimerSet,
    back_control: Option<BackControl>,
    viewport: Size,
}

impl SceneController {
    //--- Construction -----------------------------------------------------

    pub fn new(id: impl Into<String>, scene: Box<dyn Scene>, viewport: Size) -> Self {
        let id = id.into();
        let back_control = scene.has_back_control().then(|| BackControl::anchored(viewport));
        debug!(target: "scene", "Scene {} constructed", id);

        Self {
            id,
            state: SceneState::Constructed,
            scene,
            timers: TimerSet::new(),
            back_control,
            viewport,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SceneState::Running
    }

    pub fn back_control(&self) -> Option<&BackControl> {
        self.back_control.as_ref()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    //--- Lifecycle --------------------------------------------------------

    /// Attaches the scene to the surface and makes the first init poll.
    ///
    /// # Panics
    ///
    /// Panics unless the controller is freshly constructed.
    pub fn begin_init(
        &mut self,
        surface: &mut dyn RenderSurface,
        requests: &SwitchSender,
    ) -> InitProgress {
        assert_eq!(
            self.state,
            SceneState::Constructed,
            "init called on scene {} in state {:?}",
            self.id,
            self.state
        );

        self.state = SceneState::Initializing;
        surface.attach(&self.id);
        info!(target: "scene", "Scene {} initializing", self.id);

        self.poll_init(requests)
    }

    /// Continues an outstanding init; transitions to running when ready.
    ///
    /// # Panics
    ///
    /// Panics unless the controller is initializing.
    pub fn poll_init(&mut self, requests: &SwitchSender) -> InitProgress {
        assert_eq!(
            self.state,
            SceneState::Initializing,
            "init polled on scene {} in state {:?}",
            self.id,
            self.state
        );

        let mut ctx = SceneContext {
            viewport: self.viewport,
            timers: &mut self.timers,
            requests,
        };
        let progress = self.scene.on_init(&mut ctx);

        if progress == InitProgress::Ready {
            self.state = SceneState::Running;
            info!(target: "scene", "Scene {} running", self.id);
        }
        progress
    }

    /// Advances timers and runs the per-frame hook. No-op unless running.
    ///
    /// # Panics
    ///
    /// Panics if the scene has been destroyed.
    pub fn update(&mut self, elapsed_frames: f32, requests: &SwitchSender) {
        assert_ne!(
            self.state,
            SceneState::Destroyed,
            "update called on destroyed scene {}",
            self.id
        );
        if !self.is_running() {
            trace!(target: "scene", "Scene {} not running, update skipped", self.id);
            return;
        }

        let fired = self.timers.advance(frames_to_ms(elapsed_frames));

        let mut ctx = SceneContext {
            viewport: self.viewport,
            timers: &mut self.timers,
            requests,
        };
        for timer in fired {
            self.scene.on_timer(&mut ctx, timer);
        }
        self.scene.on_update(&mut ctx, elapsed_frames);
    }

    /// Re-anchors chrome and forwards the new viewport to the scene.
    pub fn resize(&mut self, width: f32, height: f32) {
        if self.state == SceneState::Destroyed {
            return;
        }

        self.viewport = Size::new(width, height);
        if let Some(control) = self.back_control.as_mut() {
            control.reanchor(self.viewport);
        }
        self.scene.on_resize(width, height);
    }

    /// Routes input: Escape or a press on the back control returns to the
    /// menu, everything else goes to the scene. Ignored unless running.
    pub fn handle_input(&mut self, input: &ShellInput, requests: &SwitchSender) {
        if !self.is_running() {
            return;
        }

        if let Some(control) = &self.back_control {
            let back = match input {
                ShellInput::KeyDown(KeyCode::Escape) => true,
                ShellInput::PointerDown(p) => control.hit(*p),
                _ => false,
            };
            if back {
                debug!(target: "scene", "Back requested from scene {}", self.id);
                requests.exit_to_menu();
                return;
            }
        }

        let mut ctx = SceneContext {
            viewport: self.viewport,
            timers: &mut self.timers,
            requests,
        };
        self.scene.on_input(&mut ctx, input);
    }

    pub fn render(&self, surface: &mut dyn RenderSurface) {
        if !self.is_running() {
            return;
        }
        self.scene.render(surface);
        if let Some(control) = &self.back_control {
            control.render(surface);
        }
    }

    /// Releases the scene: visuals, timers, chrome, surface attachment.
    ///
    /// # Panics
    ///
    /// Panics if called twice.
    pub fn destroy(&mut self, surface: &mut dyn RenderSurface) {
        assert_ne!(
            self.state,
            SceneState::Destroyed,
            "destroy called twice on scene {}",
            self.id
        );

        let attached = self.state != SceneState::Constructed;

        self.scene.on_destroy();
        self.timers.clear();
        self.back_control = None;
        if attached {
            surface.detach(&self.id);
        }
        self.state = SceneState::Destroyed;

        info!(target: "scene", "Scene {} destroyed", self.id);
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::switch_channel;
    use crate::core::surface::HeadlessSurface;
    use crate::core::timer::TimerId;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Probe {
        init_polls_needed: usize,
        updates: usize,
        timers_fired: Vec<TimerId>,
        resized: Option<(f32, f32)>,
        inputs: usize,
        destroyed: bool,
    }

    struct ProbeScene {
        probe: Arc<Mutex<Probe>>,
        schedule_on_init: Option<f32>,
        back: bool,
    }

    impl ProbeScene {
        fn new(probe: &Arc<Mutex<Probe>>) -> Self {
            Self {
                probe: Arc::clone(probe),
                schedule_on_init: None,
                back: true,
            }
        }
    }

    impl Scene for ProbeScene {
        fn on_init(&mut self, ctx: &mut SceneContext) -> InitProgress {
            let mut probe = self.probe.lock().expect("probe");
            if probe.init_polls_needed > 0 {
                probe.init_polls_needed -= 1;
                return InitProgress::Pending;
            }
            if let Some(delay) = self.schedule_on_init.take() {
                ctx.timers.schedule(delay);
            }
            InitProgress::Ready
        }

        fn on_update(&mut self, _ctx: &mut SceneContext, _elapsed: f32) {
            self.probe.lock().expect("probe").updates += 1;
        }

        fn on_timer(&mut self, _ctx: &mut SceneContext, timer: TimerId) {
            self.probe.lock().expect("probe").timers_fired.push(timer);
        }

        fn on_resize(&mut self, width: f32, height: f32) {
            self.probe.lock().expect("probe").resized = Some((width, height));
        }

        fn on_input(&mut self, _ctx: &mut SceneContext, _input: &ShellInput) {
            self.probe.lock().expect("probe").inputs += 1;
        }

        fn on_destroy(&mut self) {
            self.probe.lock().expect("probe").destroyed = true;
        }

        fn has_back_control(&self) -> bool {
            self.back
        }
    }

    fn controller(scene: ProbeScene) -> SceneController {
        SceneController::new("probe", Box::new(scene), Size::new(800.0, 600.0))
    }

    //=====================================================================
    // State Machine
    //=====================================================================

    #[test]
    fn init_runs_through_to_running() {
        let probe = Arc::new(Mutex::new(Probe::default()));
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        let (tx, _rx) = switch_channel();
        let mut c = controller(ProbeScene::new(&probe));

        assert_eq!(c.state(), SceneState::Constructed);
        assert_eq!(c.begin_init(&mut surface, &tx), InitProgress::Ready);
        assert_eq!(c.state(), SceneState::Running);
        assert_eq!(surface.layers(), &["probe".to_owned()]);
    }

    #[test]
    fn pending_init_keeps_initializing_until_ready() {
        let probe = Arc::new(Mutex::new(Probe {
            init_polls_needed: 2,
            ..Probe::default()
        }));
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        let (tx, _rx) = switch_channel();
        let mut c = controller(ProbeScene::new(&probe));

        assert_eq!(c.begin_init(&mut surface, &tx), InitProgress::Pending);
        assert_eq!(c.state(), SceneState::Initializing);

        c.update(1.0, &tx);
        assert_eq!(probe.lock().expect("probe").updates, 0, "No updates before running");

        assert_eq!(c.poll_init(&tx), InitProgress::Pending);
        assert_eq!(c.poll_init(&tx), InitProgress::Ready);
        assert!(c.is_running());
    }

    #[test]
    fn update_is_noop_before_init() {
        let probe = Arc::new(Mutex::new(Probe::default()));
        let (tx, _rx) = switch_channel();
        let mut c = controller(ProbeScene::new(&probe));

        c.update(1.0, &tx);
        assert_eq!(probe.lock().expect("probe").updates, 0);
    }

    #[test]
    #[should_panic(expected = "init called on scene probe")]
    fn init_twice_panics() {
        let probe = Arc::new(Mutex::new(Probe::default()));
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        let (tx, _rx) = switch_channel();
        let mut c = controller(ProbeScene::new(&probe));

        c.begin_init(&mut surface, &tx);
        c.begin_init(&mut surface, &tx);
    }

    #[test]
    #[should_panic(expected = "destroy called twice")]
    fn destroy_twice_panics() {
        let probe = Arc::new(Mutex::new(Probe::default()));
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        let mut c = controller(ProbeScene::new(&probe));

        c.destroy(&mut surface);
        c.destroy(&mut surface);
    }

    #[test]
    #[should_panic(expected = "update called on destroyed scene")]
    fn update_after_destroy_panics() {
        let probe = Arc::new(Mutex::new(Probe::default()));
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        let (tx, _rx) = switch_channel();
        let mut c = controller(ProbeScene::new(&probe));

        c.begin_init(&mut surface, &tx);
        c.destroy(&mut surface);
        c.update(1.0, &tx);
    }

    #[test]
    fn destroy_detaches_and_releases() {
        let probe = Arc::new(Mutex::new(Probe::default()));
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        let (tx, _rx) = switch_channel();
        let mut c = controller(ProbeScene::new(&probe));

        c.begin_init(&mut surface, &tx);
        c.destroy(&mut surface);

        assert_eq!(c.state(), SceneState::Destroyed);
        assert!(surface.layers().is_empty());
        assert!(c.back_control().is_none());
        assert!(probe.lock().expect("probe").destroyed);
    }

    //=====================================================================
    // Timers
    //=====================================================================

    #[test]
    fn timers_fire_from_update() {
        let probe = Arc::new(Mutex::new(Probe::default()));
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        let (tx, _rx) = switch_channel();
        let mut scene = ProbeScene::new(&probe);
        scene.schedule_on_init = Some(100.0);
        let mut c = controller(scene);

        c.begin_init(&mut surface, &tx);
        assert_eq!(c.pending_timers(), 1);

        // 7 frames ≈ 116 ms
        for _ in 0..7 {
            c.update(1.0, &tx);
        }
        assert_eq!(probe.lock().expect("probe").timers_fired.len(), 1);
    }

    #[test]
    fn destroy_cancels_pending_timers() {
        let probe = Arc::new(Mutex::new(Probe::default()));
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        let (tx, _rx) = switch_channel();
        let mut scene = ProbeScene::new(&probe);
        scene.schedule_on_init = Some(3000.0);
        let mut c = controller(scene);

        c.begin_init(&mut surface, &tx);
        c.destroy(&mut surface);

        assert_eq!(c.pending_timers(), 0);
        assert!(probe.lock().expect("probe").timers_fired.is_empty());
    }

    //=====================================================================
    // Resize & Chrome
    //=====================================================================

    #[test]
    fn back_control_anchors_top_right() {
        let control = BackControl::anchored(Size::new(800.0, 600.0));
        assert_eq!(control.bounds(), Rect::new(680.0, 20.0, 100.0, 40.0));
    }

    #[test]
    fn resize_before_init_is_safe_and_reanchors() {
        let probe = Arc::new(Mutex::new(Probe::default()));
        let mut c = controller(ProbeScene::new(&probe));

        c.resize(1024.0, 768.0);
        c.resize(1280.0, 720.0);

        assert_eq!(probe.lock().expect("probe").resized, Some((1280.0, 720.0)));
        let bounds = c.back_control().map(BackControl::bounds);
        assert_eq!(bounds.map(|b| b.origin.x), Some(1160.0));
    }

    #[test]
    fn escape_requests_menu() {
        let probe = Arc::new(Mutex::new(Probe::default()));
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        let (tx, rx) = switch_channel();
        let mut c = controller(ProbeScene::new(&probe));
        c.begin_init(&mut surface, &tx);

        c.handle_input(&ShellInput::KeyDown(KeyCode::Escape), &tx);
        assert_eq!(rx.drain(), vec![super::super::SwitchRequest::ExitToMenu]);
        assert_eq!(probe.lock().expect("probe").inputs, 0, "Back input is consumed");
    }

    #[test]
    fn click_on_back_control_requests_menu() {
        let probe = Arc::new(Mutex::new(Probe::default()));
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        let (tx, rx) = switch_channel();
        let mut c = controller(ProbeScene::new(&probe));
        c.begin_init(&mut surface, &tx);

        c.handle_input(&ShellInput::PointerDown(Point::new(700.0, 30.0)), &tx);
        c.handle_input(&ShellInput::PointerDown(Point::new(100.0, 300.0)), &tx);

        assert_eq!(rx.drain().len(), 1);
        assert_eq!(probe.lock().expect("probe").inputs, 1);
    }

    #[test]
    fn scene_without_back_control_gets_escape() {
        let probe = Arc::new(Mutex::new(Probe::default()));
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        let (tx, rx) = switch_channel();
        let mut scene = ProbeScene::new(&probe);
        scene.back = false;
        let mut c = controller(scene);
        c.begin_init(&mut surface, &tx);

        c.handle_input(&ShellInput::KeyDown(KeyCode::Escape), &tx);
        assert!(rx.drain().is_empty());
        assert_eq!(probe.lock().expect("probe").inputs, 1);
    }
}
