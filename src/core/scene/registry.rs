//=========================================================================
// Scene Registry
//=========================================================================
//
// Single source of truth for which scene is in the foreground, and the
// only component that constructs or destroys scenes.
//
// Switch sequence:
// ```text
//   switch_scene(id)
//     ├─ reject if another scene is still initializing (menu preempts)
//     ├─ drop frame subscription, destroy current scene
//     ├─ look up factory (unknown id → policy, Err(UnknownScene))
//     ├─ construct controller, begin_init()
//     └─ Ready   → activate: subscribe to frame clock, initial resize
//        Pending → park as pending; tick() polls until Ready
// ```
//
// Policies:
// - Overlapping switches are rejected with `SwitchInProgress`, except
//   requests for the menu scene, which destroy the pending scene first.
// - Unknown ids follow `UnknownScenePolicy` (default: leave empty).
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::{
    switch_channel, HostContext, InitProgress, SceneController, SceneError, SceneFactory,
    SceneState, SwitchReceiver, SwitchRequest, SwitchSender,
};
use crate::core::fps::{FpsCounter, FPS_LAYER};
use crate::core::input::ShellInput;
use crate::core::surface::RenderSurface;

/// Identifier of the privileged menu scene.
pub const MENU_SCENE: &str = "lobby";

//=== UnknownScenePolicy ==================================================

/// What the registry does after a switch to an unregistered id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownScenePolicy {
    /// Leave no scene active.
    #[default]
    LeaveEmpty,
    /// Switch to the menu scene.
    FallbackToMenu,
}

//=== SceneRegistryBuilder ================================================

/// Collects scene factories; the registry is read-only once built.
pub struct SceneRegistryBuilder {
    factories: HashMap<String, SceneFactory>,
    policy: UnknownScenePolicy,
}

impl SceneRegistryBuilder {
    /// Starts a registry whose menu scene is produced by `menu`.
    pub fn new(menu: SceneFactory) -> Self {
        let mut factories = HashMap::new();
        factories.insert(MENU_SCENE.to_owned(), menu);
        Self {
            factories,
            policy: UnknownScenePolicy::default(),
        }
    }

    /// Registers a scene factory under `id`.
    ///
    /// The menu id cannot be re-registered.
    pub fn register(mut self, id: impl Into<String>, factory: SceneFactory) -> Self {
        let id = id.into();
        if id == MENU_SCENE {
            warn!(target: "scene", "Ignoring registration over the menu scene");
            return self;
        }
        if self.factories.insert(id.clone(), factory).is_some() {
            warn!(target: "scene", "Scene {} was already registered and has been replaced", id);
        }
        self
    }

    pub fn with_unknown_scene_policy(mut self, policy: UnknownScenePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builds the registry, subscribing it to resize and attaching the overlay.
    pub fn build<R: RenderSurface>(self, mut surface: R) -> SceneRegistry<R> {
        let (requests_tx, requests_rx) = switch_channel();
        surface.attach(FPS_LAYER);

        info!(target: "scene", "Scene registry built with {} scenes", self.factories.len());

        SceneRegistry {
            factories: self.factories,
            policy: self.policy,
            surface,
            active: None,
            pending: None,
            frame_subscriber: None,
            resize_subscribed: true,
            overlay: Some(FpsCounter::new()),
            requests_tx,
            requests_rx,
            shut_down: false,
        }
    }
}

//=== SceneRegistry =======================================================

pub struct SceneRegistry<R: RenderSurface> {
    factories: HashMap<String, SceneFactory>,
    policy: UnknownScenePolicy,
    surface: R,
    active: Option<SceneController>,
    pending: Option<SceneController>,
    frame_subscriber: Option<String>,
    resize_subscribed: bool,
    overlay: Option<FpsCounter>,
    requests_tx: SwitchSender,
    requests_rx: SwitchReceiver,
    shut_down: bool,
}

impl<R: RenderSurface> SceneRegistry<R> {
    //--- Accessors --------------------------------------------------------

    /// Sender scenes and UI use to request switches.
    pub fn requests(&self) -> SwitchSender {
        self.requests_tx.clone()
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut R {
        &mut self.surface
    }

    pub fn active_scene_id(&self) -> Option<&str> {
        self.active.as_ref().map(SceneController::id)
    }

    pub fn active_state(&self) -> Option<SceneState> {
        self.active.as_ref().map(SceneController::state)
    }

    pub fn pending_scene_id(&self) -> Option<&str> {
        self.pending.as_ref().map(SceneController::id)
    }

    /// True while a switch is waiting for its scene's init.
    pub fn is_switching(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    pub fn policy(&self) -> UnknownScenePolicy {
        self.policy
    }

    /// Number of scenes subscribed to the frame clock (0 or 1).
    pub fn frame_listener_count(&self) -> usize {
        usize::from(self.frame_subscriber.is_some())
    }

    /// Number of resize subscriptions held (0 or 1).
    pub fn resize_listener_count(&self) -> usize {
        usize::from(self.resize_subscribed)
    }

    pub fn overlay(&self) -> Option<&FpsCounter> {
        self.overlay.as_ref()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    //--- Switching --------------------------------------------------------

    /// Replaces the foreground scene with a fresh instance of `id`.
    ///
    /// The current scene is destroyed before the new one is constructed,
    /// so it is gone even when `id` turns out to be unknown.
    pub fn switch_scene(&mut self, id: &str) -> Result<(), SceneError> {
        if self.shut_down {
            return Err(SceneError::ShutDown);
        }

        let to_menu = id == MENU_SCENE;
        if let Some(pending) = self.pending.as_ref() {
            if !to_menu {
                warn!(
                    target: "scene",
                    "Switch to {} rejected: {} still initializing", id, pending.id()
                );
                return Err(SceneError::SwitchInProgress {
                    requested: id.to_owned(),
                    pending: pending.id().to_owned(),
                });
            }
        }

        info!(target: "scene", "Switching scene to {}", id);
        self.teardown_scenes();

        if !self.factories.contains_key(id) {
            warn!(target: "scene", "Unknown scene ID: {}", id);
            if self.policy == UnknownScenePolicy::FallbackToMenu {
                self.construct(MENU_SCENE);
            }
            return Err(SceneError::UnknownScene(id.to_owned()));
        }

        self.construct(id);
        Ok(())
    }

    /// Returns to the menu scene from any state.
    pub fn exit_to_menu(&mut self) -> Result<(), SceneError> {
        self.switch_scene(MENU_SCENE)
    }

    fn teardown_scenes(&mut self) {
        self.frame_subscriber = None;

        if let Some(mut pending) = self.pending.take() {
            debug!(target: "scene", "Abandoning pending scene {}", pending.id());
            pending.destroy(&mut self.surface);
        }
        if let Some(mut active) = self.active.take() {
            active.destroy(&mut self.surface);
        }
    }

    /// Constructs and starts initialising a registered scene.
    fn construct(&mut self, id: &str) {
        let Some(factory) = self.factories.get(id) else {
            return;
        };

        let host = HostContext {
            viewport: self.surface.size(),
        };
        let mut controller = SceneController::new(id, factory(&host), host.viewport);

        match controller.begin_init(&mut self.surface, &self.requests_tx) {
            InitProgress::Ready => self.activate(controller),
            InitProgress::Pending => {
                debug!(target: "scene", "Scene {} awaiting init", id);
                self.pending = Some(controller);
            }
        }
    }

    fn activate(&mut self, mut controller: SceneController) {
        let viewport = self.surface.size();
        controller.resize(viewport.width, viewport.height);

        self.frame_subscriber = Some(controller.id().to_owned());
        info!(target: "scene", "Scene {} is now active", controller.id());
        self.active = Some(controller);
    }

    //--- Frame Clock ------------------------------------------------------

    /// Handles one frame-clock tick.
    ///
    /// Polls a pending init, updates the active scene, then applies switch
    /// requests queued during the frame. Returns errors from those requests.
    pub fn tick(&mut self, elapsed_frames: f32) -> Vec<SceneError> {
        if self.shut_down {
            return Vec::new();
        }

        if let Some(overlay) = self.overlay.as_mut() {
            overlay.tick(elapsed_frames);
        }

        if let Some(pending) = self.pending.as_mut() {
            if pending.poll_init(&self.requests_tx) == InitProgress::Ready {
                if let Some(ready) = self.pending.take() {
                    self.activate(ready);
                }
            }
        }

        if self.frame_subscriber.is_some() {
            if let Some(active) = self.active.as_mut() {
                active.update(elapsed_frames, &self.requests_tx);
            }
        }

        self.process_requests()
    }

    /// Applies queued switch requests in arrival order.
    pub fn process_requests(&mut self) -> Vec<SceneError> {
        let mut errors = Vec::new();

        for request in self.requests_rx.drain() {
            let result = match &request {
                SwitchRequest::Switch(id) => self.switch_scene(id),
                SwitchRequest::ExitToMenu => self.exit_to_menu(),
            };
            if let Err(e) = result {
                warn!(target: "scene", "Switch request {:?} failed: {}", request, e);
                errors.push(e);
            }
        }

        errors
    }

    //--- Resize & Input ---------------------------------------------------

    /// Resizes the surface and forwards the size to the active scene.
    ///
    /// The surface tracks the viewport even with no scene active, so the
    /// next scene is constructed at the current size.
    pub fn handle_resize(&mut self, width: f32, height: f32) {
        if !self.resize_subscribed {
            return;
        }

        self.surface.resize(width, height);
        if let Some(active) = self.active.as_mut() {
            active.resize(width, height);
        }
    }

    pub fn handle_input(&mut self, input: &ShellInput) {
        if let Some(active) = self.active.as_mut() {
            active.handle_input(input, &self.requests_tx);
        }
    }

    //--- Rendering --------------------------------------------------------

    pub fn render(&mut self) {
        if let Some(active) = self.active.as_ref() {
            active.render(&mut self.surface);
        }
        if let Some(overlay) = self.overlay.as_ref() {
            overlay.render(&mut self.surface);
        }
    }

    //--- Teardown ---------------------------------------------------------

    /// Unsubscribes from the host, destroys scenes, releases the overlay.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }

        self.resize_subscribed = false;
        self.teardown_scenes();

        if self.overlay.take().is_some() {
            self.surface.detach(FPS_LAYER);
        }

        self.shut_down = true;
        info!(target: "scene", "Scene registry shut down");
    }
}

//=== Tests ===============================================================
