//=========================================================================
// Aetheric Showcase Shell
//
// Main entry point and coordinator for the showcase.
//
// Architecture:
// ```text
//     ShellBuilder  ──build()──>  Shell  ──run()──>  [Runtime]
//         │                         │
//         ├─ with_window_size()     ├─ spawns logic thread (owns registry)
//         ├─ with_title()           ├─ runs platform on main thread
//         ├─ with_channel_capacity()└─ blocks until exit
//         ├─ with_dialogue_source()
//         ├─ with_unknown_scene_policy()
//         └─ with_seed()
// ```
//
//=========================================================================

mod logic_thread;

//=== External Dependencies ===============================================

use std::path::Path;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{error, info};

//=== Internal Dependencies ===============================================

use crate::core::geometry::Size;
use crate::core::scene::{SceneRegistry, UnknownScenePolicy};
use crate::core::surface::HeadlessSurface;
use crate::platform::{Platform, PlatformError, PlatformEvent, WindowConfig};
use crate::scenes::{registry_builder, DialogueSource, SceneOptions};
use logic_thread::LogicThread;

//=== ShellBuilder ========================================================

/// Builder for configuring and constructing a [`Shell`].
///
/// # Default Values
///
/// - **Window**: 800×600, titled "Aetheric Showcase"
/// - **Channel capacity**: 128 events
/// - **Dialogue**: built-in payload
/// - **Unknown scenes**: leave the stage empty
/// - **Seed**: none (entropy)
///
/// # Examples
///
/// ```no_run
/// use aetheric_showcase::ShellBuilder;
///
/// ShellBuilder::new()
///     .with_window_size(1280.0, 720.0)
///     .with_dialogue_source("assets/magicwords.json")
///     .build()
///     .run()
///     .expect("platform failure");
/// ```
pub struct ShellBuilder {
    window_size: Size,
    title: String,
    channel_capacity: usize,
    options: SceneOptions,
}

impl ShellBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            window_size: Size::new(800.0, 600.0),
            title: "Aetheric Showcase".to_owned(),
            channel_capacity: 128,
            options: SceneOptions::default(),
        }
    }

    /// Sets the initial window size in logical pixels.
    ///
    /// # Panics
    ///
    /// Panics unless both dimensions are positive.
    pub fn with_window_size(mut self, width: f32, height: f32) -> Self {
        assert!(
            width > 0.0 && height > 0.0,
            "Window size must be positive, got {}x{}",
            width,
            height
        );
        self.window_size = Size::new(width, height);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the channel capacity for platform → logic communication.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Loads the Magic Words payload from a JSON file instead of the built-in one.
    pub fn with_dialogue_source(mut self, path: impl AsRef<Path>) -> Self {
        self.options.dialogue_source = DialogueSource::file(path);
        self
    }

    pub fn with_unknown_scene_policy(mut self, policy: UnknownScenePolicy) -> Self {
        self.options.unknown_scene_policy = policy;
        self
    }

    /// Makes every scene's randomness reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.options.seed = Some(seed);
        self
    }

    /// Builds the shell, registering the lobby and every demo scene.
    pub fn build(self) -> Shell {
        info!(
            "Building shell ({}x{}, channel: {})",
            self.window_size.width, self.window_size.height, self.channel_capacity
        );

        let surface = HeadlessSurface::new(self.window_size.width, self.window_size.height);
        let registry = registry_builder(&self.options).build(surface);

        Shell {
            registry,
            window: WindowConfig {
                title: self.title,
                size: self.window_size,
            },
            channel_capacity: self.channel_capacity,
        }
    }
}

impl Default for ShellBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Shell ===============================================================

/// Showcase runtime.
///
/// # Architecture
///
/// ```text
/// Shell (Main Thread)
///   ├─► LogicThread
///   │     └─► SceneRegistry → active scene, overlay
///   │
///   └─► Platform (Event Loop)
///         └─► Window, input, frame clock
///
/// Communication: bounded crossbeam channel (PlatformEvent)
/// ```
pub struct Shell {
    registry: SceneRegistry<HeadlessSurface>,
    window: WindowConfig,
    channel_capacity: usize,
}

impl Shell {
    /// Registry the logic thread will own.
    pub fn registry(&self) -> &SceneRegistry<HeadlessSurface> {
        &self.registry
    }

    //--- Execution --------------------------------------------------------

    /// Starts the runtime and blocks until the window closes.
    ///
    /// # Lifecycle
    ///
    /// 1. Creates the platform → logic channel
    /// 2. Spawns the logic thread, which opens the menu
    /// 3. Runs the platform event loop (blocks here)
    /// 4. On window close: `WindowClosed` → registry shutdown → thread exits
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop fails.
    pub fn run(self) -> Result<(), PlatformError> {
        info!("Starting shell runtime");

        //--- 1. Create communication channel -----------------------------
        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.channel_capacity);

        info!("Platform channel created (capacity: {})", self.channel_capacity);

        //--- 2. Spawn the logic thread ------------------------------------
        let logic_handle = match LogicThread::new(self.registry).spawn(rx) {
            Ok(handle) => Some(handle),
            Err(e) => {
                error!("Could not spawn logic thread: {}", e);
                None
            }
        };

        //--- 3. Launch the platform subsystem -----------------------------
        let platform = Platform::new(tx, self.window);
        info!("Platform initialized, entering event loop");

        let result = platform.run();
        if let Err(e) = &result {
            error!("Platform error: {}", e);
        }

        info!("Platform event loop exited");

        //--- 4. Cleanup: Wait for logic thread to terminate --------------
        if let Some(handle) = logic_handle {
            match handle.join() {
                Ok(_) => info!("Logic thread terminated cleanly"),
                Err(e) => error!("Logic thread panicked: {:?}", e),
            }
        }

        info!("Shell shutdown complete");
        result
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
