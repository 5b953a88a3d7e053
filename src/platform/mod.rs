//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the shell's logic thread via a
// crossbeam channel.
//
// Architecture:
// ```text
//  Main Thread:                     Logic Thread:
//  ┌──────────────────────────┐    ┌──────────────────┐
//  │  Winit Event Loop        │    │  SceneRegistry   │
//  │   ↓                      │    │   ├─ tick()      │
//  │  InputProcessor          │    │   ├─ resize      │
//  │   ├─ Converts Winit      │    │   └─ input       │
//  │   └─ Tracks cursor       │    │                  │
//  │   ↓                      │    └──────────────────┘
//  │  InputBuffer             │             ↑
//  │   ↓                      │             │
//  │  RedrawRequested         │             │
//  │   ├─ flush input         │             │
//  │   └─ FrameClock → Frame ─┼─────────────┘
//  └──────────────────────────┘    PlatformEvent
// ```
//
// Key Design Decisions:
// - **RedrawRequested = frame boundary**: input buffered since the last
//   redraw is sent ahead of the `Frame` event that follows it
// - **Logical pixels**: sizes and positions are divided by the scale
//   factor before they cross the channel
// - **Graceful channel disconnect**: if the logic thread dies, events are
//   dropped with a warning so the window can still be closed
//
//=========================================================================

//=== Submodules ==========================================================

mod frame_clock;
mod input_buffer;
mod input_processor;

//=== External Crates =====================================================

use std::time::Instant;

use crossbeam_channel::Sender;
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::geometry::Size;
use crate::core::input::ShellInput;
use frame_clock::FrameClock;
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== PlatformEvent =======================================================

/// Events sent from the platform layer to the logic thread.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlatformEvent {
    /// One display frame elapsed (normalised to 60 Hz frames).
    Frame { elapsed_frames: f32 },

    /// Drawable area changed, in logical pixels.
    Resized { width: f32, height: f32 },

    /// One normalised input event.
    Input(ShellInput),

    /// Window close requested by user or OS. The logic thread shuts the
    /// registry down and exits.
    WindowClosed,
}

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are fatal: if the event loop can't be created, the shell cannot run.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("Event loop creation failed: {0}")]
    EventLoopCreation(#[source] winit::error::EventLoopError),

    #[error("Event loop error: {0}")]
    EventLoopExecution(#[source] winit::error::EventLoopError),
}

//=== WindowConfig ========================================================

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WindowConfig {
    pub title: String,
    pub size: Size,
}

//=== Platform ============================================================

/// Window owner and input aggregator.
///
/// Runs on the main thread (Winit requirement on macOS/iOS) and sends
/// events to the logic thread. Not Send/Sync.
pub(crate) struct Platform {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    config: WindowConfig,

    /// Buffers input until the frame boundary.
    buffer: InputBuffer,

    frame_clock: FrameClock,

    event_sender: Sender<PlatformEvent>,

    input_processor: InputProcessor,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Does not create the window yet; that happens lazily in `resumed()`.
    pub fn new(event_sender: Sender<PlatformEvent>, config: WindowConfig) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            config,
            buffer: InputBuffer::new(),
            frame_clock: FrameClock::new(),
            event_sender,
            input_processor: InputProcessor::new(),
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the Winit event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// exits with an error.
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends an event, dropping it with a warning if the logic thread is gone.
    fn send(&self, event: PlatformEvent) {
        if self.event_sender.send(event).is_err() {
            warn!(target: "platform", "Channel disconnected, dropping event");
        }
    }

    /// Flushes buffered input followed by one `Frame` event.
    fn end_frame(&mut self, now: Instant) {
        if !self.buffer.is_empty() {
            let events = self.buffer.drain();
            trace!(target: "platform::input", "Flushing {} input events", events.len());
            for event in events {
                self.send(PlatformEvent::Input(event));
            }
        }

        let elapsed_frames = self.frame_clock.tick(now);
        self.send(PlatformEvent::Frame { elapsed_frames });
    }

    fn send_resize(&self, size: PhysicalSize<u32>) {
        let logical: LogicalSize<f32> = size.to_logical(self.input_processor.scale_factor());
        debug!(target: "platform", "Resized to {}x{}", logical.width, logical.height);
        self.send(PlatformEvent::Resized {
            width: logical.width,
            height: logical.height,
        });
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Creates the window on first activation (mobile may resume repeatedly).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.size.width, self.config.size.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                self.input_processor.set_scale_factor(window.scale_factor());
                self.send_resize(window.inner_size());
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }

            WindowEvent::Resized(size) => self.send_resize(*size),

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.input_processor.set_scale_factor(*scale_factor);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self.input_processor.process_cursor_moved(position.x, position.y);
                self.buffer.push_pointer_move(event);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let Some(event) = self.input_processor.process_key_event(key_event) {
                    self.buffer.push_discrete(event);
                } else {
                    trace!(target: "platform::input", "Unmapped key ignored");
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(event) = self.input_processor.process_mouse_button(*button, *state) {
                    self.buffer.push_discrete(event);
                }
            }

            WindowEvent::RedrawRequested => {
                self.end_frame(Instant::now());

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
