//=========================================================================
// Logic Thread
//
// Owns the scene registry for the lifetime of the shell and applies
// platform events to it in arrival order.
//
// Each event:
//  - Frame        → registry.tick(), then render into the surface
//  - Resized      → registry.handle_resize()
//  - Input        → registry.handle_input()
//  - WindowClosed → registry.shutdown(), exit
//
// A disconnected channel is treated like WindowClosed.
//
//=========================================================================

//=== Standard Library Imports ============================================
use std::thread;

//=== External Crates =====================================================
use crossbeam_channel::Receiver;
use log::{debug, info, warn};

//=== Internal Modules ====================================================
use crate::core::scene::SceneRegistry;
use crate::core::surface::HeadlessSurface;
use crate::platform::PlatformEvent;

//=== TickControl =========================================================
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== LogicThread =========================================================
pub(crate) struct LogicThread {
    registry: SceneRegistry<HeadlessSurface>,
}

impl LogicThread {
    pub fn new(registry: SceneRegistry<HeadlessSurface>) -> Self {
        Self { registry }
    }

    //--- spawn() ----------------------------------------------------------
    //
    // Starts the thread. The handle yields the registry back once the
    // thread exits, already shut down.
    //
    pub fn spawn(
        self,
        receiver: Receiver<PlatformEvent>,
    ) -> std::io::Result<thread::JoinHandle<SceneRegistry<HeadlessSurface>>> {
        thread::Builder::new()
            .name("logic".into())
            .spawn(move || self.run(receiver))
    }

    fn run(mut self, receiver: Receiver<PlatformEvent>) -> SceneRegistry<HeadlessSurface> {
        if let Err(e) = self.registry.exit_to_menu() {
            warn!(target: "scene", "Could not open the menu: {}", e);
        }

        loop {
            let control = match receiver.recv() {
                Ok(event) => self.handle(event),
                Err(_) => {
                    debug!(target: "scene", "Platform channel disconnected");
                    TickControl::Exit
                }
            };

            if let TickControl::Exit = control {
                break;
            }
        }

        self.registry.shutdown();
        info!("Logic thread exiting.");
        self.registry
    }

    fn handle(&mut self, event: PlatformEvent) -> TickControl {
        match event {
            PlatformEvent::Frame { elapsed_frames } => {
                // Errors are already logged by the registry.
                let _ = self.registry.tick(elapsed_frames);
                self.registry.surface_mut().begin_frame();
                self.registry.render();
            }
            PlatformEvent::Resized { width, height } => {
                self.registry.handle_resize(width, height);
            }
            PlatformEvent::Input(input) => self.registry.handle_input(&input),
            PlatformEvent::WindowClosed => return TickControl::Exit,
        }
        TickControl::Continue
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{KeyCode, ShellInput};
    use crate::scenes::{registry_builder, SceneOptions};
    use crossbeam_channel::unbounded;

    fn spawn() -> (
        crossbeam_channel::Sender<PlatformEvent>,
        thread::JoinHandle<SceneRegistry<HeadlessSurface>>,
    ) {
        let options = SceneOptions {
            seed: Some(3),
            ..SceneOptions::default()
        };
        let registry = registry_builder(&options).build(HeadlessSurface::new(800.0, 600.0));
        let (tx, rx) = unbounded();
        let handle = LogicThread::new(registry).spawn(rx).expect("spawn logic thread");
        (tx, handle)
    }

    #[test]
    fn window_closed_shuts_registry_down() {
        let (tx, handle) = spawn();
        tx.send(PlatformEvent::Frame { elapsed_frames: 1.0 }).expect("send");
        tx.send(PlatformEvent::WindowClosed).expect("send");

        let registry = handle.join().expect("logic thread panicked");
        assert!(registry.is_shut_down());
        assert_eq!(registry.frame_listener_count(), 0);
        assert!(registry.surface().layers().is_empty());
    }

    #[test]
    fn disconnect_behaves_like_close() {
        let (tx, handle) = spawn();
        drop(tx);

        let registry = handle.join().expect("logic thread panicked");
        assert!(registry.is_shut_down());
    }

    #[test]
    fn events_drive_the_registry() {
        let (tx, handle) = spawn();
        tx.send(PlatformEvent::Resized { width: 1024.0, height: 768.0 }).expect("send");
        tx.send(PlatformEvent::Input(ShellInput::KeyDown(KeyCode::Digit3))).expect("send");
        tx.send(PlatformEvent::Frame { elapsed_frames: 1.0 }).expect("send");
        tx.send(PlatformEvent::Input(ShellInput::KeyDown(KeyCode::Escape))).expect("send");
        tx.send(PlatformEvent::Frame { elapsed_frames: 1.0 }).expect("send");
        tx.send(PlatformEvent::WindowClosed).expect("send");

        let registry = handle.join().expect("logic thread panicked");
        assert_eq!(registry.surface().resize_count(), 1);

        // Last frame rendered the lobby again, without a back control.
        let texts = registry.surface().texts();
        assert!(texts.iter().any(|t| t == "Lobby Menu"), "Drawn: {:?}", texts);
        assert!(!texts.iter().any(|t| t == "Back"));
    }
}
