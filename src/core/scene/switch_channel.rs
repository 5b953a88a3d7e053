//=========================================================================
// Switch Channel
//=========================================================================
//
// Injected message channel carrying scene switch requests from scenes
// and UI into the scene registry.
//
// Senders are cheap clones handed to every scene hook; the registry owns
// the single receiver and drains it once per frame, so every request is
// consumed exactly once.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::warn;

//=== SwitchRequest =======================================================

/// A request to change the foreground scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchRequest {
    /// Switch to the scene registered under this id.
    Switch(String),
    /// Return to the menu scene.
    ExitToMenu,
}

//=== Channel Construction ================================================

/// Creates a connected sender/receiver pair.
pub fn switch_channel() -> (SwitchSender, SwitchReceiver) {
    let (tx, rx) = unbounded();
    (SwitchSender { tx }, SwitchReceiver { rx })
}

//=== SwitchSender ========================================================

#[derive(Debug, Clone)]
pub struct SwitchSender {
    tx: Sender<SwitchRequest>,
}

impl SwitchSender {
    /// Queues a switch to `scene_id`.
    pub fn switch_to(&self, scene_id: impl Into<String>) {
        self.send(SwitchRequest::Switch(scene_id.into()));
    }

    /// Queues a return to the menu scene.
    pub fn exit_to_menu(&self) {
        self.send(SwitchRequest::ExitToMenu);
    }

    fn send(&self, request: SwitchRequest) {
        if self.tx.send(request).is_err() {
            warn!(target: "scene", "Switch channel disconnected, request dropped");
        }
    }
}

//=== SwitchReceiver ======================================================

#[derive(Debug)]
pub struct SwitchReceiver {
    rx: Receiver<SwitchRequest>,
}

impl SwitchReceiver {
    /// Takes every queued request, leaving the channel empty.
    pub fn drain(&self) -> Vec<SwitchRequest> {
        self.rx.try_iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }
}

//=== Tests ===============================================================
