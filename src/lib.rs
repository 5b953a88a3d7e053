//=========================================================================
// Aetheric Showcase - Library Root
//
// This crate hosts a set of frame-driven demo scenes behind a single
// foreground-scene registry.
//
// Responsibilities:
// - Expose the shell interface (`ShellBuilder`, `Shell`)
// - Expose the scene lifecycle and transfer-queue building blocks
//   (`core`) and the demo scenes built on them (`scenes`)
// - Keep the Winit integration (`platform`) hidden from end users
//
// Typical usage:
// ```no_run
// use aetheric_showcase::ShellBuilder;
//
// fn main() {
//     ShellBuilder::new().build().run().expect("platform failure");
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the platform-independent systems: scene lifecycle,
// registry, timers, transfer queues. `scenes` contains the lobby and the
// demos registered by the shell.
//
pub mod core;
pub mod prelude;
pub mod scenes;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the window and event loop; `engine` wires the platform
// to the logic thread.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------
pub use engine::{Shell, ShellBuilder};
pub use platform::PlatformError;
