//=========================================================================
// Core Systems
//
// Platform-independent building blocks of the showcase shell. Nothing in
// here touches Winit; the platform layer feeds these types through the
// logic thread.
//
// Layout:
// - `geometry`  : points, sizes, rects, frame/ms conversion
// - `surface`   : render surface capability + headless recorder
// - `timer`     : scene-owned one-shot timers
// - `fps`       : diagnostics overlay
// - `input`     : normalised shell input
// - `scene`     : lifecycle controller, registry, switch channel
// - `transfer`  : animated transfer queues
//
//=========================================================================

pub mod fps;
pub mod geometry;
pub mod input;
pub mod scene;
pub mod surface;
pub mod timer;
pub mod transfer;

//=== Re-exports ==========================================================

pub use geometry::{Point, Rect, Size, FRAME_MS};
pub use input::{KeyCode, ShellInput};
pub use surface::{HeadlessSurface, RenderSurface, Sprite};
pub use timer::{TimerId, TimerSet};
