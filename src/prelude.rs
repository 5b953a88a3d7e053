//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_showcase::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Shell
pub use crate::{PlatformError, Shell, ShellBuilder};

// Geometry, input and rendering
pub use crate::core::geometry::{Point, Rect, Size, FRAME_MS};
pub use crate::core::input::{KeyCode, ShellInput};
pub use crate::core::surface::{HeadlessSurface, RenderSurface, Sprite};
pub use crate::core::timer::{TimerId, TimerSet};

// Scene system
pub use crate::core::scene::{
    HostContext, InitProgress, Scene, SceneContext, SceneError, SceneFactory, SceneRegistry,
    SceneRegistryBuilder, SceneState, SwitchSender, UnknownScenePolicy, MENU_SCENE,
};

// Transfer queues
pub use crate::core::transfer::{
    Anchor, ItemId, LayoutParams, MovableItem, QueueSet, TransferQueue, TransferStart,
    TransferTuning,
};
