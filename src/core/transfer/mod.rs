//=========================================================================
// Transfer System
//=========================================================================
//
// Animated transfer queues: stacked item layout plus single-item moves
// between sibling queues, all advanced from the frame clock.
//
// Architecture:
//   QueueSet
//     ├─ queues: Vec<TransferQueue<T>>
//     │    ├─ items: Vec<MovableItem<T>>   (bottom → top)
//     │    ├─ transfer: Option<Transfer>   (exclusivity guard)
//     │    └─ auto_trigger: Option<..>     (source queue only)
//     └─ rng                               (random sibling choice)
//
//=========================================================================

//=== Module Declarations =================================================

mod item;
mod layout;
mod queue;
mod set;

//=== Public API ==========================================================

pub use item::{flip_squash, ItemId, MovableItem};
pub use layout::{slot_position, spread_offset, visible_count, Anchor, LayoutParams};
pub use queue::{
    CompletionFn, QueueId, RejectReason, TransferProgress, TransferQueue, TransferStart,
};
pub use set::{QueueSet, TransferTuning};
