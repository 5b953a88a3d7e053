//=========================================================================
// Transfer Queue
//=========================================================================
//
// Ordered stack of movable items with layout and animated cross-queue
// transfer of the top item.
//
// Transfer lifecycle:
// ```text
//   begin_transfer(dest)            advance_transfer(dest, dt) ...
//   ├─ pop top (source relayout)    ├─ move fraction of remaining distance
//   ├─ anticipate dest slot         └─ distance < 1 on both axes:
//   ├─ local → screen coordinates       ├─ snap, dest.append(item)
//   ├─ flip item up, dest top down      ├─ clear in-flight descriptor
//   └─ descriptor = Some(..)            └─ run completion callback
// ```
//
// The in-flight descriptor is the only exclusivity guard: while it is
// present the queue refuses further transfers.
//
//=========================================================================

use std::sync::atomic::{AtomicU32, Ordering};

use log::{debug, trace};

use super::item::{ItemId, MovableItem};
use super::layout::{self, Anchor, LayoutParams};
use crate::core::geometry::{Point, Rect};
use crate::core::surface::{RenderSurface, Sprite};

//=== Identifiers & Results ===============================================

static NEXT_QUEUE_ID: AtomicU32 = AtomicU32::new(0);

/// Process-unique queue identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueueId(u32);

/// Callback run once the moved item has joined its destination.
pub type CompletionFn = Box<dyn FnOnce(ItemId) + Send>;

/// Why a transfer request was not started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The source queue holds no items.
    Empty,
    /// The source queue already has a transfer in flight.
    Busy,
    /// Source and destination are the same queue.
    SameQueue,
}

/// Outcome of a transfer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStart {
    Started,
    Rejected(RejectReason),
}

impl TransferStart {
    pub fn is_started(self) -> bool {
        matches!(self, TransferStart::Started)
    }
}

/// Result of advancing a queue's in-flight transfer by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferProgress {
    /// No transfer in flight.
    Idle,
    /// Item still travelling.
    InFlight,
    /// Item landed in the destination this tick.
    Landed(ItemId),
}

//=== Transfer Descriptor =================================================

struct Transfer<T> {
    item: MovableItem<T>,
    destination: QueueId,
    start: Point,
    end: Point,
    on_complete: Option<CompletionFn>,
}

impl<T> Transfer<T> {
    /// Screen-space position of the travelling item.
    fn position(&self) -> Point {
        self.item.node().position()
    }

    fn remaining(&self) -> f32 {
        self.position().chebyshev_distance(self.end)
    }
}

//=== AutoTrigger =========================================================

/// Interval timer that makes a queue start transfers on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AutoTrigger {
    interval_ms: f32,
    accumulated_ms: f32,
}

//=== TransferQueue =======================================================

pub struct TransferQueue<T> {
    id: QueueId,
    anchor: Anchor,
    origin: Point,
    width_budget: f32,
    params: LayoutParams,
    items: Vec<MovableItem<T>>,
    placeholder: Sprite,
    transfer: Option<Transfer<T>>,
    auto_trigger: Option<AutoTrigger>,
}

impl<T> TransferQueue<T> {
    //--- Construction -----------------------------------------------------

    pub fn new(anchor: Anchor) -> Self {
        Self::with_params(anchor, LayoutParams::default())
    }

    pub fn with_params(anchor: Anchor, params: LayoutParams) -> Self {
        assert!(params.max_item_offset >= 0.0, "Max item offset must not be negative");

        let id = QueueId(NEXT_QUEUE_ID.fetch_add(1, Ordering::Relaxed));
        Self {
            id,
            anchor,
            origin: Point::ZERO,
            width_budget: params.item_size.width,
            params,
            items: Vec::new(),
            placeholder: Sprite::new(params.item_size),
            transfer: None,
            auto_trigger: None,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn id(&self) -> QueueId {
        self.id
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    /// Screen-space origin the items are laid out from.
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub fn width_budget(&self) -> f32 {
        self.width_budget
    }

    /// Changes the width budget and relays out.
    pub fn set_width_budget(&mut self, width: f32) {
        self.width_budget = width;
        self.relayout();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True while a transfer started by this queue is in flight.
    pub fn is_moving(&self) -> bool {
        self.transfer.is_some()
    }

    /// Items bottom to top.
    pub fn items(&self) -> impl Iterator<Item = &MovableItem<T>> {
        self.items.iter()
    }

    /// Item currently in flight, positioned in screen space.
    pub fn moving_item(&self) -> Option<&MovableItem<T>> {
        self.transfer.as_ref().map(|t| &t.item)
    }

    /// Destination of the in-flight transfer.
    pub fn transfer_destination(&self) -> Option<QueueId> {
        self.transfer.as_ref().map(|t| t.destination)
    }

    /// Screen-space start and end of the in-flight transfer.
    pub fn transfer_path(&self) -> Option<(Point, Point)> {
        self.transfer.as_ref().map(|t| (t.start, t.end))
    }

    /// Remaining screen-space distance of the in-flight item.
    pub fn remaining_distance(&self) -> Option<f32> {
        self.transfer.as_ref().map(Transfer::remaining)
    }

    pub fn placeholder(&self) -> &Sprite {
        &self.placeholder
    }

    //--- Stack Operations -------------------------------------------------

    pub fn append(&mut self, item: MovableItem<T>) {
        self.items.push(item);
        self.relayout();
    }

    /// Removes the top item, or returns `None` when empty.
    pub fn remove_top(&mut self) -> Option<MovableItem<T>> {
        let item = self.items.pop()?;
        self.relayout();
        Some(item)
    }

    pub fn peek_top(&self) -> Option<&MovableItem<T>> {
        self.items.last()
    }

    /// Drops every item and any in-flight transfer.
    pub fn clear(&mut self) {
        self.items.clear();
        self.transfer = None;
        self.relayout();
    }

    //--- Layout -----------------------------------------------------------

    fn relayout(&mut self) {
        let len = self.items.len();
        self.placeholder.set_visible(len == 0);

        for (index, item) in self.items.iter_mut().enumerate() {
            let pos = layout::slot_position(self.anchor, &self.params, self.width_budget, len, index);
            let node = item.node_mut();
            node.set_position(pos);
            node.set_visible(true);
        }
    }

    /// Local position the next appended item will occupy.
    fn next_slot(&self) -> Point {
        let len = self.items.len() + 1;
        layout::slot_position(self.anchor, &self.params, self.width_budget, len, len - 1)
    }

    //--- Transfers --------------------------------------------------------

    /// Starts moving the top item to `destination`.
    pub fn begin_transfer(&mut self, destination: &mut TransferQueue<T>) -> TransferStart {
        self.begin_transfer_with(destination, None)
    }

    /// Starts a transfer with a callback run when the item lands.
    pub fn begin_transfer_with(
        &mut self,
        destination: &mut TransferQueue<T>,
        on_complete: Option<CompletionFn>,
    ) -> TransferStart {
        if self.id == destination.id {
            return TransferStart::Rejected(RejectReason::SameQueue);
        }
        if self.is_moving() {
            return TransferStart::Rejected(RejectReason::Busy);
        }

        let Some(mut item) = self.remove_top() else {
            return TransferStart::Rejected(RejectReason::Empty);
        };

        let start = item.node().local_to_global(self.origin);
        let end = destination.origin + destination.next_slot();

        item.node_mut().set_position(start);
        item.flip_to(true);
        if let Some(covered) = destination.items.last_mut() {
            covered.flip_to(false);
        }

        debug!(
            target: "transfer",
            "Item {:?} leaving {:?} for {:?}: ({:.1},{:.1}) -> ({:.1},{:.1})",
            item.id(), self.id, destination.id, start.x, start.y, end.x, end.y
        );

        self.transfer = Some(Transfer {
            item,
            destination: destination.id,
            start,
            end,
            on_complete,
        });

        TransferStart::Started
    }

    /// Advances the in-flight transfer by `elapsed_frames`.
    ///
    /// Each normalised frame moves the item `animation_speed` of its
    /// remaining distance, so over `dt` frames the remaining distance
    /// shrinks by `(1 - animation_speed)^dt`. The item lands once it is
    /// within one unit of its target on both axes.
    ///
    /// # Panics
    ///
    /// Panics if `destination` is not the queue the transfer targets.
    pub fn advance_transfer(
        &mut self,
        destination: &mut TransferQueue<T>,
        elapsed_frames: f32,
        animation_speed: f32,
    ) -> TransferProgress {
        let Some(transfer) = self.transfer.as_mut() else {
            return TransferProgress::Idle;
        };
        assert_eq!(
            transfer.destination, destination.id,
            "Transfer advanced against the wrong destination queue"
        );

        let speed = animation_speed.clamp(0.0, 1.0);
        let step = 1.0 - (1.0 - speed).powf(elapsed_frames.max(0.0));

        let pos = transfer.position();
        let delta = transfer.end - pos;
        transfer
            .item
            .node_mut()
            .set_position(Point::new(pos.x + delta.x * step, pos.y + delta.y * step));

        if transfer.remaining() >= 1.0 {
            trace!(target: "transfer", "Item {:?} {:.2} from target", transfer.item.id(), transfer.remaining());
            return TransferProgress::InFlight;
        }

        let Some(mut transfer) = self.transfer.take() else {
            return TransferProgress::Idle;
        };
        let id = transfer.item.id();

        transfer.item.node_mut().set_position(transfer.end);
        destination.append(transfer.item);

        debug!(target: "transfer", "Item {:?} landed in {:?}", id, destination.id);

        if let Some(callback) = transfer.on_complete.take() {
            callback(id);
        }

        TransferProgress::Landed(id)
    }

    //--- Per-frame Item Animation -----------------------------------------

    /// Advances flip animations of every item, including one in flight.
    pub fn advance_flips(&mut self, elapsed_frames: f32, flip_speed: f32) {
        for item in &mut self.items {
            item.advance_flip(elapsed_frames, flip_speed);
        }
        if let Some(transfer) = self.transfer.as_mut() {
            transfer.item.advance_flip(elapsed_frames, flip_speed);
        }
    }

    //--- Auto-trigger -----------------------------------------------------

    /// Makes this queue start a transfer every `interval_ms`.
    pub fn enable_auto_trigger(&mut self, interval_ms: f32) {
        assert!(interval_ms > 0.0, "Auto-trigger interval must be positive");
        self.auto_trigger = Some(AutoTrigger {
            interval_ms,
            accumulated_ms: 0.0,
        });
    }

    pub fn has_auto_trigger(&self) -> bool {
        self.auto_trigger.is_some()
    }

    /// Accumulates time and reports whether a transfer should start now.
    ///
    /// The timer holds while a transfer is in flight and resets when the
    /// interval is reached; an empty queue lets the interval pass unused.
    pub fn tick_auto_trigger(&mut self, elapsed_ms: f32) -> bool {
        let busy = self.is_moving();
        let empty = self.is_empty();
        let Some(trigger) = self.auto_trigger.as_mut() else {
            return false;
        };
        if busy {
            return false;
        }

        trigger.accumulated_ms += elapsed_ms;
        if trigger.accumulated_ms < trigger.interval_ms {
            return false;
        }

        trigger.accumulated_ms = 0.0;
        !empty
    }

    //--- Rendering --------------------------------------------------------

    /// Draws the placeholder or the items, then any item in flight.
    pub fn render(&self, surface: &mut dyn RenderSurface) {
        if self.placeholder.is_visible() {
            surface.draw_rect(self.placeholder.bounds(self.origin), PLACEHOLDER_COLOR);
        }
        for item in &self.items {
            if item.node().is_visible() {
                surface.draw_rect(item.node().bounds(self.origin), face_color(item));
            }
        }
        if let Some(transfer) = &self.transfer {
            let bounds: Rect = transfer.item.node().bounds(Point::ZERO);
            surface.draw_rect(bounds, face_color(&transfer.item));
        }
    }
}

const PLACEHOLDER_COLOR: u32 = 0xFFFF_FF40;
const FRONT_COLOR: u32 = 0xFFFF_FFFF;
const BACK_COLOR: u32 = 0x2C3E_50FF;

fn face_color<T>(item: &MovableItem<T>) -> u32 {
    if item.shows_front() {
        FRONT_COLOR
    } else {
        BACK_COLOR
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Size;
    use crate::core::surface::HeadlessSurface;
    use std::sync::{Arc, Mutex};

    const SPEED: f32 = 0.05;

    fn card(id: u32) -> MovableItem<u32> {
        MovableItem::new(ItemId(id), id, Size::new(70.0, 98.0))
    }

    fn filled(anchor: Anchor, count: u32) -> TransferQueue<u32> {
        let mut queue = TransferQueue::new(anchor);
        queue.set_width_budget(200.0);
        for i in 0..count {
            queue.append(card(i));
        }
        queue
    }

    fn run_to_landing(a: &mut TransferQueue<u32>, b: &mut TransferQueue<u32>) -> usize {
        let mut frames = 0;
        loop {
            frames += 1;
            if let TransferProgress::Landed(_) = a.advance_transfer(b, 1.0, SPEED) {
                return frames;
            }
            assert!(frames < 1000, "Transfer never landed");
        }
    }

    //=====================================================================
    // Stack Operations
    //=====================================================================

    #[test]
    fn append_and_remove_match_vec_model() {
        let mut queue = TransferQueue::new(Anchor::TopLeft);
        let mut model: Vec<u32> = Vec::new();

        // Deterministic mixed sequence of pushes and pops
        for step in 0..200u32 {
            if step % 3 == 2 || step % 7 == 0 {
                let got = queue.remove_top().map(|i| *i.payload());
                assert_eq!(got, model.pop(), "Popped item differs at step {}", step);
            } else {
                queue.append(card(step));
                model.push(step);
            }
            assert_eq!(queue.len(), model.len());
            assert_eq!(queue.peek_top().map(|i| *i.payload()), model.last().copied());
        }
    }

    #[test]
    fn remove_top_on_empty_yields_none() {
        let mut queue: TransferQueue<u32> = TransferQueue::new(Anchor::TopLeft);
        assert!(queue.remove_top().is_none());
    }

    #[test]
    fn placeholder_visible_only_when_empty() {
        let mut queue = TransferQueue::new(Anchor::TopRight);
        assert!(queue.placeholder().is_visible());

        queue.append(card(1));
        assert!(!queue.placeholder().is_visible());

        queue.remove_top();
        assert!(queue.placeholder().is_visible());
    }

    #[test]
    fn relayout_positions_items_by_slot() {
        let queue = filled(Anchor::TopLeft, 3);
        let xs: Vec<f32> = queue.items().map(|i| i.node().position().x).collect();
        assert_eq!(xs, vec![0.0, 20.0, 40.0]);
    }

    //=====================================================================
    // Transfer Rejections
    //=====================================================================

    #[test]
    fn transfer_from_empty_queue_is_rejected() {
        let mut a: TransferQueue<u32> = TransferQueue::new(Anchor::TopLeft);
        let mut b = filled(Anchor::TopRight, 2);

        assert_eq!(a.begin_transfer(&mut b), TransferStart::Rejected(RejectReason::Empty));
        assert_eq!(a.len(), 0);
        assert_eq!(b.len(), 2);
        assert!(!a.is_moving());
    }

    #[test]
    fn transfer_while_busy_is_rejected() {
        let mut a = filled(Anchor::TopLeft, 3);
        let mut b = filled(Anchor::TopRight, 0);
        let mut c = filled(Anchor::BottomLeft, 0);

        assert!(a.begin_transfer(&mut b).is_started());
        assert_eq!(a.begin_transfer(&mut c), TransferStart::Rejected(RejectReason::Busy));
        assert_eq!(a.len(), 2, "Busy rejection must not pop");
        assert_eq!(c.len(), 0);
    }

    //=====================================================================
    // Transfer Lifecycle
    //=====================================================================

    #[test]
    fn transfer_moves_item_between_queues() {
        let mut a = filled(Anchor::TopLeft, 3);
        let mut b = filled(Anchor::TopRight, 1);
        a.set_origin(Point::new(70.0, 140.0));
        b.set_origin(Point::new(730.0, 140.0));

        assert!(a.begin_transfer(&mut b).is_started());
        assert_eq!(a.len(), 2);
        assert!(a.is_moving());

        let total_before = 4;
        let mut frames = 0;
        loop {
            frames += 1;
            match a.advance_transfer(&mut b, 1.0, SPEED) {
                TransferProgress::InFlight => {
                    assert!(a.is_moving());
                    assert!(a.remaining_distance().unwrap_or(0.0) >= 1.0);
                    assert_eq!(b.len(), 1, "Destination unchanged while in flight");
                }
                TransferProgress::Landed(id) => {
                    assert_eq!(id, ItemId(2));
                    break;
                }
                TransferProgress::Idle => panic!("Transfer vanished"),
            }
            assert!(frames < 1000);
        }

        assert!(!a.is_moving());
        assert_eq!(b.len(), 2);
        assert_eq!(a.len() + b.len(), total_before, "Items must be conserved");
        assert_eq!(b.items().filter(|i| i.id() == ItemId(2)).count(), 1);
        assert!(a.items().all(|i| i.id() != ItemId(2)));
    }

    #[test]
    fn item_lands_on_anticipated_slot() {
        let mut a = filled(Anchor::TopLeft, 1);
        let mut b = filled(Anchor::BottomRight, 2);
        b.set_origin(Point::new(500.0, 400.0));

        a.begin_transfer(&mut b);
        let (_, end) = a.transfer_path().expect("transfer in flight");
        // dest will hold 3 items: new top at slot 2, spreading leftwards
        assert_eq!(end, Point::new(460.0, 400.0));

        run_to_landing(&mut a, &mut b);
        let top = b.peek_top().expect("landed item");
        assert_eq!(top.node().local_to_global(b.origin()), end);
    }

    #[test]
    fn remaining_distance_never_grows() {
        let mut a = filled(Anchor::TopLeft, 5);
        let mut b = filled(Anchor::BottomRight, 0);
        b.set_origin(Point::new(900.0, 700.0));

        a.begin_transfer(&mut b);
        let mut last = a.remaining_distance().expect("in flight");
        while let TransferProgress::InFlight = a.advance_transfer(&mut b, 0.7, SPEED) {
            let now = a.remaining_distance().expect("in flight");
            assert!(now <= last, "Distance grew from {} to {}", last, now);
            last = now;
        }
    }

    #[test]
    fn landing_frame_count_is_bounded() {
        let mut a = filled(Anchor::TopLeft, 1);
        let mut b = filled(Anchor::TopRight, 0);
        b.set_origin(Point::new(1000.0, 0.0));

        a.begin_transfer(&mut b);
        // 1000 * 0.95^n < 1  =>  n > 134.7
        let frames = run_to_landing(&mut a, &mut b);
        assert!(frames <= 136, "Took {} frames", frames);
    }

    #[test]
    fn larger_ticks_cover_more_distance() {
        let mut a1 = filled(Anchor::TopLeft, 1);
        let mut b1 = filled(Anchor::TopRight, 0);
        b1.set_origin(Point::new(300.0, 0.0));
        let mut a2 = filled(Anchor::TopLeft, 1);
        let mut b2 = filled(Anchor::TopRight, 0);
        b2.set_origin(Point::new(300.0, 0.0));

        a1.begin_transfer(&mut b1);
        a2.begin_transfer(&mut b2);

        a1.advance_transfer(&mut b1, 1.0, SPEED);
        a1.advance_transfer(&mut b1, 1.0, SPEED);
        a2.advance_transfer(&mut b2, 2.0, SPEED);

        let d1 = a1.remaining_distance().expect("in flight");
        let d2 = a2.remaining_distance().expect("in flight");
        assert!((d1 - d2).abs() < 1e-3, "Two 1-frame ticks should equal one 2-frame tick");
    }

    #[test]
    fn transfer_flips_moving_item_up_and_covered_item_down() {
        let mut a = filled(Anchor::TopLeft, 2);
        let mut b = filled(Anchor::TopRight, 0);

        a.begin_transfer(&mut b);
        assert!(a.moving_item().map(|i| i.is_face_up()).unwrap_or(false));
        run_to_landing(&mut a, &mut b);
        assert!(b.peek_top().map(|i| i.is_face_up()).unwrap_or(false));

        // Finish the flip so the next covering flip is accepted
        b.advance_flips(20.0, 0.1);
        a.begin_transfer(&mut b);
        assert!(
            !b.peek_top().map(|i| i.is_face_up()).unwrap_or(true),
            "Covered item should flip face down"
        );
    }

    #[test]
    fn completion_callback_runs_once_on_landing() {
        let mut a = filled(Anchor::TopLeft, 1);
        let mut b = filled(Anchor::TopRight, 0);
        b.set_origin(Point::new(50.0, 50.0));

        let landed = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&landed);
        a.begin_transfer_with(
            &mut b,
            Some(Box::new(move |id| sink.lock().expect("lock").push(id))),
        );

        run_to_landing(&mut a, &mut b);
        assert_eq!(*landed.lock().expect("lock"), vec![ItemId(0)]);
    }

    #[test]
    fn same_queue_transfer_is_rejected() {
        let mut a = filled(Anchor::TopLeft, 1);
        let id = a.id();
        let mut twin = TransferQueue::<u32>::new(Anchor::TopLeft);
        twin.id = id;

        assert_eq!(
            a.begin_transfer(&mut twin),
            TransferStart::Rejected(RejectReason::SameQueue)
        );
        assert_eq!(a.len(), 1);
    }

    #[test]
    #[should_panic(expected = "wrong destination queue")]
    fn advancing_against_other_queue_panics() {
        let mut a = filled(Anchor::TopLeft, 1);
        let mut b = filled(Anchor::TopRight, 0);
        let mut c = filled(Anchor::BottomLeft, 0);

        a.begin_transfer(&mut b);
        a.advance_transfer(&mut c, 1.0, SPEED);
    }

    //=====================================================================
    // Auto-trigger
    //=====================================================================

    #[test]
    fn auto_trigger_fires_after_interval() {
        let mut a = filled(Anchor::TopLeft, 2);
        a.enable_auto_trigger(1000.0);

        assert!(!a.tick_auto_trigger(600.0));
        assert!(a.tick_auto_trigger(400.0));
        assert!(!a.tick_auto_trigger(100.0), "Timer resets after firing");
    }

    #[test]
    fn auto_trigger_holds_while_moving() {
        let mut a = filled(Anchor::TopLeft, 2);
        let mut b = filled(Anchor::TopRight, 0);
        a.enable_auto_trigger(1000.0);
        a.begin_transfer(&mut b);

        assert!(!a.tick_auto_trigger(5000.0));
        run_to_landing(&mut a, &mut b);
        assert!(!a.tick_auto_trigger(999.0), "No time accrued while moving");
        assert!(a.tick_auto_trigger(1.0));
    }

    #[test]
    fn auto_trigger_skips_empty_queue() {
        let mut a: TransferQueue<u32> = TransferQueue::new(Anchor::TopLeft);
        a.enable_auto_trigger(1000.0);
        assert!(!a.tick_auto_trigger(2000.0));
    }

    #[test]
    fn queue_without_trigger_never_fires() {
        let mut a = filled(Anchor::TopLeft, 2);
        assert!(!a.has_auto_trigger());
        assert!(!a.tick_auto_trigger(10_000.0));
    }

    //=====================================================================
    // Rendering
    //=====================================================================

    #[test]
    fn render_draws_placeholder_or_items() {
        let mut surface = HeadlessSurface::new(800.0, 600.0);
        let empty: TransferQueue<u32> = TransferQueue::new(Anchor::TopLeft);
        empty.render(&mut surface);
        assert_eq!(surface.rects_drawn(), 1);

        surface.begin_frame();
        let full = filled(Anchor::TopLeft, 3);
        full.render(&mut surface);
        assert_eq!(surface.rects_drawn(), 3);
    }
}
