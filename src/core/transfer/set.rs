//=========================================================================
// Queue Set
//=========================================================================
//
// Sibling transfer queues advanced together by one frame-clock tick.
//
// Per tick:
//   1. advance item flips (every queue, including items in flight)
//   2. advance each in-flight transfer against its destination
//   3. evaluate auto-triggers; a due queue moves its top item to a
//      uniformly random sibling
//
//=========================================================================

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::item::ItemId;
use super::queue::{QueueId, RejectReason, TransferProgress, TransferQueue, TransferStart};
use crate::core::geometry::frames_to_ms;
use crate::core::surface::RenderSurface;

//=== TransferTuning ======================================================

/// Animation rates shared by the queues of a set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferTuning {
    /// Fraction of the remaining distance covered per normalised frame.
    pub animation_speed: f32,
    /// Flip progress per normalised frame.
    pub flip_speed: f32,
    /// Interval between autonomous transfers.
    pub auto_interval_ms: f32,
}

impl Default for TransferTuning {
    fn default() -> Self {
        Self {
            animation_speed: 0.05,
            flip_speed: 0.1,
            auto_interval_ms: 1000.0,
        }
    }
}

//=== QueueSet ============================================================

pub struct QueueSet<T> {
    queues: Vec<TransferQueue<T>>,
    tuning: TransferTuning,
    rng: StdRng,
}

impl<T> QueueSet<T> {
    //--- Construction -----------------------------------------------------

    pub fn new(tuning: TransferTuning) -> Self {
        Self {
            queues: Vec::new(),
            tuning,
            rng: StdRng::from_entropy(),
        }
    }

    /// Set whose random sibling choice is reproducible.
    pub fn with_seed(tuning: TransferTuning, seed: u64) -> Self {
        Self {
            queues: Vec::new(),
            tuning,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Adds a queue and returns its index in the set.
    pub fn push(&mut self, queue: TransferQueue<T>) -> usize {
        self.queues.push(queue);
        self.queues.len() - 1
    }

    //--- Accessors --------------------------------------------------------

    pub fn tuning(&self) -> &TransferTuning {
        &self.tuning
    }

    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TransferQueue<T>> {
        self.queues.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut TransferQueue<T>> {
        self.queues.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransferQueue<T>> {
        self.queues.iter()
    }

    /// Items across every queue, counting any in flight.
    pub fn total_items(&self) -> usize {
        self.queues
            .iter()
            .map(|q| q.len() + usize::from(q.is_moving()))
            .sum()
    }

    fn index_of(&self, id: QueueId) -> Option<usize> {
        self.queues.iter().position(|q| q.id() == id)
    }

    /// Disjoint mutable borrows of two different queues.
    fn pair_mut(
        &mut self,
        a: usize,
        b: usize,
    ) -> Option<(&mut TransferQueue<T>, &mut TransferQueue<T>)> {
        if a == b || a >= self.queues.len() || b >= self.queues.len() {
            return None;
        }
        if a < b {
            let (left, right) = self.queues.split_at_mut(b);
            Some((&mut left[a], &mut right[0]))
        } else {
            let (left, right) = self.queues.split_at_mut(a);
            Some((&mut right[0], &mut left[b]))
        }
    }

    //--- Transfers --------------------------------------------------------

    /// Starts moving the top item of queue `from` to queue `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is outside the set.
    pub fn begin_transfer(&mut self, from: usize, to: usize) -> TransferStart {
        assert!(
            from < self.queues.len() && to < self.queues.len(),
            "Queue index out of range ({} -> {}, {} queues)",
            from,
            to,
            self.queues.len()
        );

        match self.pair_mut(from, to) {
            Some((source, destination)) => source.begin_transfer(destination),
            None => TransferStart::Rejected(RejectReason::SameQueue),
        }
    }

    //--- Frame Update -----------------------------------------------------

    /// Advances flips, transfers and auto-triggers. Returns items that landed.
    pub fn update(&mut self, elapsed_frames: f32) -> Vec<ItemId> {
        let tuning = self.tuning;

        for queue in &mut self.queues {
            queue.advance_flips(elapsed_frames, tuning.flip_speed);
        }

        let mut landed = Vec::new();
        for i in 0..self.queues.len() {
            let Some(dest_id) = self.queues[i].transfer_destination() else {
                continue;
            };
            let Some(j) = self.index_of(dest_id) else {
                warn!(target: "transfer", "Destination {:?} is not part of this set", dest_id);
                continue;
            };
            if let Some((source, destination)) = self.pair_mut(i, j) {
                if let TransferProgress::Landed(id) =
                    source.advance_transfer(destination, elapsed_frames, tuning.animation_speed)
                {
                    landed.push(id);
                }
            }
        }

        let elapsed_ms = frames_to_ms(elapsed_frames);
        for i in 0..self.queues.len() {
            if self.queues[i].tick_auto_trigger(elapsed_ms) {
                self.transfer_to_random_sibling(i);
            }
        }

        landed
    }

    fn transfer_to_random_sibling(&mut self, from: usize) {
        let count = self.queues.len();
        if count < 2 {
            return;
        }

        let mut to = self.rng.gen_range(0..count - 1);
        if to >= from {
            to += 1;
        }

        let result = self.begin_transfer(from, to);
        debug!(target: "transfer", "Auto-transfer {} -> {}: {:?}", from, to, result);
    }

    //--- Teardown & Rendering ---------------------------------------------

    /// Releases every item in every queue.
    pub fn clear(&mut self) {
        for queue in &mut self.queues {
            queue.clear();
        }
    }

    pub fn render(&self, surface: &mut dyn RenderSurface) {
        for queue in &self.queues {
            queue.render(surface);
        }
    }
}

//=== Tests ===============================================================
