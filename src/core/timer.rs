//=========================================================================
// Timer Set
//=========================================================================
//
// Scene-owned one-shot timers advanced by the frame clock.
//
// Timers never run on a schedule of their own: the owning scene
// controller advances them from `update`, and only while the scene is
// running. Destroying the scene clears the set in the same step, so a
// timer can never fire into a destroyed scene.
//
//=========================================================================

use log::trace;

//=== TimerId =============================================================

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

//=== TimerSet ============================================================

#[derive(Debug, Default)]
pub struct TimerSet {
    next_id: u64,
    now_ms: f64,
    pending: Vec<(TimerId, f64)>,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a timer that fires once `delay_ms` has elapsed.
    pub fn schedule(&mut self, delay_ms: f32) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push((id, self.now_ms + f64::from(delay_ms.max(0.0))));
        trace!(target: "scene", "Timer {:?} scheduled in {} ms", id, delay_ms);
        id
    }

    /// Cancels a pending timer. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(t, _)| *t != id);
        self.pending.len() != before
    }

    /// Advances time and returns the timers that fired, in deadline order.
    pub fn advance(&mut self, elapsed_ms: f32) -> Vec<TimerId> {
        self.now_ms += f64::from(elapsed_ms.max(0.0));
        let now = self.now_ms;

        let mut fired: Vec<(TimerId, f64)> = Vec::new();
        self.pending.retain(|&(id, deadline)| {
            if deadline <= now {
                fired.push((id, deadline));
                false
            } else {
                true
            }
        });

        fired.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        fired.into_iter().map(|(id, _)| id).collect()
    }

    /// Drops every pending timer.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

//=== Tests ===============================================================
