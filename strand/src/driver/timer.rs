use std::cmp::Ordering;
use std::sync::Arc;
use std::sync::atomic::{self, AtomicBool};
use std::task::Waker;
use std::time::Instant;

/// An entry in the driver's timer queue.
///
/// Entries are kept in a `BinaryHeap` ordered by deadline. An entry whose
/// owning `Sleep` was dropped stays in the heap until its deadline and is
/// then discarded without waking anyone.
pub(crate) struct TimerEntry {
    /// The time at which the timer should fire.
    pub(crate) deadline: Instant,

    /// Waker to notify when the deadline is reached.
    pub(crate) waker: Waker,

    /// Cancellation flag shared with the associated sleep future.
    pub(crate) cancelled: Arc<AtomicBool>,
}

impl TimerEntry {
    /// Wakes the owning task unless the sleep has been abandoned.
    pub(crate) fn fire(self) {
        if !self.cancelled.load(atomic::Ordering::Acquire) {
            self.waker.wake();
        }
    }
}

impl Eq for TimerEntry {}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline.eq(&other.deadline)
    }
}

impl Ord for TimerEntry {
    /// Reversed so that `BinaryHeap<TimerEntry>` pops the earliest deadline
    /// first.
    fn cmp(&self, other: &Self) -> Ordering {
        other.deadline.cmp(&self.deadline)
    }
}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
