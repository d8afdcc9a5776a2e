use std::time::Duration;

use crate::foundation::error::FlipbookResult;

pub(crate) mod manual;
pub(crate) mod thread;

/// Handle of one armed repeating timer. Ids are never reused by a scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

/// Source of repeating timer ticks.
///
/// A scheduler only arms and cancels timers. Delivering a tick to its owner is
/// left to the caller (see [`crate::drive`] for the thread-backed flavour), and
/// owners must ignore ids they did not arm last.
pub trait Scheduler {
    /// Arm a timer that fires every `interval` until cancelled.
    ///
    /// An error means no timer was armed and no id was handed out to a live
    /// timer.
    fn arm_repeating(&mut self, interval: Duration) -> FlipbookResult<TimerId>;

    /// Cancel a timer. Unknown or already-cancelled ids are ignored.
    fn cancel(&mut self, id: TimerId);

    /// Number of timers currently armed.
    fn armed_count(&self) -> usize;
}

impl<S: Scheduler + ?Sized> Scheduler for Box<S> {
    fn arm_repeating(&mut self, interval: Duration) -> FlipbookResult<TimerId> {
        (**self).arm_repeating(interval)
    }

    fn cancel(&mut self, id: TimerId) {
        (**self).cancel(id)
    }

    fn armed_count(&self) -> usize {
        (**self).armed_count()
    }
}
