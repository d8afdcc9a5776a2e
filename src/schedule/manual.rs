use std::collections::BTreeMap;
use std::time::Duration;

use crate::foundation::error::FlipbookResult;
use crate::schedule::{Scheduler, TimerId};

#[derive(Clone, Copy, Debug)]
struct ArmedTimer {
    interval: Duration,
    next_due: Duration,
}

/// Deterministic scheduler driven by an explicit virtual clock.
///
/// Nothing fires on its own: [`ManualScheduler::advance`] moves the clock and
/// returns the ticks that came due, in firing order.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    armed: BTreeMap<TimerId, ArmedTimer>,
    history: Vec<Duration>,
}

impl ManualScheduler {
    /// Create a scheduler at virtual time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// True if `id` is armed.
    pub fn is_armed(&self, id: TimerId) -> bool {
        self.armed.contains_key(&id)
    }

    /// Interval of an armed timer.
    pub fn interval_of(&self, id: TimerId) -> Option<Duration> {
        self.armed.get(&id).map(|t| t.interval)
    }

    /// Intervals of every timer ever armed, in arming order.
    pub fn arm_history(&self) -> &[Duration] {
        &self.history
    }

    /// Advance the clock by `by` and collect due ticks.
    ///
    /// Timers cancelled between calls never appear. Ticks are ordered by due
    /// time, ties broken by id.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerId> {
        let target = self.now + by;
        let mut due = Vec::new();
        for (&id, timer) in self.armed.iter_mut() {
            if timer.interval.is_zero() {
                continue;
            }
            while timer.next_due <= target {
                due.push((timer.next_due, id));
                timer.next_due += timer.interval;
            }
        }
        self.now = target;
        due.sort();
        due.into_iter().map(|(_, id)| id).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn arm_repeating(&mut self, interval: Duration) -> FlipbookResult<TimerId> {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.armed.insert(
            id,
            ArmedTimer {
                interval,
                next_due: self.now.saturating_add(interval),
            },
        );
        self.history.push(interval);
        Ok(id)
    }

    fn cancel(&mut self, id: TimerId) {
        self.armed.remove(&id);
    }

    fn armed_count(&self) -> usize {
        self.armed.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/manual.rs"]
mod tests;
