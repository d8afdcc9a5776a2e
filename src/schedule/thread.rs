use std::collections::HashMap;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Context as _;
use crossbeam_channel::{Receiver, Sender, select};

use crate::foundation::error::FlipbookResult;
use crate::schedule::{Scheduler, TimerId};

struct Worker {
    // Dropping the sender disconnects the worker's stop channel.
    stop: Sender<()>,
    handle: JoinHandle<()>,
}

/// Scheduler that runs one worker thread per armed timer.
///
/// Workers push their [`TimerId`] onto a shared channel every interval. The
/// receiving side is single-threaded; see [`ThreadScheduler::ticks`].
pub struct ThreadScheduler {
    next_id: u64,
    tick_tx: Sender<TimerId>,
    tick_rx: Receiver<TimerId>,
    workers: HashMap<TimerId, Worker>,
}

impl ThreadScheduler {
    /// Create a scheduler with no armed timers.
    pub fn new() -> Self {
        let (tick_tx, tick_rx) = crossbeam_channel::unbounded();
        Self {
            next_id: 0,
            tick_tx,
            tick_rx,
            workers: HashMap::new(),
        }
    }

    /// Receiver of ticks from every timer this scheduler arms.
    ///
    /// Ticks already queued when a timer is cancelled stay in the channel;
    /// consumers drop them by comparing against the currently armed id.
    pub fn ticks(&self) -> Receiver<TimerId> {
        self.tick_rx.clone()
    }
}

impl Default for ThreadScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ThreadScheduler {
    fn arm_repeating(&mut self, interval: Duration) -> FlipbookResult<TimerId> {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let (stop, stop_rx) = crossbeam_channel::bounded::<()>(0);
        let tx = self.tick_tx.clone();
        let handle = std::thread::Builder::new()
            .name(format!("flipbook-timer-{}", id.0))
            .spawn(move || {
                let ticker = crossbeam_channel::tick(interval);
                loop {
                    select! {
                        recv(stop_rx) -> _ => break,
                        recv(ticker) -> _ => {
                            if tx.send(id).is_err() {
                                break;
                            }
                        }
                    }
                }
            })
            .with_context(|| format!("spawn thread for timer {}", id.0))?;

        self.workers.insert(id, Worker { stop, handle });
        Ok(id)
    }

    fn cancel(&mut self, id: TimerId) {
        let Some(worker) = self.workers.remove(&id) else {
            return;
        };
        drop(worker.stop);
        // The worker wakes on disconnect, so this join returns promptly and no
        // further ticks for `id` are sent afterwards.
        if worker.handle.join().is_err() {
            tracing::warn!(timer = id.0, "timer thread panicked");
        }
    }

    fn armed_count(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for ThreadScheduler {
    fn drop(&mut self) {
        let ids: Vec<TimerId> = self.workers.keys().copied().collect();
        for id in ids {
            self.cancel(id);
        }
    }
}
