use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};

use crate::controller::PlaybackController;
use crate::foundation::core::interval_millis;
use crate::foundation::error::FlipbookResult;
use crate::render::FrameRenderer;
use crate::schedule::{Scheduler, TimerId};

/// When [`drive`] returns. Unset limits are ignored; playback stopping always
/// ends the loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StopWhen {
    /// Stop after this many applied frame advances.
    pub advances: Option<u64>,
    /// Stop after this much wall-clock time.
    pub elapsed: Option<Duration>,
}

impl StopWhen {
    /// Stop after `n` advances.
    pub fn after_advances(n: u64) -> Self {
        Self {
            advances: Some(n),
            elapsed: None,
        }
    }

    /// Stop after `d` of wall-clock time.
    pub fn after(d: Duration) -> Self {
        Self {
            advances: None,
            elapsed: Some(d),
        }
    }
}

/// Summary of one [`drive`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DriveReport {
    /// Ticks that advanced the cursor.
    pub advances: u64,
    /// Ticks dropped by the liveness check.
    pub stale: u64,
}

/// Feed ticks from `ticks` into `controller` until `stop` holds.
///
/// This is the single-threaded event loop for a thread-backed scheduler; the
/// controller never leaves the calling thread.
pub fn drive<S: Scheduler, R: FrameRenderer>(
    controller: &mut PlaybackController<S, R>,
    ticks: &Receiver<TimerId>,
    stop: StopWhen,
) -> FlipbookResult<DriveReport> {
    let started = Instant::now();
    let deadline = stop.elapsed.map(|d| started + d);
    let mut report = DriveReport::default();

    loop {
        if !controller.is_running() {
            break;
        }
        if stop.advances.is_some_and(|n| report.advances >= n) {
            break;
        }

        let received = match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                ticks.recv_timeout(deadline - now)
            }
            None => ticks.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(id) => {
                if controller.tick(id)? {
                    report.advances += 1;
                } else {
                    report.stale += 1;
                }
            }
            Err(RecvTimeoutError::Timeout) => break,
            Err(RecvTimeoutError::Disconnected) => {
                tracing::warn!("tick channel disconnected");
                break;
            }
        }
    }

    tracing::debug!(
        advances = report.advances,
        stale = report.stale,
        elapsed_ms = interval_millis(started.elapsed()),
        "drive finished"
    );
    Ok(report)
}
