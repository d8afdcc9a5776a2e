use std::time::Duration;

use crate::foundation::core::{RateLimits, interval_millis};
use crate::foundation::error::{FlipbookError, FlipbookResult};
use crate::frames::set::FrameSet;
use crate::render::{DisplayUpdate, FrameRenderer};
use crate::schedule::{Scheduler, TimerId};

/// Cursor and timer state for one loaded [`FrameSet`].
#[derive(Clone, Debug)]
pub struct PlaybackState {
    frames: FrameSet,
    cursor: usize,
    timer: Option<TimerId>,
    interval: Duration,
}

impl PlaybackState {
    /// Loaded frames.
    pub fn frames(&self) -> &FrameSet {
        &self.frames
    }

    /// Index of the frame on display. Always `< frames().len()`.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// True iff a repeating timer is armed.
    pub fn running(&self) -> bool {
        self.timer.is_some()
    }

    /// Id of the armed timer, if running.
    pub fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    /// Interval between automatic advances.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// [`Self::interval`] in whole milliseconds.
    pub fn interval_millis(&self) -> u64 {
        interval_millis(self.interval)
    }
}

/// Play/pause/seek transport over a list of frames.
///
/// At most one [`PlaybackState`] is alive at a time and at most one timer is
/// armed for it. Ticks are accepted only from that timer.
pub struct PlaybackController<S: Scheduler, R: FrameRenderer> {
    scheduler: S,
    renderer: R,
    limits: RateLimits,
    speed: f64,
    state: Option<PlaybackState>,
}

impl<S: Scheduler, R: FrameRenderer> PlaybackController<S, R> {
    /// Create a controller with default rate limits and speed 1.
    pub fn new(scheduler: S, renderer: R) -> Self {
        Self {
            scheduler,
            renderer,
            limits: RateLimits::default(),
            speed: 1.0,
            state: None,
        }
    }

    /// Create a controller with explicit rate limits.
    ///
    /// The limits are validated first; see [`RateLimits::validate`].
    pub fn with_limits(scheduler: S, renderer: R, limits: RateLimits) -> FlipbookResult<Self> {
        limits.validate()?;
        let mut controller = Self::new(scheduler, renderer);
        controller.limits = limits;
        Ok(controller)
    }

    /// Live playback state, if any.
    pub fn state(&self) -> Option<&PlaybackState> {
        self.state.as_ref()
    }

    /// True if a frame set is loaded and its timer is armed.
    pub fn is_running(&self) -> bool {
        self.state.as_ref().is_some_and(PlaybackState::running)
    }

    /// Requested speed factor (before clamping).
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Interval the current speed maps to.
    pub fn interval(&self) -> Duration {
        self.limits.interval_for(self.speed)
    }

    /// Borrow the scheduler.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Mutably borrow the scheduler.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Borrow the renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutably borrow the renderer.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Replace any loaded frames with `frames` and show frame 0, stopped.
    ///
    /// An empty set fails with [`FlipbookError::EmptyFrameSet`]; the previous
    /// state is discarded either way.
    pub fn load(&mut self, frames: FrameSet) -> FlipbookResult<&PlaybackState> {
        self.discard();
        if frames.is_empty() {
            return Err(FlipbookError::EmptyFrameSet);
        }

        let state = PlaybackState {
            frames,
            cursor: 0,
            timer: None,
            interval: self.limits.interval_for(self.speed),
        };
        tracing::info!(
            frames = state.frames.len(),
            interval_ms = state.interval_millis(),
            "loaded frame set"
        );
        let state = self.state.insert(state);
        emit(&mut self.renderer, state)?;
        Ok(state)
    }

    /// Start (or restart) automatic advance at the current interval.
    ///
    /// The cursor is not moved. Any timer armed earlier for this state is
    /// cancelled first, so exactly one remains.
    pub fn play(&mut self) -> FlipbookResult<()> {
        let state = self.state.as_mut().ok_or(FlipbookError::NotLoaded)?;
        if let Some(old) = state.timer.take() {
            self.scheduler.cancel(old);
        }
        // On failure the old timer is already gone, so the state stays stopped.
        let id = self.scheduler.arm_repeating(state.interval)?;
        state.timer = Some(id);
        tracing::info!(
            timer = id.0,
            cursor = state.cursor,
            interval_ms = state.interval_millis(),
            "play"
        );
        Ok(())
    }

    /// Stop automatic advance. No-op when stopped or nothing is loaded.
    pub fn pause(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if let Some(id) = state.timer.take() {
            self.scheduler.cancel(id);
            tracing::info!(timer = id.0, cursor = state.cursor, "pause");
        }
    }

    /// Stop playback and show frame `index`.
    ///
    /// Out-of-range indices are rejected, never clamped, and leave playback
    /// untouched.
    pub fn seek(&mut self, index: i64) -> FlipbookResult<()> {
        let state = self.state.as_ref().ok_or(FlipbookError::NotLoaded)?;
        let len = state.frames.len();
        let cursor = usize::try_from(index)
            .ok()
            .filter(|&i| i < len)
            .ok_or(FlipbookError::IndexOutOfRange { index, len })?;

        self.pause();
        let Some(state) = self.state.as_mut() else {
            return Err(FlipbookError::NotLoaded);
        };
        state.cursor = cursor;
        tracing::debug!(cursor, "seek");
        emit(&mut self.renderer, state)
    }

    /// Set the speed factor; re-arms the timer when running.
    pub fn set_rate(&mut self, speed: f64) -> FlipbookResult<()> {
        self.speed = speed;
        let interval = self.limits.interval_for(speed);
        let Some(state) = self.state.as_mut() else {
            return Ok(());
        };
        state.interval = interval;
        tracing::debug!(speed, interval_ms = interval_millis(interval), "rate");
        if state.running() {
            self.pause();
            self.play()?;
        }
        Ok(())
    }

    /// Deliver one timer tick.
    ///
    /// Returns `Ok(false)` and does nothing unless `id` is the timer armed for
    /// the live state.
    pub fn tick(&mut self, id: TimerId) -> FlipbookResult<bool> {
        let Some(state) = self.state.as_mut() else {
            tracing::trace!(timer = id.0, "tick with nothing loaded");
            return Ok(false);
        };
        if state.timer != Some(id) {
            tracing::trace!(timer = id.0, "stale tick");
            return Ok(false);
        }
        state.cursor = (state.cursor + 1) % state.frames.len();
        tracing::debug!(cursor = state.cursor, "tick");
        emit(&mut self.renderer, state)?;
        Ok(true)
    }

    /// Cancel the timer and drop the loaded frames.
    pub fn discard(&mut self) {
        if let Some(state) = self.state.take() {
            if let Some(id) = state.timer {
                self.scheduler.cancel(id);
            }
            tracing::debug!(frames = state.frames.len(), "discarded playback");
        }
    }
}

impl<S: Scheduler, R: FrameRenderer> Drop for PlaybackController<S, R> {
    fn drop(&mut self) {
        self.discard();
    }
}

fn emit<R: FrameRenderer>(renderer: &mut R, state: &PlaybackState) -> FlipbookResult<()> {
    let Some(payload) = state.frames.get(state.cursor) else {
        return Err(FlipbookError::IndexOutOfRange {
            index: state.cursor as i64,
            len: state.frames.len(),
        });
    };
    renderer.show_frame(&DisplayUpdate {
        frame_index: state.cursor,
        frame_count: state.frames.len(),
        payload,
    })
}

#[cfg(test)]
#[path = "../tests/unit/controller.rs"]
mod tests;
