use std::time::Duration;

use crate::foundation::error::{FlipbookError, FlipbookResult};

/// Inclusive bounds on playback rate, in frame advances per second.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RateLimits {
    /// Slowest allowed rate (must be > 0).
    pub min_fps: f64,
    /// Fastest allowed rate (must be >= `min_fps`).
    pub max_fps: f64,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            min_fps: 1.0,
            max_fps: 10.0,
        }
    }
}

impl RateLimits {
    /// Build validated limits.
    pub fn new(min_fps: f64, max_fps: f64) -> FlipbookResult<Self> {
        let limits = Self { min_fps, max_fps };
        limits.validate()?;
        Ok(limits)
    }

    /// Reject non-finite, non-positive or inverted bounds.
    ///
    /// `min_fps` must also be large enough for its interval to fit a
    /// [`Duration`].
    pub fn validate(&self) -> FlipbookResult<()> {
        if !self.min_fps.is_finite() || !self.max_fps.is_finite() {
            return Err(FlipbookError::validation("rate limits must be finite"));
        }
        if self.min_fps <= 0.0 {
            return Err(FlipbookError::validation("rate min_fps must be > 0"));
        }
        if Duration::try_from_secs_f64(1.0 / self.min_fps).is_err() {
            return Err(FlipbookError::validation(format!(
                "rate min_fps {} is too small for a timer interval",
                self.min_fps
            )));
        }
        if self.min_fps > self.max_fps {
            return Err(FlipbookError::validation(
                "rate min_fps must be <= max_fps",
            ));
        }
        Ok(())
    }

    /// Clamp a requested speed factor into these bounds.
    ///
    /// Non-finite and non-positive speeds fall back to the minimum rate.
    /// Never panics, even on limits that fail [`Self::validate`].
    pub fn clamp(&self, speed: f64) -> f64 {
        if !speed.is_finite() || speed <= 0.0 {
            return self.min_fps;
        }
        speed.min(self.max_fps).max(self.min_fps)
    }

    /// Timer interval for a requested speed factor.
    ///
    /// Rates too slow to represent saturate at [`Duration::MAX`]; rates that
    /// are not usable at all (zero, negative, NaN) do too.
    pub fn interval_for(&self, speed: f64) -> Duration {
        let rate = self.clamp(speed);
        if rate.is_nan() || rate <= 0.0 {
            return Duration::MAX;
        }
        Duration::try_from_secs_f64(1.0 / rate).unwrap_or(Duration::MAX)
    }
}

/// Whole milliseconds of an interval, as shown to users and logged.
pub fn interval_millis(interval: Duration) -> u64 {
    u64::try_from(interval.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
