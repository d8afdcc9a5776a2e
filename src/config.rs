use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use anyhow::Context as _;

use crate::foundation::core::RateLimits;
use crate::foundation::error::{FlipbookError, FlipbookResult};
use crate::source::AnimationRequest;
use crate::source::http::HttpSourceOpts;

/// Player settings, usually loaded from a JSON file.
///
/// Every field has a default, so a partial (or empty) object is valid.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Base URL of the computation service.
    pub endpoint: String,
    /// Route of the animation endpoint.
    pub api_path: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Playback rate bounds.
    pub rate: RateLimits,
    /// Start playing as soon as frames are loaded.
    pub autoplay: bool,
    /// Replace URL frames with downloaded inline data.
    pub inline_remote_frames: bool,
    /// Request used when the caller does not specify one.
    pub request: AnimationRequest,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000".to_string(),
            api_path: "/api/animation".to_string(),
            timeout_secs: 30,
            rate: RateLimits::default(),
            autoplay: true,
            inline_remote_frames: false,
            request: AnimationRequest::default(),
        }
    }
}

impl PlayerConfig {
    /// Load and validate a config file.
    pub fn from_path(path: &Path) -> FlipbookResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| FlipbookError::serde(format!("parse config '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate config JSON text.
    pub fn from_json_str(s: &str) -> FlipbookResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| FlipbookError::serde(format!("parse config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> FlipbookResult<()> {
        self.rate.validate()?;
        if self.endpoint.trim().is_empty() {
            return Err(FlipbookError::validation("endpoint must not be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(FlipbookError::validation("timeout_secs must be > 0"));
        }
        self.request.validate()
    }

    /// Options for an HTTP source built from this config.
    pub fn http_opts(&self) -> HttpSourceOpts {
        HttpSourceOpts {
            endpoint: self.endpoint.clone(),
            api_path: self.api_path.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            inline_remote_frames: self.inline_remote_frames,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
