use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{FlipbookError, FlipbookResult};
use crate::frames::set::FrameSet;

pub(crate) mod http;

/// Animation types the computation service knows how to generate.
///
/// The service substitutes `pendulum` for anything else; requests still carry
/// the type string unchanged.
pub const KNOWN_ANIMATION_TYPES: [&str; 5] = ["pendulum", "wave", "lissajous", "spiral", "orbit"];

/// Parameters of one animation request.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationRequest {
    /// Name of the animation to generate.
    pub animation_type: String,
    /// Number of frames to generate.
    pub frame_count: u32,
    /// Requested playback speed factor.
    pub speed: f64,
}

impl Default for AnimationRequest {
    fn default() -> Self {
        Self {
            animation_type: "pendulum".to_string(),
            frame_count: 20,
            speed: 1.0,
        }
    }
}

impl AnimationRequest {
    /// Build a request.
    pub fn new(animation_type: impl Into<String>, frame_count: u32, speed: f64) -> Self {
        Self {
            animation_type: animation_type.into(),
            frame_count,
            speed,
        }
    }

    /// Reject requests the service cannot satisfy.
    pub fn validate(&self) -> FlipbookResult<()> {
        if self.animation_type.trim().is_empty() {
            return Err(FlipbookError::validation("animation_type must not be empty"));
        }
        if self.frame_count == 0 {
            return Err(FlipbookError::validation("frame_count must be > 0"));
        }
        if !self.speed.is_finite() {
            return Err(FlipbookError::validation("speed must be finite"));
        }
        Ok(())
    }

    /// True if the service will honour the type instead of falling back.
    pub fn is_known_type(&self) -> bool {
        KNOWN_ANIMATION_TYPES.contains(&self.animation_type.to_lowercase().as_str())
    }

    /// Query-string pairs in the order the service expects.
    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("animation_type", self.animation_type.clone()),
            ("num_frames", self.frame_count.to_string()),
            ("speed", self.speed.to_string()),
        ]
    }
}

/// JSON body returned by the animation endpoint.
///
/// Successful responses carry `frames`; failures carry `status: "error"` and a
/// `message`. Either way the HTTP status is usually 200.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationResponse {
    /// Raw frame strings (base64 or paths).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frames: Option<Vec<String>>,
    /// Preview frame.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Display title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Display description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `"error"` on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Human-readable explanation, mainly on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AnimationResponse {
    /// Response carrying `frames` with a title.
    pub fn with_frames(title: impl Into<String>, frames: Vec<String>) -> Self {
        Self {
            frames: Some(frames),
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Parse a response body.
    pub fn from_json(bytes: &[u8]) -> FlipbookResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| FlipbookError::serde(format!("parse animation response: {e}")))
    }

    /// Frames as a [`FrameSet`]; absent frames give an empty set.
    pub fn frame_set(&self) -> FrameSet {
        match &self.frames {
            Some(frames) => FrameSet::from_raw(frames),
            None => FrameSet::default(),
        }
    }

    /// True if there is at least one frame.
    pub fn has_frames(&self) -> bool {
        self.frames.as_ref().is_some_and(|f| !f.is_empty())
    }

    /// True if the service reported a failure.
    pub fn is_error(&self) -> bool {
        self.status.as_deref() == Some("error")
    }

    /// Title, "Animation" when absent or blank.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(t) if !t.trim().is_empty() => t,
            _ => "Animation",
        }
    }
}

/// Fetch side of playback: turns a request into frames.
///
/// Implementations perform exactly one attempt per call; there is no retry.
pub trait AnimationSource {
    /// Fetch one animation.
    fn fetch(&self, request: &AnimationRequest) -> FlipbookResult<AnimationResponse>;
}

impl<A: AnimationSource + ?Sized> AnimationSource for Box<A> {
    fn fetch(&self, request: &AnimationRequest) -> FlipbookResult<AnimationResponse> {
        (**self).fetch(request)
    }
}

/// Source returning a fixed response (or failure) regardless of the request.
#[derive(Clone, Debug)]
pub struct StaticSource {
    outcome: Result<AnimationResponse, String>,
}

impl StaticSource {
    /// Always answer with `response`.
    pub fn new(response: AnimationResponse) -> Self {
        Self {
            outcome: Ok(response),
        }
    }

    /// Always fail with a fetch error carrying `msg`.
    pub fn failing(msg: impl Into<String>) -> Self {
        Self {
            outcome: Err(msg.into()),
        }
    }
}

impl AnimationSource for StaticSource {
    fn fetch(&self, _request: &AnimationRequest) -> FlipbookResult<AnimationResponse> {
        self.outcome.clone().map_err(FlipbookError::fetch)
    }
}

/// Source reading a saved response from a JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Read responses from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AnimationSource for JsonFileSource {
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    fn fetch(&self, request: &AnimationRequest) -> FlipbookResult<AnimationResponse> {
        let f = File::open(&self.path)
            .with_context(|| format!("open animation response '{}'", self.path.display()))?;
        let resp: AnimationResponse = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| FlipbookError::serde(format!("parse '{}': {e}", self.path.display())))?;
        Ok(resp)
    }
}

#[cfg(test)]
#[path = "../tests/unit/source.rs"]
mod tests;
