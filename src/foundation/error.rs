/// Convenience result type used across flipbook.
pub type FlipbookResult<T> = Result<T, FlipbookError>;

/// Top-level error taxonomy used by playback, fetch and render APIs.
#[derive(thiserror::Error, Debug)]
pub enum FlipbookError {
    /// A fetch succeeded but produced zero frames.
    #[error("no animation data: frame set is empty")]
    EmptyFrameSet,

    /// A seek targeted a frame outside `[0, len)`.
    #[error("index error: frame {index} is out of range for {len} frames")]
    IndexOutOfRange {
        /// Requested frame index.
        index: i64,
        /// Number of frames in the loaded set.
        len: usize,
    },

    /// A playback operation was issued with nothing loaded.
    #[error("playback error: no frame set is loaded")]
    NotLoaded,

    /// Invalid user-provided configuration or request data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Transport or status failure while fetching an animation.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// A frame payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlipbookError {
    /// Build a [`FlipbookError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FlipbookError::Fetch`] value.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Build a [`FlipbookError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`FlipbookError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for errors that should be shown to the user as a "no data" notice
    /// rather than as a failure.
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::EmptyFrameSet)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
