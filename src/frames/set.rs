use std::sync::Arc;

use crate::frames::payload::FramePayload;

/// Ordered, immutable frames from one fetch response.
///
/// Clones share storage. A set is never edited in place; a new fetch produces a
/// new set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameSet {
    frames: Arc<[FramePayload]>,
}

impl FrameSet {
    /// Build a set from already-classified payloads.
    pub fn new(frames: impl Into<Vec<FramePayload>>) -> Self {
        let frames: Vec<FramePayload> = frames.into();
        Self {
            frames: frames.into(),
        }
    }

    /// Build a set from the raw strings of a fetch response.
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            frames: raw
                .into_iter()
                .map(|s| FramePayload::parse(s.as_ref()))
                .collect(),
        }
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True if the set holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&FramePayload> {
        self.frames.get(index)
    }

    /// Iterate frames in order.
    pub fn iter(&self) -> std::slice::Iter<'_, FramePayload> {
        self.frames.iter()
    }

    /// Borrow all frames.
    pub fn as_slice(&self) -> &[FramePayload] {
        &self.frames
    }
}

impl FromIterator<FramePayload> for FrameSet {
    fn from_iter<T: IntoIterator<Item = FramePayload>>(iter: T) -> Self {
        Self {
            frames: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FrameSet {
    type Item = &'a FramePayload;
    type IntoIter = std::slice::Iter<'a, FramePayload>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
