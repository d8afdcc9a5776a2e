use crate::foundation::error::FlipbookResult;
use crate::frames::payload::FramePayload;

pub(crate) mod png;

/// Emitted on every cursor change.
#[derive(Clone, Copy, Debug)]
pub struct DisplayUpdate<'a> {
    /// Zero-based index of the frame to show.
    pub frame_index: usize,
    /// Number of frames in the loaded set.
    pub frame_count: usize,
    /// Payload at `frame_index`.
    pub payload: &'a FramePayload,
}

impl DisplayUpdate<'_> {
    /// One-based counter text, e.g. `"1 / 3"`.
    pub fn counter_label(&self) -> String {
        format!("{} / {}", self.frame_index + 1, self.frame_count)
    }

    /// Upper bound for a progress slider over this set.
    pub fn slider_max(&self) -> usize {
        self.frame_count.saturating_sub(1)
    }
}

/// Severity of a user-visible notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Informational, e.g. "no animation data".
    Warning,
    /// A request failed.
    Error,
}

/// Message shown in place of playback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Text shown to the user.
    pub text: String,
}

impl Notice {
    /// Build a warning notice.
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            text: text.into(),
        }
    }

    /// Build an error notice.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Title block shown next to a loaded animation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationDetails {
    /// Title, "Animation" when the service sent none.
    pub title: String,
    /// Free-form description, possibly empty.
    pub description: String,
    /// Total frames.
    pub frame_count: usize,
}

/// Presentation side of playback.
///
/// The controller only reports what changed; implementations own every visual
/// detail (image painting, counter text, slider bounds).
pub trait FrameRenderer {
    /// Show the frame described by `update`.
    fn show_frame(&mut self, update: &DisplayUpdate<'_>) -> FlipbookResult<()>;

    /// Show a notice instead of playback.
    fn show_notice(&mut self, notice: &Notice);

    /// Show the title block for a freshly loaded animation.
    fn show_details(&mut self, _details: &AnimationDetails) {}

    /// Reset presentation before a new request.
    fn clear(&mut self) {}
}

impl<R: FrameRenderer + ?Sized> FrameRenderer for Box<R> {
    fn show_frame(&mut self, update: &DisplayUpdate<'_>) -> FlipbookResult<()> {
        (**self).show_frame(update)
    }

    fn show_notice(&mut self, notice: &Notice) {
        (**self).show_notice(notice)
    }

    fn show_details(&mut self, details: &AnimationDetails) {
        (**self).show_details(details)
    }

    fn clear(&mut self) {
        (**self).clear()
    }
}

/// One call observed by a [`RecordingRenderer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderEvent {
    /// `show_frame` with index, count and the payload's source string.
    Frame {
        /// Frame index.
        index: usize,
        /// Frame count.
        count: usize,
        /// Payload source string.
        src: String,
    },
    /// `show_notice`.
    Notice(Notice),
    /// `show_details`.
    Details(AnimationDetails),
    /// `clear`.
    Cleared,
}

/// In-memory renderer for tests and debugging.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    events: Vec<RenderEvent>,
}

impl RecordingRenderer {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every observed call, in order.
    pub fn events(&self) -> &[RenderEvent] {
        &self.events
    }

    /// Indices of every shown frame, in order.
    pub fn frame_indices(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RenderEvent::Frame { index, .. } => Some(*index),
                _ => None,
            })
            .collect()
    }

    /// Notices shown so far.
    pub fn notices(&self) -> Vec<&Notice> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RenderEvent::Notice(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded events.
    pub fn reset(&mut self) {
        self.events.clear();
    }
}

impl FrameRenderer for RecordingRenderer {
    fn show_frame(&mut self, update: &DisplayUpdate<'_>) -> FlipbookResult<()> {
        self.events.push(RenderEvent::Frame {
            index: update.frame_index,
            count: update.frame_count,
            src: update.payload.to_src(),
        });
        Ok(())
    }

    fn show_notice(&mut self, notice: &Notice) {
        self.events.push(RenderEvent::Notice(notice.clone()));
    }

    fn show_details(&mut self, details: &AnimationDetails) {
        self.events.push(RenderEvent::Details(details.clone()));
    }

    fn clear(&mut self) {
        self.events.push(RenderEvent::Cleared);
    }
}

/// Renderer that reports through `tracing` only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRenderer;

impl FrameRenderer for LogRenderer {
    fn show_frame(&mut self, update: &DisplayUpdate<'_>) -> FlipbookResult<()> {
        tracing::info!(frame = %update.counter_label(), payload = ?update.payload, "frame");
        Ok(())
    }

    fn show_notice(&mut self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Warning => tracing::warn!("{}", notice.text),
            NoticeLevel::Error => tracing::error!("{}", notice.text),
        }
    }

    fn show_details(&mut self, details: &AnimationDetails) {
        tracing::info!(
            title = %details.title,
            frames = details.frame_count,
            "{}",
            details.description
        );
    }
}

#[cfg(test)]
#[path = "../tests/unit/render.rs"]
mod tests;
