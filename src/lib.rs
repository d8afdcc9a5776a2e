//! flipbook plays back animations produced by a remote computation service.
//!
//! The service renders an animation (pendulum, wave, lissajous, ...) into a list
//! of image frames. flipbook fetches that list once and steps through it on a
//! timer.
//!
//! # Pieces
//!
//! 1. **Fetch**: an [`AnimationSource`] turns an [`AnimationRequest`] into an
//!    [`AnimationResponse`] (HTTP, saved JSON, or a fixed value).
//! 2. **Load**: the response frames become an immutable [`FrameSet`].
//! 3. **Play**: a [`PlaybackController`] owns the cursor and one repeating timer
//!    from a [`Scheduler`], and reports every cursor change to a
//!    [`FrameRenderer`].
//! 4. **Drive**: with a [`ThreadScheduler`], [`drive`] runs the single-threaded
//!    loop that feeds timer ticks back into the controller.
//!
//! [`AnimationPanel`] wires fetch, load and play together the way an animation
//! view does, including the "no data" notice for empty responses.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod controller;
mod driver;
mod foundation;
mod frames;
mod panel;
mod render;
mod schedule;
mod source;

pub use config::PlayerConfig;
pub use controller::{PlaybackController, PlaybackState};
pub use driver::{DriveReport, StopWhen, drive};
pub use foundation::core::{RateLimits, interval_millis};
pub use foundation::error::{FlipbookError, FlipbookResult};
pub use frames::payload::FramePayload;
pub use frames::set::FrameSet;
pub use panel::AnimationPanel;
pub use render::png::{DecodedFrame, PngFileRenderer, decode_frame, ensure_parent_dir};
pub use render::{
    AnimationDetails, DisplayUpdate, FrameRenderer, LogRenderer, Notice, NoticeLevel,
    RecordingRenderer, RenderEvent,
};
pub use schedule::manual::ManualScheduler;
pub use schedule::thread::ThreadScheduler;
pub use schedule::{Scheduler, TimerId};
pub use source::http::{HttpAnimationSource, HttpSourceOpts};
pub use source::{
    AnimationRequest, AnimationResponse, AnimationSource, JsonFileSource, KNOWN_ANIMATION_TYPES,
    StaticSource,
};
