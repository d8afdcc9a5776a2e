use crate::config::PlayerConfig;
use crate::controller::{PlaybackController, PlaybackState};
use crate::foundation::error::{FlipbookError, FlipbookResult};
use crate::render::{AnimationDetails, FrameRenderer, Notice};
use crate::schedule::Scheduler;
use crate::source::{AnimationRequest, AnimationSource};

const NO_FRAMES: &str = "No animation frames received.";
const NO_FRAMES_HINT: &str = "Try a different animation type or check the logs for errors.";

/// One animation view: a fetch source wired to a playback controller.
///
/// Each request tears down the previous playback before fetching, so a panel
/// never has two live playbacks.
pub struct AnimationPanel<A: AnimationSource, S: Scheduler, R: FrameRenderer> {
    source: A,
    controller: PlaybackController<S, R>,
    autoplay: bool,
}

impl<A: AnimationSource, S: Scheduler, R: FrameRenderer> AnimationPanel<A, S, R> {
    /// Build a panel around an existing controller.
    pub fn new(source: A, controller: PlaybackController<S, R>) -> Self {
        Self {
            source,
            controller,
            autoplay: true,
        }
    }

    /// Build a panel using rate limits and autoplay from `cfg`.
    ///
    /// Fails with [`FlipbookError::Validation`] when `cfg.rate` is unusable.
    pub fn from_config(
        cfg: &PlayerConfig,
        source: A,
        scheduler: S,
        renderer: R,
    ) -> FlipbookResult<Self> {
        let controller = PlaybackController::with_limits(scheduler, renderer, cfg.rate)?;
        Ok(Self::new(source, controller).with_autoplay(cfg.autoplay))
    }

    /// Whether playback starts right after a successful load.
    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    /// Borrow the controller.
    pub fn controller(&self) -> &PlaybackController<S, R> {
        &self.controller
    }

    /// Mutably borrow the controller for transport controls.
    pub fn controller_mut(&mut self) -> &mut PlaybackController<S, R> {
        &mut self.controller
    }

    /// Borrow the source.
    pub fn source(&self) -> &A {
        &self.source
    }

    /// Fetch an animation and load it.
    ///
    /// Failures are shown to the renderer as notices and also returned. A
    /// response without frames yields [`FlipbookError::EmptyFrameSet`] and
    /// leaves the panel with nothing loaded.
    #[tracing::instrument(skip(self))]
    pub fn request(&mut self, request: &AnimationRequest) -> FlipbookResult<&PlaybackState> {
        self.controller.discard();
        self.controller.renderer_mut().clear();

        let resp = match self.source.fetch(request) {
            Ok(resp) => resp,
            Err(e) => {
                self.controller
                    .renderer_mut()
                    .show_notice(&Notice::error(e.to_string()));
                return Err(e);
            }
        };

        if !resp.has_frames() {
            let detail = resp.message.as_deref().unwrap_or(NO_FRAMES_HINT);
            self.controller
                .renderer_mut()
                .show_notice(&Notice::warning(format!("{NO_FRAMES} {detail}")));
            return Err(FlipbookError::EmptyFrameSet);
        }

        let frames = resp.frame_set();
        self.controller.renderer_mut().show_details(&AnimationDetails {
            title: resp.display_title().to_string(),
            description: resp.description.clone().unwrap_or_default(),
            frame_count: frames.len(),
        });

        self.controller.set_rate(request.speed)?;
        self.controller.load(frames)?;
        if self.autoplay {
            self.controller.play()?;
        }
        self.controller.state().ok_or(FlipbookError::NotLoaded)
    }

    /// Drop the current playback, e.g. when the view goes away.
    pub fn close(&mut self) {
        self.controller.discard();
    }
}

#[cfg(test)]
#[path = "../tests/unit/panel.rs"]
mod tests;
