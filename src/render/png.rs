use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{FlipbookError, FlipbookResult};
use crate::frames::payload::FramePayload;
use crate::render::{AnimationDetails, DisplayUpdate, FrameRenderer, Notice};

/// Decoded frame dimensions and straight RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct DecodedFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8.
    pub rgba8: Vec<u8>,
}

/// Decode an inline payload into RGBA8 pixels.
pub fn decode_frame(payload: &FramePayload) -> FlipbookResult<DecodedFrame> {
    let bytes = payload.decode_bytes()?;
    let img = image::load_from_memory(&bytes)
        .map_err(|e| FlipbookError::decode(format!("decode frame image: {e}")))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedFrame {
        width,
        height,
        rgba8: rgba.into_raw(),
    })
}

/// Renderer that keeps the current frame on disk as a PNG.
///
/// Reference (URL) frames cannot be painted offline and are skipped with a
/// warning.
#[derive(Debug)]
pub struct PngFileRenderer {
    current: PathBuf,
    frames_dir: Option<PathBuf>,
    written: u64,
    last_notice: Option<Notice>,
}

impl PngFileRenderer {
    /// Write the current frame to `current` on every update.
    pub fn new(current: impl Into<PathBuf>) -> Self {
        Self {
            current: current.into(),
            frames_dir: None,
            written: 0,
            last_notice: None,
        }
    }

    /// Also write each shown frame as `frame_NNN.png` under `dir`.
    pub fn with_frames_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.frames_dir = Some(dir.into());
        self
    }

    /// Number of PNG writes of the current frame so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Most recent notice, if any.
    pub fn last_notice(&self) -> Option<&Notice> {
        self.last_notice.as_ref()
    }
}

impl FrameRenderer for PngFileRenderer {
    fn show_frame(&mut self, update: &DisplayUpdate<'_>) -> FlipbookResult<()> {
        if !update.payload.is_inline() {
            tracing::warn!(
                frame = %update.counter_label(),
                src = %update.payload.to_src(),
                "skipping reference frame"
            );
            return Ok(());
        }

        let frame = decode_frame(update.payload)?;
        let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.rgba8)
            .ok_or_else(|| FlipbookError::decode("frame buffer size mismatch"))?;

        write_png(&img, &self.current)?;
        self.written += 1;

        if let Some(dir) = &self.frames_dir {
            let path = dir.join(format!("frame_{:03}.png", update.frame_index));
            write_png(&img, &path)?;
        }

        tracing::debug!(
            frame = %update.counter_label(),
            path = %self.current.display(),
            "wrote frame"
        );
        Ok(())
    }

    fn show_notice(&mut self, notice: &Notice) {
        tracing::warn!("{}", notice.text);
        self.last_notice = Some(notice.clone());
    }

    fn show_details(&mut self, details: &AnimationDetails) {
        tracing::info!(title = %details.title, frames = details.frame_count, "loaded animation");
    }

    fn clear(&mut self) {
        self.last_notice = None;
    }
}

fn write_png(img: &image::RgbaImage, path: &Path) -> FlipbookResult<()> {
    ensure_parent_dir(path)?;
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Create the parent directory of `path` if it does not exist.
pub fn ensure_parent_dir(path: &Path) -> FlipbookResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/png.rs"]
mod tests;
