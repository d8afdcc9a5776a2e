use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::foundation::error::{FlipbookError, FlipbookResult};

const DEFAULT_MIME: &str = "image/png";

/// One opaque frame of an animation, as delivered by the computation service.
///
/// The service answers either with inline base64 image data or with paths to
/// frames it has written under its static directory.
#[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FramePayload {
    /// Base64 image data, without any `data:` prefix.
    Inline {
        /// MIME type taken from a `data:` URI, `image/png` otherwise.
        mime: String,
        /// Base64 text.
        base64: String,
    },
    /// URL or server-relative path of an image.
    Url(String),
}

impl FramePayload {
    /// Classify a raw frame string from a fetch response.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(rest) = raw.strip_prefix("data:") {
            if let Some((meta, data)) = rest.split_once(',') {
                let mime = meta.strip_suffix(";base64").unwrap_or(meta);
                let mime = if mime.is_empty() { DEFAULT_MIME } else { mime };
                return Self::Inline {
                    mime: mime.to_string(),
                    base64: data.to_string(),
                };
            }
        }
        if looks_like_url(raw) {
            return Self::Url(raw.to_string());
        }
        Self::Inline {
            mime: sniff_mime(raw).to_string(),
            base64: raw.to_string(),
        }
    }

    /// Wrap raw image bytes as an inline PNG payload.
    pub fn from_png_bytes(bytes: &[u8]) -> Self {
        Self::Inline {
            mime: DEFAULT_MIME.to_string(),
            base64: STANDARD.encode(bytes),
        }
    }

    /// True if the payload carries its image data.
    pub fn is_inline(&self) -> bool {
        matches!(self, Self::Inline { .. })
    }

    /// Source string a renderer can hand to an image element.
    ///
    /// URLs are passed through verbatim; no cache-busting query is appended.
    pub fn to_src(&self) -> String {
        match self {
            Self::Inline { mime, base64 } => format!("data:{mime};base64,{base64}"),
            Self::Url(url) => url.clone(),
        }
    }

    /// Decode inline image bytes.
    pub fn decode_bytes(&self) -> FlipbookResult<Vec<u8>> {
        match self {
            Self::Inline { base64, .. } => STANDARD
                .decode(base64.trim())
                .map_err(|e| FlipbookError::decode(format!("invalid base64 frame: {e}"))),
            Self::Url(url) => Err(FlipbookError::decode(format!(
                "frame '{url}' is a reference, not inline data"
            ))),
        }
    }
}

// Bare base64 may itself start with '/' (JPEG data is "/9j/..."), so a leading
// slash only means a path when it is a static path or is not valid base64.
fn looks_like_url(raw: &str) -> bool {
    if raw.starts_with("http://")
        || raw.starts_with("https://")
        || raw.starts_with("/static/")
        || raw.starts_with("./")
        || raw.starts_with("../")
    {
        return true;
    }
    raw.starts_with('/') && STANDARD.decode(raw).is_err()
}

fn sniff_mime(base64: &str) -> &'static str {
    if base64.starts_with("/9j/") {
        "image/jpeg"
    } else {
        DEFAULT_MIME
    }
}

impl From<String> for FramePayload {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for FramePayload {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<FramePayload> for String {
    fn from(p: FramePayload) -> Self {
        match p {
            FramePayload::Inline { mime, base64 } if mime == DEFAULT_MIME => base64,
            inline @ FramePayload::Inline { .. } => inline.to_src(),
            FramePayload::Url(url) => url,
        }
    }
}

// Inline payloads are large; keep debug output to a short preview.
impl fmt::Debug for FramePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline { mime, base64 } => {
                let preview: String = base64.chars().take(16).collect();
                write!(f, "Inline({mime}, {} bytes b64, {preview}..)", base64.len())
            }
            Self::Url(url) => write!(f, "Url({url})"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/frames/payload.rs"]
mod tests;
