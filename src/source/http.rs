use std::time::Duration;

use crate::foundation::error::{FlipbookError, FlipbookResult};
use crate::frames::payload::FramePayload;
use crate::source::{AnimationRequest, AnimationResponse, AnimationSource};

/// Options for [`HttpAnimationSource`].
#[derive(Clone, Debug)]
pub struct HttpSourceOpts {
    /// Base URL of the service, e.g. `http://127.0.0.1:5000`.
    pub endpoint: String,
    /// Path of the animation route.
    pub api_path: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Download URL frames and replace them with inline data.
    pub inline_remote_frames: bool,
}

impl HttpSourceOpts {
    /// Options for `endpoint` with the default route and a 30 s timeout.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_path: "/api/animation".to_string(),
            timeout: Duration::from_secs(30),
            inline_remote_frames: false,
        }
    }
}

/// Fetches animations with a blocking GET against the service.
#[derive(Clone, Debug)]
pub struct HttpAnimationSource {
    opts: HttpSourceOpts,
    client: reqwest::blocking::Client,
}

impl HttpAnimationSource {
    /// Build a source with its own HTTP client.
    pub fn new(opts: HttpSourceOpts) -> FlipbookResult<Self> {
        if opts.endpoint.trim().is_empty() {
            return Err(FlipbookError::validation("endpoint must not be empty"));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(opts.timeout)
            .build()
            .map_err(|e| FlipbookError::fetch(format!("build http client: {e}")))?;
        Ok(Self { opts, client })
    }

    /// Full URL of the animation route.
    pub fn api_url(&self) -> String {
        self.resolve(&self.opts.api_path)
    }

    fn resolve(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.opts.endpoint.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    fn get_bytes(&self, url: &str, query: Option<&[(&str, String)]>) -> FlipbookResult<Vec<u8>> {
        let mut req = self.client.get(url);
        if let Some(q) = query {
            req = req.query(q);
        }
        let resp = req
            .send()
            .map_err(|e| FlipbookError::fetch(format!("GET {url}: {e}")))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FlipbookError::fetch(format!("GET {url} returned {status}")));
        }
        let body = resp
            .bytes()
            .map_err(|e| FlipbookError::fetch(format!("read body of {url}: {e}")))?;
        Ok(body.to_vec())
    }

    fn inline_frames(&self, resp: &mut AnimationResponse) -> FlipbookResult<()> {
        let Some(frames) = resp.frames.as_mut() else {
            return Ok(());
        };
        for raw in frames.iter_mut() {
            if let FramePayload::Url(url) = FramePayload::parse(raw) {
                let bytes = self.get_bytes(&self.resolve(&url), None)?;
                *raw = String::from(FramePayload::from_png_bytes(&bytes));
            }
        }
        Ok(())
    }
}

impl AnimationSource for HttpAnimationSource {
    #[tracing::instrument(skip(self), fields(endpoint = %self.opts.endpoint))]
    fn fetch(&self, request: &AnimationRequest) -> FlipbookResult<AnimationResponse> {
        request.validate()?;
        if !request.is_known_type() {
            tracing::warn!(
                animation_type = %request.animation_type,
                "unknown animation type; the service will fall back to pendulum"
            );
        }

        let url = self.api_url();
        let query = request.query_pairs();
        let body = self.get_bytes(&url, Some(&query[..]))?;
        let mut resp = AnimationResponse::from_json(&body)?;
        tracing::debug!(
            frames = resp.frames.as_ref().map_or(0, Vec::len),
            status = ?resp.status,
            "animation response"
        );

        if self.opts.inline_remote_frames {
            self.inline_frames(&mut resp)?;
        }
        Ok(resp)
    }
}
