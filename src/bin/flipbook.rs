use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use flipbook::{
    AnimationPanel, AnimationRequest, AnimationSource, FlipbookError, FrameRenderer,
    HttpAnimationSource, JsonFileSource, LogRenderer, ManualScheduler, PlaybackController,
    PlayerConfig, PngFileRenderer, StopWhen, ThreadScheduler,
};

#[derive(Parser, Debug)]
#[command(name = "flipbook", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Player config JSON.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch an animation from the service and play it.
    Fetch(FetchArgs),
    /// Fetch an animation and save the response JSON.
    Download(DownloadArgs),
    /// Play a saved animation response.
    Play(PlayArgs),
    /// Write one frame of a saved animation response as a PNG.
    Frame(FrameArgs),
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// Service base URL (overrides the config).
    #[arg(long)]
    endpoint: Option<String>,

    /// Animation type, e.g. pendulum, wave, lissajous, spiral, orbit.
    #[arg(long = "type")]
    animation_type: Option<String>,

    /// Number of frames to request.
    #[arg(long)]
    frames: Option<u32>,

    /// Playback speed factor (clamped to the configured rate limits).
    #[arg(long)]
    speed: Option<f64>,
}

#[derive(Args, Debug)]
struct PlaybackArgs {
    /// Stop after this many seconds of playback.
    #[arg(long, default_value_t = 5.0)]
    seconds: f64,

    /// Stop after this many frame advances.
    #[arg(long)]
    advances: Option<u64>,

    /// Keep the current frame in this PNG file (logs only when omitted).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also write every shown frame as frame_NNN.png into this directory.
    #[arg(long)]
    frames_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FetchArgs {
    #[command(flatten)]
    request: RequestArgs,

    #[command(flatten)]
    playback: PlaybackArgs,
}

#[derive(Args, Debug)]
struct DownloadArgs {
    #[command(flatten)]
    request: RequestArgs,

    /// Output JSON path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct PlayArgs {
    /// Saved animation response JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Playback speed factor.
    #[arg(long)]
    speed: Option<f64>,

    #[command(flatten)]
    playback: PlaybackArgs,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Saved animation response JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    index: i64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = match &cli.config {
        Some(path) => PlayerConfig::from_path(path)?,
        None => PlayerConfig::default(),
    };

    match cli.cmd {
        Command::Fetch(args) => cmd_fetch(cfg, args),
        Command::Download(args) => cmd_download(cfg, args),
        Command::Play(args) => cmd_play(cfg, args),
        Command::Frame(args) => cmd_frame(cfg, args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn apply_request_args(cfg: &mut PlayerConfig, args: RequestArgs) -> anyhow::Result<()> {
    if let Some(endpoint) = args.endpoint {
        cfg.endpoint = endpoint;
    }
    if let Some(t) = args.animation_type {
        cfg.request.animation_type = t;
    }
    if let Some(n) = args.frames {
        cfg.request.frame_count = n;
    }
    if let Some(speed) = args.speed {
        cfg.request.speed = speed;
    }
    cfg.validate()?;
    Ok(())
}

fn make_renderer(args: &PlaybackArgs) -> Box<dyn FrameRenderer> {
    match &args.out {
        Some(out) => {
            let mut r = PngFileRenderer::new(out);
            if let Some(dir) = &args.frames_dir {
                r = r.with_frames_dir(dir);
            }
            Box::new(r)
        }
        None => Box::new(LogRenderer),
    }
}

fn stop_condition(args: &PlaybackArgs) -> anyhow::Result<StopWhen> {
    if !args.seconds.is_finite() || args.seconds < 0.0 {
        anyhow::bail!("--seconds must be a non-negative number");
    }
    Ok(StopWhen {
        advances: args.advances,
        elapsed: Some(Duration::from_secs_f64(args.seconds)),
    })
}

fn run_panel<A: AnimationSource>(
    cfg: &PlayerConfig,
    source: A,
    playback: &PlaybackArgs,
) -> anyhow::Result<()> {
    let stop = stop_condition(playback)?;
    let scheduler = ThreadScheduler::new();
    let ticks = scheduler.ticks();
    let mut panel =
        AnimationPanel::from_config(cfg, source, scheduler, make_renderer(playback))?;

    let state = panel
        .request(&cfg.request)
        .with_context(|| format!("request '{}' animation", cfg.request.animation_type))?;
    tracing::info!(
        frames = state.frames().len(),
        interval_ms = state.interval_millis(),
        "playing"
    );

    let report = flipbook::drive(panel.controller_mut(), &ticks, stop)?;
    panel.close();
    tracing::info!(advances = report.advances, "stopped");
    Ok(())
}

fn cmd_fetch(mut cfg: PlayerConfig, args: FetchArgs) -> anyhow::Result<()> {
    apply_request_args(&mut cfg, args.request)?;
    let source = HttpAnimationSource::new(cfg.http_opts())?;
    run_panel(&cfg, source, &args.playback)
}

fn cmd_download(mut cfg: PlayerConfig, args: DownloadArgs) -> anyhow::Result<()> {
    apply_request_args(&mut cfg, args.request)?;
    let source = HttpAnimationSource::new(cfg.http_opts())?;
    let resp = source.fetch(&cfg.request)?;
    flipbook::ensure_parent_dir(&args.out)?;
    let f = std::fs::File::create(&args.out)
        .with_context(|| format!("create '{}'", args.out.display()))?;
    serde_json::to_writer_pretty(f, &resp).with_context(|| "write animation response JSON")?;
    tracing::info!(
        frames = resp.frames.as_ref().map_or(0, Vec::len),
        out = %args.out.display(),
        "saved response"
    );
    Ok(())
}

fn cmd_play(mut cfg: PlayerConfig, args: PlayArgs) -> anyhow::Result<()> {
    if let Some(speed) = args.speed {
        cfg.request.speed = speed;
    }
    cfg.autoplay = true;
    run_panel(&cfg, JsonFileSource::new(&args.in_path), &args.playback)
}

fn cmd_frame(cfg: PlayerConfig, args: FrameArgs) -> anyhow::Result<()> {
    let frames = read_frames(&args.in_path)?;
    let mut controller = PlaybackController::with_limits(
        ManualScheduler::new(),
        PngFileRenderer::new(&args.out),
        cfg.rate,
    )?;
    let payload = usize::try_from(args.index)
        .ok()
        .and_then(|i| frames.get(i))
        .ok_or(FlipbookError::IndexOutOfRange {
            index: args.index,
            len: frames.len(),
        })?;
    if !payload.is_inline() {
        anyhow::bail!("frame {} is a reference, not inline image data", args.index);
    }
    controller.load(frames)?;
    controller.seek(args.index)?;
    tracing::info!(index = args.index, out = %args.out.display(), "wrote frame");
    Ok(())
}

fn read_frames(path: &Path) -> anyhow::Result<flipbook::FrameSet> {
    let resp = JsonFileSource::new(path).fetch(&AnimationRequest::default())?;
    if !resp.has_frames() {
        anyhow::bail!(
            "no animation frames in '{}'{}",
            path.display(),
            resp.message
                .as_deref()
                .map(|m| format!(": {m}"))
                .unwrap_or_default()
        );
    }
    Ok(resp.frame_set())
}
