use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use tcb_scroller::scene::Demo;
use tcb_scroller::scroll::{
    EngineConfig, MarkerStyle, ScrollEngine, ScrollText, WaveIndex, WaveformTable,
};

const DEFAULT_OUTPUT: &str = "scroller.mp4";
const DEFAULT_DURATION_S: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum StyleArg {
    Hidden,
    Echo,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "export_video",
    version,
    about = "Offline scroller export (raw RGBA frames -> MP4 via ffmpeg)"
)]
pub(crate) struct Cli {
    #[arg(long, value_name = "MP4", default_value = DEFAULT_OUTPUT)]
    pub(crate) out: PathBuf,

    #[arg(long, default_value_t = 640)]
    pub(crate) width: usize,

    #[arg(long, default_value_t = 400)]
    pub(crate) height: usize,

    #[arg(long, default_value_t = 60)]
    pub(crate) fps: u32,

    /// Exact number of frames; wins over --duration.
    #[arg(long)]
    pub(crate) frames: Option<usize>,

    #[arg(long, value_name = "SECONDS")]
    pub(crate) duration: Option<f32>,

    #[arg(long, value_enum, default_value_t = StyleArg::Hidden)]
    pub(crate) marker_style: StyleArg,

    #[arg(long)]
    pub(crate) text_file: Option<PathBuf>,

    #[arg(long, default_value_t = '^')]
    pub(crate) escape: char,

    #[arg(long, default_value_t = 0)]
    pub(crate) wave: u8,
}

pub(crate) fn compute_frame_count(duration_s: f32, fps: u32) -> usize {
    ((duration_s.max(0.0) * fps as f32).floor() as usize).max(1)
}

pub(crate) fn resolve_frame_count(args: &Cli) -> usize {
    match args.frames {
        Some(n) => n.max(1),
        None => compute_frame_count(args.duration.unwrap_or(DEFAULT_DURATION_S), args.fps),
    }
}

pub(crate) fn validate_args(args: &Cli) -> Result<()> {
    if args.width == 0 {
        bail!("--width must be >= 1");
    }
    if args.height == 0 {
        bail!("--height must be >= 1");
    }
    if args.fps == 0 {
        bail!("--fps must be >= 1");
    }
    if args.frames == Some(0) {
        bail!("--frames must be >= 1");
    }
    if let Some(cap) = args.duration {
        if cap <= 0.0 {
            bail!("--duration must be > 0 seconds");
        }
    }
    if WaveIndex::new(args.wave).is_none() {
        bail!("--wave must be in 0..=7");
    }
    Ok(())
}

pub(crate) fn build_engine(args: &Cli) -> Result<ScrollEngine> {
    let text = match &args.text_file {
        Some(path) => ScrollText::load(path, args.escape)
            .with_context(|| format!("load scroll text {}", path.display()))?,
        None => ScrollText::classic(),
    };
    let style = match args.marker_style {
        StyleArg::Hidden => MarkerStyle::Hidden,
        StyleArg::Echo => MarkerStyle::Echo,
    };
    let cfg = EngineConfig {
        style,
        ..EngineConfig::default()
    };
    let mut engine = ScrollEngine::new(text, WaveformTable::classic(), cfg)?;
    if let Some(wave) = WaveIndex::new(args.wave) {
        engine.force_wave(wave);
    }
    Ok(engine)
}

fn main() -> Result<()> {
    let args = Cli::parse();
    run(args)
}

fn run(args: Cli) -> Result<()> {
    validate_args(&args)?;
    ensure_ffmpeg_available()?;

    let frame_count = resolve_frame_count(&args);
    let mut demo = Demo::new(build_engine(&args)?);

    let mut parent = args.out.parent().unwrap_or_else(|| Path::new(""));
    if parent == Path::new("") {
        parent = Path::new(".");
    }
    fs::create_dir_all(parent)
        .with_context(|| format!("create output directory {}", parent.display()))?;

    let mut ffmpeg = spawn_ffmpeg(&args.out, args.width, args.height, args.fps)?;
    let mut ffmpeg_in = ffmpeg
        .stdin
        .take()
        .context("failed to open ffmpeg stdin for rawvideo input")?;

    render_frames(&mut demo, frame_count, args.width, args.height, &mut ffmpeg_in)?;
    drop(ffmpeg_in);

    let status = ffmpeg.wait().context("wait for ffmpeg")?;
    if !status.success() {
        bail!("ffmpeg exited with status {status}");
    }

    println!(
        "exported {} frames @ {} fps (duration {:.3}s) -> {}",
        frame_count,
        args.fps,
        frame_count as f32 / args.fps as f32,
        args.out.display()
    );
    Ok(())
}

fn ensure_ffmpeg_available() -> Result<()> {
    match Command::new("ffmpeg")
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            bail!("ffmpeg not found in PATH (install ffmpeg and retry)")
        }
        Err(err) => Err(anyhow!("failed to run ffmpeg: {err}")),
    }
}

fn spawn_ffmpeg(
    out_path: &Path,
    width: usize,
    height: usize,
    fps: u32,
) -> Result<std::process::Child> {
    let mut cmd = Command::new("ffmpeg");
    cmd.arg("-hide_banner")
        .arg("-loglevel")
        .arg("error")
        .arg("-y")
        .arg("-f")
        .arg("rawvideo")
        .arg("-pix_fmt")
        .arg("rgba")
        .arg("-video_size")
        .arg(format!("{width}x{height}"))
        .arg("-framerate")
        .arg(fps.to_string())
        .arg("-i")
        .arg("-")
        .arg("-c:v")
        .arg("libx264")
        .arg("-pix_fmt")
        .arg("yuv420p")
        .arg("-movflags")
        .arg("+faststart")
        .arg(out_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    cmd.spawn()
        .with_context(|| format!("spawn ffmpeg for output {}", out_path.display()))
}

/// Ticks the demo once per frame and streams the composite as raw RGBA.
pub(crate) fn render_frames(
    demo: &mut Demo,
    frames: usize,
    width: usize,
    height: usize,
    sink: &mut dyn Write,
) -> Result<()> {
    for _ in 0..frames {
        demo.tick();
        let pixels = demo.render(width, height);
        sink.write_all(pixels).context("write frame to ffmpeg stdin")?;
    }
    Ok(())
}
