use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use kandinsky::{FrameRGBA, InputScript, Palette, PaletteStyle, SessionConfig, SessionRng, Sketch};

#[derive(Parser, Debug)]
#[command(name = "kandinsky", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a headless session and write the last frame as a PNG.
    Render(RenderArgs),
    /// Print the palette a seed produces, as JSON.
    Palette(PaletteArgs),
    /// Print the default session configuration, as JSON.
    Config,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Session seed; overrides the one in `--config`.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to run.
    #[arg(long, default_value_t = 900)]
    frames: u64,

    /// Simulated ticks per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Autopilot drag strokes, used when no `--script` is given.
    #[arg(long, default_value_t = 20)]
    strokes: usize,

    /// Session configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input script JSON.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Also write every N-th frame.
    #[arg(long, requires = "snapshot_dir")]
    snapshot_every: Option<u64>,

    #[arg(long)]
    snapshot_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PaletteArgs {
    #[arg(long)]
    seed: u64,

    #[arg(long, value_enum, default_value_t = StyleChoice::Scheme)]
    style: StyleChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StyleChoice {
    Scheme,
    Harmonious,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Palette(args) => cmd_palette(args),
        Command::Config => cmd_config(),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    let r = BufReader::new(f);
    serde_json::from_reader(r).with_context(|| format!("parse {what} JSON"))
}

fn write_png(path: &Path, frame: &FrameRGBA) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.fps > 0, "--fps must be > 0");
    let mut config = match &args.config {
        Some(path) => read_json::<SessionConfig>(path, "config")?,
        None => SessionConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    config.validate()?;

    let mut sketch = Sketch::new(config, args.width, args.height)?;
    let frame_ms = 1000.0 / f64::from(args.fps);
    let script = match &args.script {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read script '{}'", path.display()))?;
            InputScript::from_json_str(&text)
                .with_context(|| format!("load script '{}'", path.display()))?
        }
        None => InputScript::autopilot(
            sketch.state().anchors(),
            args.strokes,
            sketch.state().seed(),
            frame_ms,
        ),
    };

    let snapshots = args.snapshot_every.zip(args.snapshot_dir.as_deref());
    let report = sketch.run_script(&script, args.frames, |idx, frame| {
        if let Some((every, dir)) = snapshots
            && every > 0
            && idx.0 % every == 0
        {
            write_png(&dir.join(format!("frame-{:06}.png", idx.0)), frame)
                .map_err(kandinsky::KandinskyError::from)?;
        }
        Ok(())
    })?;

    write_png(&args.out, sketch.frame())?;
    let out_dir = args.out.parent().unwrap_or_else(|| Path::new("."));
    for stem in &report.exports {
        write_png(&out_dir.join(format!("{stem}.png")), sketch.frame())?;
    }

    tracing::info!(
        seed = sketch.state().seed(),
        frames = report.frames,
        finished = report.finished,
        counters = ?sketch.state().counters(),
        "render done"
    );
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_palette(args: PaletteArgs) -> anyhow::Result<()> {
    let style = match args.style {
        StyleChoice::Scheme => PaletteStyle::Scheme,
        StyleChoice::Harmonious => PaletteStyle::Harmonious,
    };
    let mut rng = SessionRng::seeded(args.seed);
    let palette = Palette::generate(&mut rng, style);
    let entries: Vec<serde_json::Value> = palette
        .colors()
        .iter()
        .map(|c| {
            serde_json::json!({
                "h": c.h,
                "s": c.s,
                "l": c.l,
                "a": c.a,
                "hex": c.to_hex(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

fn cmd_config() -> anyhow::Result<()> {
    println!("{}", SessionConfig::default().to_json_pretty()?);
    Ok(())
}
