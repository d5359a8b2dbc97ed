use std::{
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use scrollreel::{
    CpuSurface, FsFrameSource, ManualScheduler, Property, ReelConfig, RenderOutcome, Scrubber,
    Viewport,
};

#[derive(Parser, Debug)]
#[command(name = "scrollreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the frame shown at one scroll offset as a PNG.
    Frame(FrameArgs),
    /// Print progress, frame and section values for a list of offsets (JSON lines).
    Probe(ProbeArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Scrubber configuration JSON. Relative frame paths resolve against its directory.
    #[arg(long)]
    config: PathBuf,

    /// Scroll offset in pixels.
    #[arg(long, default_value_t = 0.0)]
    offset: f64,

    /// Viewport as WIDTHxHEIGHT.
    #[arg(long, default_value = "1920x1080")]
    viewport: Viewport,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Give up waiting for frames after this many seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Also print section property writes to stdout.
    #[arg(long)]
    print_sections: bool,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Scrubber configuration JSON.
    #[arg(long)]
    config: PathBuf,

    /// Viewport as WIDTHxHEIGHT.
    #[arg(long, default_value = "1920x1080")]
    viewport: Viewport,

    /// Comma-separated scroll offsets in pixels.
    #[arg(long, value_delimiter = ',', required = true)]
    offsets: Vec<f64>,
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
        Command::Frame(args) => cmd_frame(args),
        Command::Probe(args) => cmd_probe(args),
    }
}

fn read_config(path: &Path) -> anyhow::Result<ReelConfig> {
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let cfg = ReelConfig::from_reader(BufReader::new(f))
        .with_context(|| format!("load config '{}'", path.display()))?;
    Ok(cfg)
}

fn frames_root(config: &Path) -> &Path {
    config.parent().unwrap_or_else(|| Path::new("."))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = read_config(&args.config)?;
    let source = Arc::new(FsFrameSource::new(frames_root(&args.config)));
    let mut scrubber: Scrubber<CpuSurface, ManualScheduler> =
        Scrubber::from_config(&cfg, source, ManualScheduler::new(), args.viewport)?;
    scrubber.attach_surface(CpuSurface::new(args.viewport)?);
    scrubber.on_scroll(args.offset);

    let mut writes = Vec::new();
    let mut sink = |target: &str, property: Property, value: f64| {
        writes.push((target.to_owned(), property, value));
    };
    let reports = scrubber
        .run_until_idle(Duration::from_secs(args.timeout_secs), &mut sink)
        .context("drive scrubber")?;

    let Some(last) = reports.iter().rev().find(|r| r.outcome != RenderOutcome::Unchanged) else {
        anyhow::bail!("scrubber produced no frame");
    };
    match last.outcome {
        RenderOutcome::Drawn { .. } => {}
        outcome => tracing::warn!(?outcome, "selected frame was not drawn"),
    }
    let (progress, selection) = (last.progress, last.selection);

    let surface = scrubber
        .teardown()
        .context("surface detached before export")?;
    let frame = surface.to_frame().to_straight();

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    if args.print_sections {
        let mut out = std::io::stdout().lock();
        for (target, property, value) in &writes {
            let line = serde_json::json!({
                "target": target,
                "property": property,
                "value": value,
            });
            writeln!(out, "{line}")?;
        }
    }

    eprintln!(
        "wrote {} (progress {:.4}, frame {})",
        args.out.display(),
        progress,
        selection.map_or_else(|| "none".to_owned(), |s| s.index.to_string())
    );
    Ok(())
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let mut cfg = read_config(&args.config)?;
    // Probing is pure; nothing needs to be fetched.
    cfg.preload = 0;
    let source = Arc::new(FsFrameSource::new(frames_root(&args.config)));
    let scrubber: Scrubber<CpuSurface, ManualScheduler> =
        Scrubber::from_config(&cfg, source, ManualScheduler::new(), args.viewport)?;

    let mut out = std::io::stdout().lock();
    for offset in args.offsets {
        let probe = scrubber.probe(offset, args.viewport)?;
        writeln!(out, "{}", serde_json::to_string(&probe)?)?;
    }
    Ok(())
}
