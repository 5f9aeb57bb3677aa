use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "photostrip", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a strip composition to PNG or JPEG.
    Render(RenderArgs),
    /// Print the preview display list of a strip composition as JSON.
    Preview(PreviewArgs),
    /// List built-in layouts.
    Layouts,
    /// Run a demo capture sequence over still images and render the strip.
    Capture(CaptureArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input composition JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output file. Defaults to a timestamped name in the current directory.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Output pixels per composition pixel (overrides PHOTOSTRIP_EXPORT_SCALE).
    #[arg(long)]
    scale: Option<f64>,

    /// `png` or `jpeg` (overrides PHOTOSTRIP_EXPORT_FORMAT).
    #[arg(long)]
    format: Option<String>,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Input composition JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Write JSON here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CaptureArgs {
    /// Still images used as camera frames, cycled in order.
    #[arg(long = "frame", required = true)]
    frames: Vec<PathBuf>,

    /// Built-in layout id.
    #[arg(long, default_value = "strip-4")]
    layout: String,

    /// Number of shots; defaults to the layout's photo count.
    #[arg(long)]
    count: Option<u32>,

    /// Countdown seconds before each shot.
    #[arg(long, default_value_t = 3)]
    countdown: u32,

    /// Pause between shots in milliseconds.
    #[arg(long, default_value_t = 500)]
    interval_ms: u64,

    /// Session id for the captured photos.
    #[arg(long, default_value = "cli")]
    session: String,

    /// Directory the rendered strip is written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
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
        Command::Preview(args) => cmd_preview(args),
        Command::Layouts => cmd_layouts(),
        Command::Capture(args) => cmd_capture(args),
    }
}

fn export_opts(scale: Option<f64>, format: Option<&str>) -> anyhow::Result<photostrip::ExportOpts> {
    let mut opts = photostrip::ExportOpts::from_env();
    if let Some(scale) = scale {
        anyhow::ensure!(scale.is_finite() && scale > 0.0, "--scale must be > 0");
        opts.scale = scale;
    }
    if let Some(format) = format {
        opts.format = photostrip::ImageEncoding::parse(format)
            .with_context(|| format!("unknown format '{format}'"))?;
    }
    Ok(opts)
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let def = photostrip::StripCompositionDef::from_path(&args.in_path)?;
    let compositor = photostrip::StripCompositor::new(def.asset_loader())
        .with_export_opts(export_opts(args.scale, args.format.as_deref())?);
    let comp = def.into_composition()?;

    let file = compositor.render_export(&comp, &chrono::Local::now())?;
    let path = match args.out {
        Some(path) => {
            write_file(&path, &file.bytes)?;
            path
        }
        None => file.write_to_dir(".")?,
    };
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let def = photostrip::StripCompositionDef::from_path(&args.in_path)?;
    let compositor = photostrip::StripCompositor::new(def.asset_loader());
    let scene = compositor.render_preview(&def.into_composition()?)?;
    let json = serde_json::to_string_pretty(&scene).context("serialize preview scene")?;
    match args.out {
        Some(path) => {
            write_file(&path, json.as_bytes())?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_layouts() -> anyhow::Result<()> {
    for desc in photostrip::builtin_layouts() {
        let layout = photostrip::compute_layout(&desc, desc.photo_count as usize)?;
        println!(
            "{:<8} {:<20} {} photo(s)  {:<10} {}x{}",
            desc.id,
            desc.name,
            desc.photo_count,
            desc.arrangement.as_str(),
            layout.canvas.width,
            layout.canvas.height
        );
    }
    Ok(())
}

fn cmd_capture(args: CaptureArgs) -> anyhow::Result<()> {
    let desc = photostrip::find_layout(&args.layout)
        .with_context(|| format!("unknown layout '{}'", args.layout))?;
    let frames = args
        .frames
        .iter()
        .map(|p| {
            let bytes = std::fs::read(p).with_context(|| format!("read '{}'", p.display()))?;
            Ok(photostrip::decode_image(&bytes)?)
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut source = photostrip::StillImageSource::new(frames)?;
    let session = photostrip::SessionContext::new(photostrip::SessionId::new(args.session)?);
    let seq = photostrip::CaptureSequence {
        count: args.count.unwrap_or(desc.photo_count),
        interval: Duration::from_millis(args.interval_ms),
        countdown: args.countdown,
    };
    let cancel = photostrip::CancelToken::new();
    let outcome = photostrip::capture_sequence(
        &mut source,
        &mut photostrip::ThreadPacer,
        &seq,
        &session,
        &cancel,
        |event| match event {
            photostrip::CaptureEvent::CountdownTick { shot, remaining } => {
                eprintln!("shot {shot}: {remaining}...");
            }
            photostrip::CaptureEvent::Captured { shot, photo } => {
                eprintln!("shot {shot}: captured {photo}");
            }
            _ => {}
        },
    )?;
    if let Some(e) = outcome.failure {
        if outcome.photos.is_empty() {
            return Err(e.into());
        }
        tracing::warn!(error = %e, captured = outcome.photos.len(), "capture stopped early");
    }

    let photos = outcome
        .photos
        .iter()
        .map(|p| photostrip::ImageSource::Bitmap(p.original().clone()))
        .collect();
    let now = chrono::Local::now();
    let comp = photostrip::StripComposition::new(desc, photos)
        .with_caption(photostrip::timestamp_caption(&now));
    let compositor = photostrip::StripCompositor::default()
        .with_export_opts(photostrip::ExportOpts::from_env());
    let path = compositor
        .render_export(&comp, &now)?
        .write_to_dir(&args.out_dir)?;
    eprintln!("wrote {}", path.display());
    Ok(())
}
