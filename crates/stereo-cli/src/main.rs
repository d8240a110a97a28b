//! stereo3d - stereo pair and anaglyph generation from a person photo
//!
//! Segmentation is precomputed: the person mask is read from a file.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

mod commands;

#[derive(Parser)]
#[command(name = "stereo3d")]
#[command(author, version, about = "Stereo pair and red-cyan anaglyph generation")]
#[command(long_about = "
Composites a segmented person onto a stereo background and renders a
side-by-side stereo pair and a red-cyan anaglyph.

Examples:
  stereo3d generate person.jpg --mask person_mask.png --anaglyph out.png
  stereo3d generate person.jpg --mask m.png -b beach.jpg --shift 6 --size 80 \\
      --anaglyph ana.png --stereo pair.png --cutout cut.png
  stereo3d split background.jpg --left l.png --right r.png
  stereo3d anaglyph left.png right.png -o ana.png
  stereo3d clean-mask raw_mask.png -o matte.png
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate stereo pair and anaglyph from a person photo
    #[command(visible_alias = "g")]
    Generate(GenerateArgs),

    /// Split a background into left and right views
    Split(SplitArgs),

    /// Encode an existing left/right pair as an anaglyph
    #[command(visible_alias = "a")]
    Anaglyph(AnaglyphArgs),

    /// Turn a raw segmentation mask into a soft matte
    #[command(name = "clean-mask")]
    CleanMask(CleanMaskArgs),
}

/// Arguments for the `generate` command.
#[derive(Args)]
struct GenerateArgs {
    /// Person photo
    person: PathBuf,

    /// Person mask (white = person), same size as the photo
    #[arg(short, long)]
    mask: PathBuf,

    /// Background image (default: 512x512 solid green)
    #[arg(short, long)]
    background: Option<PathBuf>,

    /// Horizontal disparity in pixels
    #[arg(short, long, default_value = "10", allow_hyphen_values = true)]
    shift: i32,

    /// Person size in percent
    #[arg(long, default_value = "100")]
    size: u32,

    /// Anaglyph output
    #[arg(short, long)]
    anaglyph: PathBuf,

    /// Side-by-side stereo pair output
    #[arg(long)]
    stereo: Option<PathBuf>,

    /// Person cutout output
    #[arg(long)]
    cutout: Option<PathBuf>,

    /// Matte output (8-bit grayscale)
    #[arg(long)]
    matte: Option<PathBuf>,
}

/// Arguments for the `split` command.
#[derive(Args)]
struct SplitArgs {
    /// Background image
    background: PathBuf,

    /// Left view output
    #[arg(short, long)]
    left: PathBuf,

    /// Right view output
    #[arg(short, long)]
    right: PathBuf,

    /// Hash distance below which the halves count as a stereo pair
    #[arg(long, default_value = "10")]
    threshold: u32,
}

/// Arguments for the `anaglyph` command.
#[derive(Args)]
struct AnaglyphArgs {
    /// Left eye image
    left: PathBuf,

    /// Right eye image
    right: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,
}

/// Arguments for the `clean-mask` command.
#[derive(Args)]
struct CleanMaskArgs {
    /// Raw mask image
    input: PathBuf,

    /// Output matte
    #[arg(short, long)]
    output: PathBuf,

    /// Erosion size (odd)
    #[arg(long, default_value = "7")]
    erode: usize,

    /// Blur kernel size (odd)
    #[arg(long, default_value = "3")]
    blur: usize,
}

fn init_logging(verbose: u8, log_file: Option<&PathBuf>) -> Result<Option<WorkerGuard>> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    let stderr = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter());

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("Invalid log file: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr)
        .with(file_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose, cli.log_file.as_ref())?;

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Generate(args) => commands::generate::run(args, cli.verbose),
        Commands::Split(args) => commands::split::run(args, cli.verbose),
        Commands::Anaglyph(args) => commands::anaglyph::run(args, cli.verbose),
        Commands::CleanMask(args) => commands::clean_mask::run(args, cli.verbose),
    }
}
