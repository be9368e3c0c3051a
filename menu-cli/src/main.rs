mod batch;
mod config;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use menu::{ExtractOptions, MenuExtractor, TextDetector};
use ocr::OverlayStyle;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Extract item names and prices from photographed menus.
#[derive(Parser, Debug)]
#[command(name = "menu-ocr", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process every .jpg/.jpeg/.png in a folder, writing <name>.json next to each
    Batch {
        /// Folder with the menu photos
        #[arg(default_value = "images")]
        dir: PathBuf,
    },
    /// Process a single image and print its records
    Image {
        /// Menu photo
        path: PathBuf,

        /// Also write <name>.json next to the image
        #[arg(long, default_value_t = false)]
        save: bool,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory with the PP-OCRv5 models
    #[arg(long, global = true)]
    models_dir: Option<PathBuf>,

    /// Recognizer language (latin, english, chinese)
    #[arg(long, global = true)]
    language: Option<String>,

    /// Maximum horizontal gap in pixels between fragments of one item name
    #[arg(long, global = true)]
    threshold: Option<f32>,

    /// Write <name>_overlay.png with the raw detections drawn on the image
    #[arg(long, global = true, default_value_t = false)]
    debug_overlay: bool,

    /// Font used for overlay labels
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.common.verbose);

    let config = resolve_config(&cli.common)?;
    let overlay_style = build_overlay_style(&config)?;

    info!("loading OCR models...");
    let detector = build_detector(&config)?;
    let mut extractor = MenuExtractor::with_options(
        detector,
        ExtractOptions {
            proximity_threshold: config.extract.proximity_threshold,
        },
    );

    match cli.command {
        Command::Batch { dir } => {
            batch::run_batch(&mut extractor, &dir, overlay_style.as_ref())?;
        }
        Command::Image { path, save } => {
            let extraction =
                batch::process_image(&mut extractor, &path, overlay_style.as_ref(), save)
                    .with_context(|| format!("failed to process {}", path.display()))?;
            if extraction.detections.is_empty() {
                info!("no text found in {}", path.display());
            }
            batch::print_records(&extraction.records);
            println!("Elapsed: {:?}", extraction.elapsed);
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout only carries the records.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Config file (if any) with command-line flags applied on top.
fn resolve_config(args: &CommonArgs) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => AppConfig::default(),
    };

    if let Some(dir) = &args.models_dir {
        config.models.dir = dir.clone();
    }
    if let Some(language) = &args.language {
        config.models.language = language.clone();
    }
    if let Some(threshold) = args.threshold {
        config.extract.proximity_threshold = threshold;
    }
    if args.debug_overlay {
        config.overlay.enabled = true;
    }
    if let Some(font) = &args.font {
        config.overlay.font = Some(font.clone());
    }

    anyhow::ensure!(
        config.extract.proximity_threshold.is_finite() && config.extract.proximity_threshold > 0.0,
        "proximity threshold must be a positive number, got {}",
        config.extract.proximity_threshold
    );

    Ok(config)
}

fn build_overlay_style(config: &AppConfig) -> Result<Option<OverlayStyle>> {
    if !config.overlay.enabled {
        return Ok(None);
    }
    let style = match &config.overlay.font {
        Some(font) => OverlayStyle::with_font_path(font)?,
        None => OverlayStyle::with_system_font(),
    };
    Ok(Some(style))
}

#[cfg(feature = "paddle")]
fn build_detector(config: &AppConfig) -> Result<Box<dyn TextDetector>> {
    let models = config.models.model_config()?;
    let engine = ocr::OcrEngine::with_options(models, config.ocr)
        .context("failed to initialize the OCR engine")?;
    Ok(Box::new(engine))
}

#[cfg(not(feature = "paddle"))]
fn build_detector(_config: &AppConfig) -> Result<Box<dyn TextDetector>> {
    anyhow::bail!("menu-ocr was built without an OCR engine; rebuild with `--features paddle`")
}
