use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use menu::{Extraction, MenuExtractor, Record, TextDetector, output};
use ocr::overlay::{self, OverlayStyle};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// Counters reported at the end of a batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
    pub records: usize,
}

/// Image files directly inside `dir`, sorted by name.
///
/// Debug overlays from earlier runs are not menus and are left out. A missing
/// directory is not an error: there is simply nothing to do.
pub fn discover_images(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        warn!("image directory {} does not exist", dir.display());
        return Vec::new();
    }

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|res| res.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_supported_image(path) && !overlay::is_overlay_path(path))
        .collect()
}

/// Only PNG/JPG/JPEG, case-insensitive.
fn is_supported_image(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if ext == "png" || ext == "jpg" || ext == "jpeg"
    )
}

/// Process every image in `dir` with one shared extractor.
///
/// Each image is saved and printed on its own; a failure is logged and the
/// run moves on to the next file.
pub fn run_batch<D: TextDetector>(
    extractor: &mut MenuExtractor<D>,
    dir: &Path,
    overlay_style: Option<&OverlayStyle>,
) -> Result<BatchSummary> {
    let images = discover_images(dir);
    let mut summary = BatchSummary::default();

    if images.is_empty() {
        info!("no images found in {}", dir.display());
        return Ok(summary);
    }

    let progress = ProgressBar::new(images.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .context("invalid progress template")?
            .progress_chars("=>-"),
    );
    progress.set_message("Processing images");

    for path in &images {
        match process_image(extractor, path, overlay_style, true) {
            Ok(extraction) => {
                summary.processed += 1;
                summary.records += extraction.records.len();
                progress.suspend(|| print_records(&extraction.records));
            }
            Err(err) => {
                summary.failed += 1;
                progress.suspend(|| error!("{}: {err:#}", path.display()));
            }
        }
        progress.inc(1);
    }

    progress.finish_with_message("Done");
    info!(
        "processed {} images ({} failed), {} records",
        summary.processed, summary.failed, summary.records
    );
    Ok(summary)
}

/// Extract one image and optionally persist its JSON and debug overlay.
///
/// Overlay problems are only logged; they never affect the records.
pub fn process_image<D: TextDetector>(
    extractor: &mut MenuExtractor<D>,
    path: &Path,
    overlay_style: Option<&OverlayStyle>,
    save: bool,
) -> Result<Extraction> {
    let extraction = match overlay_style {
        Some(style) => {
            let image = image::open(path)
                .with_context(|| format!("failed to open image {}", path.display()))?;
            let extraction = extractor.extract_image(&image)?;
            let overlay_path = overlay::overlay_path_for(path);
            match overlay::save_overlay(&image, &extraction.detections, style, &overlay_path) {
                Ok(()) => debug!("wrote overlay {}", overlay_path.display()),
                Err(err) => warn!("{err:#}"),
            }
            extraction
        }
        None => extractor.extract_path(path)?,
    };

    debug!(
        "{}: {} detections, {} records in {:?}",
        path.display(),
        extraction.detections.len(),
        extraction.records.len(),
        extraction.elapsed
    );

    if save {
        let json_path = output::save_records(path, &extraction.records)?;
        debug!("wrote {}", json_path.display());
    }

    Ok(extraction)
}

pub fn print_records(records: &[Record]) {
    println!("\n--- Extracted items with price ---");
    for record in records {
        println!(
            "Name: {}, Price: {}",
            record.name,
            record.price.as_deref().unwrap_or("-")
        );
    }
}
