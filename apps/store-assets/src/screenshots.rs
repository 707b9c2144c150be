use std::collections::hash_map::{Entry, HashMap};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use app_settings::ScreenshotSettings;
use core_types::{BatchReport, ItemOutcome};
use engine::{ImageEngine, NormalizeOptions};
use tracing::{debug, info, warn};

use crate::scanner::list_images;

#[derive(Clone, Debug)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
    pub path: PathBuf,
}

#[derive(Clone, Default)]
pub struct BatchCallbacks {
    pub progress: Option<Arc<dyn Fn(BatchProgress)>>,
    pub on_error: Option<Arc<dyn Fn(PathBuf, String)>>,
}

impl BatchCallbacks {
    fn emit_progress(&self, completed: usize, total: usize, path: &Path) {
        if let Some(cb) = &self.progress {
            cb(BatchProgress {
                completed,
                total,
                path: path.to_path_buf(),
            });
        }
    }

    fn emit_error(&self, path: PathBuf, err: impl Into<String>) {
        if let Some(cb) = &self.on_error {
            cb(path, err.into());
        }
    }
}

pub fn run(settings: &ScreenshotSettings) -> Result<BatchReport> {
    run_with_callbacks(settings, &BatchCallbacks::default())
}

/// Scan the input folder, create the output folder and normalize everything found.
pub fn run_with_callbacks(
    settings: &ScreenshotSettings,
    callbacks: &BatchCallbacks,
) -> Result<BatchReport> {
    // Scan first: the output folder usually lives inside the input folder, and
    // creating it would also create a missing input folder.
    let files = list_images(&settings.input_dir, &settings.extensions)
        .with_context(|| format!("failed to scan {}", settings.input_dir.display()))?;
    info!("Found {} screenshots to process", files.len());

    fs::create_dir_all(&settings.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            settings.output_dir.display()
        )
    })?;

    Ok(normalize_batch(&files, settings, callbacks))
}

/// Normalize `files` one after another into `settings.output_dir`.
///
/// A failing file is recorded in the report and the batch moves on.
pub fn normalize_batch(
    files: &[PathBuf],
    settings: &ScreenshotSettings,
    callbacks: &BatchCallbacks,
) -> BatchReport {
    let engine = ImageEngine::new(NormalizeOptions {
        target: settings.target(),
        background: settings.background,
    });

    let mut report = BatchReport::start();
    // Output names claimed so far, compared case-insensitively so that
    // `a.png` and `a.PNG` never overwrite each other on any filesystem.
    let mut claimed: HashMap<String, PathBuf> = HashMap::new();
    let total = files.len();
    for (idx, src) in files.iter().enumerate() {
        let outcome = match output_path_for(src, &settings.output_dir) {
            None => ItemOutcome::Failed {
                source: src.to_path_buf(),
                cause: "source path has no file name".to_string(),
            },
            Some(output) => match claimed.entry(collision_key(&output)) {
                Entry::Occupied(existing) => ItemOutcome::Failed {
                    source: src.to_path_buf(),
                    cause: format!(
                        "output name collides with {}",
                        display_name(existing.get())
                    ),
                },
                Entry::Vacant(slot) => {
                    slot.insert(src.to_path_buf());
                    normalize_one(&engine, src, output)
                }
            },
        };
        if let ItemOutcome::Failed { source, cause } = &outcome {
            warn!("Failed to process {}: {cause}", display_name(source));
            callbacks.emit_error(source.clone(), cause.as_str());
        }
        report.push(outcome);
        callbacks.emit_progress(idx + 1, total, src);
    }

    report.finish()
}

/// Output path for `src`: the same file name, with the extension switched to
/// `.png` only when the source is not already a PNG (in any letter case).
pub fn output_path_for(src: &Path, output_dir: &Path) -> Option<PathBuf> {
    let file_name = src.file_name()?;
    let mut out = output_dir.join(file_name);
    let is_png = src
        .extension()
        .and_then(OsStr::to_str)
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false);
    if !is_png {
        out.set_extension("png");
    }
    Some(out)
}

fn collision_key(output: &Path) -> String {
    output.to_string_lossy().to_lowercase()
}

fn normalize_one(engine: &ImageEngine, src: &Path, output: PathBuf) -> ItemOutcome {
    info!("Processing: {}", display_name(src));
    match engine.normalize_file(src, &output) {
        Ok(normalized) => {
            debug!("Original size: {}", normalized.original);
            if normalized.flattened_alpha {
                debug!("Flattened alpha channel onto {}", engine.options().background);
            }
            info!(
                "Saved {} ({}, 24-bit RGB)",
                output.display(),
                engine.options().target
            );
            ItemOutcome::Normalized {
                source: src.to_path_buf(),
                output,
                original: normalized.original,
                placement: normalized.placement,
                flattened_alpha: normalized.flattened_alpha,
            }
        }
        Err(err) => ItemOutcome::Failed {
            source: src.to_path_buf(),
            cause: err.to_string(),
        },
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
