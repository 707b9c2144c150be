use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// List the images directly inside `dir` whose extension is in `extensions`.
///
/// Subdirectories are not entered, so an output folder nested in the input
/// folder is never picked up again. Entries that cannot be inspected (for
/// example a dangling link) are still listed when their name matches, so the
/// batch reports them instead of dropping them. Results are sorted by path.
pub fn list_images(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("input directory {} does not exist", dir.display());
    }

    let mut out = Vec::new();
    for res in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match res {
            Ok(entry) => entry,
            Err(err) => {
                if err.depth() == 0 {
                    return Err(err).with_context(|| format!("failed to read {}", dir.display()));
                }
                match err.path().map(Path::to_path_buf) {
                    Some(path) if has_extension(&path, extensions) => {
                        warn!("Cannot inspect {}: {err}", path.display());
                        out.push(path);
                    }
                    _ => debug!("Skipping unreadable entry: {err}"),
                }
                continue;
            }
        };

        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            out.push(entry.into_path());
        }
    }

    out.sort();
    Ok(out)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| is_supported_extension(ext, extensions))
        .unwrap_or(false)
}

fn is_supported_extension(ext: &str, extensions: &[String]) -> bool {
    extensions
        .iter()
        .map(|candidate| candidate.trim().trim_start_matches('.'))
        .any(|candidate| candidate.eq_ignore_ascii_case(ext))
}
