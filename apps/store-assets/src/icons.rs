use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use app_settings::IconSettings;
use engine::{encode_png, render_icon};
use tracing::debug;

/// Render one icon per configured size and write them as PNG files.
pub fn generate_icon_set(settings: &IconSettings) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(&settings.output_dir).with_context(|| {
        format!(
            "failed to create icon directory {}",
            settings.output_dir.display()
        )
    })?;

    let mut written = Vec::with_capacity(settings.sizes.len());
    for &size in &settings.sizes {
        let icon = render_icon(size).with_context(|| format!("failed to render {size}px icon"))?;
        let bytes = encode_png(&icon).with_context(|| format!("failed to encode {size}px icon"))?;

        let path = settings.output_dir.join(settings.file_name(size));
        fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
        debug!("Wrote {}", path.display());
        written.push(path);
    }

    Ok(written)
}
