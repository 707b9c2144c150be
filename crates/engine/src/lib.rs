use core_types::{Dimensions, RgbColor};
use std::path::Path;

pub mod icon;
pub mod normalize;

pub use icon::render_icon;
pub use normalize::{
    center_offsets, encode_png, fit_within, flatten_to_rgb, normalize_image, Normalized,
};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Unsupported color mode: {0}")]
    UnsupportedColorMode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Invalid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Canvas every normalized image is composited onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub target: Dimensions,
    pub background: RgbColor,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            target: Dimensions::new(1280, 800),
            background: RgbColor::WHITE,
        }
    }
}

pub struct ImageEngine {
    options: NormalizeOptions,
}

impl ImageEngine {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Decode `src`, normalize it onto the configured canvas and write a PNG to `dst`.
    ///
    /// The PNG is encoded fully in memory before anything touches `dst`, so a
    /// failed item never leaves a truncated file behind.
    pub fn normalize_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        src: P,
        dst: Q,
    ) -> Result<Normalized> {
        let (src, dst) = (src.as_ref(), dst.as_ref());
        let dyn_img = image::open(src).map_err(|e| EngineError::Decode(e.to_string()))?;

        let normalized = normalize_image(&dyn_img, &self.options)?;
        let bytes = encode_png(&normalized.image)?;
        std::fs::write(dst, bytes)?;

        Ok(normalized)
    }
}

impl Default for ImageEngine {
    fn default() -> Self {
        Self::new(NormalizeOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn normalize_file_writes_opaque_png_at_target_size() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("shot.png");
        let dst = dir.path().join("out.png");
        RgbaImage::from_pixel(300, 100, Rgba([10, 20, 30, 128]))
            .save(&src)
            .unwrap();

        let engine = ImageEngine::default();
        let normalized = engine.normalize_file(&src, &dst).expect("normalize");
        assert!(normalized.flattened_alpha);

        let written = image::open(&dst).unwrap();
        assert_eq!(written.width(), 1280);
        assert_eq!(written.height(), 800);
        assert!(!written.color().has_alpha());
        let bytes = std::fs::read(&dst).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
    }

    #[test]
    fn corrupt_source_is_a_decode_error_and_writes_nothing() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("broken.png");
        let dst = dir.path().join("out.png");
        std::fs::write(&src, b"definitely not a png").unwrap();

        let err = ImageEngine::default()
            .normalize_file(&src, &dst)
            .unwrap_err();
        assert!(matches!(err, EngineError::Decode(_)));
        assert!(!dst.exists());
    }

    #[test]
    fn unwritable_destination_is_an_io_error() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("ok.png");
        image::RgbImage::new(4, 4).save(&src).unwrap();
        let dst = dir.path().join("missing").join("out.png");

        let err = ImageEngine::default()
            .normalize_file(&src, &dst)
            .unwrap_err();
        assert!(matches!(err, EngineError::Io(_)));
    }
}
