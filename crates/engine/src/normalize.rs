use core_types::{Dimensions, Placement, RgbColor};
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::{self, FilterType};
use image::{ColorType, DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use tracing::debug;

use crate::{EngineError, NormalizeOptions, Result};

/// An image placed on its final canvas, with the geometry that produced it.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub image: RgbImage,
    pub original: Dimensions,
    pub placement: Placement,
    pub flattened_alpha: bool,
}

/// Convert any color type to 8-bit RGB.
///
/// Types with an alpha channel are composited over `background`; the returned
/// flag tells whether that happened.
pub fn flatten_to_rgb(image: &DynamicImage, background: RgbColor) -> Result<(RgbImage, bool)> {
    match image.color() {
        ColorType::L8 | ColorType::L16 | ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => {
            Ok((image.to_rgb8(), false))
        }
        ColorType::La8
        | ColorType::La16
        | ColorType::Rgba8
        | ColorType::Rgba16
        | ColorType::Rgba32F => Ok((composite_over(&image.to_rgba8(), background), true)),
        other => Err(EngineError::UnsupportedColorMode(format!("{other:?}"))),
    }
}

fn composite_over(src: &RgbaImage, background: RgbColor) -> RgbImage {
    let [br, bg, bb] = background.0;
    RgbImage::from_fn(src.width(), src.height(), |x, y| {
        let Rgba([r, g, b, a]) = *src.get_pixel(x, y);
        Rgb([blend(r, br, a), blend(g, bg, a), blend(b, bb, a)])
    })
}

#[inline]
#[allow(clippy::cast_possible_truncation)]
fn blend(fg: u8, bg: u8, alpha: u8) -> u8 {
    let a = u32::from(alpha);
    // Rounded, never exceeds 255.
    ((u32::from(fg) * a + u32::from(bg) * (255 - a) + 127) / 255) as u8
}

/// Largest size with the source's proportions that fits inside `target`.
///
/// A source wider than the target (by ratio) takes the full target width,
/// anything else takes the full target height. Sides round down and never
/// drop below one pixel.
#[allow(clippy::cast_possible_truncation)]
pub fn fit_within(source: Dimensions, target: Dimensions) -> Dimensions {
    let (sw, sh) = (u64::from(source.width), u64::from(source.height));
    let (tw, th) = (u64::from(target.width), u64::from(target.height));

    let (width, height) = if sw * th > tw * sh {
        (tw, tw * sh / sw)
    } else {
        (th * sw / sh, th)
    };

    // Both sides are bounded by the target, which is u32.
    Dimensions::new(width.max(1) as u32, height.max(1) as u32)
}

pub fn center_offsets(scaled: Dimensions, target: Dimensions) -> Placement {
    Placement {
        scaled,
        offset_x: target.width.saturating_sub(scaled.width) / 2,
        offset_y: target.height.saturating_sub(scaled.height) / 2,
    }
}

/// Flatten, scale to fit and center `image` on a fresh canvas of `options.target`.
pub fn normalize_image(image: &DynamicImage, options: &NormalizeOptions) -> Result<Normalized> {
    let original = Dimensions::new(image.width(), image.height());
    for dims in [original, options.target] {
        if dims.is_empty() {
            return Err(EngineError::InvalidDimensions {
                width: dims.width,
                height: dims.height,
            });
        }
    }

    let (rgb, flattened_alpha) = flatten_to_rgb(image, options.background)?;
    if flattened_alpha {
        debug!(color = ?image.color(), "flattened alpha onto {}", options.background);
    }

    let scaled = fit_within(original, options.target);
    let resized = if scaled == original {
        rgb
    } else {
        imageops::resize(&rgb, scaled.width, scaled.height, FilterType::Lanczos3)
    };

    let placement = center_offsets(scaled, options.target);
    let mut canvas = RgbImage::from_pixel(
        options.target.width,
        options.target.height,
        Rgb(options.background.0),
    );
    imageops::replace(
        &mut canvas,
        &resized,
        i64::from(placement.offset_x),
        i64::from(placement.offset_y),
    );

    debug!(
        %original,
        %scaled,
        offset_x = placement.offset_x,
        offset_y = placement.offset_y,
        "placed image on {} canvas",
        options.target
    );

    Ok(Normalized {
        image: canvas,
        original,
        placement,
        flattened_alpha,
    })
}

/// Encode as 24-bit PNG with the strongest compression the encoder offers.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, PngFilter::Adaptive);
    image
        .write_with_encoder(encoder)
        .map_err(|e| EngineError::Encode(e.to_string()))?;
    Ok(buffer)
}
