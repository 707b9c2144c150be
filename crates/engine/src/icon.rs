use image::{Rgb, RgbImage};

use crate::{EngineError, Result};

const GRADIENT_TOP: [f32; 3] = [99.0, 102.0, 241.0];
const GRADIENT_BOTTOM: [f32; 3] = [139.0, 92.0, 246.0];
const GLYPH: Rgb<u8> = Rgb([255, 255, 255]);

/// Draw the extension icon: a vertical indigo-to-violet gradient, a pair of
/// white braces and three sparkles.
pub fn render_icon(size: u32) -> Result<RgbImage> {
    if size == 0 {
        return Err(EngineError::InvalidDimensions {
            width: size,
            height: size,
        });
    }

    let mut img = RgbImage::from_fn(size, size, |_, y| gradient_row(y, size));

    let s = i64::from(size);
    let bracket = s / 2;
    let thickness = (s / 16).max(2) as f32;
    let center_y = s / 2;

    // Angles run clockwise from 3 o'clock: 90..270 is the left half of the ellipse.
    for (center_x, start, end) in [(s / 4, 90.0, 270.0), (s * 3 / 4, 270.0, 90.0)] {
        let bounds = BoundingBox {
            x0: center_x - bracket / 4,
            y0: center_y - bracket / 2,
            x1: center_x + bracket / 4,
            y1: center_y + bracket / 2,
        };
        stroke_arc(&mut img, bounds, start, end, thickness);
    }

    let sparkle = (s / 32).max(2);
    for (x, y) in [(s / 6, s / 6), (s * 5 / 6, s / 6), (s / 2, s * 5 / 6)] {
        fill_ellipse(&mut img, BoundingBox::around(x, y, sparkle));
    }

    Ok(img)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn gradient_row(y: u32, size: u32) -> Rgb<u8> {
    let (y, size) = (y as f32, size as f32);
    let mut px = [0u8; 3];
    for (idx, channel) in px.iter_mut().enumerate() {
        let (top, bottom) = (GRADIENT_TOP[idx], GRADIENT_BOTTOM[idx]);
        // Truncates toward zero; every channel stays within 0..=255.
        *channel = (top + (bottom - top) * y / size) as u8;
    }
    Rgb(px)
}

/// Inclusive pixel bounds of an ellipse, like a drawing-API bounding box.
#[derive(Debug, Clone, Copy)]
struct BoundingBox {
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
}

impl BoundingBox {
    fn around(x: i64, y: i64, radius: i64) -> Self {
        Self {
            x0: x - radius,
            y0: y - radius,
            x1: x + radius,
            y1: y + radius,
        }
    }

    fn center(&self) -> (f32, f32) {
        (
            (self.x0 + self.x1 + 1) as f32 / 2.0,
            (self.y0 + self.y1 + 1) as f32 / 2.0,
        )
    }

    fn radii(&self) -> (f32, f32) {
        (
            (self.x1 + 1 - self.x0) as f32 / 2.0,
            (self.y1 + 1 - self.y0) as f32 / 2.0,
        )
    }

    /// Pixels of the box that also lie on `img`, with their centers relative
    /// to the ellipse center.
    fn pixels(&self, img: &RgbImage) -> impl Iterator<Item = (u32, u32, f32, f32)> {
        let (cx, cy) = self.center();
        let max_x = i64::from(img.width()) - 1;
        let max_y = i64::from(img.height()) - 1;
        let xs = self.x0.max(0)..=self.x1.min(max_x);
        let ys = self.y0.max(0)..=self.y1.min(max_y);
        ys.flat_map(move |y| xs.clone().map(move |x| (x, y)))
            .map(move |(x, y)| {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                // Clamped to the image above, so both fit in u32.
                (x as u32, y as u32, dx, dy)
            })
    }
}

fn inside_ellipse(dx: f32, dy: f32, rx: f32, ry: f32) -> bool {
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    (dx / rx).powi(2) + (dy / ry).powi(2) <= 1.0
}

fn angle_in_sweep(angle: f32, start: f32, end: f32) -> bool {
    if start <= end {
        angle >= start && angle <= end
    } else {
        angle >= start || angle <= end
    }
}

/// Stroke the part of the ellipse outline between `start` and `end` degrees.
/// The stroke grows inward from the outline.
fn stroke_arc(img: &mut RgbImage, bounds: BoundingBox, start: f32, end: f32, width: f32) {
    let (rx, ry) = bounds.radii();
    let hits: Vec<(u32, u32)> = bounds
        .pixels(img)
        .filter(|&(_, _, dx, dy)| {
            inside_ellipse(dx, dy, rx, ry)
                && !inside_ellipse(dx, dy, rx - width, ry - width)
                && angle_in_sweep(dy.atan2(dx).to_degrees().rem_euclid(360.0), start, end)
        })
        .map(|(x, y, _, _)| (x, y))
        .collect();

    for (x, y) in hits {
        img.put_pixel(x, y, GLYPH);
    }
}

fn fill_ellipse(img: &mut RgbImage, bounds: BoundingBox) {
    let (rx, ry) = bounds.radii();
    let hits: Vec<(u32, u32)> = bounds
        .pixels(img)
        .filter(|&(_, _, dx, dy)| inside_ellipse(dx, dy, rx, ry))
        .map(|(x, y, _, _)| (x, y))
        .collect();

    for (x, y) in hits {
        img.put_pixel(x, y, GLYPH);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_every_standard_size() {
        for size in [16, 32, 48, 128] {
            let icon = render_icon(size).unwrap();
            assert_eq!(icon.dimensions(), (size, size));
        }
    }

    #[test]
    fn gradient_runs_from_indigo_to_violet() {
        let icon = render_icon(128).unwrap();
        assert_eq!(*icon.get_pixel(0, 0), Rgb([99, 102, 241]));
        assert_eq!(*icon.get_pixel(0, 64), Rgb([119, 97, 243]));
        assert_eq!(*icon.get_pixel(0, 127), Rgb([138, 92, 245]));
    }

    #[test]
    fn braces_open_outward() {
        let icon = render_icon(128).unwrap();
        // Outer edge of the left brace and of the right brace at mid-height.
        assert_eq!(*icon.get_pixel(17, 64), GLYPH);
        assert_eq!(*icon.get_pixel(110, 64), GLYPH);
        // The inner halves of both ellipses stay empty.
        assert_eq!(*icon.get_pixel(47, 64), gradient_row(64, 128));
        assert_eq!(*icon.get_pixel(81, 64), gradient_row(64, 128));
        // Center of the icon is background.
        assert_eq!(*icon.get_pixel(64, 64), gradient_row(64, 128));
    }

    #[test]
    fn sparkles_are_white() {
        let icon = render_icon(128).unwrap();
        assert_eq!(*icon.get_pixel(21, 21), GLYPH);
        assert_eq!(*icon.get_pixel(106, 21), GLYPH);
        assert_eq!(*icon.get_pixel(64, 106), GLYPH);
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(
            render_icon(0),
            Err(EngineError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn sweep_wraps_through_zero() {
        assert!(angle_in_sweep(0.0, 270.0, 90.0));
        assert!(angle_in_sweep(300.0, 270.0, 90.0));
        assert!(!angle_in_sweep(180.0, 270.0, 90.0));
        assert!(angle_in_sweep(180.0, 90.0, 270.0));
    }
}
