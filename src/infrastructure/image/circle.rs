//! Circular avatar clipping.

use image::{DynamicImage, Rgba, RgbaImage};

/// Crops the top-left square of `source` to its inscribed circle.
///
/// The result is `min(width, height)` pixels on each side; pixels whose centre
/// falls outside the circle are fully transparent.
#[must_use]
pub fn circle_clip(source: &DynamicImage) -> DynamicImage {
    let size = source.width().min(source.height());
    let center = f64::from(size) / 2.0;
    let radius_sq = center * center;
    let rgba = source.to_rgba8();

    let clipped = RgbaImage::from_fn(size, size, |x, y| {
        let dx = f64::from(x) - center + 0.5;
        let dy = f64::from(y) - center + 0.5;
        if dx * dx + dy * dy <= radius_sq {
            *rgba.get_pixel(x, y)
        } else {
            Rgba([0, 0, 0, 0])
        }
    });

    DynamicImage::ImageRgba8(clipped)
}
