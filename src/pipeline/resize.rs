//! Optional one-shot downscale of the finished poster.

use image::{imageops, RgbImage};
use tracing::debug;

/// Shrink `img` to `max_width` pixels wide, keeping the aspect ratio.
///
/// `max_width == 0` means "no limit". An image that already fits is returned
/// as-is without resampling.
pub fn downscale(img: RgbImage, max_width: u32) -> RgbImage {
    if max_width == 0 || img.width() <= max_width {
        return img;
    }
    let (w, h) = img.dimensions();
    let ratio = f64::from(max_width) / f64::from(w);
    let new_h = ((f64::from(h) * ratio).round() as u32).max(1);

    debug!("resize: {}x{} -> {}x{}", w, h, max_width, new_h);
    imageops::resize(&img, max_width, new_h, imageops::FilterType::Lanczos3)
}
