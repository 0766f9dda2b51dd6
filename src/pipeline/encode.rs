//! Image encoding: poster `RgbImage` → PNG or JPEG bytes.
//!
//! PNG is written with the strongest compression and adaptive row filters,
//! which costs encode time but posters are written once and kept. JPEG goes
//! through the `image` crate's baseline encoder, which samples every colour
//! component at full resolution (4:4:4); chroma subsampling would smear the
//! thin coloured strokes of rendered text.

use crate::config::OutputFormat;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::RgbImage;
use std::io::Cursor;
use tracing::debug;

/// Encode a poster in `format`. `quality` (0–100) only applies to JPEG.
pub fn encode_poster(
    img: &RgbImage,
    format: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    match format {
        OutputFormat::Png => {
            let encoder = PngEncoder::new_with_quality(
                Cursor::new(&mut buf),
                CompressionType::Best,
                FilterType::Adaptive,
            );
            img.write_with_encoder(encoder)?;
        }
        OutputFormat::Jpeg => {
            // The encoder's scale starts at 1.
            let quality = quality.clamp(1, 100);
            let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buf), quality);
            img.write_with_encoder(encoder)?;
        }
    }
    debug!(
        "Encoded {}x{} poster → {} bytes {}",
        img.width(),
        img.height(),
        buf.len(),
        format
    );
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn sample() -> RgbImage {
        RgbImage::from_fn(37, 23, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 11 % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    #[test]
    fn png_is_lossless() {
        let img = sample();
        let bytes = encode_poster(&img, OutputFormat::Png, 0).expect("encode should succeed");
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png)
            .unwrap()
            .into_rgb8();
        assert_eq!(decoded.dimensions(), img.dimensions());
        assert_eq!(decoded.as_raw(), img.as_raw());
    }

    #[test]
    fn jpeg_at_full_quality_is_close() {
        let img = RgbImage::from_fn(64, 64, |x, _| {
            if x < 32 {
                Rgb([250, 250, 250])
            } else {
                Rgb([20, 40, 200])
            }
        });
        let bytes = encode_poster(&img, OutputFormat::Jpeg, 100).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Jpeg)
            .unwrap()
            .into_rgb8();
        assert_eq!(decoded.dimensions(), img.dimensions());

        let total: u64 = decoded
            .as_raw()
            .iter()
            .zip(img.as_raw())
            .map(|(a, b)| u64::from(a.abs_diff(*b)))
            .sum();
        let mean = total as f64 / img.as_raw().len() as f64;
        assert!(mean < 4.0, "mean abs error {mean}");
    }

    /// Sampling factor byte of each component in the baseline frame header.
    fn sof0_sampling(jpeg: &[u8]) -> Vec<u8> {
        let mut i = 2; // past SOI
        while i + 4 <= jpeg.len() {
            assert_eq!(jpeg[i], 0xFF, "marker expected at {i}");
            let marker = jpeg[i + 1];
            let len = usize::from(u16::from_be_bytes([jpeg[i + 2], jpeg[i + 3]]));
            if marker == 0xC0 {
                // len(2) precision(1) height(2) width(2) count(1), then id/sampling/table
                let count = usize::from(jpeg[i + 9]);
                return (0..count).map(|c| jpeg[i + 10 + c * 3 + 1]).collect();
            }
            i += 2 + len;
        }
        panic!("no SOF0 marker");
    }

    #[test]
    fn jpeg_keeps_full_chroma_resolution() {
        for quality in [50, 95] {
            let bytes = encode_poster(&sample(), OutputFormat::Jpeg, quality).unwrap();
            assert_eq!(sof0_sampling(&bytes), vec![0x11, 0x11, 0x11], "q={quality}");
        }
    }

    #[test]
    fn jpeg_quality_zero_is_accepted() {
        let bytes = encode_poster(&sample(), OutputFormat::Jpeg, 0).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn lower_quality_is_smaller() {
        let img = sample();
        let low = encode_poster(&img, OutputFormat::Jpeg, 10).unwrap();
        let high = encode_poster(&img, OutputFormat::Jpeg, 100).unwrap();
        assert!(low.len() < high.len());
    }
}
