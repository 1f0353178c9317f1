//! Upload image processing.
//!
//! Decodes an uploaded image, re-encodes it as JPEG bounded to
//! [`MAX_IMAGE_EDGE`], and renders a smaller thumbnail, both as base64 data
//! URIs ready to store inline and to send to the embedding API.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;

/// Longest edge of the stored display image.
pub const MAX_IMAGE_EDGE: u32 = 1024;

/// Longest edge of the stored thumbnail.
pub const THUMBNAIL_EDGE: u32 = 256;

const JPEG_QUALITY: u8 = 85;

/// A decoded upload, re-encoded for storage.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    /// Display-sized JPEG as a `data:image/jpeg;base64,` URI.
    pub image_uri: String,
    /// Thumbnail JPEG as a data URI.
    pub thumbnail_uri: String,
    /// Width of the original upload in pixels.
    pub width: u32,
    /// Height of the original upload in pixels.
    pub height: u32,
    /// Size of the original upload in bytes.
    pub size_bytes: u64,
}

/// Decode `bytes`, convert to RGB, and produce display and thumbnail
/// renditions. Fails on anything the `image` crate cannot decode, which is
/// what rejects non-image uploads.
pub fn process_image(bytes: &[u8]) -> Result<ProcessedImage> {
    let decoded = image::load_from_memory(bytes).context("failed to decode image")?;
    let (width, height) = (decoded.width(), decoded.height());

    // JPEG has no alpha channel, so flatten to RGB before encoding.
    let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());

    let display = fit_within(&rgb, MAX_IMAGE_EDGE);
    let thumb = fit_within(&rgb, THUMBNAIL_EDGE);

    Ok(ProcessedImage {
        image_uri: encode_jpeg_data_uri(display.as_ref().unwrap_or(&rgb))?,
        thumbnail_uri: encode_jpeg_data_uri(thumb.as_ref().unwrap_or(&rgb))?,
        width,
        height,
        size_bytes: bytes.len() as u64,
    })
}

/// Downscale to fit within `edge` x `edge`, preserving aspect ratio.
/// Returns `None` when the image already fits (never upscales).
fn fit_within(img: &DynamicImage, edge: u32) -> Option<DynamicImage> {
    if img.width() > edge || img.height() > edge {
        Some(img.thumbnail(edge, edge))
    } else {
        None
    }
}

fn encode_jpeg_data_uri(img: &DynamicImage) -> Result<String> {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    img.write_with_encoder(encoder)
        .context("failed to encode JPEG")?;
    Ok(format!("data:image/jpeg;base64,{}", BASE64.encode(&buf)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn sample_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn decode_data_uri(uri: &str) -> DynamicImage {
        let b64 = uri
            .strip_prefix("data:image/jpeg;base64,")
            .expect("jpeg data uri prefix");
        let bytes = BASE64.decode(b64).unwrap();
        image::load_from_memory(&bytes).unwrap()
    }

    #[test]
    fn small_image_keeps_dimensions() {
        let bytes = sample_png(64, 48);
        let processed = process_image(&bytes).unwrap();

        assert_eq!(processed.width, 64);
        assert_eq!(processed.height, 48);
        assert_eq!(processed.size_bytes, bytes.len() as u64);

        let display = decode_data_uri(&processed.image_uri);
        assert_eq!((display.width(), display.height()), (64, 48));
    }

    #[test]
    fn oversized_image_is_bounded() {
        let bytes = sample_png(2048, 512);
        let processed = process_image(&bytes).unwrap();

        // Original dimensions are what gets recorded
        assert_eq!(processed.width, 2048);
        assert_eq!(processed.height, 512);

        let display = decode_data_uri(&processed.image_uri);
        assert!(display.width() <= MAX_IMAGE_EDGE);
        assert!(display.height() <= MAX_IMAGE_EDGE);
        // Aspect ratio preserved (4:1)
        assert_eq!(display.width(), 1024);
        assert_eq!(display.height(), 256);
    }

    #[test]
    fn thumbnail_is_smaller_than_display() {
        let bytes = sample_png(800, 600);
        let processed = process_image(&bytes).unwrap();

        let thumb = decode_data_uri(&processed.thumbnail_uri);
        assert!(thumb.width() <= THUMBNAIL_EDGE);
        assert!(thumb.height() <= THUMBNAIL_EDGE);
    }

    #[test]
    fn rejects_non_image_bytes() {
        let err = process_image(b"definitely not an image").unwrap_err();
        assert!(err.to_string().contains("decode"));
    }
}
