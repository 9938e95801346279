//! Shrinks scan images before they are uploaded.
//!
//! Data URIs longer than [`COMPRESS_THRESHOLD_CHARS`] are decoded, scaled
//! down to at most [`MAX_WIDTH`] pixels wide and re-encoded as JPEG.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use acure_core::{AcureError, Result};

pub const COMPRESS_THRESHOLD_CHARS: usize = 500_000;
pub const MAX_WIDTH: u32 = 600;
pub const JPEG_QUALITY: u8 = 60;

const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// Re-encodes a base64 data URI as a JPEG no wider than `max_width`,
/// keeping the aspect ratio.
pub fn compress_data_uri(data_uri: &str, quality: u8, max_width: u32) -> Result<String> {
    let (_, payload) = data_uri
        .split_once(";base64,")
        .ok_or_else(|| AcureError::validation("Image is not a base64 data URI"))?;
    let bytes = BASE64_STANDARD
        .decode(payload.trim())
        .map_err(|e| AcureError::internal(format!("Failed to decode image data: {}", e)))?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| AcureError::internal(format!("Failed to load image: {}", e)))?;

    let (width, height) = decoded.dimensions();
    let resized = if width > max_width {
        let scaled = (u64::from(height) * u64::from(max_width) / u64::from(width)).max(1);
        let scaled = u32::try_from(scaled).unwrap_or(u32::MAX);
        decoded.resize_exact(max_width, scaled, FilterType::Triangle)
    } else {
        decoded
    };

    // JPEG carries no alpha channel
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());
    let mut jpeg = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, quality))
        .map_err(|e| AcureError::internal(format!("Failed to encode JPEG: {}", e)))?;

    Ok(format!("{}{}", JPEG_DATA_URI_PREFIX, BASE64_STANDARD.encode(&jpeg)))
}

/// The image to upload in place of `image_ref`, or `None` to upload it as is.
///
/// Small images are left alone. A failed compression also yields `None`.
pub fn compress_for_upload(image_ref: &str) -> Option<String> {
    if image_ref.len() <= COMPRESS_THRESHOLD_CHARS {
        return None;
    }

    match compress_data_uri(image_ref, JPEG_QUALITY, MAX_WIDTH) {
        Ok(compressed) => {
            tracing::info!(
                "Image compressed from {} to {} chars",
                image_ref.len(),
                compressed.len()
            );
            Some(compressed)
        }
        Err(e) => {
            tracing::warn!("Image compression failed, uploading original: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_data_uri(image: DynamicImage) -> String {
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png).unwrap();
        format!("data:image/png;base64,{}", BASE64_STANDARD.encode(&png))
    }

    /// Pixel noise, so PNG cannot shrink it.
    fn noisy_data_uri(width: u32, height: u32) -> String {
        let mut state: u32 = 0x9e37_79b9;
        let image = RgbImage::from_fn(width, height, |_, _| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let [r, g, b, _] = state.to_le_bytes();
            Rgb([r, g, b])
        });
        png_data_uri(DynamicImage::ImageRgb8(image))
    }

    fn decode(data_uri: &str) -> DynamicImage {
        let payload = data_uri.strip_prefix(JPEG_DATA_URI_PREFIX).unwrap();
        image::load_from_memory(&BASE64_STANDARD.decode(payload).unwrap()).unwrap()
    }

    #[test]
    fn test_wide_image_is_scaled_to_max_width() {
        let source = png_data_uri(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            1200,
            300,
            Rgba([200, 40, 40, 128]),
        )));

        let compressed = compress_data_uri(&source, JPEG_QUALITY, MAX_WIDTH).unwrap();
        assert!(compressed.starts_with(JPEG_DATA_URI_PREFIX));
        assert_eq!(decode(&compressed).dimensions(), (600, 150));
    }

    #[test]
    fn test_narrow_image_keeps_its_size() {
        let source = png_data_uri(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            320,
            240,
            Rgb([10, 20, 30]),
        )));

        let compressed = compress_data_uri(&source, JPEG_QUALITY, MAX_WIDTH).unwrap();
        assert_eq!(decode(&compressed).dimensions(), (320, 240));
    }

    #[test]
    fn test_not_a_data_uri_is_rejected() {
        let err = compress_data_uri("https://example.com/a.png", JPEG_QUALITY, MAX_WIDTH).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_small_images_are_uploaded_as_is() {
        assert_eq!(compress_for_upload("data:image/png;base64,AAAA"), None);
        assert_eq!(compress_for_upload(""), None);
    }

    #[test]
    fn test_large_image_is_compressed_for_upload() {
        let source = noisy_data_uri(900, 400);
        assert!(source.len() > COMPRESS_THRESHOLD_CHARS);

        let compressed = compress_for_upload(&source).unwrap();
        assert!(compressed.len() < source.len());
        assert_eq!(decode(&compressed).dimensions(), (600, 266));
    }

    #[test]
    fn test_undecodable_large_image_falls_back_to_original() {
        let garbage = format!("data:image/png;base64,{}", "A".repeat(COMPRESS_THRESHOLD_CHARS + 4));
        assert_eq!(compress_for_upload(&garbage), None);
    }
}
