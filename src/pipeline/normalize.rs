//! Image normalization: arbitrary upload bytes → bounded JPEG.
//!
//! Vision APIs accept inline base64 image data, but request bodies have hard
//! size limits and oversized images waste model tokens without improving
//! legibility of printed text. This stage decodes whatever the client sent
//! (PNG, JPEG, WebP header — anything the `image` crate sniffs), shrinks it
//! so neither edge exceeds the configured bound, and re-encodes as JPEG.
//!
//! "Fit inside" semantics: shrink-to-fit with aspect ratio preserved, no
//! crop, no padding, and never any upscaling of smaller inputs.

use crate::error::ExtractError;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::GenericImageView;
use tracing::debug;

/// A re-encoded JPEG bounded to the configured pixel footprint.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    /// JPEG-encoded bytes.
    pub data: Vec<u8>,
    /// Final width in pixels.
    pub width: u32,
    /// Final height in pixels.
    pub height: u32,
}

impl NormalizedImage {
    /// MIME type declared when the image is sent to the model.
    pub const MIME_TYPE: &'static str = "image/jpeg";
}

/// Decode `bytes`, shrink so both edges fit within `max_edge`, and re-encode
/// as JPEG at `quality`.
///
/// Fails with [`ExtractError::ImageDecode`] when the bytes are not a
/// decodable image, and [`ExtractError::ImageEncode`] if JPEG encoding
/// fails.
pub fn normalize_image(
    bytes: &[u8],
    max_edge: u32,
    quality: u8,
) -> Result<NormalizedImage, ExtractError> {
    let mut img =
        image::load_from_memory(bytes).map_err(|source| ExtractError::ImageDecode { source })?;

    let (width, height) = img.dimensions();
    let longest_edge = width.max(height);

    if longest_edge > max_edge {
        let scale = max_edge as f32 / longest_edge as f32;
        let target_width = ((width as f32 * scale).round() as u32).max(1);
        let target_height = ((height as f32 * scale).round() as u32).max(1);
        img = img.resize(target_width, target_height, FilterType::CatmullRom);
    }

    let (final_width, final_height) = img.dimensions();

    // JPEG has no alpha channel; flatten before encoding.
    let rgb = img.to_rgb8();
    let mut buffer = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .encode_image(&rgb)
        .map_err(|source| ExtractError::ImageEncode { source })?;

    debug!(
        "Normalized image {}x{} → {}x{} ({} JPEG bytes)",
        width,
        height,
        final_width,
        final_height,
        buffer.len()
    );

    Ok(NormalizedImage {
        data: buffer,
        width: final_width,
        height: final_height,
    })
}
