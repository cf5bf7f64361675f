//! PNG encoding using the `image` crate's PNG encoder.

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::types::check_rgb_buffer;
use super::{EncodeError, OutputFormat};

/// Encode RGB pixel data to PNG bytes.
///
/// # Errors
///
/// Returns `EncodeError::InvalidDimensions` for a zero width or height and
/// `EncodeError::InvalidPixelData` if `pixels` is not `width * height * 3`
/// bytes long.
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    check_rgb_buffer(pixels, width, height)?;

    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: OutputFormat::Png,
            message: e.to_string(),
        })?;

    Ok(buffer)
}
