//! Decoding encoded bytes and files into pixel buffers.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageError, ImageReader};
use tracing::debug;

use super::{apply_orientation, read_orientation, DecodeError};

/// Decode an image from bytes, guessing the format from its contents.
///
/// When `orient` is set, the EXIF orientation tag is honored so the result
/// is upright.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format is not recognized.
/// Returns `DecodeError::CorruptedFile` if decoding fails partway.
pub fn decode_image(bytes: &[u8], orient: bool) -> Result<DynamicImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::IoError(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader.decode().map_err(|e| match e {
        ImageError::Unsupported(_) => DecodeError::InvalidFormat,
        other => DecodeError::CorruptedFile(other.to_string()),
    })?;

    if !orient {
        return Ok(img);
    }

    let orientation = read_orientation(bytes);
    if orientation.swaps_dimensions() {
        let (width, height) = orientation.oriented_dimensions(img.width(), img.height());
        debug!(?orientation, width, height, "orientation swaps width and height");
    }
    Ok(apply_orientation(img, orientation))
}

/// Read and decode an image file.
pub fn decode_file(path: &Path, orient: bool) -> Result<DynamicImage, DecodeError> {
    let bytes = std::fs::read(path).map_err(|e| DecodeError::IoError(e.to_string()))?;
    decode_image(&bytes, orient)
}
