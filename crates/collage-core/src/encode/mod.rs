//! Collage encoding.
//!
//! This module provides functionality for:
//! - Choosing PNG or JPEG from the output file name
//! - Encoding RGB pixel data to either format
//!
//! Both encoders validate the pixel buffer against the stated dimensions and
//! reject zero-area images, so an empty collage fails here rather than
//! producing an unreadable file.

mod jpeg;
mod png;
mod types;

use image::RgbImage;

pub use jpeg::{encode_jpeg, DEFAULT_JPEG_QUALITY};
pub use png::encode_png;
pub use types::{EncodeError, OutputFormat};

/// Encode a rendered canvas in the given format.
///
/// `quality` only applies to JPEG.
pub fn encode(canvas: &RgbImage, format: OutputFormat, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = canvas.dimensions();
    match format {
        OutputFormat::Png => encode_png(canvas.as_raw(), width, height),
        OutputFormat::Jpeg => encode_jpeg(canvas.as_raw(), width, height, quality),
    }
}
