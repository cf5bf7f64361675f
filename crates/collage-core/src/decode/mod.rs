//! Image decoding for collage sources.
//!
//! This module provides functionality for:
//! - Decoding PNG and JPEG files into `image::DynamicImage`
//! - Reading the EXIF orientation tag and rotating the pixels upright
//!
//! Orientation is applied at decode time so that every later stage (size
//! filtering, layout, rendering) sees the dimensions a viewer would display.

mod file;
mod orientation;
mod types;

pub use file::{decode_file, decode_image};
pub use orientation::{apply_orientation, read_orientation};
pub use types::{DecodeError, Orientation};
