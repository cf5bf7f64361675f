//! The decode-all, layout, render-all pipeline.
//!
//! Stages run strictly in sequence on one thread. Selection happens first
//! (see [`crate::select`]); the functions here take the selected images the
//! rest of the way to bytes on disk.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::CollageConfig;
use crate::encode::{encode, OutputFormat};
use crate::error::CollageError;
use crate::layout::{compute_layout, CanvasSpec};
use crate::render::render;
use crate::select::{select_images, ImageRef};

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollageReport {
    pub image_count: usize,
    pub canvas: CanvasSpec,
    pub format: OutputFormat,
    pub bytes: usize,
}

/// Lay out, render and encode `images`.
///
/// # Errors
///
/// `InvalidArgument` for a bad grid, `EncodeFailure` if the canvas cannot be
/// encoded (including the zero-height canvas of an empty image list).
pub fn build_collage(
    images: &[ImageRef],
    config: &CollageConfig,
) -> Result<(Vec<u8>, CollageReport), CollageError> {
    let layout = compute_layout(images, &config.grid)?;
    let canvas = render(&layout, &config.render);

    let format = config.output_format();
    let bytes = encode(&canvas, format, config.quality)?;

    let report = CollageReport {
        image_count: layout.len(),
        canvas: layout.canvas,
        format,
        bytes: bytes.len(),
    };
    info!(
        images = report.image_count,
        width = report.canvas.width,
        height = report.canvas.height,
        %format,
        bytes = report.bytes,
        "encoded collage"
    );
    Ok((bytes, report))
}

/// Write encoded bytes to `path`, replacing any existing file.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<(), CollageError> {
    fs::write(path, bytes).map_err(|source| CollageError::WriteFailure {
        path: path.to_path_buf(),
        source,
    })
}

/// Run the whole pipeline for `config`.
///
/// # Errors
///
/// `NoImages` if selection leaves nothing to draw; nothing is written then.
pub fn create_collage(config: &CollageConfig) -> Result<CollageReport, CollageError> {
    let images = select_images(&config.directory, &config.select)?;
    if images.is_empty() {
        return Err(CollageError::NoImages(config.directory.clone()));
    }
    let (bytes, report) = build_collage(&images, config)?;
    write_output(&config.output, &bytes)?;
    Ok(report)
}
