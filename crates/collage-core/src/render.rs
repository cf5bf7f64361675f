//! Collage rendering.
//!
//! Allocates a canvas of the layout's size, scales each source image to its
//! destination rectangle and composites it in place. Sources with an alpha
//! channel are blended over the background; the result is always opaque RGB.

use image::{imageops, DynamicImage, RgbImage, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::layout::Layout;
use crate::select::ImageRef;

/// Filter type for scaling sources into their cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> imageops::FilterType {
        match self {
            FilterType::Nearest => imageops::FilterType::Nearest,
            FilterType::Bilinear => imageops::FilterType::Triangle,
            FilterType::Lanczos3 => imageops::FilterType::Lanczos3,
        }
    }
}

/// Rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub filter: FilterType,
    /// Fill for the canvas behind and between images.
    pub background: [u8; 3],
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            filter: FilterType::default(),
            background: [0, 0, 0],
        }
    }
}

/// Access to the pixels a placement draws.
pub trait SourceImage {
    fn source_image(&self) -> &DynamicImage;
}

impl SourceImage for DynamicImage {
    fn source_image(&self) -> &DynamicImage {
        self
    }
}

impl SourceImage for ImageRef {
    fn source_image(&self) -> &DynamicImage {
        self.image()
    }
}

/// Draw every placement of `layout` onto a fresh canvas.
///
/// Empty destination rectangles (an extreme aspect ratio rounded down to
/// zero pixels) are skipped.
pub fn render<T: SourceImage>(layout: &Layout<'_, T>, options: &RenderOptions) -> RgbImage {
    let [r, g, b] = options.background;
    let mut canvas = RgbaImage::from_pixel(
        layout.canvas.width,
        layout.canvas.height,
        Rgba([r, g, b, 255]),
    );
    let filter = options.filter.to_image_filter();

    for placement in &layout.placements {
        let dest = placement.dest;
        if dest.is_empty() {
            debug!(index = placement.index, "skipping empty destination");
            continue;
        }

        let scaled = placement
            .image
            .source_image()
            .resize_exact(dest.width, dest.height, filter)
            .into_rgba8();
        imageops::overlay(&mut canvas, &scaled, i64::from(dest.x), i64::from(dest.y));
    }

    info!(
        width = layout.canvas.width,
        height = layout.canvas.height,
        images = layout.len(),
        "rendered collage"
    );
    DynamicImage::ImageRgba8(canvas).into_rgb8()
}
