//! Collage configuration.
//!
//! One `CollageConfig` describes a whole run. Defaults give an 8-column grid
//! of 128 px cells written to `collage.png`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::encode::{OutputFormat, DEFAULT_JPEG_QUALITY};
use crate::layout::GridConfig;
use crate::render::RenderOptions;
use crate::select::SelectOptions;

pub const DEFAULT_OUTPUT: &str = "collage.png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollageConfig {
    /// Directory the source images are read from.
    pub directory: PathBuf,
    pub grid: GridConfig,
    /// Output path; its extension picks the format.
    pub output: PathBuf,
    /// JPEG quality (1-100); ignored for PNG.
    pub quality: u8,
    pub select: SelectOptions,
    pub render: RenderOptions,
}

impl Default for CollageConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            grid: GridConfig::default(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            quality: DEFAULT_JPEG_QUALITY,
            select: SelectOptions::default(),
            render: RenderOptions::default(),
        }
    }
}

impl CollageConfig {
    /// Config for `directory` with every other setting at its default.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from_path(&self.output)
    }
}
