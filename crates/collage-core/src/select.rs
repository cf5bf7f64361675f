//! Source image selection.
//!
//! Lists a directory (non-recursively), keeps files with a recognized image
//! extension, orders them, decodes them, and drops images too small to be
//! worth a cell. Every image is fully decoded before layout starts because
//! the layout needs the final count and every image's dimensions up front.

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::decode::{decode_file, DecodeError};
use crate::layout::Dimensions;

/// Errors produced while selecting source images.
#[derive(Debug, Error)]
pub enum SelectError {
    /// The source path does not exist or is not a directory.
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Listing the directory or reading file metadata failed.
    #[error("Failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A candidate file could not be decoded and the policy is to abort.
    #[error("Failed to decode {}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
}

/// What to do when a candidate file fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// Stop the whole run with an error.
    #[default]
    Abort,
    /// Log a warning and leave the file out of the collage.
    Skip,
}

/// Options controlling which files become collage cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectOptions {
    /// Accepted file extensions, compared case-insensitively, without the dot.
    pub extensions: Vec<String>,
    /// Images must be strictly larger than this in both dimensions.
    pub min_dimension: u32,
    pub decode_policy: DecodePolicy,
    /// Honor the EXIF orientation tag when decoding.
    pub apply_orientation: bool,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["jpg".to_string(), "jpeg".to_string(), "png".to_string()],
            min_dimension: Self::DEFAULT_MIN_DIMENSION,
            decode_policy: DecodePolicy::default(),
            apply_orientation: true,
        }
    }
}

impl SelectOptions {
    pub const DEFAULT_MIN_DIMENSION: u32 = 32;

    /// True if the path's extension is one of the accepted ones.
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// True if an image of this size is kept.
    pub fn is_large_enough(&self, width: u32, height: u32) -> bool {
        width > self.min_dimension && height > self.min_dimension
    }
}

/// A decoded source image and the file it came from.
#[derive(Debug, Clone)]
pub struct ImageRef {
    path: PathBuf,
    image: DynamicImage,
}

impl ImageRef {
    pub fn new(path: impl Into<PathBuf>, image: DynamicImage) -> Self {
        Self {
            path: path.into(),
            image,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

impl Dimensions for ImageRef {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

/// A file that passed the extension filter, before decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    /// Creation time, or modification time where creation is not recorded.
    pub created: SystemTime,
}

/// Default ordering: oldest first, ties broken by path.
pub fn by_creation_time(a: &Candidate, b: &Candidate) -> Ordering {
    a.created
        .cmp(&b.created)
        .then_with(|| a.path.cmp(&b.path))
}

/// List the files in `dir` that have an accepted extension.
///
/// The result is in directory order, which is unspecified.
///
/// # Errors
///
/// Returns `SelectError::DirectoryNotFound` if `dir` is missing or not a
/// directory, and `SelectError::Io` if listing or metadata reads fail.
pub fn list_candidates(dir: &Path, options: &SelectOptions) -> Result<Vec<Candidate>, SelectError> {
    if !dir.is_dir() {
        return Err(SelectError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error(dir))? {
        let entry = entry.map_err(io_error(dir))?;
        let path = entry.path();
        if !options.accepts(&path) {
            continue;
        }

        // Follows symlinks, so a link to an image counts as a file
        let metadata = fs::metadata(&path).map_err(io_error(&path))?;
        if !metadata.is_file() {
            continue;
        }

        let created = metadata
            .created()
            .or_else(|_| metadata.modified())
            .map_err(io_error(&path))?;
        candidates.push(Candidate { path, created });
    }

    debug!(dir = %dir.display(), count = candidates.len(), "listed candidates");
    Ok(candidates)
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> SelectError {
    let path = path.to_path_buf();
    move |source| SelectError::Io { path, source }
}

/// Select, order and decode the images in `dir`, oldest first.
pub fn select_images(dir: &Path, options: &SelectOptions) -> Result<Vec<ImageRef>, SelectError> {
    select_images_by(dir, options, by_creation_time)
}

/// Like [`select_images`], with a caller-supplied ordering.
///
/// The sort is stable, so candidates the comparator considers equal keep
/// their directory order.
pub fn select_images_by<F>(
    dir: &Path,
    options: &SelectOptions,
    mut compare: F,
) -> Result<Vec<ImageRef>, SelectError>
where
    F: FnMut(&Candidate, &Candidate) -> Ordering,
{
    let mut candidates = list_candidates(dir, options)?;
    candidates.sort_by(|a, b| compare(a, b));

    let total = candidates.len();
    let mut images = Vec::with_capacity(total);
    for Candidate { path, .. } in candidates {
        let image = match decode_file(&path, options.apply_orientation) {
            Ok(image) => image,
            Err(source) => match options.decode_policy {
                DecodePolicy::Abort => return Err(SelectError::Decode { path, source }),
                DecodePolicy::Skip => {
                    warn!(path = %path.display(), error = %source, "skipping undecodable image");
                    continue;
                }
            },
        };

        if !options.is_large_enough(image.width(), image.height()) {
            debug!(
                path = %path.display(),
                width = image.width(),
                height = image.height(),
                "skipping small image"
            );
            continue;
        }

        images.push(ImageRef::new(path, image));
    }

    info!(
        dir = %dir.display(),
        candidates = total,
        selected = images.len(),
        "selected images"
    );
    Ok(images)
}
