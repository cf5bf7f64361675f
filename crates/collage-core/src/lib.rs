//! Collage Core - tile a directory of images into one picture
//!
//! The pipeline has three stages, run in order on one thread:
//!
//! 1. [`select`] lists a directory, filters by extension, orders by creation
//!    time, decodes, and drops images too small for a cell.
//! 2. [`layout`] assigns each image a square cell in a fixed-column grid and
//!    computes an aspect-preserving, centered destination rectangle.
//! 3. [`render`] and [`encode`] draw the placements onto a canvas and write
//!    PNG or JPEG.
//!
//! The layout stage is pure and generic over [`layout::Dimensions`], so it
//! can be driven without touching the filesystem.

pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod render;
pub mod select;

pub use config::CollageConfig;
pub use encode::OutputFormat;
pub use error::CollageError;
pub use layout::{compute_layout, fit_within, CanvasSpec, GridConfig, Layout, Placement, Rect};
pub use pipeline::{build_collage, create_collage, write_output, CollageReport};
pub use render::{render, FilterType, RenderOptions};
pub use select::{select_images, select_images_by, DecodePolicy, ImageRef, SelectOptions};
