//! Grid layout for collages.
//!
//! Given an ordered list of images and a [`GridConfig`], this module decides
//! where every image lands on the output canvas and at what size.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner of the canvas
//! - Cells are square, `cell_size` pixels on a side
//! - Cells are filled row-major: image `i` goes to column `i % columns`,
//!   row `i / columns`
//!
//! # Fit Policy
//!
//! Each image is scaled so its longer axis exactly spans the cell and is
//! centered along the shorter axis. Images are never cropped. A landscape
//! image (`width > height`) spans the full cell width; portrait and square
//! images span the full cell height.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors produced while computing a layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A grid parameter or image dimension is out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Anything with known pixel dimensions can be laid out.
pub trait Dimensions {
    /// Returns `(width, height)` in pixels.
    fn dimensions(&self) -> (u32, u32);
}

impl Dimensions for (u32, u32) {
    fn dimensions(&self) -> (u32, u32) {
        *self
    }
}

impl Dimensions for image::DynamicImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

/// Grid parameters for one collage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of cells per row.
    pub columns: u32,
    /// Edge length of each square cell in pixels.
    pub cell_size: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: Self::DEFAULT_COLUMNS,
            cell_size: Self::DEFAULT_CELL_SIZE,
        }
    }
}

impl GridConfig {
    pub const DEFAULT_COLUMNS: u32 = 8;
    pub const DEFAULT_CELL_SIZE: u32 = 128;

    /// Create a validated grid configuration.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::InvalidArgument` if either value is zero.
    pub fn new(columns: u32, cell_size: u32) -> Result<Self, LayoutError> {
        let config = Self { columns, cell_size };
        config.validate()?;
        Ok(config)
    }

    /// Check that both grid parameters are positive.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.columns == 0 {
            return Err(LayoutError::InvalidArgument(
                "columns must be greater than zero".to_string(),
            ));
        }
        if self.cell_size == 0 {
            return Err(LayoutError::InvalidArgument(
                "cell size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Compute the canvas needed to hold `count` images.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::InvalidArgument` if the configuration is invalid
    /// or the canvas would not fit in `u32` pixel coordinates.
    pub fn canvas_for(&self, count: usize) -> Result<CanvasSpec, LayoutError> {
        self.validate()?;

        let rows = u32::try_from(count.div_ceil(self.columns as usize)).map_err(|_| {
            LayoutError::InvalidArgument(format!("too many images for one canvas: {count}"))
        })?;
        let width = self.columns.checked_mul(self.cell_size);
        let height = rows.checked_mul(self.cell_size);

        match (width, height) {
            (Some(width), Some(height)) => Ok(CanvasSpec {
                width,
                height,
                rows,
            }),
            _ => Err(LayoutError::InvalidArgument(format!(
                "canvas of {} columns x {rows} rows at {}px does not fit in u32",
                self.columns, self.cell_size
            ))),
        }
    }
}

/// Output canvas size, derived from the grid and the image count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CanvasSpec {
    pub width: u32,
    pub height: u32,
    pub rows: u32,
}

impl CanvasSpec {
    /// A canvas with no rows has no pixels to encode.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u64 {
        u64::from(self.x) + u64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        u64::from(self.y) + u64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True if `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Grid address of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub column: u32,
    pub row: u32,
}

impl Cell {
    /// Top-left pixel of this cell.
    pub fn origin(&self, cell_size: u32) -> (u32, u32) {
        (self.column * cell_size, self.row * cell_size)
    }

    /// Full pixel extent of this cell.
    pub fn rect(&self, cell_size: u32) -> Rect {
        let (x, y) = self.origin(cell_size);
        Rect::new(x, y, cell_size, cell_size)
    }
}

/// Map a sequential image index to its row-major cell.
///
/// `columns` must be non-zero.
pub fn cell_for_index(index: usize, columns: u32) -> Cell {
    let columns = columns as usize;
    Cell {
        column: (index % columns) as u32,
        row: (index / columns) as u32,
    }
}

/// Fit a `width x height` image into a square cell, preserving aspect ratio.
///
/// The returned rectangle is relative to the cell's top-left corner. Ties
/// (`width == height`) take the portrait branch. A degenerate 0x0 source
/// yields an empty rectangle.
pub fn fit_within(width: u32, height: u32, cell_size: u32) -> Rect {
    let cell = u64::from(cell_size);

    if width > height {
        let dest_height = (cell * u64::from(height) / u64::from(width)) as u32;
        Rect::new(0, (cell_size - dest_height) / 2, cell_size, dest_height)
    } else if height == 0 {
        Rect::default()
    } else {
        let dest_width = (cell * u64::from(width) / u64::from(height)) as u32;
        Rect::new((cell_size - dest_width) / 2, 0, dest_width, cell_size)
    }
}

/// Where one image goes on the canvas.
#[derive(Debug)]
pub struct Placement<'a, T> {
    /// Position of the image in the input sequence.
    pub index: usize,
    pub image: &'a T,
    pub cell: Cell,
    /// Destination rectangle in canvas coordinates.
    pub dest: Rect,
}

/// A computed collage layout: the canvas plus one placement per image.
#[derive(Debug)]
pub struct Layout<'a, T> {
    pub grid: GridConfig,
    pub canvas: CanvasSpec,
    pub placements: Vec<Placement<'a, T>>,
}

impl<'a, T> Layout<'a, T> {
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Build an owned, serializable view of this layout.
    ///
    /// `label` names each source image in the plan (typically its path).
    pub fn plan<F>(&self, mut label: F) -> LayoutPlan
    where
        F: FnMut(&T) -> String,
    {
        LayoutPlan {
            grid: self.grid,
            canvas: self.canvas,
            placements: self
                .placements
                .iter()
                .map(|p| PlanEntry {
                    index: p.index,
                    source: label(p.image),
                    cell: p.cell,
                    dest: p.dest,
                })
                .collect(),
        }
    }
}

/// Serializable snapshot of a [`Layout`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPlan {
    pub grid: GridConfig,
    pub canvas: CanvasSpec,
    pub placements: Vec<PlanEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub index: usize,
    pub source: String,
    pub cell: Cell,
    pub dest: Rect,
}

/// Compute the canvas size and a placement for every image.
///
/// Placements are returned in input order; no image is dropped.
///
/// # Errors
///
/// Returns `LayoutError::InvalidArgument` if the grid is invalid, the canvas
/// would overflow, or any image has a zero dimension.
pub fn compute_layout<'a, T: Dimensions>(
    images: &'a [T],
    config: &GridConfig,
) -> Result<Layout<'a, T>, LayoutError> {
    let canvas = config.canvas_for(images.len())?;

    let placements = images
        .iter()
        .enumerate()
        .map(|(index, image)| {
            let (width, height) = image.dimensions();
            if width == 0 || height == 0 {
                return Err(LayoutError::InvalidArgument(format!(
                    "image {index} has an empty dimension ({width}x{height})"
                )));
            }

            let cell = cell_for_index(index, config.columns);
            let (origin_x, origin_y) = cell.origin(config.cell_size);
            let fit = fit_within(width, height, config.cell_size);
            let dest = Rect::new(origin_x + fit.x, origin_y + fit.y, fit.width, fit.height);

            debug!(
                index,
                column = cell.column,
                row = cell.row,
                x = dest.x,
                y = dest.y,
                width = dest.width,
                height = dest.height,
                "placed image"
            );

            Ok(Placement {
                index,
                image,
                cell,
                dest,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Layout {
        grid: *config,
        canvas,
        placements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(columns: u32, cell_size: u32) -> GridConfig {
        GridConfig::new(columns, cell_size).unwrap()
    }

    #[test]
    fn test_grid_config_default() {
        let config = GridConfig::default();
        assert_eq!(config.columns, 8);
        assert_eq!(config.cell_size, 128);
    }

    #[test]
    fn test_grid_config_rejects_zero() {
        assert!(matches!(
            GridConfig::new(0, 128),
            Err(LayoutError::InvalidArgument(_))
        ));
        assert!(matches!(
            GridConfig::new(8, 0),
            Err(LayoutError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_compute_layout_validates_public_fields() {
        let config = GridConfig {
            columns: 0,
            cell_size: 128,
        };
        let images = [(100u32, 100u32)];
        assert!(compute_layout(&images, &config).is_err());
    }

    #[test]
    fn test_empty_input_gives_zero_height_canvas() {
        let images: [(u32, u32); 0] = [];
        let layout = compute_layout(&images, &grid(8, 128)).unwrap();

        assert_eq!(layout.canvas.width, 8 * 128);
        assert_eq!(layout.canvas.height, 0);
        assert_eq!(layout.canvas.rows, 0);
        assert!(layout.canvas.is_empty());
        assert!(layout.is_empty());
    }

    #[test]
    fn test_single_landscape_image() {
        let images = [(200u32, 100u32)];
        let layout = compute_layout(&images, &grid(8, 128)).unwrap();

        assert_eq!(layout.canvas.width, 1024);
        assert_eq!(layout.canvas.height, 128);
        let placement = &layout.placements[0];
        assert_eq!(placement.cell, Cell { column: 0, row: 0 });
        assert_eq!(placement.dest, Rect::new(0, 32, 128, 64));
    }

    #[test]
    fn test_single_portrait_image() {
        let images = [(100u32, 200u32)];
        let layout = compute_layout(&images, &grid(8, 128)).unwrap();

        assert_eq!(layout.placements[0].dest, Rect::new(32, 0, 64, 128));
    }

    #[test]
    fn test_square_image_fills_cell() {
        for cell_size in [1, 64, 100, 128, 333] {
            let rect = fit_within(64, 64, cell_size);
            assert_eq!(rect, Rect::new(0, 0, cell_size, cell_size));
        }
    }

    #[test]
    fn test_near_square_tie_break() {
        // 101x100 is landscape, 100x101 is portrait
        assert_eq!(fit_within(101, 100, 128), Rect::new(0, 1, 128, 126));
        assert_eq!(fit_within(100, 101, 128), Rect::new(1, 0, 126, 128));
    }

    #[test]
    fn test_fit_rounds_down_and_centers() {
        // 128 * 100 / 300 = 42.67 -> 42; (128 - 42) / 2 = 43
        assert_eq!(fit_within(300, 100, 128), Rect::new(0, 43, 128, 42));
        // (128 - 43) / 2 = 42.5 -> 42
        assert_eq!(fit_within(100, 297, 128), Rect::new(42, 0, 43, 128));
    }

    #[test]
    fn test_extreme_aspect_collapses_to_empty() {
        let rect = fit_within(1, 1000, 128);
        assert_eq!(rect.width, 0);
        assert_eq!(rect.height, 128);
        assert!(rect.is_empty());
    }

    #[test]
    fn test_wraps_to_next_row_after_full_row() {
        let images = vec![(100u32, 100u32); 10];
        let layout = compute_layout(&images, &grid(8, 128)).unwrap();

        assert_eq!(layout.canvas.rows, 2);
        assert_eq!(layout.canvas.height, 256);
        for (i, placement) in layout.placements.iter().take(8).enumerate() {
            assert_eq!(placement.cell, Cell { column: i as u32, row: 0 });
        }
        // A cursor that only bumps the row when the column hits 8, without
        // resetting the column, would put these at columns 8 and 9, past
        // the canvas edge.
        assert_eq!(layout.placements[8].cell, Cell { column: 0, row: 1 });
        assert_eq!(layout.placements[9].cell, Cell { column: 1, row: 1 });
        assert_eq!(layout.placements[9].dest, Rect::new(128, 128, 128, 128));
    }

    #[test]
    fn test_exact_row_count() {
        let config = grid(8, 10);
        assert_eq!(config.canvas_for(1).unwrap().rows, 1);
        assert_eq!(config.canvas_for(8).unwrap().rows, 1);
        assert_eq!(config.canvas_for(9).unwrap().rows, 2);
        assert_eq!(config.canvas_for(16).unwrap().rows, 2);
        assert_eq!(config.canvas_for(17).unwrap().rows, 3);
    }

    #[test]
    fn test_canvas_overflow_is_rejected() {
        let config = grid(u32::MAX, 2);
        assert!(matches!(
            config.canvas_for(1),
            Err(LayoutError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_zero_dimension_image_is_rejected() {
        let images = [(100u32, 100u32), (0u32, 50u32)];
        let err = compute_layout(&images, &grid(8, 128)).unwrap_err();
        assert!(err.to_string().contains("image 1"));
    }

    #[test]
    fn test_placements_reference_inputs_in_order() {
        let images = [(10u32, 20u32), (30u32, 40u32), (50u32, 60u32)];
        let layout = compute_layout(&images, &grid(2, 64)).unwrap();

        assert_eq!(layout.len(), 3);
        for (i, placement) in layout.placements.iter().enumerate() {
            assert_eq!(placement.index, i);
            assert!(std::ptr::eq(placement.image, &images[i]));
        }
    }

    #[test]
    fn test_cell_rect() {
        let cell = cell_for_index(11, 4);
        assert_eq!(cell, Cell { column: 3, row: 2 });
        assert_eq!(cell.rect(50), Rect::new(150, 100, 50, 50));
    }

    #[test]
    fn test_rect_contains() {
        let outer = Rect::new(10, 10, 100, 100);
        assert!(outer.contains(&Rect::new(10, 10, 100, 100)));
        assert!(outer.contains(&Rect::new(20, 30, 10, 10)));
        assert!(!outer.contains(&Rect::new(5, 10, 10, 10)));
        assert!(!outer.contains(&Rect::new(100, 10, 11, 10)));
    }

    #[test]
    fn test_plan_serializes_labels() {
        let images = [(200u32, 100u32), (100u32, 200u32)];
        let layout = compute_layout(&images, &grid(2, 128)).unwrap();
        let plan = layout.plan(|&(w, h)| format!("{w}x{h}"));

        assert_eq!(plan.canvas, layout.canvas);
        assert_eq!(plan.placements[0].source, "200x100");
        assert_eq!(plan.placements[1].dest, Rect::new(160, 0, 64, 128));

        let json = serde_json::to_string(&plan).unwrap();
        let back: LayoutPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for image dimensions (positive, wide range of aspect ratios).
    fn dimensions_strategy() -> impl Strategy<Value = (u32, u32)> {
        (1u32..=5000, 1u32..=5000)
    }

    fn images_strategy() -> impl Strategy<Value = Vec<(u32, u32)>> {
        prop::collection::vec(dimensions_strategy(), 0..=40)
    }

    fn grid_strategy() -> impl Strategy<Value = GridConfig> {
        (1u32..=12, 1u32..=512).prop_map(|(columns, cell_size)| GridConfig { columns, cell_size })
    }

    proptest! {
        /// Property: Every input image gets exactly one placement.
        #[test]
        fn prop_no_image_dropped(images in images_strategy(), config in grid_strategy()) {
            let layout = compute_layout(&images, &config).unwrap();
            prop_assert_eq!(layout.placements.len(), images.len());
        }

        /// Property: Canvas is an exact multiple of the cell size with ceil(n / cols) rows.
        #[test]
        fn prop_canvas_dimensions(images in images_strategy(), config in grid_strategy()) {
            let layout = compute_layout(&images, &config).unwrap();
            let expected_rows = images.len().div_ceil(config.columns as usize) as u32;

            prop_assert_eq!(layout.canvas.rows, expected_rows);
            prop_assert_eq!(layout.canvas.width, config.columns * config.cell_size);
            prop_assert_eq!(layout.canvas.height, expected_rows * config.cell_size);
        }

        /// Property: Destination rectangles stay inside their row-major cell and the canvas.
        #[test]
        fn prop_dest_inside_cell(images in images_strategy(), config in grid_strategy()) {
            let layout = compute_layout(&images, &config).unwrap();
            let canvas = Rect::new(0, 0, layout.canvas.width, layout.canvas.height);

            for (i, placement) in layout.placements.iter().enumerate() {
                let cell = cell_for_index(i, config.columns);
                prop_assert_eq!(placement.cell, cell);

                let cell_rect = cell.rect(config.cell_size);
                prop_assert!(cell_rect.contains(&placement.dest),
                    "dest {:?} escapes cell {:?}", placement.dest, cell_rect);
                prop_assert!(canvas.contains(&placement.dest));
            }
        }

        /// Property: The longer axis spans the cell; the shorter is within one pixel of exact.
        #[test]
        fn prop_aspect_ratio_preserved(
            (width, height) in dimensions_strategy(),
            cell_size in 1u32..=1024,
        ) {
            let rect = fit_within(width, height, cell_size);
            let cell = f64::from(cell_size);

            if width > height {
                prop_assert_eq!(rect.width, cell_size);
                prop_assert_eq!(rect.x, 0);
                let exact = cell * f64::from(height) / f64::from(width);
                prop_assert!((f64::from(rect.height) - exact).abs() < 1.0);
                prop_assert_eq!(rect.y, (cell_size - rect.height) / 2);
            } else {
                prop_assert_eq!(rect.height, cell_size);
                prop_assert_eq!(rect.y, 0);
                let exact = cell * f64::from(width) / f64::from(height);
                prop_assert!((f64::from(rect.width) - exact).abs() < 1.0);
                prop_assert_eq!(rect.x, (cell_size - rect.width) / 2);
            }
        }

        /// Property: Layout is a pure function of its inputs.
        #[test]
        fn prop_deterministic(images in images_strategy(), config in grid_strategy()) {
            let first = compute_layout(&images, &config).unwrap();
            let second = compute_layout(&images, &config).unwrap();
            prop_assert_eq!(first.canvas, second.canvas);

            let first: Vec<Rect> = first.placements.iter().map(|p| p.dest).collect();
            let second: Vec<Rect> = second.placements.iter().map(|p| p.dest).collect();
            prop_assert_eq!(first, second);
        }
    }
}
