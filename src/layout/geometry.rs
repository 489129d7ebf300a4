//! Grid geometry derived from a page format and a token cell size.

use super::{mm_to_pt, LayoutOptions};
use crate::error::{Error, Result};
use serde::Serialize;

/// Fixed grid of equally sized cells on a page. All lengths are in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridGeometry {
    /// Cells per row
    pub columns: u32,

    /// Rows per page
    pub rows: u32,

    /// Cell width
    pub cell_width: f32,

    /// Cell height, label band included
    pub cell_height: f32,

    /// Edge length of the token image inside a cell
    pub token_size: f32,

    /// Offset of the first cell from the page's top-left corner
    pub margin: f32,
}

impl GridGeometry {
    /// Build a grid with explicit dimensions.
    ///
    /// The token image fills the cell width; any extra height is the label band.
    pub fn new(columns: u32, rows: u32, cell_width: f32, cell_height: f32, margin: f32) -> Result<Self> {
        if columns == 0 || rows == 0 {
            return Err(Error::Geometry(format!(
                "grid of {} columns x {} rows cannot hold a token",
                columns, rows
            )));
        }
        if !(cell_width > 0.0 && cell_height >= cell_width) {
            return Err(Error::Geometry(format!(
                "invalid cell size {:.2} x {:.2} pt",
                cell_width, cell_height
            )));
        }

        Ok(Self {
            columns,
            rows,
            cell_width,
            cell_height,
            token_size: cell_width,
            margin,
        })
    }

    /// Derive the grid for a page format.
    ///
    /// `columns = floor((width - 2*margin) / cell_width)` and likewise for rows.
    /// Fails when the usable area cannot hold at least one cell.
    pub fn from_options(options: &LayoutOptions) -> Result<Self> {
        if !options.token_size_mm.is_finite() || options.token_size_mm <= 0.0 {
            return Err(Error::Geometry(format!(
                "token size must be positive, got {} mm",
                options.token_size_mm
            )));
        }
        if !options.margin_mm.is_finite() || options.margin_mm < 0.0 {
            return Err(Error::Geometry(format!(
                "margin must not be negative, got {} mm",
                options.margin_mm
            )));
        }
        if options.show_names && (!options.label_height_mm.is_finite() || options.label_height_mm < 0.0) {
            return Err(Error::Geometry(format!(
                "label height must not be negative, got {} mm",
                options.label_height_mm
            )));
        }

        let format = options.format;
        let usable_w = format.width_mm() - 2.0 * options.margin_mm;
        let usable_h = format.height_mm() - 2.0 * options.margin_mm;
        let cell_w = options.token_size_mm;
        let cell_h = options.cell_height_mm();

        let columns = cells_along(usable_w, cell_w);
        let rows = cells_along(usable_h, cell_h);

        if columns == 0 || rows == 0 {
            return Err(Error::Geometry(format!(
                "{} page with {} mm margins has a usable area of {:.1} x {:.1} mm, \
                 smaller than one {:.1} x {:.1} mm token cell",
                format,
                options.margin_mm,
                usable_w.max(0.0),
                usable_h.max(0.0),
                cell_w,
                cell_h
            )));
        }

        log::debug!(
            "{} grid: {} columns x {} rows ({} tokens per page)",
            format,
            columns,
            rows,
            columns * rows
        );

        Self::new(
            columns,
            rows,
            mm_to_pt(cell_w),
            mm_to_pt(cell_h),
            mm_to_pt(options.margin_mm),
        )
    }

    /// Number of tokens a page can hold.
    pub fn capacity(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Row and column of the `index`-th cell on a page, row-major.
    pub fn cell_at(&self, index: usize) -> (u32, u32) {
        let columns = self.columns as usize;
        ((index / columns) as u32, (index % columns) as u32)
    }

    /// Top-left corner of a cell, in points from the page's top-left corner.
    pub fn cell_origin(&self, row: u32, column: u32) -> (f32, f32) {
        (
            self.margin + column as f32 * self.cell_width,
            self.margin + row as f32 * self.cell_height,
        )
    }

    /// Height of the name band below each token.
    pub fn label_height(&self) -> f32 {
        self.cell_height - self.token_size
    }
}

/// Slack for lengths that are an exact multiple of the cell size but land
/// just below it after millimeter values pass through `f32`.
const FIT_EPSILON: f64 = 1e-4;

/// Number of whole cells of `cell` mm that fit in `usable` mm.
fn cells_along(usable: f32, cell: f32) -> u32 {
    if usable <= 0.0 {
        return 0;
    }
    (f64::from(usable) / f64::from(cell) + FIT_EPSILON).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PageFormat;

    #[test]
    fn test_a4_default_grid() {
        let grid = GridGeometry::from_options(&LayoutOptions::default()).unwrap();
        // (210 - 8) / 25 = 8.08, (297 - 8) / 25 = 11.56
        assert_eq!(grid.columns, 8);
        assert_eq!(grid.rows, 11);
        assert_eq!(grid.capacity(), 88);
    }

    #[test]
    fn test_a3_default_grid() {
        let options = LayoutOptions::new().with_format(PageFormat::A3);
        let grid = GridGeometry::from_options(&options).unwrap();
        // (297 - 8) / 25 = 11.56, (420 - 8) / 25 = 16.48
        assert_eq!(grid.columns, 11);
        assert_eq!(grid.rows, 16);
    }

    #[test]
    fn test_names_reduce_rows() {
        let options = LayoutOptions::new().with_names(true);
        let grid = GridGeometry::from_options(&options).unwrap();
        // (297 - 8) / 29 = 9.96
        assert_eq!(grid.rows, 9);
        assert!(grid.label_height() > 0.0);
    }

    #[test]
    fn test_exact_fit_keeps_last_column() {
        let options = LayoutOptions::new()
            .with_format(PageFormat::A3)
            .with_margin(12.0)
            .with_token_size(18.2);
        let grid = GridGeometry::from_options(&options).unwrap();
        // (297 - 24) / 18.2 = 15 exactly, (420 - 24) / 18.2 = 21.76
        assert_eq!(grid.columns, 15);
        assert_eq!(grid.rows, 21);
    }

    #[test]
    fn test_cells_along_exact_multiples() {
        assert_eq!(cells_along(100.0, 25.0), 4);
        assert_eq!(cells_along(0.3, 0.1), 3);
        assert_eq!(cells_along(99.9, 25.0), 3);
        assert_eq!(cells_along(-1.0, 25.0), 0);
    }

    #[test]
    fn test_supported_formats_hold_tokens() {
        for format in PageFormat::ALL {
            for names in [false, true] {
                let options = LayoutOptions::new().with_format(format).with_names(names);
                let grid = GridGeometry::from_options(&options).unwrap();
                assert!(grid.columns >= 1 && grid.rows >= 1);
            }
        }
    }

    #[test]
    fn test_token_larger_than_page_is_error() {
        let options = LayoutOptions::new().with_token_size(250.0);
        let result = GridGeometry::from_options(&options);
        assert!(matches!(result, Err(Error::Geometry(_))));
    }

    #[test]
    fn test_margins_eating_page_is_error() {
        let options = LayoutOptions::new().with_margin(110.0);
        assert!(matches!(
            GridGeometry::from_options(&options),
            Err(Error::Geometry(_))
        ));
    }

    #[test]
    fn test_non_positive_token_size_is_error() {
        for size in [0.0, -5.0, f32::NAN] {
            let options = LayoutOptions::new().with_token_size(size);
            assert!(GridGeometry::from_options(&options).is_err());
        }
    }

    #[test]
    fn test_explicit_zero_grid_is_error() {
        assert!(GridGeometry::new(0, 2, 10.0, 10.0, 0.0).is_err());
        assert!(GridGeometry::new(3, 0, 10.0, 10.0, 0.0).is_err());
    }

    #[test]
    fn test_cell_at_row_major() {
        let grid = GridGeometry::new(3, 2, 10.0, 10.0, 5.0).unwrap();
        assert_eq!(grid.cell_at(0), (0, 0));
        assert_eq!(grid.cell_at(2), (0, 2));
        assert_eq!(grid.cell_at(3), (1, 0));
        assert_eq!(grid.cell_at(5), (1, 2));
    }

    #[test]
    fn test_cell_origin_includes_margin() {
        let grid = GridGeometry::new(3, 2, 10.0, 12.0, 5.0).unwrap();
        assert_eq!(grid.cell_origin(0, 0), (5.0, 5.0));
        assert_eq!(grid.cell_origin(1, 2), (25.0, 17.0));
    }
}
