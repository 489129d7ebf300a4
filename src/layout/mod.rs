//! Page layout: grid geometry and pagination.

mod geometry;
mod options;
mod paginate;

pub use geometry::GridGeometry;
pub use options::{LayoutOptions, DEFAULT_LABEL_HEIGHT_MM, DEFAULT_MARGIN_MM, DEFAULT_TOKEN_SIZE_MM};
pub use paginate::paginate;

/// Points per millimeter (1 pt = 1/72 inch).
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Convert millimeters to points.
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

/// Convert millimeters to pixels at the given resolution.
pub fn mm_to_px(mm: f32, dpi: u32) -> u32 {
    (mm * dpi as f32 / 25.4) as u32
}
