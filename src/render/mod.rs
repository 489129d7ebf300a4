//! Rendering module for turning paginated token sheets into output documents.

mod json;
mod label;
mod options;
mod pdf;

pub use json::{to_json, JsonFormat};
pub use label::{fit_label, text_width};
pub use options::{RenderOptions, DEFAULT_LABEL_FONT_SIZE};
pub use pdf::{to_pdf, write_pdf};
