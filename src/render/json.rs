//! JSON rendering of token sheet layouts.

use crate::error::{Error, Result};
use crate::model::TokenSheet;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a token sheet layout to JSON. Pixel data is not included.
pub fn to_json(sheet: &TokenSheet, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(sheet),
        JsonFormat::Compact => serde_json::to_string(sheet),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{paginate, GridGeometry};
    use crate::model::{PageFormat, Placement, TokenImage};
    use std::sync::Arc;

    fn sheet() -> TokenSheet {
        let grid = GridGeometry::new(2, 1, 10.0, 10.0, 0.0).unwrap();
        let image = Arc::new(TokenImage::blank("MM/Goblin", 2));
        let placements = vec![
            Placement::new(Arc::clone(&image)).with_name("Goblin"),
            Placement::new(image),
        ];
        TokenSheet::new(PageFormat::A4, grid, paginate(placements, &grid, PageFormat::A4))
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sheet(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"image\": \"MM/Goblin\""));
        assert!(json.contains("\"name\": \"Goblin\""));
        assert!(json.contains("\"name\": null"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sheet(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains("\"format\":\"A4\""));
    }
}
