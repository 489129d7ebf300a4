//! Row-major pagination of token placements.

use super::GridGeometry;
use crate::model::{Page, PageFormat, Placement, PlacedToken};

/// Lay placements out on pages, filling each page left-to-right, top-to-bottom.
///
/// A page is closed once it holds `columns * rows` tokens and the next
/// placement starts a new page at cell (0, 0). Empty input yields no pages.
/// Concatenating the cells of the returned pages reproduces the input order.
pub fn paginate<I>(placements: I, grid: &GridGeometry, format: PageFormat) -> Vec<Page>
where
    I: IntoIterator<Item = Placement>,
{
    let capacity = grid.capacity();
    let mut pages: Vec<Page> = Vec::new();
    let mut current: Option<Page> = None;

    for placement in placements {
        let page = current.get_or_insert_with(|| Page::new(pages.len() as u32 + 1, format));

        let (row, column) = grid.cell_at(page.cells.len());
        let (x, y) = grid.cell_origin(row, column);
        page.cells.push(PlacedToken {
            image: placement.image,
            name: placement.name,
            row,
            column,
            x,
            y,
        });

        if page.cells.len() == capacity {
            if let Some(full) = current.take() {
                pages.push(full);
            }
        }
    }

    if let Some(last) = current {
        pages.push(last);
    }

    log::debug!(
        "paginated {} tokens onto {} page(s) of {}",
        pages.iter().map(Page::len).sum::<usize>(),
        pages.len(),
        capacity
    );

    pages
}
