//! Poster composition: tile rendered pages into one grid-shaped image.
//!
//! Every cell has the same size: the widest page by the tallest page of the
//! whole document. Pages smaller than the cell are centred in it and never
//! scaled, so a document with mixed page sizes still yields a rectilinear
//! grid. Cells past the last page are left as background.
//!
//! The arithmetic lives in [`PosterGeometry::measure`] and the pixel work in
//! [`PosterGeometry::paint`], so the layout can be measured (and logged)
//! before a single byte of the canvas is allocated. [`compose`] does both.

use crate::pipeline::grid::GridShape;
use image::{imageops, Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Margin, spacing and background colour of a poster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParams {
    /// Outer border around the whole grid, in pixels.
    pub margin: u32,
    /// Gap between neighbouring cells, in pixels.
    pub spacing: u32,
    /// Canvas fill colour.
    pub background: Rgb<u8>,
}

/// Why a poster could not be composed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// No pages were supplied.
    #[error("no pages to compose")]
    EmptyInput,
    /// The canvas would not fit in an image buffer.
    #[error("canvas of {width}x{height} px exceeds the image buffer limit")]
    CanvasTooLarge { width: u64, height: u64 },
    /// More pages than the grid has cells.
    #[error("{pages} pages do not fit in {cells} cells")]
    GridTooSmall { pages: usize, cells: u64 },
}

/// Resolved layout of one poster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosterGeometry {
    pub grid: GridShape,
    pub cell_width: u32,
    pub cell_height: u32,
    pub margin: u32,
    pub spacing: u32,
    /// Total canvas width including margins.
    pub width: u32,
    /// Total canvas height including margins.
    pub height: u32,
}

impl PosterGeometry {
    /// Measure the poster for pages of the given `(width, height)` sizes.
    pub fn measure(
        page_sizes: &[(u32, u32)],
        grid: GridShape,
        layout: &LayoutParams,
    ) -> Result<Self, ComposeError> {
        if page_sizes.is_empty() {
            return Err(ComposeError::EmptyInput);
        }
        if page_sizes.len() as u64 > grid.cells() {
            return Err(ComposeError::GridTooSmall {
                pages: page_sizes.len(),
                cells: grid.cells(),
            });
        }

        let cell_width = page_sizes.iter().map(|&(w, _)| w).max().unwrap_or(0);
        let cell_height = page_sizes.iter().map(|&(_, h)| h).max().unwrap_or(0);

        let span = |count: u32, cell: u32| -> u64 {
            let count = u64::from(count);
            count * u64::from(cell)
                + count.saturating_sub(1) * u64::from(layout.spacing)
                + 2 * u64::from(layout.margin)
        };
        let total_w = span(grid.columns, cell_width);
        let total_h = span(grid.rows, cell_height);

        let too_large = || ComposeError::CanvasTooLarge {
            width: total_w,
            height: total_h,
        };
        let width = u32::try_from(total_w).map_err(|_| too_large())?;
        let height = u32::try_from(total_h).map_err(|_| too_large())?;
        // RgbImage stores 3 bytes per pixel in one Vec<u8>.
        let bytes = total_w
            .checked_mul(total_h)
            .and_then(|px| px.checked_mul(3))
            .ok_or_else(too_large)?;
        if bytes > isize::MAX as u64 {
            return Err(too_large());
        }

        Ok(Self {
            grid,
            cell_width,
            cell_height,
            margin: layout.margin,
            spacing: layout.spacing,
            width,
            height,
        })
    }

    /// Top-left corner of cell `index` (row-major).
    pub fn cell_origin(&self, index: usize) -> (u64, u64) {
        let columns = self.grid.columns as usize;
        let row = (index / columns) as u64;
        let col = (index % columns) as u64;
        let x0 = u64::from(self.margin) + col * (u64::from(self.cell_width) + u64::from(self.spacing));
        let y0 = u64::from(self.margin) + row * (u64::from(self.cell_height) + u64::from(self.spacing));
        (x0, y0)
    }

    /// Where a `width`×`height` page at `index` is pasted so it sits centred
    /// in its cell. Odd leftover padding goes to the right/bottom.
    pub fn page_origin(&self, index: usize, width: u32, height: u32) -> (u64, u64) {
        let (x0, y0) = self.cell_origin(index);
        let off_x = u64::from(self.cell_width.saturating_sub(width) / 2);
        let off_y = u64::from(self.cell_height.saturating_sub(height) / 2);
        (x0 + off_x, y0 + off_y)
    }

    /// Allocate the canvas and paste `pages` into their cells.
    ///
    /// `pages` must be the pages this geometry was measured from. Anything
    /// reaching past the canvas edge is clipped.
    pub fn paint(&self, pages: &[RgbImage], background: Rgb<u8>) -> RgbImage {
        debug!(
            "compose: grid {}, cell={}x{}, total={}x{}",
            self.grid, self.cell_width, self.cell_height, self.width, self.height
        );

        let mut poster = RgbImage::from_pixel(self.width, self.height, background);
        for (idx, page) in pages.iter().enumerate() {
            let (x, y) = self.page_origin(idx, page.width(), page.height());
            // Pages are opaque, so a straight copy is the same as alpha-over.
            imageops::replace(&mut poster, page, x as i64, y as i64);
        }
        poster
    }
}

/// Compose `pages` into a single poster.
///
/// Pure: the same pages, grid and layout always give the same pixels.
pub fn compose(
    pages: &[RgbImage],
    grid: GridShape,
    layout: &LayoutParams,
) -> Result<RgbImage, ComposeError> {
    let sizes: Vec<(u32, u32)> = pages.iter().map(|p| p.dimensions()).collect();
    let geometry = PosterGeometry::measure(&sizes, grid, layout)?;
    Ok(geometry.paint(pages, layout.background))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn layout(margin: u32, spacing: u32) -> LayoutParams {
        LayoutParams {
            margin,
            spacing,
            background: WHITE,
        }
    }

    fn solid(w: u32, h: u32, shade: u8) -> RgbImage {
        RgbImage::from_pixel(w, h, Rgb([shade, 0, 0]))
    }

    /// Bounding box of all pixels with the given colour.
    fn bbox_of(img: &RgbImage, color: Rgb<u8>) -> Option<(u32, u32, u32, u32)> {
        let mut found: Option<(u32, u32, u32, u32)> = None;
        for (x, y, p) in img.enumerate_pixels() {
            if *p == color {
                found = Some(match found {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }
        found
    }

    #[test]
    fn canvas_size_matches_formula() {
        let pages = vec![solid(100, 200, 10), solid(150, 150, 20), solid(100, 180, 30)];
        let grid = GridShape { columns: 2, rows: 2 };
        let poster = compose(&pages, grid, &layout(10, 5)).unwrap();
        assert_eq!(poster.dimensions(), (325, 425));
    }

    #[test]
    fn geometry_uses_global_maxima() {
        let sizes = [(100, 200), (150, 150), (100, 180)];
        let g = PosterGeometry::measure(&sizes, GridShape { columns: 2, rows: 2 }, &layout(10, 5))
            .unwrap();
        assert_eq!((g.cell_width, g.cell_height), (150, 200));
        assert_eq!(g.cell_origin(0), (10, 10));
        assert_eq!(g.cell_origin(1), (165, 10));
        assert_eq!(g.cell_origin(2), (10, 215));
    }

    #[test]
    fn pages_are_centred_in_their_cells() {
        let pages = vec![solid(100, 200, 10), solid(150, 150, 20), solid(101, 181, 30)];
        let grid = GridShape { columns: 2, rows: 2 };
        let lp = layout(10, 5);
        let poster = compose(&pages, grid, &lp).unwrap();
        let sizes: Vec<(u32, u32)> = pages.iter().map(|p| p.dimensions()).collect();
        let geometry = PosterGeometry::measure(&sizes, grid, &lp).unwrap();

        for (idx, page) in pages.iter().enumerate() {
            let (x0, y0, x1, y1) = bbox_of(&poster, *page.get_pixel(0, 0)).unwrap();
            assert_eq!((x1 - x0 + 1, y1 - y0 + 1), page.dimensions(), "page {idx}");

            let (cx, cy) = geometry.cell_origin(idx);
            let left = u64::from(x0) - cx;
            let right = cx + u64::from(geometry.cell_width) - u64::from(x1) - 1;
            let top = u64::from(y0) - cy;
            let bottom = cy + u64::from(geometry.cell_height) - u64::from(y1) - 1;
            assert!(left.abs_diff(right) <= 1, "page {idx}: {left} vs {right}");
            assert!(top.abs_diff(bottom) <= 1, "page {idx}: {top} vs {bottom}");
        }
    }

    #[test]
    fn trailing_cells_are_background() {
        let pages = vec![solid(10, 10, 1), solid(10, 10, 2), solid(10, 10, 3)];
        let poster = compose(&pages, GridShape { columns: 2, rows: 2 }, &layout(0, 0)).unwrap();
        assert_eq!(poster.dimensions(), (20, 20));
        for y in 10..20 {
            for x in 10..20 {
                assert_eq!(*poster.get_pixel(x, y), WHITE);
            }
        }
    }

    #[test]
    fn margins_and_gaps_use_background_colour() {
        let bg = Rgb([1, 2, 3]);
        let lp = LayoutParams {
            margin: 4,
            spacing: 2,
            background: bg,
        };
        let pages = vec![solid(5, 5, 200), solid(5, 5, 200)];
        let poster = compose(&pages, GridShape { columns: 2, rows: 1 }, &lp).unwrap();
        assert_eq!(poster.dimensions(), (4 + 5 + 2 + 5 + 4, 4 + 5 + 4));
        assert_eq!(*poster.get_pixel(0, 0), bg);
        assert_eq!(*poster.get_pixel(9, 6), bg); // in the gap
        assert_eq!(*poster.get_pixel(4, 4), Rgb([200, 0, 0]));
        assert_eq!(*poster.get_pixel(11, 4), Rgb([200, 0, 0]));
    }

    #[test]
    fn single_column_stack() {
        let pages = vec![solid(30, 10, 1), solid(20, 10, 2)];
        let poster = compose(&pages, GridShape { columns: 1, rows: 2 }, &layout(0, 1)).unwrap();
        assert_eq!(poster.dimensions(), (30, 21));
        // Narrow page centred: 5 px padding either side.
        assert_eq!(*poster.get_pixel(4, 15), WHITE);
        assert_eq!(*poster.get_pixel(5, 15), Rgb([2, 0, 0]));
        assert_eq!(*poster.get_pixel(24, 15), Rgb([2, 0, 0]));
        assert_eq!(*poster.get_pixel(25, 15), WHITE);
    }

    #[test]
    fn compose_is_deterministic() {
        let pages = vec![solid(7, 9, 5), solid(3, 4, 6), solid(8, 2, 7)];
        let grid = GridShape { columns: 2, rows: 2 };
        let a = compose(&pages, grid, &layout(3, 2)).unwrap();
        let b = compose(&pages, grid, &layout(3, 2)).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn paint_matches_compose() {
        let pages = vec![solid(12, 8, 40), solid(6, 10, 80)];
        let grid = GridShape { columns: 2, rows: 1 };
        let lp = layout(3, 2);
        let sizes: Vec<(u32, u32)> = pages.iter().map(|p| p.dimensions()).collect();
        let geometry = PosterGeometry::measure(&sizes, grid, &lp).unwrap();
        let painted = geometry.paint(&pages, lp.background);
        assert_eq!(painted.dimensions(), (geometry.width, geometry.height));
        assert_eq!(painted.as_raw(), compose(&pages, grid, &lp).unwrap().as_raw());
    }

    #[test]
    fn compose_errors_display() {
        assert_eq!(ComposeError::EmptyInput.to_string(), "no pages to compose");
        let err = ComposeError::GridTooSmall { pages: 3, cells: 2 };
        assert_eq!(err.to_string(), "3 pages do not fit in 2 cells");
        let err = ComposeError::CanvasTooLarge { width: 5, height: 6 };
        assert!(err.to_string().contains("5x6"));
    }

    #[test]
    fn empty_pages_rejected() {
        let grid = GridShape { columns: 1, rows: 1 };
        assert_eq!(compose(&[], grid, &layout(0, 0)), Err(ComposeError::EmptyInput));
    }

    #[test]
    fn grid_must_cover_pages() {
        let pages = vec![solid(1, 1, 1), solid(1, 1, 1), solid(1, 1, 1)];
        let err = compose(&pages, GridShape { columns: 1, rows: 2 }, &layout(0, 0)).unwrap_err();
        assert_eq!(err, ComposeError::GridTooSmall { pages: 3, cells: 2 });
    }

    #[test]
    fn oversized_canvas_is_an_error_not_a_panic() {
        let sizes = [(u32::MAX / 2, 10), (u32::MAX / 2, 10)];
        let err = PosterGeometry::measure(&sizes, GridShape { columns: 2, rows: 1 }, &layout(0, 4))
            .unwrap_err();
        assert!(matches!(err, ComposeError::CanvasTooLarge { .. }));
    }
}
