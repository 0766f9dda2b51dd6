//! Grid planning: page count + column spec → `(columns, rows)`.

use crate::config::ColumnSpec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape of the poster grid. `columns * rows` always covers every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub columns: u32,
    pub rows: u32,
}

impl GridShape {
    /// Number of cells in the grid, including trailing empty ones.
    pub fn cells(&self) -> u64 {
        u64::from(self.columns) * u64::from(self.rows)
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}

/// Compute the grid for `page_count` pages.
///
/// Returns `None` for an empty document; there is no meaningful grid for
/// zero pages.
///
/// * [`ColumnSpec::Auto`] picks the smallest column count whose square
///   covers the pages, which yields a near-square grid.
/// * [`ColumnSpec::Fixed`] uses the given count (at least 1).
pub fn plan(page_count: usize, columns: ColumnSpec) -> Option<GridShape> {
    if page_count == 0 {
        return None;
    }
    let pages = u64::try_from(page_count).ok()?;
    let columns = match columns {
        ColumnSpec::Auto => ceil_sqrt(pages),
        ColumnSpec::Fixed(n) => u64::from(n.max(1)),
    };
    let rows = pages.div_ceil(columns);
    Some(GridShape {
        columns: u32::try_from(columns).ok()?,
        rows: u32::try_from(rows).ok()?,
    })
}

fn ceil_sqrt(n: u64) -> u64 {
    let r = n.isqrt();
    if r * r == n {
        r
    } else {
        r + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(columns: u32, rows: u32) -> GridShape {
        GridShape { columns, rows }
    }

    #[test]
    fn auto_is_ceil_sqrt_for_first_thousand() {
        for n in 1..=1000usize {
            let g = plan(n, ColumnSpec::Auto).unwrap();
            let expected_cols = (n as f64).sqrt().ceil() as u32;
            assert_eq!(g.columns, expected_cols, "n={n}");
            assert_eq!(g.rows as usize, n.div_ceil(expected_cols as usize), "n={n}");
            assert!(g.cells() >= n as u64, "n={n}");
        }
    }

    #[test]
    fn auto_small_counts() {
        assert_eq!(plan(1, ColumnSpec::Auto), Some(shape(1, 1)));
        assert_eq!(plan(2, ColumnSpec::Auto), Some(shape(2, 1)));
        assert_eq!(plan(4, ColumnSpec::Auto), Some(shape(2, 2)));
        assert_eq!(plan(5, ColumnSpec::Auto), Some(shape(3, 2)));
        assert_eq!(plan(10, ColumnSpec::Auto), Some(shape(4, 3)));
    }

    #[test]
    fn single_column_stacks_vertically() {
        for n in 1..=50 {
            assert_eq!(plan(n, ColumnSpec::Fixed(1)), Some(shape(1, n as u32)));
        }
    }

    #[test]
    fn explicit_columns() {
        assert_eq!(plan(7, ColumnSpec::Fixed(3)), Some(shape(3, 3)));
        assert_eq!(plan(6, ColumnSpec::Fixed(3)), Some(shape(3, 2)));
        // More columns than pages leaves trailing cells empty.
        assert_eq!(plan(2, ColumnSpec::Fixed(5)), Some(shape(5, 1)));
    }

    #[test]
    fn zero_columns_is_treated_as_one() {
        assert_eq!(plan(3, ColumnSpec::Fixed(0)), Some(shape(1, 3)));
    }

    #[test]
    fn empty_document_has_no_grid() {
        assert_eq!(plan(0, ColumnSpec::Auto), None);
        assert_eq!(plan(0, ColumnSpec::Fixed(2)), None);
    }

    #[test]
    fn ceil_sqrt_exact_squares() {
        assert_eq!(ceil_sqrt(1), 1);
        assert_eq!(ceil_sqrt(9), 3);
        assert_eq!(ceil_sqrt(10), 4);
        assert_eq!(ceil_sqrt(u64::from(u32::MAX)), 65536);
    }
}
