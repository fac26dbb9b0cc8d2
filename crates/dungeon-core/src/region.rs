//! Cell positions and lazy traversal over rectangular parts of a grid.

use crate::tile::Tile;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Chain;
use std::ops::Range;

/// A cell position (row, column), zero based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}, column {}", self.row + 1, self.col + 1)
    }
}

/// Clip the signed span `start..start + len` to `0..bound`.
fn clip(start: isize, len: usize, bound: usize) -> Range<usize> {
    let end = start.saturating_add_unsigned(len);
    let lo = start.clamp(0, bound as isize) as usize;
    let hi = end.clamp(0, bound as isize) as usize;
    lo..hi.max(lo)
}

/// Row-major iterator over the cells of a sub-rectangle, clipped to the grid.
#[derive(Debug, Clone)]
pub struct Region<'a> {
    tiles: &'a [Vec<Tile>],
    cols: Range<usize>,
    row: usize,
    row_end: usize,
    col: usize,
}

impl<'a> Region<'a> {
    pub(crate) fn new(
        tiles: &'a [Vec<Tile>],
        n_cols: usize,
        row: isize,
        col: isize,
        height: usize,
        width: usize,
    ) -> Self {
        let rows = clip(row, height, tiles.len());
        let cols = clip(col, width, n_cols);
        // an empty column span must not yield anything
        let row_end = if cols.is_empty() { rows.start } else { rows.end };
        Self {
            tiles,
            col: cols.start,
            cols,
            row: rows.start,
            row_end,
        }
    }
}

impl<'a> Iterator for Region<'a> {
    type Item = (Position, &'a Tile);

    fn next(&mut self) -> Option<Self::Item> {
        if self.row >= self.row_end {
            return None;
        }
        let pos = Position::new(self.row, self.col);
        let tile = &self.tiles[self.row][self.col];
        self.col += 1;
        if self.col >= self.cols.end {
            self.col = self.cols.start;
            self.row += 1;
        }
        Some((pos, tile))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.row >= self.row_end {
            0
        } else {
            let full_rows = self.row_end - self.row - 1;
            full_rows * self.cols.len() + (self.cols.end - self.col)
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Region<'_> {}

/// Cells directly above, below, left and right of a rectangular footprint.
///
/// Diagonal cells are not included; cells outside the grid are skipped.
#[derive(Debug, Clone)]
pub struct Adjacent<'a> {
    inner: Chain<Chain<Chain<Region<'a>, Region<'a>>, Region<'a>>, Region<'a>>,
}

impl<'a> Adjacent<'a> {
    pub(crate) fn new(
        tiles: &'a [Vec<Tile>],
        n_cols: usize,
        row: isize,
        col: isize,
        height: usize,
        width: usize,
    ) -> Self {
        let below = row.saturating_add_unsigned(height);
        let right = col.saturating_add_unsigned(width);
        let above = Region::new(tiles, n_cols, row.saturating_sub(1), col, 1, width);
        let under = Region::new(tiles, n_cols, below, col, 1, width);
        let left = Region::new(tiles, n_cols, row, col.saturating_sub(1), height, 1);
        let side = Region::new(tiles, n_cols, row, right, height, 1);
        Self {
            inner: above.chain(under).chain(left).chain(side),
        }
    }
}

impl<'a> Iterator for Adjacent<'a> {
    type Item = (Position, &'a Tile);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}
