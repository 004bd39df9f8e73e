//! Row-major grid geometry for patterns drawn on a 2-D editor.

use super::pattern::{Pattern, ACTIVE, INACTIVE};
use crate::error::{EngineError, Result};

/// Rectangular cell layout mapping `(row, col)` to pattern indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
}

impl Grid {
    /// Grid of `rows` x `cols` cells.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells, i.e. the pattern dimension.
    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }

    /// Pattern index of a cell, or `None` when off the grid.
    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    /// Cell of a pattern index, or `None` when out of range.
    pub fn position(&self, index: usize) -> Option<(usize, usize)> {
        (index < self.cells()).then(|| (index / self.cols, index % self.cols))
    }

    /// Build a pattern with the listed cells active and the rest inactive.
    pub fn pattern(&self, active: &[(usize, usize)]) -> Result<Pattern> {
        let mut data = vec![INACTIVE; self.cells()];
        for &(row, col) in active {
            let i = self
                .index(row, col)
                .ok_or(EngineError::CellOutOfRange { row, col })?;
            data[i] = ACTIVE;
        }
        Pattern::new(data)
    }

    /// Render one line per row, `#` for active and `.` for inactive cells.
    pub fn render(&self, pattern: &Pattern) -> Result<String> {
        if pattern.len() != self.cells() {
            return Err(EngineError::DimensionMismatch {
                expected: self.cells(),
                got: pattern.len(),
            });
        }
        if self.cols == 0 {
            return Ok(String::new());
        }
        let mut out = String::with_capacity(self.cells() + self.rows);
        for row in pattern.data().chunks(self.cols) {
            out.extend(row.iter().map(|&v| if v == ACTIVE { '#' } else { '.' }));
            out.push('\n');
        }
        Ok(out)
    }
}

impl Default for Grid {
    /// The 12x12 editor grid.
    fn default() -> Self {
        Self::new(12, 12)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        let grid = Grid::default();
        assert_eq!(grid.cells(), 144);
        assert_eq!(grid.index(1, 0), Some(12));
        assert_eq!(grid.position(13), Some((1, 1)));
        assert_eq!(grid.index(12, 0), None);
        assert_eq!(grid.position(144), None);
    }

    #[test]
    fn test_pattern_and_render() {
        let grid = Grid::new(2, 3);
        let p = grid.pattern(&[(0, 0), (1, 2)]).unwrap();
        assert_eq!(p.data(), &[1, -1, -1, -1, -1, 1]);
        assert_eq!(grid.render(&p).unwrap(), "#..\n..#\n");
        assert!(grid.pattern(&[(2, 0)]).is_err());
        assert!(grid.render(&Pattern::blank(5)).is_err());
    }
}
