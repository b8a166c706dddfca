//! Owned row-major 2-D buffer backing the distance, cost, and direction matrices.

use std::ops::{Index, IndexMut};

/// Dense `rows x cols` matrix stored as one flat row-major vector.
///
/// Every access is bounds-checked on both axes; an out-of-range index is an
/// indexing bug and panics.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Create a grid with every cell set to `fill`.
    pub(crate) fn new(rows: usize, cols: usize, fill: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![fill; rows * cols],
        }
    }
}

impl<T> Grid<T> {
    /// Return the number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Return the number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Return the cell at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows` or `col >= cols`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> &T {
        &self.data[self.offset(row, col)]
    }

    /// Return one row as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows`.
    #[must_use]
    pub fn row(&self, row: usize) -> &[T] {
        assert!(row < self.rows, "row index {row} out of bounds for grid with {} rows", self.rows);
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Return the whole grid in row-major order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(row < self.rows, "row index {row} out of bounds for grid with {} rows", self.rows);
        assert!(col < self.cols, "column index {col} out of bounds for grid with {} columns", self.cols);
        row * self.cols + col
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        self.get(row, col)
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        let offset = self.offset(row, col);
        &mut self.data[offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_grid() -> Grid<u32> {
        let mut g = Grid::new(2, 3, 0);
        for r in 0..2 {
            for c in 0..3 {
                g[(r, c)] = (r * 10 + c) as u32;
            }
        }
        g
    }

    #[test]
    fn shape() {
        let g = make_grid();
        assert_eq!(g.rows(), 2);
        assert_eq!(g.cols(), 3);
        assert_eq!(g.as_slice().len(), 6);
    }

    #[test]
    fn row_major_layout() {
        let g = make_grid();
        assert_eq!(g.as_slice(), &[0, 1, 2, 10, 11, 12]);
        assert_eq!(g.row(1), &[10, 11, 12]);
        assert_eq!(*g.get(1, 2), 12);
    }

    #[test]
    fn fill_value() {
        let g = Grid::new(3, 2, 7u8);
        assert!(g.as_slice().iter().all(|&v| v == 7));
    }

    #[test]
    #[should_panic(expected = "column index 3 out of bounds")]
    fn column_out_of_bounds_panics() {
        let g = make_grid();
        let _ = g[(0, 3)];
    }

    #[test]
    #[should_panic(expected = "row index 2 out of bounds")]
    fn row_out_of_bounds_panics() {
        let mut g = make_grid();
        g[(2, 0)] = 1;
    }
}
