//! Banded matrix of pairwise frame distances.

use tracing::{debug, instrument};

use crate::band::Band;
use crate::cell::Cell;
use crate::error::DtwError;
use crate::grid::Grid;
use crate::metric::DistanceMetric;
use crate::sequence::SequenceView;

/// Distances between every frame of one sequence and the frames of another
/// that fall inside the band. Cells outside the band are [`Cell::Missing`].
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    grid: Grid<Cell>,
    band: Band,
}

impl DistanceMatrix {
    /// Compute the banded distance matrix between `a` (rows) and `b` (columns).
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::DimensionMismatch`] | `a` and `b` have different frame dimensions |
    /// | [`DtwError::InvalidDistance`] | `metric` returns a negative or non-finite value |
    #[instrument(skip_all, fields(rows = a.len(), cols = b.len(), band = %band))]
    pub fn build<M>(
        a: SequenceView<'_>,
        b: SequenceView<'_>,
        metric: &M,
        band: Band,
    ) -> Result<Self, DtwError>
    where
        M: DistanceMetric + ?Sized,
    {
        if a.dim() != b.dim() {
            return Err(DtwError::DimensionMismatch {
                left: a.dim(),
                right: b.dim(),
            });
        }

        let rows = a.len();
        let cols = b.len();
        let mut grid = Grid::new(rows, cols, Cell::Missing);
        let mut computed = 0usize;

        for (x, frame) in a.frames().enumerate() {
            for y in band.column_range(x, rows, cols) {
                let value = metric.distance(frame, b.frame(y));
                if !(value.is_finite() && value >= 0.0) {
                    return Err(DtwError::InvalidDistance { row: x, col: y, value });
                }
                grid[(x, y)] = Cell::Value(value);
                computed += 1;
            }
        }

        debug!(computed, total = rows * cols, "distance matrix built");
        Ok(Self { grid, band })
    }

    #[cfg(test)]
    pub(crate) fn from_grid(grid: Grid<Cell>, band: Band) -> Self {
        Self { grid, band }
    }

    /// Return the distance at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the cell is outside the grid.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.grid[(row, col)]
    }

    /// Return the number of rows (frames of the first sequence).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    /// Return the number of columns (frames of the second sequence).
    #[must_use]
    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// Return the band the matrix was built with.
    #[must_use]
    pub fn band(&self) -> Band {
        self.band
    }

    /// Return the underlying grid.
    #[must_use]
    pub fn grid(&self) -> &Grid<Cell> {
        &self.grid
    }
}
