//! DTW alignment: distance matrix, cost accumulation, and backtracking.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::accumulate::{Accumulation, rolling_total_cost};
use crate::band::Band;
use crate::error::DtwError;
use crate::metric::{DistanceMetric, Euclidean};
use crate::pairwise::DistanceMatrix;
use crate::path::{WarpingPath, backtrack};
use crate::sequence::SequenceView;

/// Result of aligning two sequences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alignment {
    /// Cumulative cost at the bottom-right cell. Equals the final path cost.
    pub total_cost: f64,
    /// Optimal warping path from `(0, 0)` to `(n - 1, m - 1)`.
    pub path: WarpingPath,
}

/// Immutable DTW configuration. Thread-safe and copyable.
///
/// # Defaults
///
/// | Parameter         | Default           |
/// |-------------------|-------------------|
/// | `diagonal_weight` | 1.0               |
/// | `band`            | `Band::Unbanded`  |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignmentEngine {
    diagonal_weight: f64,
    band: Band,
}

impl Default for AlignmentEngine {
    fn default() -> Self {
        Self {
            diagonal_weight: 1.0,
            band: Band::Unbanded,
        }
    }
}

impl AlignmentEngine {
    /// Create an engine with the given diagonal weight and band.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::InvalidDiagonalWeight`] | `diagonal_weight` is negative, NaN, or infinite |
    pub fn new(diagonal_weight: f64, band: Band) -> Result<Self, DtwError> {
        Self::default()
            .with_diagonal_weight(diagonal_weight)
            .map(|engine| engine.with_band(band))
    }

    /// Create an unbanded engine with unit diagonal weight.
    #[must_use]
    pub fn unbanded() -> Self {
        Self::default()
    }

    /// Set the weight applied to the local distance of diagonal steps.
    ///
    /// # Errors
    ///
    /// Returns [`DtwError::InvalidDiagonalWeight`] if `weight` is negative or not finite.
    pub fn with_diagonal_weight(mut self, weight: f64) -> Result<Self, DtwError> {
        if !(weight.is_finite() && weight >= 0.0) {
            return Err(DtwError::InvalidDiagonalWeight { weight });
        }
        self.diagonal_weight = weight;
        Ok(self)
    }

    /// Set the band.
    #[must_use]
    pub fn with_band(mut self, band: Band) -> Self {
        self.band = band;
        self
    }

    /// Return the diagonal weight.
    #[must_use]
    pub fn diagonal_weight(&self) -> f64 {
        self.diagonal_weight
    }

    /// Return the band.
    #[must_use]
    pub fn band(&self) -> Band {
        self.band
    }

    /// Align two sequences under the Euclidean metric.
    ///
    /// # Errors
    ///
    /// See [`AlignmentEngine::align_with`].
    pub fn align(&self, a: SequenceView<'_>, b: SequenceView<'_>) -> Result<Alignment, DtwError> {
        self.align_with(a, b, &Euclidean)
    }

    /// Align two sequences under `metric`, returning the total cost and the
    /// optimal warping path.
    ///
    /// Allocates the banded distance matrix plus full cost and direction
    /// matrices, all dropped before returning. Use
    /// [`cost_with`][AlignmentEngine::cost_with] when only the total is needed.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::DimensionMismatch`] | Frame dimensions differ |
    /// | [`DtwError::CornerOutsideBand`] | The band excludes `(0, 0)` or `(n - 1, m - 1)` |
    /// | [`DtwError::InvalidDistance`] | `metric` returns a negative or non-finite value |
    /// | [`DtwError::Unreachable`] | No path inside the band reaches `(n - 1, m - 1)` |
    /// | [`DtwError::BrokenPath`] | Backtracking hits an unvisited cell |
    #[instrument(skip_all, fields(rows = a.len(), cols = b.len(), band = %self.band, diagonal_weight = self.diagonal_weight))]
    pub fn align_with<M>(
        &self,
        a: SequenceView<'_>,
        b: SequenceView<'_>,
        metric: &M,
    ) -> Result<Alignment, DtwError>
    where
        M: DistanceMetric + ?Sized,
    {
        self.check_inputs(a, b)?;

        let distances = DistanceMatrix::build(a, b, metric, self.band)?;
        let accumulation = Accumulation::compute(&distances, self.diagonal_weight);
        let Some(total_cost) = accumulation.total_cost().value() else {
            return Err(DtwError::Unreachable {
                rows: a.len(),
                cols: b.len(),
            });
        };
        let path = backtrack(accumulation.cost(), accumulation.directions())?;

        debug!(total_cost, path_len = path.len(), "alignment complete");
        Ok(Alignment { total_cost, path })
    }

    /// Total alignment cost under the Euclidean metric.
    ///
    /// # Errors
    ///
    /// See [`AlignmentEngine::cost_with`].
    pub fn cost(&self, a: SequenceView<'_>, b: SequenceView<'_>) -> Result<f64, DtwError> {
        self.cost_with(a, b, &Euclidean)
    }

    /// Total alignment cost under `metric`, without the path.
    ///
    /// Uses two rolling rows of length `m` instead of full matrices. The result
    /// equals `align_with(a, b, metric)?.total_cost`.
    ///
    /// # Errors
    ///
    /// Same as [`AlignmentEngine::align_with`], except that
    /// [`DtwError::BrokenPath`] cannot occur.
    #[instrument(skip_all, fields(rows = a.len(), cols = b.len(), band = %self.band))]
    pub fn cost_with<M>(
        &self,
        a: SequenceView<'_>,
        b: SequenceView<'_>,
        metric: &M,
    ) -> Result<f64, DtwError>
    where
        M: DistanceMetric + ?Sized,
    {
        self.check_inputs(a, b)?;
        rolling_total_cost(a, b, metric, self.band, self.diagonal_weight)?
            .value()
            .ok_or(DtwError::Unreachable {
                rows: a.len(),
                cols: b.len(),
            })
    }

    /// Reject inputs that cannot produce a path before anything is allocated.
    fn check_inputs(&self, a: SequenceView<'_>, b: SequenceView<'_>) -> Result<(), DtwError> {
        if a.dim() != b.dim() {
            return Err(DtwError::DimensionMismatch {
                left: a.dim(),
                right: b.dim(),
            });
        }
        if a.is_empty() || b.is_empty() {
            return Err(DtwError::EmptySequence);
        }
        let rows = a.len();
        let cols = b.len();
        for (row, col) in [(0, 0), (rows - 1, cols - 1)] {
            if !self.band.contains(row, col, rows, cols) {
                return Err(DtwError::CornerOutsideBand {
                    row,
                    col,
                    band: self.band,
                });
            }
        }
        Ok(())
    }
}
