//! Warping path types and reconstruction from the direction matrix.

use serde::Serialize;

use crate::accumulate::{CostMatrix, Direction, DirectionMatrix};
use crate::cell::Cell;
use crate::error::DtwError;

/// A single cell on a warping path: frame `a` of the first sequence aligned
/// with frame `b` of the second, and the cumulative cost of reaching it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WarpingStep {
    /// Frame index in the first sequence.
    pub a: usize,
    /// Frame index in the second sequence.
    pub b: usize,
    /// Cumulative cost at this cell (not the local distance).
    pub cost: f64,
}

/// An ordered sequence of warping steps from `(0, 0)` to `(n - 1, m - 1)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WarpingPath(Vec<WarpingStep>);

impl WarpingPath {
    pub(crate) fn new(steps: Vec<WarpingStep>) -> Self {
        Self(steps)
    }

    /// Return the warping steps as a slice.
    #[must_use]
    pub fn steps(&self) -> &[WarpingStep] {
        &self.0
    }

    /// Return the number of steps in the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the path contains no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the `(a, b)` index pairs.
    pub fn indices(&self) -> impl ExactSizeIterator<Item = (usize, usize)> + '_ {
        self.0.iter().map(|s| (s.a, s.b))
    }

    /// Iterate over the cumulative costs.
    pub fn costs(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.0.iter().map(|s| s.cost)
    }

    /// Return the cumulative cost at the final step.
    #[must_use]
    pub fn final_cost(&self) -> Option<f64> {
        self.0.last().map(|s| s.cost)
    }

    /// Consume and return the steps.
    #[must_use]
    pub fn into_steps(self) -> Vec<WarpingStep> {
        self.0
    }
}

impl<'a> IntoIterator for &'a WarpingPath {
    type Item = &'a WarpingStep;
    type IntoIter = std::slice::Iter<'a, WarpingStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Walk `directions` back from the bottom-right cell to `(0, 0)` and return
/// the path in chronological order, each step carrying its cumulative cost.
///
/// # Errors
///
/// Returns [`DtwError::BrokenPath`] if the walk reaches a cell with no
/// predecessor (or no cost) before arriving at `(0, 0)`.
pub fn backtrack(cost: &CostMatrix, directions: &DirectionMatrix) -> Result<WarpingPath, DtwError> {
    let mut x = cost.rows() - 1;
    let mut y = cost.cols() - 1;
    let mut reversed = Vec::with_capacity(cost.rows() + cost.cols() - 1);

    loop {
        let Cell::Value(c) = cost[(x, y)] else {
            return Err(DtwError::BrokenPath { row: x, col: y });
        };
        reversed.push(WarpingStep { a: x, b: y, cost: c });
        if x == 0 && y == 0 {
            break;
        }
        match directions[(x, y)] {
            Direction::FromTop => x -= 1,
            Direction::FromSide => y -= 1,
            Direction::FromDiagonal => {
                x -= 1;
                y -= 1;
            }
            Direction::NotVisited => return Err(DtwError::BrokenPath { row: x, col: y }),
        }
    }

    reversed.reverse();
    Ok(WarpingPath::new(reversed))
}
