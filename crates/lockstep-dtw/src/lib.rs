//! Banded dynamic time warping over sequences of feature vectors.
//!
//! Pure math library with no I/O. Aligns two sequences of fixed-dimension
//! frames under a pluggable per-frame distance metric, restricted to a
//! diagonal band and with a configurable weight on diagonal steps. Returns the
//! total cost and the optimal warping path with the cumulative cost at every
//! step.

mod accumulate;
mod band;
mod cell;
mod engine;
mod error;
mod grid;
mod metric;
mod pairwise;
mod path;
mod sequence;

pub use accumulate::{Accumulation, CostMatrix, Direction, DirectionMatrix};
pub use band::Band;
pub use cell::Cell;
pub use engine::{Alignment, AlignmentEngine};
pub use error::DtwError;
pub use grid::Grid;
pub use metric::{DistanceMetric, Euclidean, Manhattan};
pub use pairwise::DistanceMatrix;
pub use path::{WarpingPath, WarpingStep, backtrack};
pub use sequence::{Sequence, SequenceView};
