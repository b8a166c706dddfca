//! Error types for sequence validation and DTW alignment.

use crate::band::Band;

/// Errors from sequence validation and DTW alignment.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DtwError {
    /// Returned when a sequence contains no frames.
    #[error("sequence must contain at least one frame")]
    EmptySequence,

    /// Returned when a sequence is declared with a feature dimension of zero.
    #[error("feature dimension must be at least 1")]
    ZeroDimension,

    /// Returned when the flat buffer length is not a multiple of the feature dimension.
    #[error("flat sequence of {len} values cannot be split into frames of dimension {dim}")]
    RaggedSequence {
        /// Number of values in the flat buffer.
        len: usize,
        /// Declared feature dimension.
        dim: usize,
    },

    /// Returned when a sequence contains NaN, infinity, or negative infinity.
    #[error("sequence contains non-finite value at flat index {index}")]
    NonFiniteValue {
        /// Position of the first non-finite value in the flat buffer.
        index: usize,
    },

    /// Returned when the two sequences have different feature dimensions.
    #[error("feature dimensions differ: {left} vs {right}")]
    DimensionMismatch {
        /// Dimension of the first sequence.
        left: usize,
        /// Dimension of the second sequence.
        right: usize,
    },

    /// Returned when the band leaves one of the mandatory corner cells uncomputed.
    #[error("cell ({row}, {col}) lies outside band {band}")]
    CornerOutsideBand {
        /// Row of the excluded corner.
        row: usize,
        /// Column of the excluded corner.
        col: usize,
        /// The band that excluded it.
        band: Band,
    },

    /// Returned when the band leaves no connected path to the final cell.
    #[error("no warping path inside the band connects the corners of a {rows}x{cols} grid")]
    Unreachable {
        /// Number of frames in the first sequence.
        rows: usize,
        /// Number of frames in the second sequence.
        cols: usize,
    },

    /// Returned when the diagonal weight is negative or not finite.
    #[error("diagonal weight must be finite and non-negative, got {weight}")]
    InvalidDiagonalWeight {
        /// The rejected weight.
        weight: f64,
    },

    /// Returned when a distance metric yields a negative or non-finite value.
    #[error("distance metric returned {value} for cell ({row}, {col})")]
    InvalidDistance {
        /// Frame index in the first sequence.
        row: usize,
        /// Frame index in the second sequence.
        col: usize,
        /// The offending value.
        value: f64,
    },

    /// Returned when backtracking reaches a cell with no recorded predecessor.
    #[error("backtracking stalled at unvisited cell ({row}, {col})")]
    BrokenPath {
        /// Row of the stalled cell.
        row: usize,
        /// Column of the stalled cell.
        col: usize,
    },
}
