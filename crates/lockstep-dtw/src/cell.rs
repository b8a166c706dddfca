//! Tagged grid value: a computed quantity or a cell that was never computed.

use std::fmt;

/// A distance or cumulative cost stored in the alignment grid.
///
/// Cells outside the band, or unreachable from `(0, 0)`, are [`Cell::Missing`].
/// A missing cell is distinct from a zero-cost cell.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Cell {
    /// Never computed.
    #[default]
    Missing,
    /// A computed non-negative value.
    Value(f64),
}

impl Cell {
    /// Return the stored value, if any.
    #[must_use]
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::Missing => None,
        }
    }

    /// Return true if the cell was never computed.
    #[must_use]
    pub fn is_missing(self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Value used when comparing DP predecessors: missing cells cost infinity.
    pub(crate) fn or_infinity(self) -> f64 {
        self.value().unwrap_or(f64::INFINITY)
    }
}

impl From<Option<f64>> for Cell {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Missing, Self::Value)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v:.6}"),
            Self::Missing => f.write_str("-"),
        }
    }
}
