//! Diagonal band restricting which cells of the alignment grid are computed.

use std::fmt;
use std::ops::Range;

/// Corridor around the scaled diagonal of the alignment grid.
///
/// For row `x` of an `n_rows x n_cols` grid the band keeps columns
/// `ceil(x * n_cols / n_rows - w) .. ceil(x * n_cols / n_rows + w)`, clipped to
/// the grid. The corridor is defined per row, so its column coverage is not
/// symmetric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Band {
    /// Every cell is computed.
    #[default]
    Unbanded,

    /// Half-width `w` of the corridor. Widths of 0 or 1 behave like [`Band::Unbanded`].
    Window(usize),
}

impl Band {
    /// Build a band from a width, where widths of 0 and 1 disable banding.
    #[must_use]
    pub fn new(width: usize) -> Self {
        if width > 1 {
            Self::Window(width)
        } else {
            Self::Unbanded
        }
    }

    /// Build a band from a signed width. Any width below 2, negative ones
    /// included, disables banding.
    #[must_use]
    pub fn from_signed(width: i64) -> Self {
        usize::try_from(width).map_or(Self::Unbanded, Self::new)
    }

    /// Return the effective half-width, or 0 when unbanded.
    #[must_use]
    pub fn width(&self) -> usize {
        match self {
            Self::Window(w) if *w > 1 => *w,
            _ => 0,
        }
    }

    /// Return true if the band actually restricts the grid.
    #[must_use]
    pub fn is_banded(&self) -> bool {
        self.width() > 1
    }

    /// Return the computed column range for `row` of an `n_rows x n_cols` grid.
    ///
    /// `n_rows` must be non-zero.
    #[must_use]
    pub fn column_range(&self, row: usize, n_rows: usize, n_cols: usize) -> Range<usize> {
        let w = self.width();
        if w <= 1 {
            return 0..n_cols;
        }
        let centre = row as f64 * n_cols as f64 / n_rows as f64;
        let w = w as f64;
        let start = (centre - w).ceil().max(0.0) as usize;
        let end = ((centre + w).ceil().max(0.0) as usize).min(n_cols);
        start.min(end)..end
    }

    /// Return true if cell `(row, col)` is inside the band.
    #[must_use]
    pub fn contains(&self, row: usize, col: usize, n_rows: usize, n_cols: usize) -> bool {
        row < n_rows && self.column_range(row, n_rows, n_cols).contains(&col)
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.width() {
            0 => f.write_str("unbanded"),
            w => write!(f, "window {w}"),
        }
    }
}
