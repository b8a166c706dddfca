//! Dynamic-programming accumulation of cumulative costs and predecessor directions.

use tracing::{debug, instrument};

use crate::band::Band;
use crate::cell::Cell;
use crate::error::DtwError;
use crate::grid::Grid;
use crate::metric::DistanceMetric;
use crate::pairwise::DistanceMatrix;
use crate::sequence::SequenceView;

/// Which neighbour a cell's minimum cumulative cost came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// From `(x - 1, y)`.
    FromTop,
    /// From `(x, y - 1)`.
    FromSide,
    /// From `(x - 1, y - 1)`.
    FromDiagonal,
    /// No predecessor: outside the band, unreachable, or the origin.
    #[default]
    NotVisited,
}

/// Minimum cumulative cost of reaching each cell from `(0, 0)`.
pub type CostMatrix = Grid<Cell>;

/// Predecessor chosen for each cell of a [`CostMatrix`].
pub type DirectionMatrix = Grid<Direction>;

/// Pick the cheapest predecessor among top, side, and diagonal.
///
/// Missing candidates count as infinitely costly. Comparisons are strict, so
/// any exact tie resolves to the diagonal. When the diagonal is missing and top
/// and side tie, top wins. Returns `None` when every candidate is missing.
fn select(top: Cell, side: Cell, diagonal: Cell) -> Option<(Direction, f64)> {
    let t = top.or_infinity();
    let s = side.or_infinity();
    let d = diagonal.or_infinity();
    if t < s && t < d {
        Some((Direction::FromTop, t))
    } else if s < t && s < d {
        Some((Direction::FromSide, s))
    } else if d.is_finite() {
        Some((Direction::FromDiagonal, d))
    } else if t.is_finite() {
        Some((Direction::FromTop, t))
    } else {
        None
    }
}

/// Cost of entering a cell with local distance `distance` from a predecessor
/// whose cumulative cost is `from`.
fn step(direction: Direction, from: f64, distance: f64, diagonal_weight: f64) -> f64 {
    match direction {
        Direction::FromDiagonal => from + diagonal_weight * distance,
        _ => from + distance,
    }
}

/// Cumulative cost and direction matrices for one alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulation {
    cost: CostMatrix,
    directions: DirectionMatrix,
}

impl Accumulation {
    /// Run the DTW recurrence over `distances`.
    ///
    /// A cell whose own distance is missing stays [`Cell::Missing`] /
    /// [`Direction::NotVisited`] whatever its neighbours hold, and so does a
    /// present cell none of whose predecessors is reachable.
    #[instrument(skip_all, fields(rows = distances.rows(), cols = distances.cols()))]
    pub fn compute(distances: &DistanceMatrix, diagonal_weight: f64) -> Self {
        let rows = distances.rows();
        let cols = distances.cols();
        let mut cost = CostMatrix::new(rows, cols, Cell::Missing);
        let mut directions = DirectionMatrix::new(rows, cols, Direction::NotVisited);

        cost[(0, 0)] = distances.get(0, 0);

        // first column: only a top predecessor
        for x in 1..rows {
            if let (Cell::Value(d), Cell::Value(from)) = (distances.get(x, 0), cost[(x - 1, 0)]) {
                cost[(x, 0)] = Cell::Value(from + d);
                directions[(x, 0)] = Direction::FromTop;
            }
        }

        // first row: only a side predecessor
        for y in 1..cols {
            if let (Cell::Value(d), Cell::Value(from)) = (distances.get(0, y), cost[(0, y - 1)]) {
                cost[(0, y)] = Cell::Value(from + d);
                directions[(0, y)] = Direction::FromSide;
            }
        }

        let band = distances.band();
        for x in 1..rows {
            let range = band.column_range(x, rows, cols);
            for y in range.start.max(1)..range.end {
                let Cell::Value(d) = distances.get(x, y) else {
                    continue;
                };
                let candidates = (cost[(x - 1, y)], cost[(x, y - 1)], cost[(x - 1, y - 1)]);
                if let Some((direction, from)) = select(candidates.0, candidates.1, candidates.2) {
                    cost[(x, y)] = Cell::Value(step(direction, from, d, diagonal_weight));
                    directions[(x, y)] = direction;
                }
            }
        }

        let reachable = cost.as_slice().iter().filter(|c| !c.is_missing()).count();
        debug!(reachable, "cost accumulation complete");

        Self { cost, directions }
    }

    /// Return the cumulative cost matrix.
    #[must_use]
    pub fn cost(&self) -> &CostMatrix {
        &self.cost
    }

    /// Return the direction matrix.
    #[must_use]
    pub fn directions(&self) -> &DirectionMatrix {
        &self.directions
    }

    /// Return the cumulative cost at the bottom-right cell.
    #[must_use]
    pub fn total_cost(&self) -> Cell {
        self.cost[(self.cost.rows() - 1, self.cost.cols() - 1)]
    }
}

/// Total cost only, using two rolling rows instead of full matrices.
///
/// Applies the same recurrence and tie-break as [`Accumulation::compute`] over
/// distances computed on the fly, so the result equals the total cost of the
/// full computation.
pub(crate) fn rolling_total_cost<M>(
    a: SequenceView<'_>,
    b: SequenceView<'_>,
    metric: &M,
    band: Band,
    diagonal_weight: f64,
) -> Result<Cell, DtwError>
where
    M: DistanceMetric + ?Sized,
{
    let rows = a.len();
    let cols = b.len();
    let mut prev = vec![Cell::Missing; cols];
    let mut curr = vec![Cell::Missing; cols];

    for (x, frame) in a.frames().enumerate() {
        curr.fill(Cell::Missing);
        for y in band.column_range(x, rows, cols) {
            let d = metric.distance(frame, b.frame(y));
            if !(d.is_finite() && d >= 0.0) {
                return Err(DtwError::InvalidDistance { row: x, col: y, value: d });
            }
            let value = match (x, y) {
                (0, 0) => Cell::Value(d),
                (0, _) => curr[y - 1].value().map(|from| from + d).into(),
                (_, 0) => prev[0].value().map(|from| from + d).into(),
                _ => select(prev[y], curr[y - 1], prev[y - 1])
                    .map(|(direction, from)| step(direction, from, d, diagonal_weight))
                    .into(),
            };
            curr[y] = value;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    // after the final swap `prev` holds the last row
    Ok(prev[cols - 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::Euclidean;
    use crate::sequence::Sequence;

    fn scalars(values: &[f64]) -> Sequence {
        Sequence::from_scalars(values.to_vec()).unwrap()
    }

    fn accumulate(a: &[f64], b: &[f64], band: Band, diagonal_weight: f64) -> Accumulation {
        let a = scalars(a);
        let b = scalars(b);
        let distances = DistanceMatrix::build(a.as_view(), b.as_view(), &Euclidean, band).unwrap();
        Accumulation::compute(&distances, diagonal_weight)
    }

    fn cost_row(acc: &Accumulation, row: usize) -> Vec<Option<f64>> {
        acc.cost().row(row).iter().map(|c| c.value()).collect()
    }

    #[test]
    fn strict_minimum_selection() {
        let v = |x| Cell::Value(x);
        assert_eq!(select(v(1.0), v(2.0), v(3.0)), Some((Direction::FromTop, 1.0)));
        assert_eq!(select(v(2.0), v(1.0), v(3.0)), Some((Direction::FromSide, 1.0)));
        assert_eq!(select(v(2.0), v(3.0), v(1.0)), Some((Direction::FromDiagonal, 1.0)));
    }

    #[test]
    fn ties_resolve_to_diagonal() {
        let v = |x| Cell::Value(x);
        assert_eq!(select(v(1.0), v(1.0), v(1.0)), Some((Direction::FromDiagonal, 1.0)));
        assert_eq!(select(v(1.0), v(2.0), v(1.0)), Some((Direction::FromDiagonal, 1.0)));
        // a top/side tie below a present diagonal still picks the diagonal
        assert_eq!(select(v(1.0), v(1.0), v(2.0)), Some((Direction::FromDiagonal, 2.0)));
    }

    #[test]
    fn missing_candidates_are_excluded() {
        let v = |x| Cell::Value(x);
        assert_eq!(
            select(Cell::Missing, v(5.0), Cell::Missing),
            Some((Direction::FromSide, 5.0))
        );
        assert_eq!(
            select(v(4.0), v(4.0), Cell::Missing),
            Some((Direction::FromTop, 4.0))
        );
        assert_eq!(select(Cell::Missing, Cell::Missing, Cell::Missing), None);
    }

    #[test]
    fn hand_computed_two_by_four() {
        // dist row 0 = [0, 1, 2, 3], row 1 = [1, 0, 1, 2]
        let acc = accumulate(&[1.0, 2.0], &[1.0, 2.0, 3.0, 4.0], Band::Unbanded, 1.0);
        assert_eq!(cost_row(&acc, 0), vec![Some(0.0), Some(1.0), Some(3.0), Some(6.0)]);
        assert_eq!(cost_row(&acc, 1), vec![Some(1.0), Some(0.0), Some(1.0), Some(3.0)]);
        assert_eq!(acc.total_cost(), Cell::Value(3.0));

        let dirs = acc.directions();
        assert_eq!(dirs[(0, 0)], Direction::NotVisited);
        assert_eq!(dirs[(0, 3)], Direction::FromSide);
        assert_eq!(dirs[(1, 0)], Direction::FromTop);
        assert_eq!(dirs[(1, 1)], Direction::FromDiagonal);
        assert_eq!(dirs[(1, 2)], Direction::FromSide);
        assert_eq!(dirs[(1, 3)], Direction::FromSide);
    }

    #[test]
    fn diagonal_weight_scales_diagonal_steps_only() {
        // every distance is 1
        let acc = accumulate(&[0.0, 0.0, 0.0], &[1.0, 1.0, 1.0], Band::Unbanded, 0.5);
        assert_eq!(acc.cost()[(1, 1)], Cell::Value(1.5));
        assert_eq!(acc.cost()[(1, 2)], Cell::Value(2.5));
        assert_eq!(acc.directions()[(1, 2)], Direction::FromSide);
        assert_eq!(acc.total_cost(), Cell::Value(2.0));
    }

    #[test]
    fn out_of_band_cells_stay_missing() {
        let acc = accumulate(&[0.0, 0.0, 0.0], &[1.0, 1.0, 1.0], Band::new(2), 1.0);
        assert!(acc.cost()[(0, 2)].is_missing());
        assert_eq!(acc.directions()[(0, 2)], Direction::NotVisited);
        // (1, 2) loses its top candidate but keeps side and diagonal
        assert_eq!(acc.cost()[(1, 2)], Cell::Value(3.0));
        assert_eq!(acc.total_cost(), Cell::Value(3.0));
    }

    #[test]
    fn unreachable_cells_stay_missing() {
        // present cells whose every predecessor is missing
        let mut grid = Grid::new(3, 3, Cell::Missing);
        grid[(0, 0)] = Cell::Value(1.0);
        grid[(1, 2)] = Cell::Value(1.0);
        grid[(2, 0)] = Cell::Value(1.0);
        grid[(2, 2)] = Cell::Value(1.0);
        let distances = DistanceMatrix::from_grid(grid, Band::Unbanded);
        let acc = Accumulation::compute(&distances, 1.0);
        assert_eq!(acc.cost()[(0, 0)], Cell::Value(1.0));
        assert!(acc.cost()[(2, 0)].is_missing());
        assert_eq!(acc.directions()[(2, 0)], Direction::NotVisited);
        assert!(acc.cost()[(1, 2)].is_missing());
        assert_eq!(acc.directions()[(1, 2)], Direction::NotVisited);
        assert!(acc.total_cost().is_missing());
    }

    #[test]
    fn rolling_matches_full() {
        let cases: [(&[f64], &[f64], Band, f64); 4] = [
            (&[1.0, 2.0], &[1.0, 2.0, 3.0, 4.0], Band::Unbanded, 1.0),
            (&[0.0, 3.0, 1.0, 4.0, 2.0], &[1.0, 1.0, 5.0], Band::Unbanded, 0.5),
            (&[0.0, 1.0, 2.0, 1.0, 0.0, 1.0], &[1.0, 2.0, 1.0, 0.0, 0.0, 2.0], Band::new(2), 2.0),
            (&[0.0, 0.0, 0.0], &[1.0, 1.0, 1.0], Band::new(2), 1.0),
        ];
        for (a, b, band, w) in cases {
            let full = accumulate(a, b, band, w).total_cost();
            let sa = scalars(a);
            let sb = scalars(b);
            let rolling = rolling_total_cost(sa.as_view(), sb.as_view(), &Euclidean, band, w).unwrap();
            assert_eq!(full, rolling, "mismatch for {a:?} vs {b:?} ({band}, w={w})");
        }
    }
}
