//! Per-frame distance metrics.

/// Distance between two feature vectors of equal length.
///
/// Implementations must be deterministic and return a non-negative finite
/// value. Symmetry is expected but not enforced. Any
/// `Fn(&[f64], &[f64]) -> f64` closure is a metric.
pub trait DistanceMetric {
    /// Return the distance between `x` and `y`.
    fn distance(&self, x: &[f64], y: &[f64]) -> f64;
}

impl<F> DistanceMetric for F
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    fn distance(&self, x: &[f64], y: &[f64]) -> f64 {
        self(x, y)
    }
}

/// Euclidean (L2) distance, `sqrt(sum((x_k - y_k)^2))`. The default metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Euclidean;

impl DistanceMetric for Euclidean {
    fn distance(&self, x: &[f64], y: &[f64]) -> f64 {
        debug_assert_eq!(x.len(), y.len());
        x.iter()
            .zip(y)
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}

/// Manhattan (L1) distance, `sum(|x_k - y_k|)`. Never smaller than [`Euclidean`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Manhattan;

impl DistanceMetric for Manhattan {
    fn distance(&self, x: &[f64], y: &[f64]) -> f64 {
        debug_assert_eq!(x.len(), y.len());
        x.iter().zip(y).map(|(a, b)| (a - b).abs()).sum()
    }
}
