//! Domain types for lockstep-io.

use lockstep_dtw::AlignmentEngine;

/// Run parameters recorded next to an alignment in the output artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentMeta {
    diagonal_weight: f64,
    band: usize,
    metric: String,
}

impl AlignmentMeta {
    /// Capture the configuration of `engine` and the name of the metric it ran with.
    pub fn new(engine: &AlignmentEngine, metric: impl Into<String>) -> Self {
        Self {
            diagonal_weight: engine.diagonal_weight(),
            band: engine.band().width(),
            metric: metric.into(),
        }
    }

    /// Return the diagonal weight.
    #[must_use]
    pub fn diagonal_weight(&self) -> f64 {
        self.diagonal_weight
    }

    /// Return the effective band half-width, 0 when unbanded.
    #[must_use]
    pub fn band(&self) -> usize {
        self.band
    }

    /// Return the metric name.
    #[must_use]
    pub fn metric(&self) -> &str {
        &self.metric
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockstep_dtw::Band;

    #[test]
    fn captures_engine_configuration() {
        let engine = AlignmentEngine::new(0.5, Band::new(4)).unwrap();
        let meta = AlignmentMeta::new(&engine, "manhattan");
        assert_eq!(meta.diagonal_weight(), 0.5);
        assert_eq!(meta.band(), 4);
        assert_eq!(meta.metric(), "manhattan");
    }

    #[test]
    fn narrow_band_recorded_as_unbanded() {
        let engine = AlignmentEngine::unbanded().with_band(Band::Window(1));
        assert_eq!(AlignmentMeta::new(&engine, "euclidean").band(), 0);
    }
}
