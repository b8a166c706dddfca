//! Sequences of fixed-dimension feature vectors with validation guarantees.

use crate::error::DtwError;

fn validate(values: &[f64], dim: usize) -> Result<(), DtwError> {
    if dim == 0 {
        return Err(DtwError::ZeroDimension);
    }
    if values.is_empty() {
        return Err(DtwError::EmptySequence);
    }
    if values.len() % dim != 0 {
        return Err(DtwError::RaggedSequence {
            len: values.len(),
            dim,
        });
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(DtwError::NonFiniteValue { index });
    }
    Ok(())
}

/// Owned, validated sequence of feature vectors ("frames").
///
/// Frames are stored row-major in one flat buffer. Guaranteed to hold at least
/// one frame, a non-zero dimension, and only finite values.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    values: Vec<f64>,
    dim: usize,
}

impl Sequence {
    /// Create a sequence from a flat row-major buffer of `len * dim` values.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::ZeroDimension`] | `dim` is zero |
    /// | [`DtwError::EmptySequence`] | `values` is empty |
    /// | [`DtwError::RaggedSequence`] | `values.len()` is not a multiple of `dim` |
    /// | [`DtwError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn new(values: Vec<f64>, dim: usize) -> Result<Self, DtwError> {
        validate(&values, dim)?;
        Ok(Self { values, dim })
    }

    /// Create a sequence from one vector per frame.
    ///
    /// # Errors
    ///
    /// Same as [`Sequence::new`]; frames of differing length are reported as
    /// [`DtwError::RaggedSequence`].
    pub fn from_frames(frames: &[Vec<f64>]) -> Result<Self, DtwError> {
        let dim = frames.first().map_or(0, Vec::len);
        let values: Vec<f64> = frames.concat();
        if frames.iter().any(|f| f.len() != dim) {
            return Err(DtwError::RaggedSequence {
                len: values.len(),
                dim,
            });
        }
        Self::new(values, dim)
    }

    /// Create a one-dimensional sequence, one frame per value.
    ///
    /// # Errors
    ///
    /// Same as [`Sequence::new`].
    pub fn from_scalars(values: Vec<f64>) -> Result<Self, DtwError> {
        Self::new(values, 1)
    }

    /// Borrow this sequence as a zero-copy view.
    #[must_use]
    pub fn as_view(&self) -> SequenceView<'_> {
        SequenceView {
            values: &self.values,
            dim: self.dim,
        }
    }

    /// Return the number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len() / self.dim
    }

    /// Return true if the sequence has no frames.
    ///
    /// Always `false` for a validated sequence; provided alongside `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return the feature dimension.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Consume and return the flat row-major buffer.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.values
    }
}

/// Borrowed, validated view of a sequence. Zero-copy reference.
#[derive(Debug, Clone, Copy)]
pub struct SequenceView<'a> {
    values: &'a [f64],
    dim: usize,
}

impl<'a> SequenceView<'a> {
    /// Create a view over a flat row-major buffer, validating it as
    /// [`Sequence::new`] does.
    ///
    /// # Errors
    ///
    /// Same as [`Sequence::new`].
    pub fn new(values: &'a [f64], dim: usize) -> Result<Self, DtwError> {
        validate(values, dim)?;
        Ok(Self { values, dim })
    }

    /// Return the flat row-major buffer.
    #[must_use]
    pub fn as_slice(&self) -> &'a [f64] {
        self.values
    }

    /// Return frame `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[must_use]
    pub fn frame(&self, index: usize) -> &'a [f64] {
        &self.values[index * self.dim..(index + 1) * self.dim]
    }

    /// Iterate over frames in order.
    pub fn frames(&self) -> impl ExactSizeIterator<Item = &'a [f64]> + 'a {
        self.values.chunks_exact(self.dim)
    }

    /// Return the number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len() / self.dim
    }

    /// Return true if the view has no frames. Always `false` once validated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return the feature dimension.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl<'a> From<&'a Sequence> for SequenceView<'a> {
    fn from(sequence: &'a Sequence) -> Self {
        sequence.as_view()
    }
}
