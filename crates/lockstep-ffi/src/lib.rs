//! C ABI for lockstep DTW alignment.
//!
//! Sequences cross the boundary as flat row-major `f32` buffers of
//! `len * dim` values. Results come back in a [`DtwPath`] whose buffers are
//! owned by this library and must be released with [`deallocate_dtw`].

use std::ffi::{c_char, c_int};
use std::panic;
use std::ptr;

use lockstep_dtw::{AlignmentEngine, Band, DtwError, Sequence, WarpingPath};
use tracing::{debug, warn};

/// Alignment succeeded.
pub const DTW_OK: c_int = 0;
/// The sequences have different frame dimensions.
pub const DTW_DIMENSION_MISMATCH: c_int = 1;
/// Empty or ragged input, or a band that excludes a corner or disconnects the grid.
pub const DTW_DEGENERATE_INPUT: c_int = 2;
/// Null pointer, negative length, non-finite value, invalid weight, or invalid distance.
pub const DTW_INVALID_ARGUMENT: c_int = 3;
/// Backtracking failed or the alignment panicked.
pub const DTW_INTERNAL_ERROR: c_int = 4;

/// Warping path returned to C callers.
///
/// The three buffers each hold `length` elements. `distances[i]` is the
/// cumulative cost at `(seq1_indices[i], seq2_indices[i])`, so the last entry
/// equals `total_cost`. On failure every pointer is null, `length` is 0, and
/// `status` is nonzero.
#[repr(C)]
#[derive(Debug)]
pub struct DtwPath {
    /// Cumulative cost at each path element.
    pub distances: *mut f32,
    /// Frame index into the first sequence.
    pub seq1_indices: *mut c_int,
    /// Frame index into the second sequence.
    pub seq2_indices: *mut c_int,
    /// Number of path elements.
    pub length: c_int,
    /// Cumulative cost at the bottom-right cell.
    pub total_cost: f32,
    /// One of the `DTW_*` status codes.
    pub status: c_int,
}

impl DtwPath {
    fn failed(status: c_int) -> Self {
        Self {
            distances: ptr::null_mut(),
            seq1_indices: ptr::null_mut(),
            seq2_indices: ptr::null_mut(),
            length: 0,
            total_cost: 0.0,
            status,
        }
    }
}

fn status_of(error: &DtwError) -> c_int {
    match error {
        DtwError::DimensionMismatch { .. } => DTW_DIMENSION_MISMATCH,
        DtwError::EmptySequence
        | DtwError::RaggedSequence { .. }
        | DtwError::CornerOutsideBand { .. }
        | DtwError::Unreachable { .. } => DTW_DEGENERATE_INPUT,
        DtwError::ZeroDimension
        | DtwError::NonFiniteValue { .. }
        | DtwError::InvalidDiagonalWeight { .. }
        | DtwError::InvalidDistance { .. } => DTW_INVALID_ARGUMENT,
        DtwError::BrokenPath { .. } => DTW_INTERNAL_ERROR,
    }
}

/// Copy `len * dim` values from `data` into an owned sequence.
///
/// # Safety
///
/// `data` must be null or valid for reads of `len * dim` `f32` values.
unsafe fn read_sequence(data: *const f32, len: c_int, dim: c_int) -> Result<Sequence, c_int> {
    let (Ok(len), Ok(dim)) = (usize::try_from(len), usize::try_from(dim)) else {
        return Err(DTW_INVALID_ARGUMENT);
    };
    if len == 0 {
        return Err(DTW_DEGENERATE_INPUT);
    }
    if dim == 0 || data.is_null() {
        return Err(DTW_INVALID_ARGUMENT);
    }
    let count = len.checked_mul(dim).ok_or(DTW_INVALID_ARGUMENT)?;
    // SAFETY: non-null and valid for `count` reads per the caller contract.
    let values = unsafe { std::slice::from_raw_parts(data, count) };
    Sequence::new(values.iter().map(|&v| f64::from(v)).collect(), dim).map_err(|e| status_of(&e))
}

/// Leak `values` as a raw buffer to be reclaimed by [`free_buffer`].
fn into_buffer<T>(values: Vec<T>) -> *mut T {
    Box::into_raw(values.into_boxed_slice()).cast::<T>()
}

/// Reclaim a buffer produced by [`into_buffer`] and null the pointer.
///
/// # Safety
///
/// `*buffer` must be null or a pointer returned by [`into_buffer`] for exactly
/// `len` elements that has not been freed yet.
unsafe fn free_buffer<T>(buffer: &mut *mut T, len: usize) {
    if buffer.is_null() {
        return;
    }
    // SAFETY: reconstructs the boxed slice leaked by `into_buffer`.
    drop(unsafe { Box::from_raw(ptr::slice_from_raw_parts_mut(*buffer, len)) });
    *buffer = ptr::null_mut();
}

fn to_ffi(total_cost: f64, path: &WarpingPath) -> Result<DtwPath, c_int> {
    let length = c_int::try_from(path.len()).map_err(|_| DTW_INTERNAL_ERROR)?;
    let mut distances = Vec::with_capacity(path.len());
    let mut seq1_indices = Vec::with_capacity(path.len());
    let mut seq2_indices = Vec::with_capacity(path.len());
    for step in path {
        // indices are bounded by the input lengths, which were c_int
        let a = c_int::try_from(step.a).map_err(|_| DTW_INTERNAL_ERROR)?;
        let b = c_int::try_from(step.b).map_err(|_| DTW_INTERNAL_ERROR)?;
        distances.push(step.cost as f32);
        seq1_indices.push(a);
        seq2_indices.push(b);
    }
    Ok(DtwPath {
        distances: into_buffer(distances),
        seq1_indices: into_buffer(seq1_indices),
        seq2_indices: into_buffer(seq2_indices),
        length,
        total_cost: total_cost as f32,
        status: DTW_OK,
    })
}

/// # Safety
///
/// Same contract as [`dtw_path`].
unsafe fn align(
    seq1: *const f32,
    seq2: *const f32,
    len_seq1: c_int,
    len_seq2: c_int,
    dim: c_int,
    w_diag: f32,
    band_win: c_int,
) -> Result<DtwPath, c_int> {
    // SAFETY: forwarded caller contract.
    let a = unsafe { read_sequence(seq1, len_seq1, dim) }?;
    // SAFETY: forwarded caller contract.
    let b = unsafe { read_sequence(seq2, len_seq2, dim) }?;
    let engine = AlignmentEngine::new(f64::from(w_diag), Band::from_signed(i64::from(band_win)))
        .map_err(|e| status_of(&e))?;
    let alignment = engine.align(a.as_view(), b.as_view()).map_err(|e| {
        warn!(error = %e, "alignment failed");
        status_of(&e)
    })?;
    to_ffi(alignment.total_cost, &alignment.path)
}

/// Align `seq1` against `seq2` with banded DTW under the Euclidean metric.
///
/// `seq1` holds `len_seq1 * dim` row-major values and `seq2` holds
/// `len_seq2 * dim`. `w_diag` weights the local distance of diagonal steps.
/// `band_win` is the band half-width; any value below 2, negative ones
/// included, disables banding.
///
/// The returned buffers must be freed with [`deallocate_dtw`].
///
/// # Safety
///
/// `seq1` and `seq2` must each be null or valid for reads of their
/// `len * dim` `f32` values for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn dtw_path(
    seq1: *const f32,
    seq2: *const f32,
    len_seq1: c_int,
    len_seq2: c_int,
    dim: c_int,
    w_diag: f32,
    band_win: c_int,
) -> DtwPath {
    let outcome = panic::catch_unwind(|| {
        // SAFETY: forwarded caller contract.
        unsafe { align(seq1, seq2, len_seq1, len_seq2, dim, w_diag, band_win) }
    });
    match outcome {
        Ok(Ok(path)) => {
            debug!(length = path.length, total_cost = path.total_cost, "dtw_path complete");
            path
        }
        Ok(Err(status)) => DtwPath::failed(status),
        Err(_) => {
            warn!("dtw_path panicked");
            DtwPath::failed(DTW_INTERNAL_ERROR)
        }
    }
}

/// Free the buffers of a [`DtwPath`] returned by [`dtw_path`].
///
/// Pointers are nulled and `length` reset, so calling this twice on the same
/// struct is a no-op. A null `path` is ignored.
///
/// # Safety
///
/// `path` must be null or point to a `DtwPath` produced by [`dtw_path`] whose
/// buffers have not been freed or modified by the caller.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn deallocate_dtw(path: *mut DtwPath) {
    // SAFETY: null or a valid, exclusive DtwPath per the caller contract.
    let Some(path) = (unsafe { path.as_mut() }) else {
        return;
    };
    let len = usize::try_from(path.length).unwrap_or(0);
    // SAFETY: each buffer was leaked by `into_buffer` with `len` elements.
    unsafe {
        free_buffer(&mut path.distances, len);
        free_buffer(&mut path.seq1_indices, len);
        free_buffer(&mut path.seq2_indices, len);
    }
    path.length = 0;
}

/// Return a static NUL-terminated description of `status`.
#[unsafe(no_mangle)]
pub extern "C" fn dtw_status_message(status: c_int) -> *const c_char {
    let message = match status {
        DTW_OK => c"ok",
        DTW_DIMENSION_MISMATCH => c"sequences have different frame dimensions",
        DTW_DEGENERATE_INPUT => c"degenerate input: empty sequence or no path inside the band",
        DTW_INVALID_ARGUMENT => c"invalid argument",
        DTW_INTERNAL_ERROR => c"internal error",
        _ => c"unknown status",
    };
    message.as_ptr()
}
