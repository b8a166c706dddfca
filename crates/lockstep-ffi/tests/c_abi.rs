//! Exercises the C entry points the way a foreign caller would.

use std::ffi::{CStr, c_int};
use std::slice;

use lockstep_ffi::{
    DTW_DEGENERATE_INPUT, DTW_INVALID_ARGUMENT, DTW_OK, DtwPath, deallocate_dtw, dtw_path,
    dtw_status_message,
};

fn call(seq1: &[f32], seq2: &[f32], dim: c_int, w_diag: f32, band_win: c_int) -> DtwPath {
    let len1 = seq1.len() as c_int / dim.max(1);
    let len2 = seq2.len() as c_int / dim.max(1);
    // SAFETY: both slices hold exactly `len * dim` values.
    unsafe { dtw_path(seq1.as_ptr(), seq2.as_ptr(), len1, len2, dim, w_diag, band_win) }
}

fn contents(path: &DtwPath) -> (Vec<f32>, Vec<c_int>, Vec<c_int>) {
    let len = path.length as usize;
    // SAFETY: a successful DtwPath holds `length` elements in each buffer.
    unsafe {
        (
            slice::from_raw_parts(path.distances, len).to_vec(),
            slice::from_raw_parts(path.seq1_indices, len).to_vec(),
            slice::from_raw_parts(path.seq2_indices, len).to_vec(),
        )
    }
}

fn assert_failed(path: &DtwPath, status: c_int) {
    assert_eq!(path.status, status);
    assert_eq!(path.length, 0);
    assert!(path.distances.is_null());
    assert!(path.seq1_indices.is_null());
    assert!(path.seq2_indices.is_null());
}

#[test]
fn short_against_long() {
    let mut path = call(&[1.0, 2.0], &[1.0, 2.0, 3.0, 4.0], 1, 1.0, 0);
    assert_eq!(path.status, DTW_OK);
    assert_eq!(path.length, 4);
    assert_eq!(path.total_cost, 3.0);

    let (distances, seq1, seq2) = contents(&path);
    assert_eq!(seq1, vec![0, 1, 1, 1]);
    assert_eq!(seq2, vec![0, 1, 2, 3]);
    assert_eq!(distances, vec![0.0, 0.0, 1.0, 3.0]);

    // SAFETY: `path` came from dtw_path and is released twice on purpose.
    unsafe {
        deallocate_dtw(&mut path);
        assert!(path.distances.is_null());
        assert!(path.seq1_indices.is_null());
        assert!(path.seq2_indices.is_null());
        assert_eq!(path.length, 0);
        deallocate_dtw(&mut path);
        deallocate_dtw(std::ptr::null_mut());
    }
}

#[test]
fn diagonal_weight_and_multi_dimensional_frames() {
    // three 2-d frames of zeros against three of (0.6, 0.8): every distance is 1
    let zeros = [0.0f32; 6];
    let ones = [0.6f32, 0.8, 0.6, 0.8, 0.6, 0.8];
    let mut path = call(&zeros, &ones, 2, 0.5, 0);
    assert_eq!(path.status, DTW_OK);
    assert!((path.total_cost - 2.0).abs() < 1e-6);
    let (_, seq1, seq2) = contents(&path);
    assert_eq!(seq1, vec![0, 1, 2]);
    assert_eq!(seq2, vec![0, 1, 2]);
    // SAFETY: `path` came from dtw_path.
    unsafe { deallocate_dtw(&mut path) };
}

#[test]
fn negative_band_means_unbanded() {
    let a = [0.0f32, 1.0, 2.0, 1.0, 0.0];
    let b = [0.0f32, 2.0, 0.0];
    let mut unbanded = call(&a, &b, 1, 1.0, 0);
    let mut negative = call(&a, &b, 1, 1.0, -5);
    assert_eq!(unbanded.status, DTW_OK);
    assert_eq!(negative.status, DTW_OK);
    assert_eq!(unbanded.total_cost, negative.total_cost);
    assert_eq!(contents(&unbanded), contents(&negative));
    // SAFETY: both came from dtw_path.
    unsafe {
        deallocate_dtw(&mut unbanded);
        deallocate_dtw(&mut negative);
    }
}

#[test]
fn band_excluding_corner_fails() {
    let path = call(&[0.0, 1.0], &[0.0; 10], 1, 1.0, 2);
    assert_failed(&path, DTW_DEGENERATE_INPUT);
}

#[test]
fn invalid_arguments_fail() {
    assert_failed(&call(&[1.0, f32::NAN], &[1.0], 1, 1.0, 0), DTW_INVALID_ARGUMENT);
    assert_failed(&call(&[1.0], &[1.0], 1, -1.0, 0), DTW_INVALID_ARGUMENT);
    assert_failed(&call(&[1.0], &[1.0], 0, 1.0, 0), DTW_INVALID_ARGUMENT);

    // SAFETY: null input is rejected before any read.
    let path = unsafe { dtw_path(std::ptr::null(), [1.0f32].as_ptr(), 1, 1, 1, 1.0, 0) };
    assert_failed(&path, DTW_INVALID_ARGUMENT);
}

#[test]
fn empty_sequence_fails() {
    assert_failed(&call(&[], &[1.0], 1, 1.0, 0), DTW_DEGENERATE_INPUT);
}

#[test]
fn status_messages_are_static_strings() {
    for status in [0, 1, 2, 3, 4, 99] {
        // SAFETY: dtw_status_message returns a static NUL-terminated string.
        let message = unsafe { CStr::from_ptr(dtw_status_message(status)) };
        assert!(!message.to_bytes().is_empty());
    }
    // SAFETY: as above.
    let ok = unsafe { CStr::from_ptr(dtw_status_message(DTW_OK)) };
    assert_eq!(ok.to_str().unwrap(), "ok");
}
