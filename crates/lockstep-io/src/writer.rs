//! JSON writer for alignment results.

use std::fs;
use std::path::{Path, PathBuf};

use lockstep_dtw::{Alignment, WarpingStep};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::IoError;
use crate::domain::AlignmentMeta;

/// Writes an alignment and its run parameters to a JSON file.
///
/// The parent directory is created on write if it does not exist.
pub struct AlignmentWriter {
    path: PathBuf,
}

impl AlignmentWriter {
    /// Create a new writer targeting the given file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Return the target path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `alignment` and `meta` as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::OutputDirCreate`] | The parent directory cannot be created |
    /// | [`IoError::Serialize`] | The artifact cannot be encoded |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn write(&self, alignment: &Alignment, meta: &AlignmentMeta) -> Result<(), IoError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| IoError::OutputDirCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
            debug!("output directory ready");
        }

        let json = to_json(alignment, meta).map_err(|e| IoError::Serialize {
            path: self.path.clone(),
            source: e,
        })?;
        fs::write(&self.path, &json).map_err(|e| IoError::WriteFile {
            path: self.path.clone(),
            source: e,
        })?;

        info!(path_len = alignment.path.len(), "alignment written");
        Ok(())
    }
}

/// Render `alignment` and `meta` as the pretty-printed JSON artifact.
///
/// # Errors
///
/// Returns the underlying `serde_json` error if encoding fails.
pub fn to_json(alignment: &Alignment, meta: &AlignmentMeta) -> Result<String, serde_json::Error> {
    // the path always ends at the bottom-right cell
    let (rows, cols) = alignment
        .path
        .steps()
        .last()
        .map_or((0, 0), |s| (s.a + 1, s.b + 1));

    let artifact = AlignmentArtifact {
        total_cost: alignment.total_cost,
        diagonal_weight: meta.diagonal_weight(),
        band: meta.band(),
        metric: meta.metric(),
        rows,
        cols,
        path: alignment.path.steps(),
    };
    serde_json::to_string_pretty(&artifact)
}

// --- Shadow struct for JSON serialization ---

#[derive(Serialize)]
struct AlignmentArtifact<'a> {
    total_cost: f64,
    diagonal_weight: f64,
    band: usize,
    metric: &'a str,
    rows: usize,
    cols: usize,
    path: &'a [WarpingStep],
}
