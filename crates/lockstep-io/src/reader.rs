//! CSV sequence reader with full input validation.

use std::path::{Path, PathBuf};

use lockstep_dtw::Sequence;
use tracing::{debug, info, instrument};

use crate::IoError;

/// Reads one multi-dimensional sequence from a CSV file.
///
/// Expected CSV format:
/// - One frame per row, one feature per column
/// - All rows must have the same number of columns
/// - Optional header row, skipped when [`with_headers`](Self::with_headers) is set
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::EmptyDataset`] | Zero data rows |
/// | [`IoError::InconsistentRowLength`] | Row has a different column count than the first |
/// | [`IoError::NonFiniteValue`] | Cell is NaN, Inf, or unparseable float |
/// | [`IoError::InvalidSequence`] | Values rejected by [`Sequence::new`] |
pub struct SequenceReader {
    path: PathBuf,
    has_headers: bool,
}

impl SequenceReader {
    /// Create a new reader for the given CSV file path. Headers are off by default.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            has_headers: false,
        }
    }

    /// Treat the first row as a header and skip it.
    #[must_use]
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    /// Read and validate the CSV file, returning a [`Sequence`].
    #[instrument(skip(self), fields(path = %self.path.display(), headers = self.has_headers))]
    pub fn read(&self) -> Result<Sequence, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) so that our own InconsistentRowLength check fires
        // instead of a low-level CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(self.has_headers)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut expected_cols = if self.has_headers {
            let header = rdr.headers().map_err(|e| self.csv_error(e))?;
            debug!(expected_cols = header.len(), "read CSV header");
            Some(header.len())
        } else {
            None
        };

        let mut values = Vec::new();
        let mut n_frames = 0usize;

        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;

            let expected = *expected_cols.get_or_insert(record.len());
            if record.len() != expected {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected,
                    got: record.len(),
                });
            }

            for (col_index, raw) in record.iter().enumerate() {
                let value = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| IoError::NonFiniteValue {
                        path: self.path.clone(),
                        row_index,
                        col_index,
                        raw: raw.to_string(),
                    })?;
                values.push(value);
            }
            n_frames += 1;
        }

        let dim = match expected_cols {
            Some(dim) if n_frames > 0 => dim,
            _ => {
                return Err(IoError::EmptyDataset {
                    path: self.path.clone(),
                });
            }
        };

        let sequence = Sequence::new(values, dim).map_err(|source| IoError::InvalidSequence {
            path: self.path.clone(),
            source,
        })?;

        info!(n_frames, dim, "sequence loaded");
        Ok(sequence)
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn read_frames_without_header() {
        let f = write_csv("0.0,1.0\n2.0,3.0\n4.0,5.0\n");
        let seq = SequenceReader::new(f.path()).read().unwrap();
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.dim(), 2);
        assert_eq!(seq.as_view().frame(1), &[2.0, 3.0]);
    }

    #[test]
    fn read_frames_with_header() {
        let f = write_csv("mfcc0,mfcc1,mfcc2\n1.0,2.0,3.0\n4.0,5.0,6.0\n");
        let seq = SequenceReader::new(f.path()).with_headers(true).read().unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.dim(), 3);
    }

    #[test]
    fn header_read_as_data_is_rejected() {
        let f = write_csv("a,b\n1.0,2.0\n");
        let err = SequenceReader::new(f.path()).read().unwrap_err();
        assert!(matches!(err, IoError::NonFiniteValue { row_index: 0, col_index: 0, .. }));
    }

    #[test]
    fn whitespace_around_values_is_trimmed() {
        let f = write_csv(" 1.5 , 2.5\n3.5,4.5 \n");
        let seq = SequenceReader::new(f.path()).read().unwrap();
        assert_eq!(seq.as_view().frame(0), &[1.5, 2.5]);
    }

    #[test]
    fn empty_dataset_error() {
        let f = write_csv("x,y\n");
        let err = SequenceReader::new(f.path()).with_headers(true).read().unwrap_err();
        assert!(matches!(err, IoError::EmptyDataset { .. }));

        let f = write_csv("");
        let err = SequenceReader::new(f.path()).read().unwrap_err();
        assert!(matches!(err, IoError::EmptyDataset { .. }));
    }

    #[test]
    fn inconsistent_row_length_error() {
        let f = write_csv("1.0,2.0\n3.0\n");
        let err = SequenceReader::new(f.path()).read().unwrap_err();
        assert!(matches!(
            err,
            IoError::InconsistentRowLength { row_index: 1, expected: 2, got: 1, .. }
        ));
    }

    #[test]
    fn non_finite_value_error() {
        let f = write_csv("1.0,NaN\n");
        let err = SequenceReader::new(f.path()).read().unwrap_err();
        assert!(matches!(err, IoError::NonFiniteValue { col_index: 1, .. }));

        let f = write_csv("1.0,abc\n");
        let err = SequenceReader::new(f.path()).read().unwrap_err();
        assert!(matches!(err, IoError::NonFiniteValue { ref raw, .. } if raw == "abc"));
    }

    #[test]
    fn missing_file_error() {
        let err = SequenceReader::new(Path::new("/nonexistent/lockstep.csv"))
            .read()
            .unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }
}
