//! File I/O, validation, and serialization for the lockstep CLI.

mod domain;
mod error;
mod reader;
mod writer;

pub use domain::AlignmentMeta;
pub use error::IoError;
pub use reader::SequenceReader;
pub use writer::{AlignmentWriter, to_json};
