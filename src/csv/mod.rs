//! CSV snapshot persistence split across reader and writer halves.
//!
//! The codec never touches the roster directly: the reader hands parsed
//! records back to the caller, which performs the bulk replace, and the
//! writer takes a borrowed slice of the current records. Front ends mediate
//! between the two layers.

mod reader;
mod writer;

pub use reader::{load_students, parse_line, LoadOutcome, ParseError, SkippedLine};
pub use writer::{encode_record, save_students};

/// Fixed persistence path used by both binaries. There are no flags or
/// environment variables; this relative path is the whole process contract.
pub const DEFAULT_DATA_FILE: &str = "data/students.csv";
