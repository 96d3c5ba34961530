//! Types and methods for reading lines from files and converter processes,
//! classifying them, and writing output.

pub mod file;
pub mod parsers;
pub mod process;
pub mod source;

pub use file::{FileLines, OutputFile};
pub use parsers::{classify_line, split_fields, LineKind};
pub use process::{ExternalCommand, ProcessLines};
pub use source::{LineSource, SourceTarget};
