//! Traits used by the biotable library.
//!

use crate::{data::DatumType, error::BioTableError};

/// Conversion of a native value into a table cell.
pub trait IntoDatumType {
    fn into_data_type(self) -> DatumType;
}

/// A producer of text lines that must be explicitly finalized once drained.
///
/// Lines are yielded with their line terminator already removed. After the
/// iterator is exhausted, [`LineProducer::finish()`] reports whether the
/// underlying source completed successfully; for a process-backed source
/// this is where a nonzero exit status surfaces, so consumers must always
/// call it before treating a load as successful.
pub trait LineProducer: Iterator<Item = Result<String, BioTableError>> + Sized {
    /// Release the source and report its final status.
    fn finish(self) -> Result<(), BioTableError>;
}
