//! The [`BioTableError`] `enum` definition and error messages.
//!
use std::path::PathBuf;
use thiserror::Error;

/// The [`BioTableError`] defines the standard set of errors that should
/// be passed to the user. Every one of these is fatal to the load in
/// progress; nothing is retried.
#[derive(Debug, Error)]
pub enum BioTableError {
    // IO related errors
    #[error("File reading error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("CSV writing error: {0}")]
    CsvError(#[from] csv::Error),

    // Construction errors
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("invalid file extension: {0}")]
    UnsupportedFormat(PathBuf),

    // Parsing errors
    #[error("Invalid schema at line {line}: {message}")]
    InvalidSchema { line: usize, message: String },
    #[error("Could not parse '{value}' as an integer for column '{column}' at line {line}")]
    TypeCoercion {
        column: String,
        value: String,
        line: usize,
    },

    // External converter errors
    #[error("Command '{command}' returned non-zero exit status {}.\n{stderr}", .code.map_or("(killed by signal)".to_string(), |c| c.to_string()))]
    ExternalTool {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl BioTableError {
    /// Shorthand for building an [`BioTableError::InvalidSchema`] error.
    pub fn invalid_schema(line: usize, message: impl Into<String>) -> Self {
        BioTableError::InvalidSchema {
            line,
            message: message.into(),
        }
    }
}
