//! The [`LineSource`] type: one sequence of text lines, whatever backs it.

use std::path::PathBuf;

use crate::error::BioTableError;
use crate::io::file::FileLines;
use crate::io::process::{ExternalCommand, ProcessLines};
use crate::traits::LineProducer;

/// Where the lines of a load come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceTarget {
    /// Read a plaintext file directly.
    File(PathBuf),
    /// Stream the standard output of an external converter.
    Command(ExternalCommand),
}

/// A single-use sequence of lines, backed by a file, a running process, or
/// lines already in memory. It cannot be rewound; open a new one to re-read.
#[derive(Debug)]
pub enum LineSource {
    File(FileLines),
    Process(ProcessLines),
    Memory(std::vec::IntoIter<String>),
}

impl LineSource {
    /// Open `target`, spawning the external command if there is one.
    pub fn open(target: &SourceTarget) -> Result<Self, BioTableError> {
        match target {
            SourceTarget::File(path) => Ok(LineSource::File(FileLines::new(path)?)),
            SourceTarget::Command(command) => {
                Ok(LineSource::Process(ProcessLines::spawn(command.clone())?))
            }
        }
    }

    /// A source over lines that are already in memory, e.g. for tests or
    /// text decoded elsewhere. Line terminators should already be removed.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        LineSource::Memory(lines.into_iter())
    }
}

impl Iterator for LineSource {
    type Item = Result<String, BioTableError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            LineSource::File(lines) => lines.next(),
            LineSource::Process(lines) => lines.next(),
            LineSource::Memory(lines) => lines.next().map(Ok),
        }
    }
}

impl LineProducer for LineSource {
    fn finish(self) -> Result<(), BioTableError> {
        match self {
            LineSource::File(lines) => lines.finish(),
            LineSource::Process(lines) => lines.finish(),
            LineSource::Memory(_) => Ok(()),
        }
    }
}
