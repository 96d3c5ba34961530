//! Lines streamed from the standard output of an external converter.
//!
//! Binary and compressed inputs (BAM, CRAM, BCF, bgzipped VCF) are decoded
//! by `samtools view` or `bcftools view`. [`ProcessLines`] spawns the
//! converter, yields its standard output one line at a time (the output is
//! never buffered whole), and captures its standard error in an anonymous
//! temporary file so a chatty converter can never block on a full pipe.
//!
//! The exit status is only known once the output is closed, so it is
//! checked in [`LineProducer::finish()`]: a nonzero status becomes a
//! [`BioTableError::ExternalTool`] error no matter how many lines were
//! already consumed. If a [`ProcessLines`] is dropped without being
//! finished (e.g. because parsing failed part way), the child is killed and
//! reaped.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::process::{Child, ChildStdout, Command, Stdio};

use crate::error::BioTableError;
use crate::io::{file::PARSE_CAPACITY, parsers::trim_line_terminator};
use crate::traits::LineProducer;

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ExternalCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// A lazy iterator over the standard output lines of a running process.
pub struct ProcessLines {
    command: ExternalCommand,
    child: Option<Child>,
    reader: Option<BufReader<ChildStdout>>,
    stderr: File,
    line_buffer: String,
}

impl fmt::Debug for ProcessLines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessLines")
            .field("command", &self.command)
            .finish_non_exhaustive()
    }
}

impl ProcessLines {
    /// Spawn `command`, with its standard output piped to this iterator.
    pub fn spawn(command: ExternalCommand) -> Result<Self, BioTableError> {
        log::debug!("spawning external converter: {}", command);
        let stderr = tempfile::tempfile()?;
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::from(stderr.try_clone()?))
            .spawn()?;
        let reader = child.stdout.take().map(BufReader::new);
        Ok(Self {
            command,
            child: Some(child),
            reader,
            stderr,
            line_buffer: String::with_capacity(PARSE_CAPACITY),
        })
    }

    fn captured_stderr(&mut self) -> String {
        let mut captured = String::new();
        let read = self
            .stderr
            .seek(SeekFrom::Start(0))
            .and_then(|_| self.stderr.read_to_string(&mut captured));
        if let Err(e) = read {
            log::warn!("could not read standard error of '{}': {}", self.command, e);
        }
        captured.trim_end().to_string()
    }
}

impl Iterator for ProcessLines {
    type Item = Result<String, BioTableError>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        self.line_buffer.clear();
        match reader.read_line(&mut self.line_buffer) {
            Ok(0) => {
                self.reader = None;
                None
            }
            Ok(_) => Some(Ok(trim_line_terminator(&self.line_buffer).to_string())),
            Err(e) => Some(Err(BioTableError::IOError(e))),
        }
    }
}

impl LineProducer for ProcessLines {
    fn finish(mut self) -> Result<(), BioTableError> {
        // Drain anything left so the child is not blocked writing to the pipe.
        if let Some(mut reader) = self.reader.take() {
            std::io::copy(&mut reader, &mut std::io::sink())?;
        }
        let status = match self.child.take() {
            Some(mut child) => child.wait()?,
            None => return Ok(()),
        };
        if status.success() {
            log::debug!("external converter finished: {}", self.command);
            return Ok(());
        }
        Err(BioTableError::ExternalTool {
            command: self.command.to_string(),
            code: status.code(),
            stderr: self.captured_stderr(),
        })
    }
}

impl Drop for ProcessLines {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            log::debug!("killing unfinished external converter: {}", self.command);
            self.reader = None;
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
