//! Input/Output file handling with [`FileLines`] and [`OutputFile`].
//!
//! Compressed and binary inputs are never decoded here; those go through an
//! external converter (see [`crate::io::process`]).

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use crate::error::BioTableError;
use crate::io::parsers::trim_line_terminator;
use crate::traits::LineProducer;

pub const PARSE_CAPACITY: usize = 512;

/// A lazy iterator over the lines of a plaintext file.
///
/// Each line is UTF-8 decoded and yielded without its line terminator.
pub struct FileLines {
    filepath: PathBuf,
    reader: BufReader<File>,
    line_buffer: String,
}

impl std::fmt::Debug for FileLines {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileLines")
            .field("filepath", &self.filepath)
            .finish_non_exhaustive()
    }
}

impl FileLines {
    /// Open `filepath` for line-by-line reading.
    pub fn new(filepath: impl Into<PathBuf>) -> Result<Self, BioTableError> {
        let filepath = filepath.into();
        let file = File::open(&filepath)?;
        Ok(Self {
            filepath,
            reader: BufReader::new(file),
            line_buffer: String::with_capacity(PARSE_CAPACITY),
        })
    }
}

impl Iterator for FileLines {
    type Item = Result<String, BioTableError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.line_buffer.clear();
        match self.reader.read_line(&mut self.line_buffer) {
            Ok(0) => None,
            Ok(_) => Some(Ok(trim_line_terminator(&self.line_buffer).to_string())),
            Err(e) => Some(Err(BioTableError::IOError(e))),
        }
    }
}

impl LineProducer for FileLines {
    fn finish(self) -> Result<(), BioTableError> {
        Ok(())
    }
}

enum OutputDestination {
    File(PathBuf),
    Stdout,
}

/// Represents an output file.
///
/// This abstracts writing either to a file on disk or to standard output.
pub struct OutputFile {
    destination: OutputDestination,
    pub header: Option<Vec<String>>,
}

impl OutputFile {
    /// Constructs a new `OutputFile`.
    ///
    /// # Arguments
    ///
    /// * `filepath` - the path of the file to create (or truncate).
    /// * `header` - optional header lines, written verbatim before anything else.
    pub fn new(filepath: impl Into<PathBuf>, header: Option<Vec<String>>) -> Self {
        Self {
            destination: OutputDestination::File(filepath.into()),
            header,
        }
    }

    /// Constructs a new [`OutputFile`] for standard output.
    pub fn new_stdout(header: Option<Vec<String>>) -> Self {
        Self {
            destination: OutputDestination::Stdout,
            header,
        }
    }

    /// Opens the destination and returns a writer, with the header (if
    /// one is set) already written.
    pub fn writer(&self) -> io::Result<Box<dyn Write>> {
        let mut writer: Box<dyn Write> = match &self.destination {
            OutputDestination::File(path) => Box::new(BufWriter::new(File::create(path)?)),
            OutputDestination::Stdout => Box::new(BufWriter::new(io::stdout())),
        };
        if let Some(entries) = &self.header {
            for entry in entries {
                writeln!(writer, "{}", entry)?;
            }
        }
        Ok(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::{FileLines, OutputFile};
    use crate::test_utilities::temp_text_file;
    use crate::traits::LineProducer;
    use std::io::Write;

    #[test]
    fn test_file_lines_strip_terminators() {
        let file = temp_text_file(".bed", "track name=a\r\nchr1\t1\t2\n\nchr2\t3\t4");
        let lines: Vec<String> = FileLines::new(file.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(lines, vec!["track name=a", "chr1\t1\t2", "", "chr2\t3\t4"]);
    }

    #[test]
    fn test_file_lines_missing_file() {
        assert!(FileLines::new("no/such/file.sam").is_err());
    }

    #[test]
    fn test_file_lines_finish() {
        let file = temp_text_file(".sam", "r1\t0\n");
        let mut lines = FileLines::new(file.path()).unwrap();
        assert!(lines.next().is_some());
        assert!(lines.next().is_none());
        assert!(lines.finish().is_ok());
    }

    #[test]
    fn test_output_file_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let output = OutputFile::new(&path, Some(vec!["##fileformat=VCFv4.2".to_string()]));
        {
            let mut writer = output.writer().unwrap();
            writeln!(writer, "a,b").unwrap();
        }
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "##fileformat=VCFv4.2\na,b\n");
    }
}
