//! The [`BioTable`] loader: one file of one format, loaded into a [`Table`].
//!
//! Construction only validates the path; [`BioTable::load()`] does the
//! work. Plain text inputs (`.sam`, `.vcf`, BED, flagstat) are read
//! directly, while binary or compressed inputs (`.bam`, `.cram`, `.bcf`,
//! `.vcf.gz`) are streamed through `samtools view` or `bcftools view`.
//!
//! ```no_run
//! use biotable::prelude::*;
//!
//! let mut vcf = BioTable::vcf("calls.vcf.gz")?
//!     .with_converter(ConverterConfig { n_thread: 4, ..Default::default() });
//! let report = vcf.load()?;
//! println!("{} variants for samples {:?}", report.n_rows, vcf.samples());
//! # Ok::<(), BioTableError>(())
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{
    builder::StreamingTableBuilder,
    error::BioTableError,
    io::{parsers::utils::match_extension, ExternalCommand, LineSource, OutputFile, SourceTarget},
    reporting::LoadReport,
    schema::{SchemaRegistry, TableFormat},
    table::Table,
};

/// Settings for the external converters used on binary/compressed inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    /// The `samtools` executable, used for `.bam` and `.cram`.
    pub samtools: String,
    /// The `bcftools` executable, used for `.bcf` and `.vcf.gz`.
    pub bcftools: String,
    /// Thread count forwarded to the converter; only passed when above 1.
    pub n_thread: usize,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            samtools: "samtools".to_string(),
            bcftools: "bcftools".to_string(),
            n_thread: 1,
        }
    }
}

impl ConverterConfig {
    /// The converter command that decodes `path` as `format` to text.
    pub fn command(&self, format: TableFormat, path: &Path) -> Option<ExternalCommand> {
        let path = path.to_string_lossy().to_string();
        let threads = self.n_thread.to_string();
        match format {
            TableFormat::Sam => {
                let mut args = vec!["view".to_string()];
                if self.n_thread > 1 {
                    args.extend(["-@".to_string(), threads]);
                }
                args.extend(["-h".to_string(), path]);
                Some(ExternalCommand::new(self.samtools.clone(), args))
            }
            TableFormat::Vcf => {
                let mut args = vec!["view".to_string()];
                if self.n_thread > 1 {
                    args.extend(["--threads".to_string(), threads]);
                }
                args.push(path);
                Some(ExternalCommand::new(self.bcftools.clone(), args))
            }
            TableFormat::Bed | TableFormat::Flagstat => None,
        }
    }
}

/// A loader for one SAM, VCF, BED or flagstat file, and the table it produced.
#[derive(Debug, Clone)]
pub struct BioTable {
    path: PathBuf,
    extension: Option<&'static str>,
    registry: SchemaRegistry,
    converter: ConverterConfig,
    table: Table,
    header: Vec<String>,
    samples: Vec<String>,
}

impl BioTable {
    /// Create a loader for `path` as `format`. No content is read.
    ///
    /// # Errors
    /// [`BioTableError::FileNotFound`] if `path` is not an existing file, and
    /// [`BioTableError::UnsupportedFormat`] if its extension is not one the
    /// format accepts.
    pub fn new(path: impl Into<PathBuf>, format: TableFormat) -> Result<Self, BioTableError> {
        Self::with_registry(path, SchemaRegistry::new(format))
    }

    fn with_registry(
        path: impl Into<PathBuf>,
        registry: SchemaRegistry,
    ) -> Result<Self, BioTableError> {
        let path = path.into();
        if !path.is_file() {
            return Err(BioTableError::FileNotFound(path));
        }
        let supported = registry.format().supported_extensions();
        let extension = match_extension(&path, supported);
        if !supported.is_empty() && extension.is_none() {
            return Err(BioTableError::UnsupportedFormat(path));
        }
        Ok(Self {
            path,
            extension,
            registry,
            converter: ConverterConfig::default(),
            table: Table::default(),
            header: Vec::new(),
            samples: Vec::new(),
        })
    }

    /// A SAM loader; accepts `.sam`, `.bam` and `.cram`.
    pub fn sam(path: impl Into<PathBuf>) -> Result<Self, BioTableError> {
        Self::new(path, TableFormat::Sam)
    }

    /// A VCF loader; accepts `.vcf`, `.vcf.gz` and `.bcf`.
    pub fn vcf(path: impl Into<PathBuf>) -> Result<Self, BioTableError> {
        Self::new(path, TableFormat::Vcf)
    }

    /// A BED loader; accepts `.bed`, `.txt` and `.tsv`.
    pub fn bed(path: impl Into<PathBuf>) -> Result<Self, BioTableError> {
        Self::new(path, TableFormat::Bed)
    }

    /// A BED loader whose optional columns are `names` instead of the
    /// standard BED12 trailing columns.
    pub fn bed_with_optional_columns(
        path: impl Into<PathBuf>,
        names: &[String],
    ) -> Result<Self, BioTableError> {
        Self::with_registry(path, SchemaRegistry::bed_with_optional_columns(names))
    }

    /// A `samtools flagstat` report loader; any extension is accepted.
    pub fn flagstat(path: impl Into<PathBuf>) -> Result<Self, BioTableError> {
        Self::new(path, TableFormat::Flagstat)
    }

    pub fn with_converter(mut self, converter: ConverterConfig) -> Self {
        self.converter = converter;
        self
    }

    /// Fail loads whose files have more than `max` optional columns.
    pub fn with_max_optional_columns(mut self, max: usize) -> Self {
        self.registry = self.registry.with_max_optional_columns(max);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> TableFormat {
        self.registry.format()
    }

    /// The supported extension the path matched, if the format has any.
    pub fn extension(&self) -> Option<&'static str> {
        self.extension
    }

    /// Where a load reads its lines from: the file itself, or a converter.
    pub fn source_target(&self) -> SourceTarget {
        if self.format().needs_converter(self.extension) {
            if let Some(command) = self.converter.command(self.format(), &self.path) {
                return SourceTarget::Command(command);
            }
        }
        SourceTarget::File(self.path.clone())
    }

    /// Read the whole source, build the table, and drop optional columns
    /// that are empty in every row.
    ///
    /// Every call starts from an empty table and re-reads the source (or
    /// re-runs the converter). On error the table, header and samples are
    /// left empty.
    pub fn load(&mut self) -> Result<LoadReport, BioTableError> {
        self.table = Table::default();
        self.header.clear();
        self.samples.clear();

        let target = self.source_target();
        log::info!("loading {} from {:?}", self.format(), target);
        let source = LineSource::open(&target)?;
        let built = StreamingTableBuilder::new(&self.registry).build(source)?;

        let mut table = built.table;
        let dropped_columns = table.drop_empty_optional_columns();
        if !dropped_columns.is_empty() {
            log::debug!("dropped empty optional columns: {}", dropped_columns.join(", "));
        }

        let report = LoadReport {
            n_lines: built.n_lines,
            n_header_lines: built.header.len(),
            n_rows: table.nrows(),
            dropped_columns,
        };
        log::info!(
            "loaded {} rows x {} columns ({} header lines) from {}",
            report.n_rows,
            table.ncols(),
            report.n_header_lines,
            self.path.display()
        );

        self.table = table;
        self.header = built.header;
        self.samples = built.samples;
        Ok(report)
    }

    /// Load, then return the finished table.
    pub fn load_and_output_table(&mut self) -> Result<&Table, BioTableError> {
        self.load()?;
        Ok(&self.table)
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn into_table(self) -> Table {
        self.table
    }

    /// Header/metadata lines, verbatim, in file order.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// VCF sample names, in column order; empty for other formats.
    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    /// Write the header lines, then the table as CSV.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<(), BioTableError> {
        for line in &self.header {
            writeln!(writer, "{}", line)?;
        }
        self.table.write_csv(writer)
    }

    /// Write the header lines and CSV table to a file at `path`.
    pub fn write_csv_path(&self, path: impl Into<PathBuf>) -> Result<(), BioTableError> {
        let output = OutputFile::new(path, Some(self.header.clone()));
        let writer = output.writer()?;
        self.table.write_csv(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::{BioTable, ConverterConfig};
    use crate::error::BioTableError;
    use crate::io::SourceTarget;
    use crate::schema::TableFormat;
    use crate::test_utilities::temp_text_file;
    use std::path::Path;

    #[test]
    fn test_file_not_found() {
        assert!(matches!(
            BioTable::sam("no/such/reads.sam"),
            Err(BioTableError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = temp_text_file(".fastq", "@r1\nACGT\n+\nIIII\n");
        assert!(matches!(
            BioTable::sam(file.path()),
            Err(BioTableError::UnsupportedFormat(_))
        ));
        // flagstat accepts any extension
        assert!(BioTable::flagstat(file.path()).is_ok());
    }

    #[test]
    fn test_source_target_direct_and_converted() {
        let sam = temp_text_file(".sam", "");
        let bam = temp_text_file(".bam", "");
        let bcf = temp_text_file(".bcf", "");

        let loader = BioTable::sam(sam.path()).unwrap();
        assert_eq!(loader.extension(), Some(".sam"));
        assert!(matches!(loader.source_target(), SourceTarget::File(_)));

        let converter = ConverterConfig {
            n_thread: 4,
            ..Default::default()
        };
        let loader = BioTable::sam(bam.path()).unwrap().with_converter(converter.clone());
        match loader.source_target() {
            SourceTarget::Command(command) => {
                assert_eq!(command.program, "samtools");
                assert_eq!(&command.args[..4], &["view", "-@", "4", "-h"]);
            }
            other => panic!("expected a converter command, got {:?}", other),
        }

        let loader = BioTable::vcf(bcf.path()).unwrap().with_converter(converter);
        match loader.source_target() {
            SourceTarget::Command(command) => {
                assert_eq!(command.program, "bcftools");
                assert_eq!(&command.args[..3], &["view", "--threads", "4"]);
            }
            other => panic!("expected a converter command, got {:?}", other),
        }
    }

    #[test]
    fn test_single_thread_passes_no_flag() {
        let command = ConverterConfig::default()
            .command(TableFormat::Sam, Path::new("in.bam"))
            .unwrap();
        assert_eq!(command.args, vec!["view", "-h", "in.bam"]);
        let command = ConverterConfig::default()
            .command(TableFormat::Vcf, Path::new("in.bcf"))
            .unwrap();
        assert_eq!(command.args, vec!["view", "in.bcf"]);
    }

    #[test]
    fn test_failed_load_leaves_table_empty() {
        let file = temp_text_file(".bed", "chr1\t1\t2\tgeneA\n");
        let mut loader = BioTable::bed(file.path()).unwrap();
        loader.load().unwrap();
        assert_eq!(loader.table().nrows(), 1);

        std::fs::write(file.path(), "track name=x\nchr1\tone\t2\n").unwrap();
        assert!(matches!(
            loader.load(),
            Err(BioTableError::TypeCoercion { .. })
        ));
        assert_eq!(loader.table().nrows(), 0);
        assert!(loader.header().is_empty());
    }

    #[test]
    fn test_write_csv() {
        let file = temp_text_file(".bed", "track name=x\nchr1\t1\t2\n");
        let mut loader = BioTable::bed(file.path()).unwrap();
        loader.load().unwrap();
        let mut buffer = Vec::new();
        loader.write_csv(&mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "track name=x\nchrom,chromStart,chromEnd\nchr1,1,2\n"
        );
    }
}
