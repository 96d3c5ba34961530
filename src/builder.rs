//! The streaming, schema-inferring table builder.
//!
//! [`StreamingTableBuilder`] consumes lines one at a time. Header lines are
//! collected verbatim; the first data line (or, for VCF, the `#CHROM` line)
//! freezes the schema; every data line after that is split, coerced to the
//! column types, and appended as a row.
//!
//! ```
//! use biotable::builder::StreamingTableBuilder;
//! use biotable::io::LineSource;
//! use biotable::schema::{SchemaRegistry, TableFormat};
//!
//! let registry = SchemaRegistry::new(TableFormat::Bed);
//! let source = LineSource::from_lines(["track name=demo", "chr1\t10\t20\tgeneA"]);
//! let built = StreamingTableBuilder::new(&registry).build(source).unwrap();
//! assert_eq!(built.header, vec!["track name=demo"]);
//! assert_eq!(built.table.column_names(), vec!["chrom", "chromStart", "chromEnd", "name"]);
//! ```

use crate::{
    data::DatumType,
    error::BioTableError,
    io::parsers::{classify_line, split_fields, LineKind},
    schema::{SchemaRegistry, TableFormat},
    table::Table,
    traits::LineProducer,
};

/// Everything produced by one pass over a line source.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltTable {
    pub table: Table,
    /// Header/metadata lines, verbatim, in encounter order.
    pub header: Vec<String>,
    /// VCF sample names from the `#CHROM` line; empty for other formats.
    pub samples: Vec<String>,
    /// Total lines read, including header and blank lines.
    pub n_lines: usize,
}

/// Builds a [`Table`] incrementally from classified lines.
#[derive(Debug)]
pub struct StreamingTableBuilder<'a> {
    registry: &'a SchemaRegistry,
    table: Option<Table>,
    header: Vec<String>,
    samples: Vec<String>,
    line_number: usize,
}

impl<'a> StreamingTableBuilder<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            table: None,
            header: Vec::new(),
            samples: Vec::new(),
            line_number: 0,
        }
    }

    /// Drain `source`, then finalize it, then finish the table.
    ///
    /// The source is always finalized before the table is returned, so a
    /// converter that exits nonzero fails the build even if every line it
    /// produced parsed cleanly. If a line fails to parse, the source is
    /// dropped unfinished, which kills a converter process.
    pub fn build<P: LineProducer>(mut self, mut source: P) -> Result<BuiltTable, BioTableError> {
        for line in source.by_ref() {
            self.push_line(&line?)?;
        }
        source.finish()?;
        self.finish()
    }

    /// Process one line, without its line terminator.
    pub fn push_line(&mut self, line: &str) -> Result<(), BioTableError> {
        self.line_number += 1;
        if line.is_empty() {
            return Ok(());
        }
        match classify_line(self.registry.format(), line) {
            LineKind::Header => {
                self.header.push(line.to_string());
                Ok(())
            }
            LineKind::Declaration => self.push_declaration(line),
            LineKind::Data => self.push_data(line),
        }
    }

    fn push_declaration(&mut self, line: &str) -> Result<(), BioTableError> {
        if self.table.is_some() {
            return Err(BioTableError::invalid_schema(
                self.line_number,
                "duplicate #CHROM declaration line",
            ));
        }
        let fields: Vec<&str> = line.trim_end().split('\t').collect();
        self.registry.check_declaration(&fields, self.line_number)?;
        let schema = self.registry.freeze(fields.len(), self.line_number)?;
        self.samples = fields[schema.n_fixed()..]
            .iter()
            .map(|s| s.to_string())
            .collect();
        log::debug!(
            "declared {} columns ({} samples) at line {}",
            schema.len(),
            self.samples.len(),
            self.line_number
        );
        self.table = Some(Table::new(schema));
        Ok(())
    }

    fn push_data(&mut self, line: &str) -> Result<(), BioTableError> {
        let format = self.registry.format();
        let fields = split_fields(format, line);

        let line_number = self.line_number;
        let table = match &mut self.table {
            Some(table) => table,
            slot @ None => {
                if format == TableFormat::Vcf {
                    return Err(BioTableError::invalid_schema(
                        line_number,
                        "data line found before the #CHROM declaration line",
                    ));
                }
                let schema = self.registry.freeze(fields.len(), line_number)?;
                log::debug!(
                    "froze {} schema with {} columns ({} optional) at line {}",
                    format,
                    schema.len(),
                    schema.n_optional(),
                    line_number
                );
                slot.insert(Table::new(schema))
            }
        };

        if fields.len() > table.ncols() {
            return Err(BioTableError::invalid_schema(
                line_number,
                format!(
                    "line has {} fields, but the schema has {} columns",
                    fields.len(),
                    table.ncols()
                ),
            ));
        }
        if fields.len() < table.n_fixed() {
            return Err(BioTableError::invalid_schema(
                line_number,
                format!(
                    "line has {} fields, but {} requires at least {}",
                    fields.len(),
                    format,
                    table.n_fixed()
                ),
            ));
        }

        let n_fixed = table.n_fixed();
        let row = table
            .columns()
            .iter()
            .enumerate()
            .map(|(i, column)| match fields.get(i) {
                Some(raw) => column
                    .dtype
                    .coerce(raw, i < n_fixed)
                    .map_err(|_| BioTableError::TypeCoercion {
                        column: column.name.clone(),
                        value: raw.to_string(),
                        line: line_number,
                    }),
                None => Ok(DatumType::NoValue),
            })
            .collect::<Result<Vec<_>, _>>()?;
        table.push_row(row);
        Ok(())
    }

    /// Finish the load, producing the table even if no data lines were seen.
    pub fn finish(self) -> Result<BuiltTable, BioTableError> {
        let table = match self.table {
            Some(table) => table,
            None if self.registry.format() == TableFormat::Vcf => {
                return Err(BioTableError::invalid_schema(
                    self.line_number,
                    "no #CHROM declaration line found",
                ))
            }
            None => Table::new(self.registry.freeze(0, self.line_number)?),
        };
        Ok(BuiltTable {
            table,
            header: self.header,
            samples: self.samples,
            n_lines: self.line_number,
        })
    }
}
