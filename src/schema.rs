//! Per-format column knowledge, and schema freezing.
//!
//! Each supported format has a *fixed* prefix of columns that every conforming
//! file carries, followed by a file-specific number of *optional* columns (SAM
//! tags, VCF samples, trailing BED fields). The [`SchemaRegistry`] holds the
//! static knowledge for one format; calling [`SchemaRegistry::freeze()`] with
//! the field count of the first data line (or the VCF `#CHROM` line) produces
//! the [`Schema`] used for the rest of the load.
//!
//! # Design
//!
//! The optional-suffix width is decided once per load. A later line with
//! more fields than the frozen schema is an error, never a silent extension,
//! so the table never has to be re-shaped mid-load.

use indexmap::IndexMap;
use lazy_static::lazy_static;

use crate::{data::ColumnType, error::BioTableError};

use ColumnType::{Integer, String as Str};

/// The fixed SAM alignment columns.
pub const SAM_FIXED_COLUMNS: [(&str, ColumnType); 11] = [
    ("QNAME", Str),
    ("FLAG", Integer),
    ("RNAME", Str),
    ("POS", Integer),
    ("MAPQ", Integer),
    ("CIGAR", Str),
    ("RNEXT", Str),
    ("PNEXT", Integer),
    ("TLEN", Integer),
    ("SEQ", Str),
    ("QUAL", Str),
];

/// The fixed VCF columns, as declared on the `#CHROM` line.
pub const VCF_FIXED_COLUMNS: [(&str, ColumnType); 9] = [
    ("#CHROM", Str),
    ("POS", Integer),
    ("ID", Str),
    ("REF", Str),
    ("ALT", Str),
    ("QUAL", Str),
    ("FILTER", Str),
    ("INFO", Str),
    ("FORMAT", Str),
];

/// The three BED range columns.
pub const BED_FIXED_COLUMNS: [(&str, ColumnType); 3] =
    [("chrom", Str), ("chromStart", Integer), ("chromEnd", Integer)];

/// The default trailing BED columns, in file order.
pub const BED_OPTIONAL_COLUMNS: [(&str, ColumnType); 9] = [
    ("name", Str),
    ("score", Integer),
    ("strand", Str),
    ("thickStart", Integer),
    ("thickEnd", Integer),
    ("itemRgb", Str),
    ("blockCount", Integer),
    ("blockSizes", Integer),
    ("blockStarts", Integer),
];

/// The `samtools flagstat` columns, in table order.
pub const FLAGSTAT_COLUMNS: [(&str, ColumnType); 3] =
    [("read", Str), ("qc_passed", Integer), ("qc_failed", Integer)];

lazy_static! {
    /// Column types for every known BED column name, used to type
    /// caller-supplied optional column names.
    static ref BED_COLUMN_TYPES: IndexMap<&'static str, ColumnType> = BED_FIXED_COLUMNS
        .iter()
        .chain(BED_OPTIONAL_COLUMNS.iter())
        .cloned()
        .collect();
}

/// The supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Sam,
    Vcf,
    Bed,
    Flagstat,
}

impl TableFormat {
    /// All file extensions accepted for this format. An empty slice means
    /// any extension is accepted.
    pub fn supported_extensions(&self) -> &'static [&'static str] {
        match self {
            TableFormat::Sam => &[".sam", ".bam", ".cram"],
            TableFormat::Vcf => &[".vcf", ".vcf.gz", ".bcf"],
            TableFormat::Bed => &[".bed", ".txt", ".tsv"],
            TableFormat::Flagstat => &[],
        }
    }

    /// Whether a file with the (already matched) extension `ext` must be
    /// decoded by an external converter rather than read directly.
    pub fn needs_converter(&self, ext: Option<&str>) -> bool {
        match (self, ext) {
            (TableFormat::Sam, Some(ext)) => ext != ".sam",
            (TableFormat::Vcf, Some(ext)) => ext != ".vcf",
            _ => false,
        }
    }

    fn fixed_columns(&self) -> &'static [(&'static str, ColumnType)] {
        match self {
            TableFormat::Sam => &SAM_FIXED_COLUMNS,
            TableFormat::Vcf => &VCF_FIXED_COLUMNS,
            TableFormat::Bed => &BED_FIXED_COLUMNS,
            TableFormat::Flagstat => &FLAGSTAT_COLUMNS,
        }
    }
}

impl std::fmt::Display for TableFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TableFormat::Sam => "SAM",
            TableFormat::Vcf => "VCF",
            TableFormat::Bed => "BED",
            TableFormat::Flagstat => "flagstat",
        };
        write!(f, "{}", name)
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub dtype: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, dtype: ColumnType) -> Self {
        Self {
            name: name.into(),
            dtype,
        }
    }
}

fn to_columns(spec: &[(&str, ColumnType)]) -> Vec<Column> {
    spec.iter()
        .map(|(name, dtype)| Column::new(*name, *dtype))
        .collect()
}

/// The naming and typing rule for a format's optional columns.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionalColumns {
    /// The format has no optional columns.
    Empty,
    /// Optional columns are string-typed and numbered with a prefix,
    /// e.g. `OPT0`, `OPT1`, ...
    Numbered(&'static str),
    /// Optional columns are drawn, in order, from a fixed list of names.
    Named(Vec<Column>),
}

/// The static schema knowledge for one format.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    format: TableFormat,
    fixed: Vec<Column>,
    optional: OptionalColumns,
    max_optional: Option<usize>,
}

impl SchemaRegistry {
    /// Create the registry for `format` with its default optional columns.
    pub fn new(format: TableFormat) -> Self {
        let optional = match format {
            TableFormat::Sam => OptionalColumns::Numbered("OPT"),
            TableFormat::Vcf => OptionalColumns::Numbered("SAMPLE"),
            TableFormat::Bed => OptionalColumns::Named(to_columns(&BED_OPTIONAL_COLUMNS)),
            TableFormat::Flagstat => OptionalColumns::Empty,
        };
        Self {
            format,
            fixed: to_columns(format.fixed_columns()),
            optional,
            max_optional: None,
        }
    }

    /// Create a BED registry whose optional columns are `names` instead of
    /// the default BED set. Known BED column names keep their BED types;
    /// anything else is a string column.
    pub fn bed_with_optional_columns(names: &[String]) -> Self {
        let columns = names
            .iter()
            .map(|name| {
                let dtype = BED_COLUMN_TYPES
                    .get(name.as_str())
                    .copied()
                    .unwrap_or(ColumnType::String);
                Column::new(name.clone(), dtype)
            })
            .collect();
        Self {
            optional: OptionalColumns::Named(columns),
            ..Self::new(TableFormat::Bed)
        }
    }

    /// Cap the number of optional columns a file may declare.
    pub fn with_max_optional_columns(mut self, max: usize) -> Self {
        self.max_optional = Some(max);
        self
    }

    pub fn format(&self) -> TableFormat {
        self.format
    }

    pub fn fixed_columns(&self) -> &[Column] {
        &self.fixed
    }

    pub fn optional_columns(&self) -> &OptionalColumns {
        &self.optional
    }

    /// Check that the fields of a VCF `#CHROM` declaration line start with
    /// exactly the fixed column names, in order.
    pub fn check_declaration(&self, fields: &[&str], line: usize) -> Result<(), BioTableError> {
        let expected = self.fixed.iter().map(|col| col.name.as_str());
        let matches = fields.len() >= self.fixed.len()
            && expected.zip(fields.iter()).all(|(want, got)| want == *got);
        if !matches {
            return Err(BioTableError::invalid_schema(
                line,
                format!(
                    "invalid {} columns: expected the line to start with '{}'",
                    self.format,
                    self.fixed
                        .iter()
                        .map(|col| col.name.as_str())
                        .collect::<Vec<_>>()
                        .join("\t")
                ),
            ));
        }
        Ok(())
    }

    /// Freeze the schema for a file whose first data line (or declaration
    /// line) has `n_fields` fields. `line` is only used for error messages.
    pub fn freeze(&self, n_fields: usize, line: usize) -> Result<Schema, BioTableError> {
        let n_optional = n_fields.saturating_sub(self.fixed.len());

        if let Some(max) = self.max_optional {
            if n_optional > max {
                return Err(BioTableError::invalid_schema(
                    line,
                    format!(
                        "{} optional columns found, but at most {} are allowed",
                        n_optional, max
                    ),
                ));
            }
        }

        let optional: Vec<Column> = match &self.optional {
            OptionalColumns::Empty => Vec::new(),
            OptionalColumns::Numbered(prefix) => (0..n_optional)
                .map(|i| Column::new(format!("{}{}", prefix, i), ColumnType::String))
                .collect(),
            OptionalColumns::Named(names) => {
                if n_optional > names.len() {
                    return Err(BioTableError::invalid_schema(
                        line,
                        format!(
                            "line has {} fields, but only {} {} columns are defined",
                            n_fields,
                            self.fixed.len() + names.len(),
                            self.format
                        ),
                    ));
                }
                names[..n_optional].to_vec()
            }
        };

        let mut columns = self.fixed.clone();
        columns.extend(optional);
        Ok(Schema {
            columns,
            n_fixed: self.fixed.len(),
        })
    }
}

/// A frozen schema: the fixed columns followed by this file's optional columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: Vec<Column>,
    n_fixed: usize,
}

impl Schema {
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn n_fixed(&self) -> usize {
        self.n_fixed
    }

    pub fn n_optional(&self) -> usize {
        self.columns.len() - self.n_fixed
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|col| col.name.as_str()).collect()
    }

    pub(crate) fn into_parts(self) -> (Vec<Column>, usize) {
        (self.columns, self.n_fixed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sam_freeze_numbers_optional_columns() {
        let registry = SchemaRegistry::new(TableFormat::Sam);
        let schema = registry.freeze(14, 1).unwrap();
        assert_eq!(schema.n_fixed(), 11);
        assert_eq!(schema.n_optional(), 3);
        assert_eq!(&schema.column_names()[11..], &["OPT0", "OPT1", "OPT2"]);
        assert_eq!(schema.columns()[1].dtype, ColumnType::Integer);
    }

    #[test]
    fn test_sam_freeze_clamps_short_lines() {
        let schema = SchemaRegistry::new(TableFormat::Sam).freeze(5, 1).unwrap();
        assert_eq!(schema.len(), 11);
        assert_eq!(schema.n_optional(), 0);
    }

    #[test]
    fn test_bed_freeze_truncates_defaults() {
        let schema = SchemaRegistry::new(TableFormat::Bed).freeze(6, 1).unwrap();
        assert_eq!(
            schema.column_names(),
            vec!["chrom", "chromStart", "chromEnd", "name", "score", "strand"]
        );
        assert_eq!(schema.columns()[4].dtype, ColumnType::Integer);
    }

    #[test]
    fn test_bed_too_many_fields() {
        let result = SchemaRegistry::new(TableFormat::Bed).freeze(13, 4);
        assert!(matches!(
            result,
            Err(BioTableError::InvalidSchema { line: 4, .. })
        ));
    }

    #[test]
    fn test_bed_custom_optional_columns() {
        let names = vec!["score".to_string(), "gene_id".to_string()];
        let registry = SchemaRegistry::bed_with_optional_columns(&names);
        let schema = registry.freeze(5, 1).unwrap();
        assert_eq!(&schema.column_names()[3..], &["score", "gene_id"]);
        assert_eq!(schema.columns()[3].dtype, ColumnType::Integer);
        assert_eq!(schema.columns()[4].dtype, ColumnType::String);
    }

    #[test]
    fn test_max_optional_columns() {
        let registry = SchemaRegistry::new(TableFormat::Sam).with_max_optional_columns(2);
        assert!(registry.freeze(13, 1).is_ok());
        assert!(registry.freeze(14, 1).is_err());
    }

    #[test]
    fn test_vcf_declaration_check() {
        let registry = SchemaRegistry::new(TableFormat::Vcf);
        let good = [
            "#CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO", "FORMAT", "S1",
        ];
        assert!(registry.check_declaration(&good, 3).is_ok());

        let swapped = [
            "#CHROM", "POS", "REF", "ID", "ALT", "QUAL", "FILTER", "INFO", "FORMAT",
        ];
        assert!(registry.check_declaration(&swapped, 3).is_err());

        let short = ["#CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO"];
        assert!(registry.check_declaration(&short, 3).is_err());
    }

    #[test]
    fn test_flagstat_has_no_optional_columns() {
        let schema = SchemaRegistry::new(TableFormat::Flagstat).freeze(3, 1).unwrap();
        assert_eq!(schema.column_names(), vec!["read", "qc_passed", "qc_failed"]);
        assert_eq!(schema.n_optional(), 0);
    }

    #[test]
    fn test_converter_extensions() {
        assert!(TableFormat::Sam.needs_converter(Some(".bam")));
        assert!(!TableFormat::Sam.needs_converter(Some(".sam")));
        assert!(TableFormat::Vcf.needs_converter(Some(".vcf.gz")));
        assert!(!TableFormat::Bed.needs_converter(Some(".bed")));
        assert!(!TableFormat::Flagstat.needs_converter(None));
    }
}
