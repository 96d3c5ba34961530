//! Per-format line classification and field splitting.
//!
//! Every line read from a source is first classified as one of the
//! [`LineKind`] variants. Header/metadata lines are kept verbatim, the VCF
//! `#CHROM` line declares the column layout, and everything else is data.
//!
//! | Format   | Header lines                   | Declaration | Field separator       |
//! |----------|--------------------------------|-------------|-----------------------|
//! | SAM      | `@` + an uppercase letter      | none        | tab                   |
//! | VCF      | `##`                           | `#CHROM`    | tab                   |
//! | BED      | `browser`, `track`             | none        | tab                   |
//! | flagstat | none                           | none        | `" + "`, then a space |

pub mod flagstat;
pub mod utils;

use crate::schema::TableFormat;

/// The role of a single input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// File-level metadata, preserved verbatim and never parsed into columns.
    Header,
    /// The VCF `#CHROM` column declaration line.
    Declaration,
    /// A tabular record.
    Data,
}

/// Classify `line` (without its line terminator) for `format`.
pub fn classify_line(format: TableFormat, line: &str) -> LineKind {
    match format {
        TableFormat::Sam => {
            let bytes = line.as_bytes();
            if bytes.len() >= 2 && bytes[0] == b'@' && bytes[1].is_ascii_uppercase() {
                LineKind::Header
            } else {
                LineKind::Data
            }
        }
        TableFormat::Vcf => {
            if line.starts_with("##") {
                LineKind::Header
            } else if line.starts_with("#CHROM") {
                LineKind::Declaration
            } else {
                LineKind::Data
            }
        }
        TableFormat::Bed => {
            if line.starts_with("browser") || line.starts_with("track") {
                LineKind::Header
            } else {
                LineKind::Data
            }
        }
        TableFormat::Flagstat => LineKind::Data,
    }
}

/// Split a data (or declaration) line into its raw fields, in table column order.
pub fn split_fields(format: TableFormat, line: &str) -> Vec<&str> {
    match format {
        TableFormat::Flagstat => flagstat::split_flagstat_line(line),
        _ => line.split('\t').collect(),
    }
}

/// Strip a trailing `\n` or `\r\n` line terminator.
pub fn trim_line_terminator(line: &str) -> &str {
    line.trim_end_matches(&['\n', '\r'][..])
}
