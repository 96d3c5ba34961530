//! `samtools flagstat` report lines.
//!
//! Each line has the shape `<passed> + <failed> <description...>`, e.g.
//!
//! ```text
//! 1000 + 50 mapped (95.24% : N/A)
//! ```
//!
//! The first `" + "` and the next single space are the only field
//! separators; the description keeps its internal whitespace.

/// Split a flagstat line into `[read, qc_passed, qc_failed]`, the table
/// column order.
///
/// A line without the `" + "` separator, or without a description, yields
/// fewer than three fields, which the table builder rejects.
pub fn split_flagstat_line(line: &str) -> Vec<&str> {
    match line.split_once(" + ") {
        Some((passed, rest)) => match rest.split_once(' ') {
            Some((failed, read)) => vec![read, passed, failed],
            None => vec![passed, rest],
        },
        None => vec![line],
    }
}
