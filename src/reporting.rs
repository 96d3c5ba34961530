//! Types for reporting what a load did.
//!
//! A [`LoadReport`] is returned from every successful
//! [`BioTable::load()`](crate::biotable::BioTable::load), so callers (and the
//! `biotable` binary) can tell the user how many lines were read and which
//! optional columns turned out to be empty.

/// A summary of one completed load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Every line read from the source, including header and blank lines.
    pub n_lines: usize,
    pub n_header_lines: usize,
    pub n_rows: usize,
    /// Optional columns removed because no row had a value for them.
    pub dropped_columns: Vec<String>,
}

impl LoadReport {
    /// Human-readable issues worth surfacing to the user.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.n_rows == 0 {
            issues.push("no data rows were found".to_string());
        }
        if !self.dropped_columns.is_empty() {
            issues.push(format!(
                "{} empty optional column(s) were removed: {}",
                self.dropped_columns.len(),
                self.dropped_columns.join(", ")
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::LoadReport;

    #[test]
    fn test_issues() {
        let report = LoadReport {
            n_lines: 3,
            n_header_lines: 1,
            n_rows: 2,
            dropped_columns: vec!["OPT2".to_string()],
        };
        assert_eq!(
            report.issues(),
            vec!["1 empty optional column(s) were removed: OPT2"]
        );
        assert_eq!(LoadReport::default().issues(), vec!["no data rows were found"]);
    }
}
