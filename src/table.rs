//! The [`Table`] type: typed columns and row-major records.
//!
//! Every row holds exactly one [`DatumType`] per column, with
//! [`DatumType::NoValue`] marking missing data. Columns are split into a
//! fixed prefix, mandated by the format, and an optional suffix whose width
//! was frozen from the input.

use std::io::Write;

use crate::{
    data::DatumType,
    error::BioTableError,
    schema::{Column, Schema},
};

/// An ordered set of typed columns and the rows loaded into them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    n_fixed: usize,
    rows: Vec<Vec<DatumType>>,
}

impl Table {
    /// Create an empty table with the columns of a frozen `schema`.
    pub fn new(schema: Schema) -> Self {
        let (columns, n_fixed) = schema.into_parts();
        Self {
            columns,
            n_fixed,
            rows: Vec::new(),
        }
    }

    /// Append a row. The caller guarantees one cell per column.
    pub(crate) fn push_row(&mut self, row: Vec<DatumType>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|col| col.name.as_str()).collect()
    }

    /// The number of fixed (format-mandated) columns.
    pub fn n_fixed(&self) -> usize {
        self.n_fixed
    }

    /// Whether the column at `index` is a fixed column.
    pub fn is_fixed(&self, index: usize) -> bool {
        index < self.n_fixed
    }

    /// The position of the column called `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.name == name)
    }

    pub fn rows(&self) -> &[Vec<DatumType>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[DatumType]> {
        self.rows.get(index).map(|row| row.as_slice())
    }

    /// The cell at row `index`, column `name`.
    pub fn get(&self, index: usize, name: &str) -> Option<&DatumType> {
        let col = self.column_index(name)?;
        self.rows.get(index).map(|row| &row[col])
    }

    /// Iterate over the cells of the column called `name`, in row order.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &DatumType> + '_> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[col]))
    }

    /// Remove every optional column whose cells are all missing, keeping
    /// fixed columns regardless. The order of retained columns is preserved.
    ///
    /// Returns the names of the removed columns.
    pub fn drop_empty_optional_columns(&mut self) -> Vec<String> {
        let keep: Vec<bool> = (0..self.columns.len())
            .map(|col| {
                self.is_fixed(col) || self.rows.iter().any(|row| !row[col].is_missing())
            })
            .collect();

        if keep.iter().all(|&k| k) {
            return Vec::new();
        }

        let mut dropped = Vec::new();
        let mut kept_columns = Vec::with_capacity(self.columns.len());
        for (column, &k) in self.columns.drain(..).zip(keep.iter()) {
            if k {
                kept_columns.push(column);
            } else {
                dropped.push(column.name);
            }
        }
        self.columns = kept_columns;

        for row in self.rows.iter_mut() {
            let mut flags = keep.iter();
            row.retain(|_| *flags.next().unwrap_or(&true));
        }
        dropped
    }

    /// Write the table as CSV, with the column names as the first record.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), BioTableError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        csv_writer.write_record(self.columns.iter().map(|col| col.name.as_str()))?;
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
