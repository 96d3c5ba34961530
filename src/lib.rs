
pub mod biotable;
pub mod builder;
pub mod data;
pub mod error;
pub mod io;
pub mod reporting;
pub mod schema;
pub mod table;
pub mod test_utilities;
pub mod traits;

pub mod prelude {
    pub use crate::biotable::{BioTable, ConverterConfig};
    pub use crate::data::{ColumnType, DatumType};
    pub use crate::error::BioTableError;
    pub use crate::reporting::LoadReport;
    pub use crate::schema::{Column, TableFormat};
    pub use crate::table::Table;
}
