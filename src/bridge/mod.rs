//! Downstream consumers of query results.
//!
//! - `json`: tables to flat text records and back to parameters
//! - `sheet`: records to worksheet files and back

pub mod json;
pub mod sheet;

pub use json::{record_to_params, table_to_records, Record};
pub use sheet::{export_records, import_records, records_to_sheet, sheet_to_records, SheetError, Worksheet};
