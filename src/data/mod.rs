//! Data module - CSV loading, raw rows and typed records

mod loader;
mod processor;
mod record;

pub use loader::DataLoader;
pub use processor::{ProcessorError, RecordProcessor};
pub use record::{CellValue, EmployeeRecord, RawRow, StoredRecord, REQUIRED_COLUMNS};
