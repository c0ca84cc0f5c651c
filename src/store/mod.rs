//! Store module - relational persistence of employee records

mod record_store;

pub use record_store::{ImportMode, RecordStore, StoreError};
