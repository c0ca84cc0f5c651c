//! Record Types
//! Raw CSV rows and the typed employee records stored in the database.

use serde::Serialize;
use std::fmt;

/// Column names required in the input file, in insertion order.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "employee_id",
    "department",
    "performance_score",
    "years_with_company",
    "salary",
];

/// A single untyped cell as inferred by the CSV parser.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, "<missing>"),
            CellValue::Int(v) => write!(f, "{}", v),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// One data row of the input file restricted to [`REQUIRED_COLUMNS`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based line number in the input file, counting the header as line 1.
    pub line: usize,
    pub employee_id: CellValue,
    pub department: CellValue,
    pub performance_score: CellValue,
    pub years_with_company: CellValue,
    pub salary: CellValue,
}

/// One employee as stored in the `EmployeePerformance` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeRecord {
    pub employee_id: i64,
    pub department: String,
    pub performance_score: f64,
    pub years_with_company: i64,
    pub salary: f64,
}

impl EmployeeRecord {
    pub fn new(
        employee_id: i64,
        department: impl Into<String>,
        performance_score: f64,
        years_with_company: i64,
        salary: f64,
    ) -> Self {
        Self {
            employee_id,
            department: department.into(),
            performance_score,
            years_with_company,
            salary,
        }
    }
}

/// A record read back from the store together with its identity key.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: i64,
    pub record: EmployeeRecord,
}
