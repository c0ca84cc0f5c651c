//! Data Processor Module
//! Converts raw CSV cells into typed employee records following the
//! column types of the `EmployeePerformance` table.

use crate::data::{CellValue, EmployeeRecord, RawRow};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use thiserror::Error;

/// Largest magnitude accepted by a DECIMAL(5,2) column.
pub const SCORE_LIMIT: f64 = 999.99;
/// Largest magnitude accepted by a DECIMAL(10,2) column.
pub const SALARY_LIMIT: f64 = 99_999_999.99;
/// Maximum length of the department column (VARCHAR(255)).
pub const DEPARTMENT_MAX_CHARS: usize = 255;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessorError {
    #[error("column '{column}' has no value")]
    Missing { column: &'static str },
    #[error("column '{column}' expects an integer, got {value}")]
    NotInteger { column: &'static str, value: String },
    #[error("column '{column}' expects a number, got {value}")]
    NotNumeric { column: &'static str, value: String },
    #[error("column '{column}' value {value} is out of range (max {limit})")]
    OutOfRange {
        column: &'static str,
        value: f64,
        limit: f64,
    },
    #[error("column '{column}' is longer than {max} characters")]
    TooLong { column: &'static str, max: usize },
}

/// Handles the typed conversion of raw rows.
pub struct RecordProcessor;

impl RecordProcessor {
    /// Convert one raw row into an [`EmployeeRecord`].
    ///
    /// Decimal columns are rounded to two places, as a fixed-scale column
    /// stores them.
    pub fn to_record(row: &RawRow) -> Result<EmployeeRecord, ProcessorError> {
        Ok(EmployeeRecord {
            employee_id: Self::integer("employee_id", &row.employee_id)?,
            department: Self::text("department", &row.department)?,
            performance_score: Self::decimal(
                "performance_score",
                &row.performance_score,
                SCORE_LIMIT,
            )?,
            years_with_company: Self::integer("years_with_company", &row.years_with_company)?,
            salary: Self::decimal("salary", &row.salary, SALARY_LIMIT)?,
        })
    }

    fn integer(column: &'static str, cell: &CellValue) -> Result<i64, ProcessorError> {
        let not_integer = || ProcessorError::NotInteger {
            column,
            value: cell.to_string(),
        };

        match cell {
            CellValue::Null => Err(ProcessorError::Missing { column }),
            CellValue::Int(v) => Ok(*v),
            CellValue::Float(v) => Self::integral(*v).ok_or_else(not_integer),
            CellValue::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(Self::integral))
                    .ok_or_else(not_integer)
            }
        }
    }

    fn integral(v: f64) -> Option<i64> {
        if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
            Some(v as i64)
        } else {
            None
        }
    }

    fn decimal(column: &'static str, cell: &CellValue, limit: f64) -> Result<f64, ProcessorError> {
        let not_numeric = || ProcessorError::NotNumeric {
            column,
            value: cell.to_string(),
        };

        let value = match cell {
            CellValue::Null => return Err(ProcessorError::Missing { column }),
            CellValue::Int(v) => *v as f64,
            CellValue::Float(v) => *v,
            CellValue::Text(s) => s.trim().parse::<f64>().map_err(|_| not_numeric())?,
        };

        if !value.is_finite() {
            return Err(not_numeric());
        }

        let out_of_range = || ProcessorError::OutOfRange {
            column,
            value,
            limit,
        };

        // Prefer the written digits so that half cents round like the column does.
        let exact = match cell {
            CellValue::Text(s) => Decimal::from_str(s.trim()).ok(),
            _ => None,
        }
        .or_else(|| Decimal::from_str(&value.to_string()).ok())
        .or_else(|| Decimal::from_f64(value))
        .ok_or_else(out_of_range)?;

        let rounded = round_to_cents(exact)
            .to_string()
            .parse::<f64>()
            .map_err(|_| out_of_range())?;
        if rounded.abs() > limit {
            return Err(out_of_range());
        }

        Ok(rounded)
    }

    fn text(column: &'static str, cell: &CellValue) -> Result<String, ProcessorError> {
        let value = match cell {
            CellValue::Null => return Err(ProcessorError::Missing { column }),
            CellValue::Int(v) => v.to_string(),
            CellValue::Float(v) => v.to_string(),
            CellValue::Text(s) => s.clone(),
        };

        if value.chars().count() > DEPARTMENT_MAX_CHARS {
            return Err(ProcessorError::TooLong {
                column,
                max: DEPARTMENT_MAX_CHARS,
            });
        }

        Ok(value)
    }
}

/// Round half away from zero to two decimal places.
pub fn round_to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
