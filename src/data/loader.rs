//! CSV Data Loader Module
//! Handles CSV file loading and required-column extraction using Polars.

use crate::data::{CellValue, RawRow, REQUIRED_COLUMNS};
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("No data loaded")]
    NoData,
}

/// Handles CSV file loading with Polars.
pub struct DataLoader {
    df: Option<DataFrame>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self { df: None }
    }

    /// Load a CSV file using Polars.
    ///
    /// The whole file is scanned for schema inference so that a numeric
    /// column holding a stray text value is kept as text instead of being
    /// silently nulled; the store rejects such rows on insert.
    pub fn load_csv(&mut self, file_path: impl AsRef<Path>) -> Result<&DataFrame, LoaderError> {
        let path = file_path.as_ref();

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(None)
            .finish()?
            .collect()?;
        debug!(rows = df.height(), columns = df.width(), path = %path.display(), "CSV parsed");

        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Extract the required columns as raw rows, in file order.
    pub fn raw_rows(&self) -> Result<Vec<RawRow>, LoaderError> {
        let df = self.df.as_ref().ok_or(LoaderError::NoData)?;

        let columns = REQUIRED_COLUMNS
            .iter()
            .map(|name| {
                df.column(name)
                    .map_err(|_| LoaderError::MissingColumn(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut rows = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let cell = |c: usize| -> Result<CellValue, LoaderError> {
                Ok(to_cell(columns[c].get(i)?))
            };
            rows.push(RawRow {
                // the header occupies line 1
                line: i + 2,
                employee_id: cell(0)?,
                department: cell(1)?,
                performance_score: cell(2)?,
                years_with_company: cell(3)?,
                salary: cell(4)?,
            });
        }

        Ok(rows)
    }
}

fn to_cell(value: AnyValue<'_>) -> CellValue {
    match value {
        AnyValue::Null => CellValue::Null,
        AnyValue::Int8(v) => CellValue::Int(v.into()),
        AnyValue::Int16(v) => CellValue::Int(v.into()),
        AnyValue::Int32(v) => CellValue::Int(v.into()),
        AnyValue::Int64(v) => CellValue::Int(v),
        AnyValue::UInt8(v) => CellValue::Int(v.into()),
        AnyValue::UInt16(v) => CellValue::Int(v.into()),
        AnyValue::UInt32(v) => CellValue::Int(v.into()),
        AnyValue::UInt64(v) => match i64::try_from(v) {
            Ok(v) => CellValue::Int(v),
            Err(_) => CellValue::Text(v.to_string()),
        },
        AnyValue::Float32(v) => CellValue::Float(v.into()),
        AnyValue::Float64(v) => CellValue::Float(v),
        AnyValue::String(s) => CellValue::Text(s.to_string()),
        AnyValue::StringOwned(s) => CellValue::Text(s.to_string()),
        other => CellValue::Text(other.to_string().trim_matches('"').to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_required_columns_in_order() {
        let file = csv_file(
            "employee_id,department,performance_score,years_with_company,salary\n\
             1,Sales,80.5,2,50000.0\n\
             2,HR,70.25,1,40000.0\n",
        );
        let mut loader = DataLoader::new();
        loader.load_csv(file.path()).unwrap();
        assert_eq!(loader.get_row_count(), 2);

        let rows = loader.raw_rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[1].line, 3);
        assert_eq!(rows[0].employee_id, CellValue::Int(1));
        assert_eq!(rows[0].department, CellValue::Text("Sales".into()));
        assert_eq!(rows[0].performance_score, CellValue::Float(80.5));
        assert_eq!(rows[0].years_with_company, CellValue::Int(2));
        assert_eq!(rows[1].department, CellValue::Text("HR".into()));
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let file = csv_file(
            "first_name,employee_id,department,performance_score,years_with_company,salary,email\n\
             Ann,7,IT,91.0,3,61000.0,ann@example.com\n",
        );
        let mut loader = DataLoader::new();
        loader.load_csv(file.path()).unwrap();
        assert_eq!(loader.get_columns().len(), 7);

        let rows = loader.raw_rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].employee_id, CellValue::Int(7));
        assert_eq!(rows[0].department, CellValue::Text("IT".into()));
    }

    #[test]
    fn test_missing_column_is_reported() {
        let file =
            csv_file("employee_id,department,performance_score,salary\n1,Sales,80.0,50000\n");
        let mut loader = DataLoader::new();
        loader.load_csv(file.path()).unwrap();

        match loader.raw_rows() {
            Err(LoaderError::MissingColumn(name)) => assert_eq!(name, "years_with_company"),
            other => panic!("expected missing column, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_value_is_kept_as_text() {
        let file = csv_file(
            "employee_id,department,performance_score,years_with_company,salary\n\
             1,Sales,80.0,2,50000\n\
             2,Sales,high,4,55000\n",
        );
        let mut loader = DataLoader::new();
        loader.load_csv(file.path()).unwrap();

        let rows = loader.raw_rows().unwrap();
        assert_eq!(rows[0].performance_score, CellValue::Text("80.0".into()));
        assert_eq!(rows[1].performance_score, CellValue::Text("high".into()));
    }

    #[test]
    fn test_raw_rows_without_load() {
        let loader = DataLoader::new();
        assert!(matches!(loader.raw_rows(), Err(LoaderError::NoData)));
        assert!(loader.get_columns().is_empty());
    }
}
