//! Stats module - per-department aggregation

mod calculator;

pub use calculator::{DepartmentReport, StatsCalculator};
