//! Console report of per-department statistics.

use crate::stats::DepartmentReport;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Output format of the statistics report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Format a statistic the way an analyst expects to read it: `nan` for
/// undefined values and a trailing `.0` on integral values.
pub fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value == f64::INFINITY {
        "inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Write the report in the requested format.
pub fn write_report<W: Write>(
    out: &mut W,
    report: &DepartmentReport,
    format: ReportFormat,
) -> io::Result<()> {
    match format {
        ReportFormat::Text => write_text_report(out, report),
        ReportFormat::Json => write_json_report(out, report),
    }
}

/// One labelled block per department, in report order.
pub fn write_text_report<W: Write>(out: &mut W, report: &DepartmentReport) -> io::Result<()> {
    for stats in report.iter() {
        writeln!(out, "Department: {}", stats.department)?;
        writeln!(
            out,
            "Mean performance_score: {}",
            format_stat(stats.performance_score.mean)
        )?;
        writeln!(
            out,
            "Median performance_score: {}",
            format_stat(stats.performance_score.median)
        )?;
        writeln!(
            out,
            "Standard deviation of performance_score: {}",
            format_stat(stats.performance_score.std_dev)
        )?;
        writeln!(out, "Mean salary: {}", format_stat(stats.salary.mean))?;
        writeln!(out, "Median salary: {}", format_stat(stats.salary.median))?;
        writeln!(
            out,
            "Standard deviation of salary: {}",
            format_stat(stats.salary.std_dev)
        )?;
        writeln!(out, "Total number of employees: {}", stats.employee_count)?;
        writeln!(
            out,
            "Correlation between years_with_company and performance_score: {}",
            format_stat(stats.years_performance_correlation)
        )?;
        writeln!(
            out,
            "Correlation between salary and performance_score: {}",
            format_stat(stats.salary_performance_correlation)
        )?;
        writeln!(out)?;
    }
    Ok(())
}

/// The report as a JSON array; undefined statistics become `null`.
pub fn write_json_report<W: Write>(out: &mut W, report: &DepartmentReport) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)
}
