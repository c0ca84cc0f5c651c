//! Statistics Calculator Module
//! Groups employee records by department and computes descriptive
//! statistics and correlations per group.

use crate::data::EmployeeRecord;
use rayon::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::collections::HashMap;

/// Mean, median and sample standard deviation of one numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl Default for ColumnSummary {
    fn default() -> Self {
        Self {
            mean: f64::NAN,
            median: f64::NAN,
            std_dev: f64::NAN,
        }
    }
}

/// Statistics for a single department.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentStatistics {
    pub department: String,
    pub employee_count: usize,
    pub performance_score: ColumnSummary,
    pub salary: ColumnSummary,
    /// Pearson correlation of years_with_company and performance_score.
    pub years_performance_correlation: f64,
    /// Pearson correlation of salary and performance_score.
    pub salary_performance_correlation: f64,
}

/// Per-department statistics in first-occurrence order of the departments.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct DepartmentReport {
    departments: Vec<DepartmentStatistics>,
}

impl DepartmentReport {
    /// Look up a department by its exact name.
    #[cfg(test)]
    pub fn get(&self, department: &str) -> Option<&DepartmentStatistics> {
        self.departments.iter().find(|d| d.department == department)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DepartmentStatistics> {
        self.departments.iter()
    }

    /// Department names in report order.
    pub fn departments(&self) -> Vec<&str> {
        self.departments.iter().map(|d| d.department.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.departments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.departments.is_empty()
    }

    /// Sum of employee counts over all departments.
    pub fn total_count(&self) -> usize {
        self.departments.iter().map(|d| d.employee_count).sum()
    }
}

/// Records sharing one department value.
#[derive(Debug, Clone)]
pub struct DepartmentGroup<'a> {
    pub department: &'a str,
    pub records: Vec<&'a EmployeeRecord>,
}

impl DepartmentGroup<'_> {
    pub fn performance_scores(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.performance_score).collect()
    }

    pub fn salaries(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.salary).collect()
    }

    pub fn years(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.years_with_company as f64).collect()
    }
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Partition records by exact department value, keeping the order in
    /// which each department first appears.
    pub fn group_by_department(records: &[EmployeeRecord]) -> Vec<DepartmentGroup<'_>> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<DepartmentGroup<'_>> = Vec::new();

        for record in records {
            let department = record.department.as_str();
            match index.get(department) {
                Some(&i) => groups[i].records.push(record),
                None => {
                    index.insert(department, groups.len());
                    groups.push(DepartmentGroup {
                        department,
                        records: vec![record],
                    });
                }
            }
        }

        groups
    }

    /// Compute statistics for every department, in parallel.
    pub fn aggregate(records: &[EmployeeRecord]) -> DepartmentReport {
        let groups = Self::group_by_department(records);

        // par_iter().collect() into a Vec keeps group order
        let departments = groups
            .par_iter()
            .map(Self::compute_department_stats)
            .collect();

        DepartmentReport { departments }
    }

    /// Compute statistics for one group.
    pub fn compute_department_stats(group: &DepartmentGroup<'_>) -> DepartmentStatistics {
        let scores = group.performance_scores();
        let salaries = group.salaries();
        let years = group.years();

        DepartmentStatistics {
            department: group.department.to_string(),
            employee_count: group.records.len(),
            performance_score: Self::compute_summary(&scores),
            salary: Self::compute_summary(&salaries),
            years_performance_correlation: Self::pearson(&years, &scores),
            salary_performance_correlation: Self::pearson(&salaries, &scores),
        }
    }

    /// Mean, median and sample standard deviation. NaN where undefined.
    pub fn compute_summary(values: &[f64]) -> ColumnSummary {
        if values.is_empty() {
            return ColumnSummary::default();
        }

        ColumnSummary {
            mean: values.iter().mean(),
            median: Self::median(values),
            // n - 1 divisor; NaN for a single value
            std_dev: values.iter().std_dev(),
        }
    }

    /// Median, averaging the two middle values for an even count.
    pub fn median(values: &[f64]) -> f64 {
        let n = values.len();
        if n == 0 {
            return f64::NAN;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        }
    }

    /// Pearson product-moment correlation.
    ///
    /// NaN for fewer than two pairs, mismatched lengths, or a constant
    /// column.
    pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
        if xs.len() != ys.len() || xs.len() < 2 {
            return f64::NAN;
        }
        if Self::is_constant(xs) || Self::is_constant(ys) {
            return f64::NAN;
        }

        let covariance = xs.iter().covariance(ys.iter());
        let sx = xs.iter().std_dev();
        let sy = ys.iter().std_dev();
        if sx == 0.0 || sy == 0.0 {
            return f64::NAN;
        }

        (covariance / (sx * sy)).clamp(-1.0, 1.0)
    }

    fn is_constant(values: &[f64]) -> bool {
        values.windows(2).all(|w| w[0] == w[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, department: &str, score: f64, years: i64, salary: f64) -> EmployeeRecord {
        EmployeeRecord::new(id, department, score, years, salary)
    }

    fn scenario() -> Vec<EmployeeRecord> {
        vec![
            record(1, "Sales", 80.0, 2, 50000.0),
            record(2, "Sales", 90.0, 4, 55000.0),
            record(3, "HR", 70.0, 1, 40000.0),
            record(4, "HR", 70.0, 1, 40000.0),
        ]
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_end_to_end_scenario() {
        let report = StatsCalculator::aggregate(&scenario());
        assert_eq!(report.departments(), vec!["Sales", "HR"]);

        let sales = report.get("Sales").unwrap();
        assert_eq!(sales.employee_count, 2);
        assert!(approx(sales.performance_score.mean, 85.0));
        assert!(approx(sales.performance_score.median, 85.0));
        assert!(approx(sales.salary.mean, 52500.0));
        assert!(approx(sales.performance_score.std_dev, 50.0_f64.sqrt()));
        assert!(approx(sales.years_performance_correlation, 1.0));
        assert!(approx(sales.salary_performance_correlation, 1.0));

        let hr = report.get("HR").unwrap();
        assert_eq!(hr.employee_count, 2);
        assert!(approx(hr.performance_score.mean, 70.0));
        assert_eq!(hr.performance_score.std_dev, 0.0);
        assert!(hr.years_performance_correlation.is_nan());
        assert!(hr.salary_performance_correlation.is_nan());
    }

    #[test]
    fn test_groups_partition_input() {
        let records = vec![
            record(1, "IT", 60.0, 1, 30000.0),
            record(2, "Sales", 70.0, 2, 40000.0),
            record(3, "IT", 80.0, 3, 50000.0),
            record(4, "Legal", 90.0, 4, 60000.0),
            record(5, "Sales", 65.0, 5, 45000.0),
            record(6, "IT", 75.0, 6, 52000.0),
        ];

        let groups = StatsCalculator::group_by_department(&records);
        let mut ids: Vec<i64> = groups
            .iter()
            .flat_map(|g| g.records.iter().map(|r| r.employee_id))
            .collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        for group in &groups {
            assert!(group.records.iter().all(|r| r.department == group.department));
        }

        let report = StatsCalculator::aggregate(&records);
        assert_eq!(report.total_count(), records.len());
        assert_eq!(report.departments(), vec!["IT", "Sales", "Legal"]);
    }

    #[test]
    fn test_single_member_group_is_undefined() {
        let report = StatsCalculator::aggregate(&[record(1, "Legal", 88.0, 3, 70000.0)]);
        let legal = report.get("Legal").unwrap();
        assert_eq!(legal.employee_count, 1);
        assert_eq!(legal.performance_score.mean, 88.0);
        assert_eq!(legal.performance_score.median, 88.0);
        assert!(legal.performance_score.std_dev.is_nan());
        assert!(legal.salary.std_dev.is_nan());
        assert!(legal.years_performance_correlation.is_nan());
        assert!(legal.salary_performance_correlation.is_nan());
    }

    #[test]
    fn test_varied_group_is_finite() {
        let records = vec![
            record(1, "IT", 60.0, 1, 30000.0),
            record(2, "IT", 85.0, 2, 42000.0),
            record(3, "IT", 72.5, 7, 39000.0),
        ];
        let report = StatsCalculator::aggregate(&records);
        let it = report.get("IT").unwrap();
        assert!(it.performance_score.std_dev.is_finite());
        assert!(it.salary.std_dev.is_finite());
        assert!(it.years_performance_correlation.is_finite());
        assert!(it.salary_performance_correlation.is_finite());
        assert!(it.years_performance_correlation.abs() <= 1.0);
    }

    #[test]
    fn test_mean_within_observed_range() {
        let records = vec![
            record(1, "Ops", 55.25, 1, 1.0),
            record(2, "Ops", 99.99, 2, 2.0),
            record(3, "Ops", 61.0, 3, 3.0),
            record(4, "Ops", 77.7, 4, 4.0),
        ];
        let report = StatsCalculator::aggregate(&records);
        let mean = report.get("Ops").unwrap().performance_score.mean;
        assert!((55.25..=99.99).contains(&mean));
    }

    #[test]
    fn test_grouping_is_case_and_whitespace_sensitive() {
        let records = vec![
            record(1, "Sales", 80.0, 2, 50000.0),
            record(2, "sales ", 90.0, 4, 55000.0),
        ];
        let report = StatsCalculator::aggregate(&records);
        assert_eq!(report.len(), 2);
        assert_eq!(report.departments(), vec!["Sales", "sales "]);
        assert!(report.get("sales").is_none());
    }

    #[test]
    fn test_empty_input_gives_empty_report() {
        let report = StatsCalculator::aggregate(&[]);
        assert!(report.is_empty());
        assert_eq!(report.total_count(), 0);
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(StatsCalculator::median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(StatsCalculator::median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert!(StatsCalculator::median(&[]).is_nan());
    }

    #[test]
    fn test_sample_standard_deviation() {
        // population std would be 2.0
        let summary = StatsCalculator::compute_summary(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!(approx(summary.std_dev, (32.0_f64 / 7.0).sqrt()));
        assert!(approx(summary.mean, 5.0));
        assert!(approx(summary.median, 4.5));
    }

    #[test]
    fn test_pearson_negative_and_degenerate() {
        let r = StatsCalculator::pearson(&[1.0, 2.0, 3.0], &[6.0, 4.0, 2.0]);
        assert!(approx(r, -1.0));
        assert!(StatsCalculator::pearson(&[1.0], &[2.0]).is_nan());
        assert!(StatsCalculator::pearson(&[0.1, 0.1, 0.1], &[1.0, 2.0, 3.0]).is_nan());
        assert!(StatsCalculator::pearson(&[1.0, 2.0], &[1.0]).is_nan());
    }
}
