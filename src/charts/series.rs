//! Chart Series Module
//! Backend-independent chart data: histogram bins per department and the
//! two whole-dataset scatter plots.

use crate::data::EmployeeRecord;
use crate::stats::StatsCalculator;

/// Number of equal-width histogram bins.
pub const HISTOGRAM_BINS: usize = 10;

/// Color palette for series (RGB).
pub const PALETTE: [(u8, u8, u8); 10] = [
    (52, 152, 219),  // Blue
    (231, 76, 60),   // Red
    (46, 204, 113),  // Green
    (155, 89, 182),  // Purple
    (243, 156, 18),  // Orange
    (26, 188, 156),  // Teal
    (233, 30, 99),   // Pink
    (0, 188, 212),   // Cyan
    (255, 87, 34),   // Deep Orange
    (96, 125, 139),  // Blue Grey
];

/// Get the palette entry for the n-th series.
pub fn series_rgb(index: usize) -> (u8, u8, u8) {
    PALETTE[index % PALETTE.len()]
}

/// One histogram bin `[start, end)`; the last bin of a series is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSeries {
    pub label: String,
    pub bins: Vec<HistogramBin>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramChart {
    pub name: &'static str,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<HistogramSeries>,
}

impl HistogramChart {
    /// Highest bin count over all series.
    pub fn max_count(&self) -> usize {
        self.series
            .iter()
            .flat_map(|s| s.bins.iter().map(|b| b.count))
            .max()
            .unwrap_or(0)
    }

    /// Span of all bin edges, if any series has bins.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        let mut bins = self.series.iter().flat_map(|s| s.bins.iter());
        let first = bins.next()?;
        Some(bins.fold((first.start, first.end), |(lo, hi), b| {
            (lo.min(b.start), hi.max(b.end))
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart {
    pub name: &'static str,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<[f64; 2]>,
}

impl ScatterChart {
    /// Observed `(min, max)` of x and y, if there are points.
    pub fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let first = self.points.first()?;
        Some(self.points.iter().fold(
            ((first[0], first[0]), (first[1], first[1])),
            |((x0, x1), (y0, y1)), p| ((x0.min(p[0]), x1.max(p[0])), (y0.min(p[1]), y1.max(p[1]))),
        ))
    }
}

/// A chart ready to be shown in a window or exported.
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Histogram(HistogramChart),
    Scatter(ScatterChart),
}

impl Chart {
    /// Stable identifier, also used as export file stem.
    pub fn name(&self) -> &'static str {
        match self {
            Chart::Histogram(h) => h.name,
            Chart::Scatter(s) => s.name,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Chart::Histogram(h) => &h.title,
            Chart::Scatter(s) => &s.title,
        }
    }
}

/// Builds the three report charts from the full record set.
pub struct ChartSet;

impl ChartSet {
    /// Histogram of scores per department, then years vs score and salary
    /// vs score over every record.
    pub fn build(records: &[EmployeeRecord]) -> Vec<Chart> {
        vec![
            Chart::Histogram(Self::score_histogram(records)),
            Chart::Scatter(Self::scatter(
                "years_vs_performance",
                "Years with Company vs. Performance Score",
                "Years with Company",
                records.iter().map(|r| [r.years_with_company as f64, r.performance_score]),
            )),
            Chart::Scatter(Self::scatter(
                "salary_vs_performance",
                "Salary vs. Performance Score",
                "Salary",
                records.iter().map(|r| [r.salary, r.performance_score]),
            )),
        ]
    }

    /// One series per department, in first-occurrence order.
    pub fn score_histogram(records: &[EmployeeRecord]) -> HistogramChart {
        let series = StatsCalculator::group_by_department(records)
            .iter()
            .map(|group| HistogramSeries {
                label: group.department.to_string(),
                bins: histogram(&group.performance_scores(), HISTOGRAM_BINS),
            })
            .collect();

        HistogramChart {
            name: "performance_histogram",
            title: "Performance Score Histogram by Department".to_string(),
            x_label: "Performance Score".to_string(),
            y_label: "Frequency".to_string(),
            series,
        }
    }

    fn scatter(
        name: &'static str,
        title: &str,
        x_label: &str,
        points: impl Iterator<Item = [f64; 2]>,
    ) -> ScatterChart {
        ScatterChart {
            name,
            title: title.to_string(),
            x_label: x_label.to_string(),
            y_label: "Performance Score".to_string(),
            points: points
                .filter(|p| p[0].is_finite() && p[1].is_finite())
                .collect(),
        }
    }
}

/// Count `values` into `bins` equal-width bins spanning their observed range.
///
/// Non-finite values are skipped. A range of a single value is widened to
/// `value ± 0.5`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for v in finite {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: lo + i as f64 * width,
            end: if i + 1 == bins {
                hi
            } else {
                lo + (i + 1) as f64 * width
            },
            count,
        })
        .collect()
}
