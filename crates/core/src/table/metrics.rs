//! Per-sample season metrics table

use serde::Serialize;

/// Season metrics of one sample.
///
/// Every field except `sample_id` is `None` when the sample was invalid or
/// the event it depends on was not detected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRow {
    pub sample_id: String,
    pub start_day: Option<usize>,
    pub peak_day: Option<usize>,
    pub end_day: Option<usize>,
    pub season_length: Option<i64>,
    pub amplitude: Option<f64>,
    pub rate_in: Option<f64>,
    pub rate_out: Option<f64>,
    pub cumulative_integral: Option<f64>,
    pub baseline_integral: Option<f64>,
}

impl MetricsRow {
    /// Row with every metric undefined
    pub fn undefined(sample_id: impl Into<String>) -> Self {
        Self {
            sample_id: sample_id.into(),
            start_day: None,
            peak_day: None,
            end_day: None,
            season_length: None,
            amplitude: None,
            rate_in: None,
            rate_out: None,
            cumulative_integral: None,
            baseline_integral: None,
        }
    }

    /// Whether every metric is undefined
    pub fn is_undefined(&self) -> bool {
        self.start_day.is_none()
            && self.peak_day.is_none()
            && self.end_day.is_none()
            && self.season_length.is_none()
            && self.amplitude.is_none()
            && self.rate_in.is_none()
            && self.rate_out.is_none()
            && self.cumulative_integral.is_none()
            && self.baseline_integral.is_none()
    }
}

/// Metrics of a whole sample batch, one row per sample in column order
#[derive(Debug, Clone, Default)]
pub struct MetricsTable {
    rows: Vec<MetricsRow>,
}

impl MetricsTable {
    pub fn new(rows: Vec<MetricsRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[MetricsRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row of a sample by identifier
    pub fn get(&self, sample_id: &str) -> Option<&MetricsRow> {
        self.rows.iter().find(|r| r.sample_id == sample_id)
    }

    /// Number of rows with at least one defined metric
    pub fn defined_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.is_undefined()).count()
    }
}
