//! Daily NDVI matrix

use crate::error::{Error, Result};
use crate::series::{InvalidReason, InvalidSample, Sample, SampleSeries};
use ndarray::Array2;

/// Number of daily rows in one annual cycle.
pub const DAYS_PER_YEAR: usize = 365;

/// A smoothed, daily-regular NDVI matrix.
///
/// Rows are days of year (`0..365`), columns are samples. Undefined days
/// are stored as `NaN`. The column order is stable and identifies the
/// sample, so every output table follows it.
///
/// # Example
///
/// ```ignore
/// use phenoscope_core::NdviMatrix;
///
/// let plot = vec![0.3; 365];
/// let matrix = NdviMatrix::from_columns(vec!["plot_a".into()], vec![plot])?;
/// assert_eq!(matrix.n_samples(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct NdviMatrix {
    /// Values stored as (day, sample)
    data: Array2<f64>,
    /// Sample identifiers, one per column
    samples: Vec<String>,
}

impl NdviMatrix {
    /// Create a matrix from a (day, sample) array and its column names
    pub fn new(data: Array2<f64>, samples: Vec<String>) -> Result<Self> {
        let (days, cols) = data.dim();
        if days != DAYS_PER_YEAR {
            return Err(Error::SeriesLength {
                expected: DAYS_PER_YEAR,
                got: days,
            });
        }
        if cols != samples.len() {
            return Err(Error::InvalidDimensions {
                days,
                samples: samples.len(),
            });
        }
        Ok(Self { data, samples })
    }

    /// Create a matrix from one daily series per sample
    pub fn from_columns(samples: Vec<String>, columns: Vec<Vec<f64>>) -> Result<Self> {
        if samples.len() != columns.len() {
            return Err(Error::InvalidDimensions {
                days: columns.first().map_or(0, Vec::len),
                samples: samples.len(),
            });
        }
        if let Some(bad) = columns.iter().find(|c| c.len() != DAYS_PER_YEAR) {
            return Err(Error::SeriesLength {
                expected: DAYS_PER_YEAR,
                got: bad.len(),
            });
        }

        let cols = columns.len();
        let mut data = Array2::from_elem((DAYS_PER_YEAR, cols), f64::NAN);
        for (col, series) in columns.iter().enumerate() {
            for (day, &v) in series.iter().enumerate() {
                data[(day, col)] = v;
            }
        }
        Self::new(data, samples)
    }

    /// Number of daily rows (always [`DAYS_PER_YEAR`])
    pub fn days(&self) -> usize {
        self.data.nrows()
    }

    /// Number of samples (columns)
    pub fn n_samples(&self) -> usize {
        self.data.ncols()
    }

    /// Sample identifiers in column order
    pub fn sample_names(&self) -> &[String] {
        &self.samples
    }

    /// Column index of a sample by name
    pub fn sample_index(&self, name: &str) -> Result<usize> {
        self.samples
            .iter()
            .position(|s| s == name)
            .ok_or_else(|| Error::UnknownSample(name.to_string()))
    }

    /// Value at (day, sample)
    pub fn get(&self, day: usize, sample: usize) -> Option<f64> {
        self.data.get((day, sample)).copied()
    }

    /// Classify one sample as valid or invalid.
    ///
    /// A sample is valid when it has at least one defined day and the mean
    /// of its defined days is strictly positive. Everything downstream
    /// works on the returned variant rather than re-checking the mean.
    pub fn sample(&self, index: usize) -> Sample {
        let name = self.samples[index].clone();
        let values: Vec<f64> = self.data.column(index).to_vec();

        let (sum, count) = values
            .iter()
            .filter(|v| v.is_finite())
            .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));

        if count == 0 {
            return Sample::Invalid(InvalidSample {
                index,
                name,
                reason: InvalidReason::NoData,
            });
        }

        let mean = sum / count as f64;
        if mean <= 0.0 {
            return Sample::Invalid(InvalidSample {
                index,
                name,
                reason: InvalidReason::NonPositiveMean(mean),
            });
        }

        Sample::Valid(SampleSeries {
            index,
            name,
            values,
            mean,
        })
    }

    /// Classify every sample, in column order
    pub fn samples(&self) -> Vec<Sample> {
        (0..self.n_samples()).map(|i| self.sample(i)).collect()
    }
}
