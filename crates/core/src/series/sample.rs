//! Per-sample validity classification

use std::fmt;

/// Why a sample was excluded from detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvalidReason {
    /// Mean of the defined days is zero or negative (bare soil, water, garbage)
    NonPositiveMean(f64),
    /// No defined day at all
    NoData,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::NonPositiveMean(m) => write!(f, "non-positive mean NDVI ({m:.4})"),
            InvalidReason::NoData => write!(f, "no defined days"),
        }
    }
}

/// A sample that passed the vegetation check.
#[derive(Debug, Clone)]
pub struct SampleSeries {
    /// Column index in the source matrix
    pub index: usize,
    /// Sample identifier
    pub name: String,
    /// Daily NDVI values, `NaN` for undefined days
    pub values: Vec<f64>,
    /// Mean of the defined days (always > 0)
    pub mean: f64,
}

impl SampleSeries {
    /// Number of defined (finite) days
    pub fn defined_days(&self) -> usize {
        self.values.iter().filter(|v| v.is_finite()).count()
    }
}

/// A sample that is skipped by every detector.
#[derive(Debug, Clone)]
pub struct InvalidSample {
    pub index: usize,
    pub name: String,
    pub reason: InvalidReason,
}

/// Validity of one sample, decided once per run.
#[derive(Debug, Clone)]
pub enum Sample {
    Valid(SampleSeries),
    Invalid(InvalidSample),
}

impl Sample {
    /// Sample identifier
    pub fn name(&self) -> &str {
        match self {
            Sample::Valid(s) => &s.name,
            Sample::Invalid(s) => &s.name,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Sample::Valid(_))
    }
}
