//! # Phenoscope Core
//!
//! Core types, tables and I/O for the phenoscope vegetation phenology engine.
//!
//! This crate provides:
//! - `NdviMatrix`: daily (365 rows) NDVI matrix, one column per sample
//! - `Sample`: valid/invalid classification decided once per sample
//! - Metrics and event tables produced by the detectors
//! - Algorithm trait for consistent API
//! - CSV I/O for the resampler input and presenter outputs

pub mod error;
pub mod io;
pub mod series;
pub mod table;

pub use error::{Error, Result};
pub use series::{InvalidReason, NdviMatrix, Sample, SampleSeries, DAYS_PER_YEAR};
pub use table::{
    DerivedMetric, EventKind, EventTable, MetricKind, MetricSpec, MetricsRow, MetricsTable,
    PhenoEvent,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::series::{NdviMatrix, Sample, SampleSeries, DAYS_PER_YEAR};
    pub use crate::table::{EventKind, EventTable, MetricsRow, MetricsTable, PhenoEvent};
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in phenoscope.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
