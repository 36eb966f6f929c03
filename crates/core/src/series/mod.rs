//! Daily NDVI series and sample classification

mod matrix;
mod sample;

pub use matrix::{NdviMatrix, DAYS_PER_YEAR};
pub use sample::{InvalidReason, InvalidSample, Sample, SampleSeries};
