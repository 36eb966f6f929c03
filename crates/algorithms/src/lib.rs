//! # Phenoscope Algorithms
//!
//! Phenology detection over daily NDVI series.
//!
//! ## Available Algorithms
//!
//! - **phenology**: rolling baselines, season start/peak/end and derived
//!   metrics, valley-to-valley events, pairwise event metrics

pub mod phenology;
mod parallel;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::phenology::{
        phenology_events, rolling_baseline_matrices, sample_events, sample_metrics,
        season_metrics, BaselineAlignment, BaselineBuilder, DayWindow, EventOutcome,
        PhenologyEvents, PhenologyParams, RollingBaselines, SampleEvents, SeasonMetrics,
    };
    pub use phenoscope_core::prelude::*;
}
