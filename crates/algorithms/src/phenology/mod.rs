//! Vegetation phenology from daily NDVI curves
//!
//! Two independent views of the growing season of each sample:
//! - Baseline crossings: the curve crosses forward/backward rolling-mean
//!   baselines sized by the senescence lag of its minima
//! - Valley-to-valley: the highest local maximum and the local minima
//!   enclosing it, plus the steepest slopes in between
//!
//! Season metrics come from the first view; event tables combine both and
//! append pairwise metrics between events.

mod baseline;
mod batch;
mod crossing;
mod events;
mod metrics;
mod minima;
mod pairwise;
mod params;
mod season;
mod valley;

pub use baseline::{
    backward_baseline, forward_baseline, rolling_baseline_matrices, rolling_baselines,
    BaselineBuilder, Baselines, RollingBaselines,
};
pub use batch::{
    phenology_events, season_metrics, season_metrics_with, EventOutcome, PhenologyEvents,
    SampleEvents, SeasonMetrics,
};
pub use crossing::{detect_season, season_end, season_start, zero_crossings, SeasonEvents};
pub use events::sample_events;
pub use metrics::{
    amplitude, baseline_integral, cumulative_integral, green_up_rate, metrics_row, sample_metrics,
    season_length, senescence_rate, trapezoid, vigor_integral,
};
pub use minima::{global_peak, locate_minima, minimum_in, Extremum, MinimaRecord};
pub use pairwise::{
    days_between, evaluate, evaluate_all, horizontal_difference, peak_vigor_days, percentile,
    vertical_difference,
};
pub use params::{default_metric_specs, BaselineAlignment, DayWindow, PhenologyParams};
pub use season::{analyze_season, SeasonAnalysis};
pub use valley::{
    derivative_events, local_maxima, local_minima, valley_to_valley, DerivativeEvents,
    ValleyEvents,
};
