//! Per-sample season analysis shared by the metrics and event tables

use crate::phenology::baseline::{Baselines, rolling_baselines};
use crate::phenology::crossing::{SeasonEvents, detect_season};
use crate::phenology::minima::{MinimaRecord, locate_minima};
use crate::phenology::params::PhenologyParams;

/// Minima, baselines and baseline-crossing events of one valid sample
#[derive(Debug, Clone)]
pub struct SeasonAnalysis {
    pub minima: Option<MinimaRecord>,
    pub baselines: Baselines,
    pub season: SeasonEvents,
}

/// Run minima location, baseline building and crossing detection in order.
///
/// The minima size the baseline window, so they always come first.
pub fn analyze_season(values: &[f64], params: &PhenologyParams) -> SeasonAnalysis {
    let minima = locate_minima(values, params.left_min_from, params.right_min_until);
    let window = minima.as_ref().and_then(|m| m.window_len(values.len()));
    let baselines = rolling_baselines(values, window, params.alignment);
    let season = detect_season(values, &baselines, params);

    SeasonAnalysis {
        minima,
        baselines,
        season,
    }
}
