//! Batch drivers over every sample of an NDVI matrix
//!
//! Each sample is classified once. Invalid samples get an all-undefined
//! metrics row and are skipped by event detection; the per-sample work of
//! valid samples runs on the rayon pool when the `parallel` feature is on.

use crate::parallel::map_samples;
use crate::phenology::events::sample_events;
use crate::phenology::metrics::sample_metrics;
use crate::phenology::params::PhenologyParams;
use phenoscope_core::{
    Algorithm, Error, EventTable, InvalidReason, MetricsRow, MetricsTable, NdviMatrix, Result,
    Sample, SampleSeries,
};
use tracing::{debug, info};

/// Season metrics for every sample, one row per sample in input order
pub fn season_metrics(matrix: &NdviMatrix, params: &PhenologyParams) -> Result<MetricsTable> {
    season_metrics_with(matrix, params, sample_metrics)
}

/// Same as [`season_metrics`] with a caller-supplied per-sample computation.
///
/// `compute` only ever sees valid samples.
pub fn season_metrics_with<F>(matrix: &NdviMatrix, params: &PhenologyParams, compute: F) -> Result<MetricsTable>
where
    F: Fn(&SampleSeries, &PhenologyParams) -> MetricsRow + Sync + Send,
{
    params.validate()?;

    let rows = map_samples(matrix.n_samples(), |i| match matrix.sample(i) {
        Sample::Valid(series) => compute(&series, params),
        Sample::Invalid(invalid) => {
            debug!(sample = %invalid.name, reason = %invalid.reason, "skipping sample");
            MetricsRow::undefined(invalid.name)
        }
    });

    let table = MetricsTable::new(rows);
    info!(
        samples = table.len(),
        with_season = table.defined_count(),
        "season metrics computed"
    );
    Ok(table)
}

/// Result of event detection on one sample
#[derive(Debug)]
pub enum EventOutcome {
    Detected(EventTable),
    /// Sample failed the vegetation check
    Skipped(InvalidReason),
    /// Detection ran but the curve had no usable extremum
    Failed(Error),
}

/// Event detection result of one sample
#[derive(Debug)]
pub struct SampleEvents {
    pub sample_id: String,
    pub outcome: EventOutcome,
}

impl SampleEvents {
    pub fn table(&self) -> Option<&EventTable> {
        match &self.outcome {
            EventOutcome::Detected(t) => Some(t),
            _ => None,
        }
    }
}

/// Event tables for every sample, in input order.
///
/// A failing sample does not abort the batch; its error is kept in the outcome.
pub fn phenology_events(matrix: &NdviMatrix, params: &PhenologyParams) -> Result<Vec<SampleEvents>> {
    params.validate()?;

    let results = map_samples(matrix.n_samples(), |i| {
        let sample = matrix.sample(i);
        let sample_id = sample.name().to_string();
        let outcome = match sample {
            Sample::Valid(series) => match sample_events(&series, params) {
                Ok(table) => EventOutcome::Detected(table),
                Err(e) => {
                    debug!(sample = %sample_id, error = %e, "event detection failed");
                    EventOutcome::Failed(e)
                }
            },
            Sample::Invalid(invalid) => {
                debug!(sample = %sample_id, reason = %invalid.reason, "skipping sample");
                EventOutcome::Skipped(invalid.reason)
            }
        };
        SampleEvents { sample_id, outcome }
    });

    let detected = results.iter().filter(|r| r.table().is_some()).count();
    info!(samples = results.len(), detected, "phenological events detected");
    Ok(results)
}

/// Season metrics (start, peak, end, rates, integrals) per sample
#[derive(Debug, Clone, Default)]
pub struct SeasonMetrics;

impl Algorithm for SeasonMetrics {
    type Input = NdviMatrix;
    type Output = MetricsTable;
    type Params = PhenologyParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Season Metrics"
    }

    fn description(&self) -> &'static str {
        "Growing-season start, peak, end, amplitude, rates and integrals from baseline crossings"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        season_metrics(&input, &params)
    }
}

/// Valley-to-valley and baseline events per sample
#[derive(Debug, Clone, Default)]
pub struct PhenologyEvents;

impl Algorithm for PhenologyEvents {
    type Input = NdviMatrix;
    type Output = Vec<SampleEvents>;
    type Params = PhenologyParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Phenology Events"
    }

    fn description(&self) -> &'static str {
        "Valley, peak, baseline-crossing and steepest-slope events with pairwise metrics"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        phenology_events(&input, &params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn matrix(columns: Vec<Vec<f64>>) -> NdviMatrix {
        let names = (0..columns.len()).map(|i| format!("s{i}")).collect();
        NdviMatrix::from_columns(names, columns).unwrap()
    }

    #[test]
    fn test_invalid_samples_never_reach_compute() {
        let calls = AtomicUsize::new(0);
        let m = matrix(vec![vec![0.0; 365], vec![0.5; 365], vec![-0.2; 365], vec![f64::NAN; 365]]);

        let table = season_metrics_with(&m, &PhenologyParams::default(), |s, p| {
            calls.fetch_add(1, Ordering::SeqCst);
            sample_metrics(s, p)
        })
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(table.len(), 4);
        for id in ["s0", "s2", "s3"] {
            assert!(table.get(id).unwrap().is_undefined());
        }
    }

    #[test]
    fn test_rows_keep_input_order() {
        let m = matrix((0..20).map(|i| vec![0.1 + i as f64 * 0.01; 365]).collect());
        let table = season_metrics(&m, &PhenologyParams::default()).unwrap();
        let ids: Vec<&str> = table.rows().iter().map(|r| r.sample_id.as_str()).collect();
        let expected: Vec<String> = (0..20).map(|i| format!("s{i}")).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let m = matrix(vec![vec![0.5; 365]]);
        let params = PhenologyParams {
            extremum_order: 0,
            ..Default::default()
        };
        assert!(matches!(season_metrics(&m, &params), Err(Error::InvalidParameter { .. })));
        assert!(phenology_events(&m, &params).is_err());
    }

    #[test]
    fn test_event_outcomes() {
        let m = matrix(vec![vec![0.0; 365], vec![0.5; 365]]);
        let results = phenology_events(&m, &PhenologyParams::default()).unwrap();
        assert_eq!(results.len(), 2);
        assert!(matches!(results[0].outcome, EventOutcome::Skipped(InvalidReason::NonPositiveMean(_))));
        assert!(matches!(results[1].outcome, EventOutcome::Failed(Error::DegenerateExtremum(_))));
        assert!(results.iter().all(|r| r.table().is_none()));
    }
}
