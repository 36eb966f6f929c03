//! Per-sample event table assembly
//!
//! Valley-to-valley detection gives the season's valleys and peak, the
//! baseline crossings give the absolute season bounds, and the slope
//! extremes between valley and peak give the derivative bounds. Pairwise
//! metrics over these events are appended last.

use crate::phenology::pairwise::evaluate_all;
use crate::phenology::params::PhenologyParams;
use crate::phenology::season::analyze_season;
use crate::phenology::valley::{derivative_events, valley_to_valley};
use phenoscope_core::{EventKind, EventTable, PhenoEvent, Result, SampleSeries};

/// Build the event table of one valid sample.
///
/// Fails when the curve has no usable local extremum around its highest
/// peak, or when a configured pairwise metric names an event that is not
/// in the table. Events that are detected as absent are kept as undefined rows.
pub fn sample_events(series: &SampleSeries, params: &PhenologyParams) -> Result<EventTable> {
    let values = &series.values;
    let valley = valley_to_valley(values, params.extremum_order)?;
    let season = analyze_season(values, params).season;
    let slopes = derivative_events(values, &valley);

    let days = [
        (EventKind::VosStart, Some(valley.vos_start)),
        (EventKind::VosEnd, Some(valley.vos_end)),
        (EventKind::Pos, Some(valley.pos)),
        (EventKind::BosAbs, season.start),
        (EventKind::EosAbs, season.end),
        (EventKind::BosDer, slopes.bos_der),
        (EventKind::EosDer, slopes.eos_der),
    ];

    let mut table = EventTable::new();
    for (kind, day) in days {
        table.push(PhenoEvent::from_day(kind, day, params.origin, values));
    }

    let derived = evaluate_all(&table, values, params)?;
    table.append_derived(derived);
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use phenoscope_core::Error;

    fn series(values: Vec<f64>) -> SampleSeries {
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        SampleSeries {
            index: 0,
            name: "s".to_string(),
            values,
            mean,
        }
    }

    fn bell() -> Vec<f64> {
        let g = |d: f64, c: f64, s: f64| (-((d - c) / s).powi(2)).exp();
        (0..365)
            .map(|d| {
                let d = d as f64;
                0.25 + 0.5 * g(d, 210.0, 30.0) - 0.1 * g(d, 135.0, 20.0) - 0.1 * g(d, 285.0, 20.0)
            })
            .collect()
    }

    #[test]
    fn test_event_order_and_days() {
        let table = sample_events(&series(bell()), &PhenologyParams::default()).unwrap();
        let kinds: Vec<EventKind> = table.events().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, EventKind::ALL.to_vec());

        assert_eq!(table.get(EventKind::VosStart).unwrap().day, Some(135));
        assert_eq!(table.get(EventKind::Pos).unwrap().day, Some(210));
        assert_eq!(table.get(EventKind::VosEnd).unwrap().day, Some(285));
        assert_eq!(table.get(EventKind::BosAbs).unwrap().day, Some(155));
        assert_eq!(table.get(EventKind::EosAbs).unwrap().day, Some(264));
        assert_eq!(table.derived().len(), PhenologyParams::default().derived_metrics.len());
    }

    #[test]
    fn test_flat_curve_is_degenerate() {
        let err = sample_events(&series(vec![0.4; 365]), &PhenologyParams::default()).unwrap_err();
        assert!(matches!(err, Error::DegenerateExtremum(_)));
    }

    #[test]
    fn test_empty_metric_list() {
        let params = PhenologyParams {
            derived_metrics: Vec::new(),
            ..Default::default()
        };
        let table = sample_events(&series(bell()), &params).unwrap();
        assert!(table.derived().is_empty());
        assert_eq!(table.events().len(), 7);
    }
}
