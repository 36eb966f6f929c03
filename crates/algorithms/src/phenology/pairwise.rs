//! Pairwise metrics between named events of an event table
//!
//! Unlike the season metrics, day counts here come from calendar dates.
//! Every lookup of an event missing from the table is an error; an event
//! that is present but undetected gives an undefined value.

use crate::phenology::params::PhenologyParams;
use chrono::NaiveDate;
use phenoscope_core::{DerivedMetric, EventKind, EventTable, MetricKind, MetricSpec, Result};

/// Calendar days from `from` to `to` (negative when `to` comes first)
pub fn days_between(table: &EventTable, from: EventKind, to: EventKind) -> Result<Option<i64>> {
    let (a, b) = (table.get(from)?, table.get(to)?);
    Ok(match (a.date, b.date) {
        (Some(a), Some(b)) => Some((b - a).num_days()),
        _ => None,
    })
}

/// Alias of [`days_between`]
pub fn horizontal_difference(table: &EventTable, from: EventKind, to: EventKind) -> Result<Option<i64>> {
    days_between(table, from, to)
}

/// `value(to) - value(from)`
pub fn vertical_difference(table: &EventTable, from: EventKind, to: EventKind) -> Result<Option<f64>> {
    let (a, b) = (table.get(from)?, table.get(to)?);
    Ok(match (a.value, b.value) {
        (Some(a), Some(b)) => Some(b - a),
        _ => None,
    })
}

/// Percentile of the defined values, linearly interpolated between order statistics
pub fn percentile(values: &[f64], pct: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64))
}

/// Count the days within `[date(from), date(to)]` whose NDVI is strictly above
/// the `pct` percentile of that same window.
///
/// `values` is the sample's daily series, day 0 falling on `origin`.
/// `None` when either event is undetected or the window holds no defined day.
pub fn peak_vigor_days(
    table: &EventTable,
    values: &[f64],
    origin: NaiveDate,
    from: EventKind,
    to: EventKind,
    pct: f64,
) -> Result<Option<usize>> {
    let (a, b) = (table.get(from)?, table.get(to)?);
    let (Some(first), Some(last)) = (a.date, b.date) else {
        return Ok(None);
    };
    if values.is_empty() {
        return Ok(None);
    }

    let last_day = (values.len() - 1) as i64;
    let lo = (first - origin).num_days().clamp(0, last_day) as usize;
    let hi = (last - origin).num_days().clamp(0, last_day) as usize;
    if lo > hi {
        return Ok(None);
    }

    let window = &values[lo..=hi];
    Ok(percentile(window, pct).map(|threshold| window.iter().filter(|&&v| v > threshold).count()))
}

/// Evaluate one pairwise metric
pub fn evaluate(table: &EventTable, values: &[f64], params: &PhenologyParams, spec: MetricSpec) -> Result<DerivedMetric> {
    let value = match spec.kind {
        MetricKind::DaysBetween => days_between(table, spec.from, spec.to)?.map(|d| d as f64),
        MetricKind::HorizontalDifference => {
            horizontal_difference(table, spec.from, spec.to)?.map(|d| d as f64)
        }
        MetricKind::VerticalDifference => vertical_difference(table, spec.from, spec.to)?,
        MetricKind::PeakVigorDays => peak_vigor_days(
            table,
            values,
            params.origin,
            spec.from,
            spec.to,
            params.vigor_percentile,
        )?
        .map(|n| n as f64),
    };
    Ok(DerivedMetric { spec, value })
}

/// Evaluate every configured pairwise metric, failing on the first missing event
pub fn evaluate_all(table: &EventTable, values: &[f64], params: &PhenologyParams) -> Result<Vec<DerivedMetric>> {
    params
        .derived_metrics
        .iter()
        .map(|&spec| evaluate(table, values, params, spec))
        .collect()
}
