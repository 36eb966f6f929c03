//! Minima bounding the growing season
//!
//! The left minimum is searched from a fixed early day up to the global
//! peak, the right minimum from the peak up to a fixed late day. The span
//! between them sizes the rolling baseline window.

use std::ops::Range;

/// A located extreme day and its NDVI value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremum {
    pub day: usize,
    pub value: f64,
}

/// Season-bounding minima of one sample and the window statistics derived from them
#[derive(Debug, Clone, PartialEq)]
pub struct MinimaRecord {
    /// Global maximum (first occurrence)
    pub peak: Extremum,
    /// Minimum over `[from, peak)`
    pub left: Option<Extremum>,
    /// Minimum over `[peak, until)`
    pub right: Option<Extremum>,
    /// Mean day index over `[left.day, right.day]`
    pub day_mean: Option<f64>,
    /// Population standard deviation of the day index over `[left.day, right.day]`
    pub day_std: Option<f64>,
    /// Senescence-lag estimate, `round(2 * day_std)`
    pub sle: Option<f64>,
    /// `round(series_len - day_mean)`
    pub lag: Option<f64>,
}

impl MinimaRecord {
    /// Rolling baseline window, `series_len - SLE`.
    ///
    /// `None` when the SLE is undefined or leaves no day in the window.
    pub fn window_len(&self, series_len: usize) -> Option<usize> {
        let sle = self.sle?;
        let w = series_len as f64 - sle;
        (w >= 1.0).then_some(w as usize)
    }
}

/// First day holding the largest defined value
pub fn global_peak(values: &[f64]) -> Option<Extremum> {
    extreme_in(values, 0..values.len(), |candidate, best| candidate > best)
}

/// First day holding the smallest defined value within `range`
pub fn minimum_in(values: &[f64], range: Range<usize>) -> Option<Extremum> {
    extreme_in(values, range, |candidate, best| candidate < best)
}

fn extreme_in<F>(values: &[f64], range: Range<usize>, better: F) -> Option<Extremum>
where
    F: Fn(f64, f64) -> bool,
{
    let end = range.end.min(values.len());
    let mut best: Option<Extremum> = None;
    for day in range.start..end {
        let v = values[day];
        if !v.is_finite() {
            continue;
        }
        match best {
            Some(b) if !better(v, b.value) => {}
            _ => best = Some(Extremum { day, value: v }),
        }
    }
    best
}

/// Locate the minima around the global peak.
///
/// # Arguments
/// * `values` - Daily NDVI of a valid sample
/// * `from` - First day of the left search window
/// * `until` - Exclusive end of the right search window
///
/// # Returns
/// `None` if the series has no defined value. A side whose window is empty
/// (peak at or before `from`, or at or after `until`) is left undefined, and
/// so are the statistics that need both sides.
pub fn locate_minima(values: &[f64], from: usize, until: usize) -> Option<MinimaRecord> {
    let peak = global_peak(values)?;

    let left = if peak.day > from { minimum_in(values, from..peak.day) } else { None };
    let right = if peak.day < until { minimum_in(values, peak.day..until) } else { None };

    let (day_mean, day_std) = match (left, right) {
        (Some(l), Some(r)) => {
            // Mean and population std of the consecutive integers l..=r
            let n = (r.day - l.day + 1) as f64;
            let mean = (l.day + r.day) as f64 / 2.0;
            let std = ((n * n - 1.0) / 12.0).sqrt();
            (Some(mean), Some(std))
        }
        _ => (None, None),
    };

    let sle = day_std.map(|s| (2.0 * s).round());
    let lag = day_mean.map(|m| (values.len() as f64 - m).round());

    Some(MinimaRecord {
        peak,
        left,
        right,
        day_mean,
        day_std,
        sle,
        lag,
    })
}
