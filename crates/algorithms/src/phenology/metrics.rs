//! Season metrics derived from the detected bounds
//!
//! All day arithmetic here is on day-of-year indices.

use crate::phenology::crossing::SeasonEvents;
use crate::phenology::minima::MinimaRecord;
use crate::phenology::params::PhenologyParams;
use crate::phenology::season::{SeasonAnalysis, analyze_season};
use phenoscope_core::{MetricsRow, SampleSeries};

/// Number of decimals kept by the integrals
const INTEGRAL_DECIMALS: i32 = 2;

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

fn round_to(v: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (v * scale).round() / scale
}

/// `end - start`, in days
pub fn season_length(season: &SeasonEvents) -> Option<i64> {
    Some(season.end? as i64 - season.start? as i64)
}

/// Mean value of the left and right minima
pub fn amplitude(minima: Option<&MinimaRecord>) -> Option<f64> {
    let m = minima?;
    finite((m.left?.value + m.right?.value) / 2.0)
}

fn slope(values: &[f64], from: usize, to: usize) -> Option<f64> {
    let (a, b) = (*values.get(from)?, *values.get(to)?);
    finite((b - a) / (to as f64 - from as f64))
}

/// NDVI gained per day from season start to peak
pub fn green_up_rate(values: &[f64], season: &SeasonEvents) -> Option<f64> {
    if !season.is_bounded() {
        return None;
    }
    slope(values, season.start?, season.peak?)
}

/// NDVI lost per day from peak to season end, as a magnitude
pub fn senescence_rate(values: &[f64], season: &SeasonEvents) -> Option<f64> {
    if !season.is_bounded() {
        return None;
    }
    slope(values, season.end?, season.peak?).map(f64::abs)
}

/// Trapezoidal integral with unit day spacing
pub fn trapezoid(values: &[f64]) -> f64 {
    values.windows(2).map(|w| (w[0] + w[1]) / 2.0).sum()
}

/// Area between the curve and its own minimum over `[from, to]`, rounded to 2 decimals.
///
/// `None` for an empty or out-of-range window, or one containing an undefined day.
pub fn vigor_integral(values: &[f64], from: usize, to: usize) -> Option<f64> {
    if from > to {
        return None;
    }
    let window = values.get(from..=to)?;
    if window.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let floor = window.iter().copied().fold(f64::INFINITY, f64::min);
    let lifted: Vec<f64> = window.iter().map(|v| v - floor).collect();
    Some(round_to(trapezoid(&lifted), INTEGRAL_DECIMALS))
}

/// Vigor integral over the detected season, `[start, end]`
pub fn cumulative_integral(values: &[f64], season: &SeasonEvents) -> Option<f64> {
    vigor_integral(values, season.start?, season.end?)
}

/// Vigor integral between the left and right minima.
///
/// Only reported for samples whose season bounds were also detected.
pub fn baseline_integral(values: &[f64], season: &SeasonEvents, minima: Option<&MinimaRecord>) -> Option<f64> {
    if !season.is_bounded() {
        return None;
    }
    let m = minima?;
    vigor_integral(values, m.left?.day, m.right?.day)
}

/// Metrics row from an already computed analysis
pub fn metrics_row(series: &SampleSeries, analysis: &SeasonAnalysis) -> MetricsRow {
    let values = &series.values;
    let season = &analysis.season;
    let minima = analysis.minima.as_ref();

    MetricsRow {
        sample_id: series.name.clone(),
        start_day: season.start,
        peak_day: season.peak,
        end_day: season.end,
        season_length: season_length(season),
        amplitude: amplitude(minima),
        rate_in: green_up_rate(values, season),
        rate_out: senescence_rate(values, season),
        cumulative_integral: cumulative_integral(values, season),
        baseline_integral: baseline_integral(values, season, minima),
    }
}

/// Full metrics of one valid sample
pub fn sample_metrics(series: &SampleSeries, params: &PhenologyParams) -> MetricsRow {
    let analysis = analyze_season(&series.values, params);
    metrics_row(series, &analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phenology::minima::Extremum;
    use approx::assert_relative_eq;

    fn bounded(start: usize, peak: usize, end: usize) -> SeasonEvents {
        SeasonEvents {
            start: Some(start),
            peak: Some(peak),
            end: Some(end),
        }
    }

    fn minima(left: (usize, f64), right: (usize, f64)) -> MinimaRecord {
        MinimaRecord {
            peak: Extremum { day: 5, value: 1.0 },
            left: Some(Extremum { day: left.0, value: left.1 }),
            right: Some(Extremum { day: right.0, value: right.1 }),
            day_mean: None,
            day_std: None,
            sle: None,
            lag: None,
        }
    }

    #[test]
    fn test_season_length() {
        assert_eq!(season_length(&bounded(150, 200, 270)), Some(120));
        let open = SeasonEvents { start: None, ..bounded(0, 200, 270) };
        assert_eq!(season_length(&open), None);
    }

    #[test]
    fn test_amplitude() {
        let m = minima((120, 0.2), (300, 0.1));
        assert_relative_eq!(amplitude(Some(&m)).unwrap(), 0.15, epsilon = 1e-12);
        let one_sided = MinimaRecord { right: None, ..m };
        assert_eq!(amplitude(Some(&one_sided)), None);
        assert_eq!(amplitude(None), None);
    }

    #[test]
    fn test_rates() {
        let mut v = vec![0.0; 10];
        v[2] = 0.2;
        v[5] = 0.8;
        v[8] = 0.5;
        let s = bounded(2, 5, 8);
        assert_relative_eq!(green_up_rate(&v, &s).unwrap(), 0.2, epsilon = 1e-12);
        assert_relative_eq!(senescence_rate(&v, &s).unwrap(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_rates_need_both_bounds() {
        let v = vec![0.5; 10];
        let no_end = SeasonEvents { end: None, ..bounded(2, 5, 8) };
        assert_eq!(green_up_rate(&v, &no_end), None);
        assert_eq!(senescence_rate(&v, &no_end), None);
    }

    #[test]
    fn test_rate_with_peak_on_start_is_undefined() {
        let v = vec![0.5; 10];
        assert_eq!(green_up_rate(&v, &bounded(5, 5, 8)), None);
    }

    #[test]
    fn test_trapezoid() {
        assert_relative_eq!(trapezoid(&[0.0, 1.0, 2.0, 1.0]), 3.5);
        assert_relative_eq!(trapezoid(&[4.0]), 0.0);
    }

    #[test]
    fn test_vigor_integral_subtracts_window_minimum() {
        let v = [9.0, 0.5, 1.5, 2.5, 1.5, 0.5, 9.0];
        // lifted: 0, 1, 2, 1, 0 -> area 4
        assert_eq!(vigor_integral(&v, 1, 5), Some(4.0));
        assert_eq!(vigor_integral(&v, 5, 1), None);
        assert_eq!(vigor_integral(&v, 1, 9), None);
    }

    #[test]
    fn test_vigor_integral_rounds_and_is_non_negative() {
        let v: Vec<f64> = (0..50).map(|d| 0.3 + 0.001 * ((d * 7) % 11) as f64).collect();
        let area = vigor_integral(&v, 3, 40).unwrap();
        assert!(area >= 0.0);
        assert_relative_eq!(area, round_to(area, 2));
    }

    #[test]
    fn test_vigor_integral_gap() {
        let v = [0.1, 0.2, f64::NAN, 0.2];
        assert_eq!(vigor_integral(&v, 0, 3), None);
        assert!(vigor_integral(&v, 0, 1).is_some());
    }

    #[test]
    fn test_baseline_integral_needs_season() {
        let v = [0.1, 0.3, 0.5, 0.3, 0.1, 0.1];
        let m = minima((0, 0.1), (4, 0.1));
        assert_eq!(baseline_integral(&v, &bounded(1, 2, 3), Some(&m)), Some(0.8));
        let open = SeasonEvents { start: None, ..bounded(1, 2, 3) };
        assert_eq!(baseline_integral(&v, &open, Some(&m)), None);
    }
}
