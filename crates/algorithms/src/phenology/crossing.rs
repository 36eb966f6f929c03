//! Baseline-crossing detection of season start, peak and end

use crate::phenology::baseline::Baselines;
use crate::phenology::minima::global_peak;
use crate::phenology::params::{DayWindow, PhenologyParams};

/// Start, peak and end day of one season. `None` means not detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeasonEvents {
    pub start: Option<usize>,
    pub peak: Option<usize>,
    pub end: Option<usize>,
}

impl SeasonEvents {
    /// Whether both season bounds were detected
    pub fn is_bounded(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }
}

/// -1, 0 or 1; `None` for undefined differences
fn sign(v: f64) -> Option<i8> {
    if v.is_nan() {
        None
    } else if v > 0.0 {
        Some(1)
    } else if v < 0.0 {
        Some(-1)
    } else {
        Some(0)
    }
}

/// Days `i` where the sign of `values - baseline` changes between `i` and `i + 1`.
///
/// Touching the baseline (a difference of exactly zero) counts as a change.
/// Pairs involving an undefined day never cross.
pub fn zero_crossings(values: &[f64], baseline: &[f64]) -> Vec<usize> {
    let signs: Vec<Option<i8>> = values
        .iter()
        .zip(baseline)
        .map(|(v, b)| sign(v - b))
        .collect();

    signs
        .windows(2)
        .enumerate()
        .filter_map(|(i, pair)| match (pair[0], pair[1]) {
            (Some(a), Some(b)) if a != b => Some(i),
            _ => None,
        })
        .collect()
}

/// Latest forward-baseline crossing inside `window`
pub fn season_start(values: &[f64], forward: &[f64], window: DayWindow) -> Option<usize> {
    zero_crossings(values, forward)
        .into_iter()
        .filter(|&d| window.contains(d))
        .next_back()
}

/// Earliest backward-baseline crossing inside `window`
pub fn season_end(values: &[f64], backward: &[f64], window: DayWindow) -> Option<usize> {
    zero_crossings(values, backward)
        .into_iter()
        .find(|&d| window.contains(d))
}

/// Detect season start, peak and end of one sample.
///
/// Peak is the first day holding the global maximum. Samples with fewer
/// than two defined days detect nothing.
pub fn detect_season(values: &[f64], baselines: &Baselines, params: &PhenologyParams) -> SeasonEvents {
    if values.iter().filter(|v| v.is_finite()).count() < 2 {
        return SeasonEvents::default();
    }

    SeasonEvents {
        start: season_start(values, &baselines.forward, params.start_window),
        peak: global_peak(values).map(|p| p.day),
        end: season_end(values, &baselines.backward, params.end_window),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Curve above the baseline up to `flip`, below it afterwards
    fn step_down_at(flip: usize) -> (Vec<f64>, Vec<f64>) {
        let values: Vec<f64> = (0..365).map(|d| if d <= flip { 0.6 } else { 0.2 }).collect();
        (values, vec![0.4; 365])
    }

    #[test]
    fn test_zero_crossings() {
        let values = [0.1, 0.5, 0.6, 0.2, 0.4, f64::NAN, 0.1];
        let base = [0.3; 7];
        // 0->1 up, 2->3 down, 3->4 up; 4->5 and 5->6 touch a gap
        assert_eq!(zero_crossings(&values, &base), vec![0, 2, 3]);
    }

    #[test]
    fn test_touching_counts_as_change() {
        let values = [0.5, 0.3, 0.1];
        let base = [0.3; 3];
        assert_eq!(zero_crossings(&values, &base), vec![0, 1]);
    }

    #[test]
    fn test_start_window_lower_bound_excluded() {
        let w = DayWindow::new(110, 200);
        let (v, b) = step_down_at(110);
        assert_eq!(season_start(&v, &b, w), None);
        let (v, b) = step_down_at(111);
        assert_eq!(season_start(&v, &b, w), Some(111));
    }

    #[test]
    fn test_start_window_upper_bound_excluded() {
        let w = DayWindow::new(110, 200);
        let (v, b) = step_down_at(200);
        assert_eq!(season_start(&v, &b, w), None);
        let (v, b) = step_down_at(199);
        assert_eq!(season_start(&v, &b, w), Some(199));
    }

    #[test]
    fn test_end_window_bounds_excluded() {
        let w = DayWindow::new(250, 360);
        for (flip, expected) in [(250, None), (251, Some(251)), (359, Some(359)), (360, None)] {
            let (v, b) = step_down_at(flip);
            assert_eq!(season_end(&v, &b, w), expected, "crossing at day {flip}");
        }
    }

    #[test]
    fn test_start_takes_latest_end_takes_earliest() {
        let mut v = vec![0.2; 365];
        for d in [120, 150, 260, 300] {
            v[d] = 0.6;
        }
        let b = vec![0.4; 365];
        // crossings at 119/120, 149/150, 259/260, 299/300
        assert_eq!(season_start(&v, &b, DayWindow::new(110, 200)), Some(150));
        assert_eq!(season_end(&v, &b, DayWindow::new(250, 360)), Some(259));
    }

    #[test]
    fn test_no_crossing_does_not_fall_back_to_bounds() {
        let v = vec![0.6; 365];
        let b = vec![0.4; 365];
        assert_eq!(season_start(&v, &b, DayWindow::new(110, 200)), None);
        assert_eq!(season_end(&v, &b, DayWindow::new(250, 360)), None);
    }

    #[test]
    fn test_sparse_sample_detects_nothing() {
        let mut v = vec![f64::NAN; 365];
        v[180] = 0.7;
        let season = detect_season(&v, &Baselines::undefined(365), &PhenologyParams::default());
        assert_eq!(season, SeasonEvents::default());
    }

    #[test]
    fn test_undefined_baselines_still_give_peak() {
        let mut v = vec![0.2; 365];
        v[180] = 0.7;
        let season = detect_season(&v, &Baselines::undefined(365), &PhenologyParams::default());
        assert_eq!(season.peak, Some(180));
        assert!(!season.is_bounded());
    }
}
