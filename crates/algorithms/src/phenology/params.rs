//! Search windows and detector settings

use chrono::NaiveDate;
use phenoscope_core::{DAYS_PER_YEAR, Error, EventKind, MetricKind, MetricSpec, Result};
use serde::{Deserialize, Serialize};

/// Open day-of-year interval `(after, before)`.
///
/// Both bounds are excluded: a crossing exactly on `after` or `before`
/// is outside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    pub after: usize,
    pub before: usize,
}

impl DayWindow {
    pub const fn new(after: usize, before: usize) -> Self {
        Self { after, before }
    }

    pub fn contains(&self, day: usize) -> bool {
        day > self.after && day < self.before
    }
}

/// Alignment of the forward rolling baseline relative to the day it is reported on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineAlignment {
    /// Day `d` averages days `d - ℓ + 1 ..= d`
    #[default]
    Trailing,
    /// Day `d` averages days `d - ℓ/2 .. d - ℓ/2 + ℓ`
    Centered,
}

/// Parameters for phenology detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhenologyParams {
    /// Window for forward-baseline crossings (season start). Default: (110, 200)
    pub start_window: DayWindow,
    /// Window for backward-baseline crossings (season end). Default: (250, 360)
    pub end_window: DayWindow,
    /// First day searched for the left minimum. Default: 100
    pub left_min_from: usize,
    /// Right minimum is searched up to (excluding) this day. Default: 330
    pub right_min_until: usize,
    /// Local extremum order k for valley-to-valley detection. Default: 10
    pub extremum_order: usize,
    /// Forward baseline alignment. Default: trailing
    pub alignment: BaselineAlignment,
    /// Calendar date of day 0. Default: 2021-01-01
    pub origin: NaiveDate,
    /// Percentile used by the peak vigor count. Default: 85
    pub vigor_percentile: f64,
    /// Pairwise metrics appended to every event table
    pub derived_metrics: Vec<MetricSpec>,
}

impl Default for PhenologyParams {
    fn default() -> Self {
        Self {
            start_window: DayWindow::new(110, 200),
            end_window: DayWindow::new(250, 360),
            left_min_from: 100,
            right_min_until: 330,
            extremum_order: 10,
            alignment: BaselineAlignment::Trailing,
            origin: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap_or_default(),
            vigor_percentile: 85.0,
            derived_metrics: default_metric_specs(),
        }
    }
}

impl PhenologyParams {
    /// Check that windows are ordered and inside one annual cycle
    pub fn validate(&self) -> Result<()> {
        check_window("start_window", self.start_window)?;
        check_window("end_window", self.end_window)?;

        if self.left_min_from >= self.right_min_until || self.right_min_until > DAYS_PER_YEAR {
            return Err(Error::InvalidParameter {
                name: "minimum search bounds",
                value: format!("[{}, {})", self.left_min_from, self.right_min_until),
                reason: format!("must satisfy from < until <= {}", DAYS_PER_YEAR),
            });
        }

        if self.extremum_order == 0 {
            return Err(Error::InvalidParameter {
                name: "extremum_order",
                value: "0".into(),
                reason: "must be >= 1".into(),
            });
        }

        if !(0.0..=100.0).contains(&self.vigor_percentile) {
            return Err(Error::InvalidParameter {
                name: "vigor_percentile",
                value: self.vigor_percentile.to_string(),
                reason: "must be between 0 and 100".into(),
            });
        }

        Ok(())
    }
}

fn check_window(name: &'static str, w: DayWindow) -> Result<()> {
    if w.after >= w.before || w.before > DAYS_PER_YEAR {
        return Err(Error::InvalidParameter {
            name,
            value: format!("({}, {})", w.after, w.before),
            reason: format!("must satisfy after < before <= {}", DAYS_PER_YEAR),
        });
    }
    Ok(())
}

/// The standard reporting set of pairwise metrics
pub fn default_metric_specs() -> Vec<MetricSpec> {
    use EventKind::*;
    use MetricKind::*;

    vec![
        MetricSpec::new(DaysBetween, VosStart, VosEnd),
        MetricSpec::new(DaysBetween, BosAbs, EosAbs),
        MetricSpec::new(VerticalDifference, EosAbs, Pos),
        MetricSpec::new(HorizontalDifference, Pos, EosAbs),
        MetricSpec::new(HorizontalDifference, VosStart, EosAbs),
        MetricSpec::new(VerticalDifference, VosStart, EosAbs),
        MetricSpec::new(HorizontalDifference, BosAbs, VosEnd),
        MetricSpec::new(VerticalDifference, VosStart, BosAbs),
        MetricSpec::new(PeakVigorDays, BosAbs, EosAbs),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let p = PhenologyParams::default();
        assert!(p.validate().is_ok());
        assert_eq!(p.origin, NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
        assert_eq!(p.derived_metrics.len(), 9);
    }

    #[test]
    fn test_window_bounds_are_open() {
        let w = DayWindow::new(110, 200);
        assert!(!w.contains(110));
        assert!(w.contains(111));
        assert!(w.contains(199));
        assert!(!w.contains(200));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let p = PhenologyParams { start_window: DayWindow::new(200, 110), ..Default::default() };
        assert!(matches!(p.validate(), Err(Error::InvalidParameter { name: "start_window", .. })));

        let p = PhenologyParams { right_min_until: 400, ..Default::default() };
        assert!(p.validate().is_err());

        let p = PhenologyParams { extremum_order: 0, ..Default::default() };
        assert!(p.validate().is_err());

        let p = PhenologyParams { vigor_percentile: 120.0, ..Default::default() };
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let p: PhenologyParams =
            serde_json::from_str(r#"{"extremum_order": 5, "alignment": "centered"}"#).unwrap();
        assert_eq!(p.extremum_order, 5);
        assert_eq!(p.alignment, BaselineAlignment::Centered);
        assert_eq!(p.start_window, DayWindow::new(110, 200));
        assert_eq!(p.derived_metrics.len(), 9);
    }

    #[test]
    fn test_config_roundtrip() {
        let p = PhenologyParams { origin: NaiveDate::from_ymd_opt(2022, 7, 1).unwrap(), ..Default::default() };
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"origin\":\"2022-07-01\""));
        assert!(json.contains("\"kind\":\"peak_vigor_days\""));
        let back: PhenologyParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
