//! Structured pairwise metrics derived from an event table

use crate::table::EventKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of pairwise metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Calendar days from the first event to the second
    DaysBetween,
    /// NDVI of the second event minus NDVI of the first
    VerticalDifference,
    /// Same as [`MetricKind::DaysBetween`], reported under its own name
    HorizontalDifference,
    /// Days between the two events whose NDVI exceeds the vigor percentile
    PeakVigorDays,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::DaysBetween => "days_between",
            MetricKind::VerticalDifference => "vertical_difference",
            MetricKind::HorizontalDifference => "horizontal_difference",
            MetricKind::PeakVigorDays => "peak_vigor_days",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pairwise metric request: kind plus the two events it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSpec {
    pub kind: MetricKind,
    pub from: EventKind,
    pub to: EventKind,
}

impl MetricSpec {
    pub const fn new(kind: MetricKind, from: EventKind, to: EventKind) -> Self {
        Self { kind, from, to }
    }

    /// Human-readable label used by table renderers
    pub fn description(&self) -> String {
        match self.kind {
            MetricKind::DaysBetween => format!("Days between {} and {}", self.from, self.to),
            MetricKind::VerticalDifference => {
                format!("Vertical difference between {} and {}", self.from, self.to)
            }
            MetricKind::HorizontalDifference => {
                format!("Horizontal difference between {} and {}", self.from, self.to)
            }
            MetricKind::PeakVigorDays => {
                format!("Count of peak vigor days between {} and {}", self.from, self.to)
            }
        }
    }
}

/// An evaluated pairwise metric row.
///
/// `value` is `None` when either operand event exists but was not detected.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetric {
    pub spec: MetricSpec,
    pub value: Option<f64>,
}

impl DerivedMetric {
    pub fn kind(&self) -> MetricKind {
        self.spec.kind
    }

    pub fn operands(&self) -> (EventKind, EventKind) {
        (self.spec.from, self.spec.to)
    }

    pub fn description(&self) -> String {
        self.spec.description()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description() {
        let spec = MetricSpec::new(MetricKind::DaysBetween, EventKind::BosAbs, EventKind::EosAbs);
        assert_eq!(spec.description(), "Days between bos_abs and eos_abs");

        let row = DerivedMetric { spec, value: Some(109.0) };
        assert_eq!(row.operands(), (EventKind::BosAbs, EventKind::EosAbs));
        assert_eq!(row.kind(), MetricKind::DaysBetween);
    }
}
