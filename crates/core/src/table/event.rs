//! Phenological event records and the per-sample event table

use crate::error::{Error, Result};
use crate::table::DerivedMetric;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed vocabulary of phenological events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Closest valley before the seasonal peak
    VosStart,
    /// Closest valley after the seasonal peak
    VosEnd,
    /// Peak of season (largest local maximum)
    Pos,
    /// Steepest green-up day between `vos_start` and `pos`
    BosDer,
    /// Steepest senescence day between `pos` and `vos_end`
    EosDer,
    /// Season start from forward-baseline crossing
    BosAbs,
    /// Season end from backward-baseline crossing
    EosAbs,
}

impl EventKind {
    pub const ALL: [EventKind; 7] = [
        EventKind::VosStart,
        EventKind::VosEnd,
        EventKind::Pos,
        EventKind::BosAbs,
        EventKind::EosAbs,
        EventKind::BosDer,
        EventKind::EosDer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::VosStart => "vos_start",
            EventKind::VosEnd => "vos_end",
            EventKind::Pos => "pos",
            EventKind::BosDer => "bos_der",
            EventKind::EosDer => "eos_der",
            EventKind::BosAbs => "bos_abs",
            EventKind::EosAbs => "eos_abs",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        EventKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::EventNotFound(s.to_string()))
    }
}

/// One detected (or undetected) event of a sample.
///
/// An event whose detector found nothing is still recorded, with every
/// field left `None`, so lookups can tell "not detected" apart from
/// "not part of this table".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhenoEvent {
    pub kind: EventKind,
    /// Day-of-year index
    pub day: Option<usize>,
    /// Calendar date (season origin + day)
    pub date: Option<NaiveDate>,
    /// NDVI at the event day
    pub value: Option<f64>,
}

impl PhenoEvent {
    /// Event placed on `day`, dated relative to `origin`
    pub fn at(kind: EventKind, day: usize, origin: NaiveDate, value: f64) -> Self {
        let date = origin.checked_add_days(chrono::Days::new(day as u64));
        Self {
            kind,
            day: Some(day),
            date,
            value: value.is_finite().then_some(value),
        }
    }

    /// Event whose detector found nothing
    pub fn undefined(kind: EventKind) -> Self {
        Self {
            kind,
            day: None,
            date: None,
            value: None,
        }
    }

    /// Build from an optional day, looking the value up in `values`
    pub fn from_day(kind: EventKind, day: Option<usize>, origin: NaiveDate, values: &[f64]) -> Self {
        match day.and_then(|d| values.get(d).map(|&v| (d, v))) {
            Some((d, v)) => Self::at(kind, d, origin, v),
            None => Self::undefined(kind),
        }
    }

    pub fn is_defined(&self) -> bool {
        self.day.is_some()
    }
}

/// Append-only event table of one sample.
///
/// Detected events come first; derived pairwise rows are appended
/// afterwards and reference events by kind.
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    events: Vec<PhenoEvent>,
    derived: Vec<DerivedMetric>,
}

impl EventTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event row
    pub fn push(&mut self, event: PhenoEvent) {
        self.events.push(event);
    }

    /// Append derived pairwise rows
    pub fn append_derived(&mut self, rows: impl IntoIterator<Item = DerivedMetric>) {
        self.derived.extend(rows);
    }

    pub fn events(&self) -> &[PhenoEvent] {
        &self.events
    }

    pub fn derived(&self) -> &[DerivedMetric] {
        &self.derived
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn contains(&self, kind: EventKind) -> bool {
        self.events.iter().any(|e| e.kind == kind)
    }

    /// First event of the given kind.
    ///
    /// Fails with [`Error::EventNotFound`] if the table has no such row.
    pub fn get(&self, kind: EventKind) -> Result<&PhenoEvent> {
        self.events
            .iter()
            .find(|e| e.kind == kind)
            .ok_or_else(|| Error::EventNotFound(kind.to_string()))
    }
}
