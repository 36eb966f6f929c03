//! Output tables: season metrics and phenological events

mod derived;
mod event;
mod metrics;

pub use derived::{DerivedMetric, MetricKind, MetricSpec};
pub use event::{EventKind, EventTable, PhenoEvent};
pub use metrics::{MetricsRow, MetricsTable};
