//! Metric snapshot model and registry for the Sagemcom exporter
//!
//! The registry exposes exactly one completed collection cycle at a time;
//! see [`MetricsRegistry`] for the swap semantics.

pub mod names;
mod registry;
mod samples;

pub use registry::MetricsRegistry;
pub use samples::{MetricFamily, MetricKind, MetricSample, Snapshot, SnapshotBuilder, labels};
