//! Metrics registry with whole-snapshot replacement
//!
//! The collector produces a complete [`Snapshot`] per cycle and swaps it in
//! atomically; the export server encodes whatever snapshot is current. The
//! two sides share nothing else, so a slow collection can never block a
//! scrape and a scrape can never observe a mix of two cycles.

use std::sync::Arc;

use arc_swap::ArcSwap;
use prometheus_client::collector::Collector;
use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::{DescriptorEncoder, EncodeMetric, MetricEncoder};
use prometheus_client::metrics::MetricType;
use prometheus_client::metrics::counter::ConstCounter;
use prometheus_client::metrics::gauge::ConstGauge;
use prometheus_client::registry::Registry;

use super::names;
use super::samples::{MetricFamily, MetricKind, MetricSample, Snapshot};

/// Thread-safe holder of the current metric snapshot
#[derive(Clone)]
pub struct MetricsRegistry {
    snapshot: Arc<ArcSwap<Snapshot>>,
    registry: Arc<Registry>,
}

impl MetricsRegistry {
    #[must_use]
    pub fn new() -> Self {
        let snapshot = Arc::new(ArcSwap::from_pointee(Snapshot::default()));
        let mut registry = Registry::default();
        registry.register_collector(Box::new(SnapshotCollector {
            snapshot: snapshot.clone(),
        }));

        Self {
            snapshot,
            registry: Arc::new(registry),
        }
    }

    /// Atomically replaces the exposed metric set with a new cycle's snapshot
    pub fn replace(&self, snapshot: Snapshot) {
        self.snapshot.store(Arc::new(snapshot));
    }

    /// Marks the latest cycle as failed while retaining the previous data
    ///
    /// The last-known-good snapshot stays served, with only the overall
    /// success gauge forced to 0 so scrapers see the failure.
    pub fn mark_cycle_failed(&self) {
        let current = self.snapshot.load_full();
        let mut families: Vec<MetricFamily> = current.families.clone();
        let failed = MetricSample::unlabeled(0.0);

        if let Some(family) = families
            .iter_mut()
            .find(|f| f.name == names::LAST_COLLECTION_SUCCESS)
        {
            family.samples = vec![failed];
        } else {
            families.push(MetricFamily {
                name: names::LAST_COLLECTION_SUCCESS.to_string(),
                help: "Whether the most recent collection cycle succeeded".to_string(),
                kind: MetricKind::Gauge,
                samples: vec![failed],
            });
        }

        self.snapshot.store(Arc::new(Snapshot { families }));
    }

    /// Encodes the current snapshot in the OpenMetrics text format
    ///
    /// Infallible: encoding into a `String` cannot fail, and a failed cycle
    /// still renders the last-known-good snapshot.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buffer = String::new();
        if let Err(e) = encode(&mut buffer, &self.registry) {
            // Unreachable with a String sink, but never panic on the scrape path
            tracing::error!("Failed to encode metrics: {}", e);
        }
        buffer
    }

    /// Current snapshot, for inspection in health checks and tests
    #[must_use]
    pub fn current(&self) -> Arc<Snapshot> {
        self.snapshot.load_full()
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Bridges the swapped snapshot into `prometheus_client` encoding
#[derive(Debug)]
struct SnapshotCollector {
    snapshot: Arc<ArcSwap<Snapshot>>,
}

impl Collector for SnapshotCollector {
    fn encode(&self, mut encoder: DescriptorEncoder) -> Result<(), std::fmt::Error> {
        let snapshot = self.snapshot.load();
        for family in &snapshot.families {
            let metric_type = match family.kind {
                MetricKind::Gauge => MetricType::Gauge,
                MetricKind::Counter => MetricType::Counter,
            };
            let mut family_encoder =
                encoder.encode_descriptor(&family.name, &family.help, None, metric_type)?;

            match family.samples.as_slice() {
                [single] if single.labels.is_empty() => {
                    encode_value(family.kind, single.value, family_encoder)?;
                }
                samples => {
                    for sample in samples {
                        let labeled = family_encoder.encode_family(&sample.labels)?;
                        encode_value(family.kind, sample.value, labeled)?;
                    }
                }
            }
        }
        Ok(())
    }
}

fn encode_value(
    kind: MetricKind,
    value: f64,
    encoder: MetricEncoder<'_>,
) -> Result<(), std::fmt::Error> {
    match kind {
        MetricKind::Gauge => ConstGauge::new(value).encode(encoder),
        MetricKind::Counter => ConstCounter::new(value).encode(encoder),
    }
}
