//! Snapshot data model for exported metrics
//!
//! A [`Snapshot`] is the immutable product of one collection cycle: families
//! of samples, swapped into the registry as a whole. Samples are plain data,
//! so a snapshot can never be observed half-written.

/// Kind of a metric instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Counter,
}

/// A single sample: one label set, one value
#[derive(Debug, Clone)]
pub struct MetricSample {
    pub labels: Vec<(String, String)>,
    pub value: f64,
}

impl MetricSample {
    #[must_use]
    pub fn unlabeled(value: f64) -> Self {
        Self {
            labels: Vec::new(),
            value,
        }
    }

    #[must_use]
    pub fn with_labels(labels: Vec<(String, String)>, value: f64) -> Self {
        Self { labels, value }
    }
}

/// All samples of one metric name
#[derive(Debug, Clone)]
pub struct MetricFamily {
    pub name: String,
    pub help: String,
    pub kind: MetricKind,
    pub samples: Vec<MetricSample>,
}

/// Immutable point-in-time metric set from one completed cycle
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub families: Vec<MetricFamily>,
}

impl Snapshot {
    #[must_use]
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::default()
    }

    /// Looks up a family by name
    #[must_use]
    pub fn family(&self, name: &str) -> Option<&MetricFamily> {
        self.families.iter().find(|f| f.name == name)
    }
}

/// Accumulates families for one cycle, keeping one sample per series
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    families: Vec<MetricFamily>,
}

impl SnapshotBuilder {
    pub fn gauge(&mut self, name: &str, help: &str) -> &mut MetricFamily {
        self.push_family(name, help, MetricKind::Gauge)
    }

    pub fn counter(&mut self, name: &str, help: &str) -> &mut MetricFamily {
        self.push_family(name, help, MetricKind::Counter)
    }

    fn push_family(&mut self, name: &str, help: &str, kind: MetricKind) -> &mut MetricFamily {
        if let Some(pos) = self.families.iter().position(|f| f.name == name) {
            return &mut self.families[pos];
        }
        self.families.push(MetricFamily {
            name: name.to_string(),
            help: help.to_string(),
            kind,
            samples: Vec::new(),
        });
        self.families
            .last_mut()
            .unwrap_or_else(|| unreachable!("family was just pushed"))
    }

    #[must_use]
    pub fn build(self) -> Snapshot {
        Snapshot {
            families: self.families,
        }
    }
}

impl MetricFamily {
    /// Appends a sample, dropping duplicates of an already-present series
    pub fn sample(&mut self, sample: MetricSample) -> &mut Self {
        let duplicate = self.samples.iter().any(|s| s.labels == sample.labels);
        if duplicate {
            tracing::warn!(
                "Dropping duplicate series for metric {} (labels {:?})",
                self.name,
                sample.labels
            );
            return self;
        }
        self.samples.push(sample);
        self
    }

    pub fn set(&mut self, value: f64) -> &mut Self {
        self.sample(MetricSample::unlabeled(value))
    }

    pub fn set_labeled(&mut self, labels: Vec<(String, String)>, value: f64) -> &mut Self {
        self.sample(MetricSample::with_labels(labels, value))
    }
}

/// Builds an owned label vector from string pairs
#[must_use]
pub fn labels(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}
