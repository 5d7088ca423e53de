//! Prelude module for convenient imports
//!
//! Re-exports commonly used types and traits:
//!
//! ```rust
//! use sagemcom_exporter::prelude::*;
//! ```

// Core types
pub use crate::config::Config;
pub use crate::error::{AppError, ClientError, Result};

// Metrics types
pub use crate::metrics::{MetricFamily, MetricKind, MetricSample, MetricsRegistry, Snapshot};

// Router client
pub use crate::sagemcom::{
    ConnectionStatus, DeviceLease, PingResult, PortMapping, Protocol, RouterClient, RouterInfo,
    SagemcomClient, SpeedtestResult, WifiBand, WifiChannel,
};

// Collection
pub use crate::collector::{Collector, Domain, start_collection_loop};
