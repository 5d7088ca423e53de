//! # Sagemcom Exporter
//!
//! Prometheus exporter for Sagemcom residential gateways.
//!
//! Periodically polls the router's management API for operational state
//! (DHCP leases, router info, WiFi channels, port forwards) plus host-side
//! probes (speedtest, latency, public IP) and serves the result on a
//! `/metrics` endpoint. Collection and serving are decoupled through an
//! atomically swapped metric snapshot, so a slow or hung router never makes
//! scrapes slow or hang.
//!
//! ## Main modules
//! - `api`: HTTP API handlers
//! - `collector`: collection cycles and scheduling
//! - `config`: configuration management
//! - `error`: error types
//! - `metrics`: snapshot model and registry
//! - `sagemcom`: router client trait and concrete implementation
//! - `prelude`: commonly used types and traits

mod api;
mod collector;
mod config;
mod error;
mod metrics;
mod sagemcom;
pub mod prelude;

// Re-export commonly used types
/// Application configuration
pub use config::Config;

/// Application errors and result type
pub use error::{AppError, ClientError, Result};

/// HTTP API router and state
pub use api::{AppState, create_router};

/// Collection cycle driver and scheduling loop
pub use collector::{Collector, Domain, start_collection_loop};

/// Metrics snapshot model and registry
pub use metrics::{MetricsRegistry, Snapshot, names};

/// Router client trait, concrete client and domain types
pub use sagemcom::{
    ConnectionStatus, DeviceLease, PingResult, PortMapping, Protocol, RouterClient, RouterInfo,
    SagemcomClient, SpeedtestResult, WifiBand, WifiChannel,
};
