//! Sagemcom router client module
//!
//! Defines the [`RouterClient`] capability trait the collector depends on and
//! a thin concrete implementation speaking the router's JSON-request API.
//! The collector only ever sees the trait, so the concrete protocol client is
//! swappable (integration tests substitute a scripted double).

mod client;
mod parse;
mod probes;
mod types;

use async_trait::async_trait;

use crate::error::ClientError;

pub use client::SagemcomClient;
pub use types::{
    ConnectionStatus, DeviceLease, PingResult, PortMapping, Protocol, RouterInfo, SpeedtestResult,
    WifiBand, WifiChannel,
};

/// Capability set the collector requires from a router client
///
/// Each method maps to one data domain of a collection cycle. Errors are
/// classified by [`ClientError`] variant; the collector decides whether a
/// failure degrades one domain or the whole cycle.
#[async_trait]
pub trait RouterClient: Send + Sync {
    /// Ensures an authenticated session exists, logging in if necessary
    async fn authenticate(&self) -> Result<(), ClientError>;

    /// Drops the cached session so the next cycle authenticates fresh
    async fn invalidate_session(&self);

    /// Current DHCP lease table
    async fn device_list(&self) -> Result<Vec<DeviceLease>, ClientError>;

    /// Router identity, uptime and reboot count
    async fn router_info(&self) -> Result<RouterInfo, ClientError>;

    /// Channel assignment per WiFi radio
    async fn wifi_info(&self) -> Result<Vec<WifiChannel>, ClientError>;

    /// NAT port-forwarding rules
    async fn port_mappings(&self) -> Result<Vec<PortMapping>, ClientError>;

    /// Bandwidth measurement (expensive, the collector rate-limits it)
    async fn run_speedtest(&self) -> Result<SpeedtestResult, ClientError>;

    /// Latency probe against `target`
    async fn run_ping(&self, target: &str) -> Result<PingResult, ClientError>;

    /// Public IP address as seen from outside the network
    async fn public_ip(&self) -> Result<String, ClientError>;
}
