//! Typed results for each router data domain

use serde::Deserialize;

/// Connection state of a DHCP client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Online,
    Offline,
}

impl ConnectionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

/// One entry from the router's DHCP lease table
#[derive(Debug, Clone)]
pub struct DeviceLease {
    pub mac_address: String,
    pub hostname: String,
    pub ip_address: String,
    pub status: ConnectionStatus,
    /// Unix timestamp of the last activity reported by the router
    pub last_seen: u64,
}

/// Static router identity and uptime, singleton per cycle
#[derive(Debug, Clone)]
pub struct RouterInfo {
    pub software_version: String,
    pub build_date: String,
    pub model_name: String,
    pub serial_number: String,
    pub mac_address: String,
    pub uptime_seconds: u64,
    pub reboot_count: u64,
}

/// WiFi frequency band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiBand {
    Band2_4GHz,
    Band5GHz,
    Band6GHz,
}

impl WifiBand {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Band2_4GHz => "2.4GHz",
            Self::Band5GHz => "5GHz",
            Self::Band6GHz => "6GHz",
        }
    }
}

/// Channel assignment of one WiFi radio
#[derive(Debug, Clone)]
pub struct WifiChannel {
    pub band: WifiBand,
    pub channel: u32,
    pub width_mhz: u32,
}

/// Transport protocol of a NAT rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
        }
    }
}

/// One NAT port-forwarding rule, keyed by (external_port, protocol)
#[derive(Debug, Clone)]
pub struct PortMapping {
    pub rule_name: String,
    pub internal_port: u16,
    pub external_port: u16,
    pub protocol: Protocol,
    pub enabled: bool,
}

/// Result of a bandwidth measurement
#[derive(Debug, Clone)]
pub struct SpeedtestResult {
    pub download_mbps: f64,
    pub upload_mbps: f64,
    /// Unix timestamp of the measurement
    pub measured_at: u64,
}

/// Result of a latency probe
#[derive(Debug, Clone)]
pub struct PingResult {
    pub target: String,
    pub latency_ms: f64,
    pub success: bool,
}
