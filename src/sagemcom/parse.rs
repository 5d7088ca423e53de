//! Parsing of JSON-request reply payloads into typed domain results

use serde::Deserialize;
use serde_json::Value;

use super::types::{
    ConnectionStatus, DeviceLease, PortMapping, Protocol, RouterInfo, WifiBand, WifiChannel,
};
use crate::error::ClientError;

/// Host entry as the router reports it
///
/// Firmware revisions disagree on key style, hence the aliases.
#[derive(Debug, Deserialize)]
struct RawHost {
    #[serde(alias = "PhysAddress", alias = "phys_address", default)]
    phys_address: String,
    #[serde(alias = "HostName", alias = "host_name", default)]
    host_name: String,
    #[serde(alias = "IPAddress", alias = "ip_address", default)]
    ip_address: String,
    #[serde(alias = "Active", alias = "active", default)]
    active: bool,
    #[serde(alias = "LeaseStart", alias = "lease_start", default)]
    lease_start: u64,
}

#[derive(Debug, Deserialize)]
struct RawDeviceInfo {
    #[serde(alias = "SoftwareVersion", alias = "software_version", default)]
    software_version: String,
    #[serde(alias = "BuildDate", alias = "build_date", default)]
    build_date: String,
    #[serde(alias = "ModelName", alias = "model_name", default)]
    model_name: String,
    #[serde(alias = "SerialNumber", alias = "serial_number", default)]
    serial_number: String,
    #[serde(alias = "MacAddress", alias = "mac_address", default)]
    mac_address: String,
    #[serde(alias = "UpTime", alias = "up_time", default)]
    up_time: u64,
    #[serde(alias = "RebootCount", alias = "reboot_count", default)]
    reboot_count: u64,
}

#[derive(Debug, Deserialize)]
struct RawRadio {
    #[serde(
        alias = "OperatingFrequencyBand",
        alias = "operating_frequency_band",
        default
    )]
    band: String,
    #[serde(alias = "Channel", alias = "channel", default)]
    channel: u32,
    #[serde(
        alias = "CurrentOperatingChannelBandwidth",
        alias = "channel_bandwidth",
        default
    )]
    bandwidth: String,
}

#[derive(Debug, Deserialize)]
struct RawPortMapping {
    #[serde(alias = "Description", alias = "description", default)]
    description: String,
    #[serde(alias = "InternalPort", alias = "internal_port", default)]
    internal_port: u16,
    #[serde(alias = "ExternalPort", alias = "external_port", default)]
    external_port: u16,
    #[serde(alias = "Protocol", alias = "protocol", default)]
    protocol: String,
    #[serde(alias = "Enable", alias = "enabled", default)]
    enabled: bool,
}

fn fetch_err(context: &str, err: impl std::fmt::Display) -> ClientError {
    ClientError::Fetch(format!("{context}: {err}"))
}

/// Parses the DHCP lease table
///
/// `now` is the collection timestamp; an active host is considered seen now,
/// an inactive one at its lease start.
pub fn parse_hosts(value: Value, now: u64) -> Result<Vec<DeviceLease>, ClientError> {
    let raw: Vec<RawHost> =
        serde_json::from_value(value).map_err(|e| fetch_err("host table", e))?;

    Ok(raw
        .into_iter()
        .map(|h| DeviceLease {
            mac_address: h.phys_address,
            hostname: h.host_name,
            ip_address: h.ip_address,
            status: if h.active {
                ConnectionStatus::Online
            } else {
                ConnectionStatus::Offline
            },
            last_seen: if h.active { now } else { h.lease_start },
        })
        .collect())
}

pub fn parse_device_info(value: Value) -> Result<RouterInfo, ClientError> {
    let raw: RawDeviceInfo =
        serde_json::from_value(value).map_err(|e| fetch_err("device info", e))?;

    Ok(RouterInfo {
        software_version: raw.software_version,
        build_date: raw.build_date,
        model_name: raw.model_name,
        serial_number: raw.serial_number,
        mac_address: raw.mac_address,
        uptime_seconds: raw.up_time,
        reboot_count: raw.reboot_count,
    })
}

pub fn parse_wifi_radios(value: Value) -> Result<Vec<WifiChannel>, ClientError> {
    let raw: Vec<RawRadio> =
        serde_json::from_value(value).map_err(|e| fetch_err("wifi radios", e))?;

    Ok(raw
        .into_iter()
        .map(|r| WifiChannel {
            band: parse_band(&r.band),
            channel: r.channel,
            width_mhz: parse_bandwidth_mhz(&r.bandwidth),
        })
        .collect())
}

pub fn parse_port_mappings(value: Value) -> Result<Vec<PortMapping>, ClientError> {
    let raw: Vec<RawPortMapping> =
        serde_json::from_value(value).map_err(|e| fetch_err("port mappings", e))?;

    Ok(raw
        .into_iter()
        .map(|m| PortMapping {
            rule_name: m.description,
            internal_port: m.internal_port,
            external_port: m.external_port,
            protocol: if m.protocol.eq_ignore_ascii_case("udp") {
                Protocol::Udp
            } else {
                Protocol::Tcp
            },
            enabled: m.enabled,
        })
        .collect())
}

fn parse_band(raw: &str) -> WifiBand {
    if raw.starts_with('5') {
        WifiBand::Band5GHz
    } else if raw.starts_with('6') {
        WifiBand::Band6GHz
    } else {
        WifiBand::Band2_4GHz
    }
}

/// Extracts the numeric part of a bandwidth string like "80MHz"
fn parse_bandwidth_mhz(raw: &str) -> u32 {
    raw.trim_end_matches(|c: char| !c.is_ascii_digit())
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}
