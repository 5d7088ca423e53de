//! Conversion of one cycle's typed results into metric families

use std::time::Duration;

use crate::metrics::{Snapshot, labels, names};
use crate::sagemcom::ConnectionStatus;

use super::{CycleData, Domain};

/// Builds the complete snapshot for one successful cycle
///
/// Every domain contributes its families only when its fetch succeeded;
/// `sagemcom_domain_up` records the per-domain outcome either way.
pub(super) fn build(
    data: &CycleData,
    duration: Duration,
    cycles_total: u64,
    skipped_ticks: u64,
) -> Snapshot {
    let mut builder = Snapshot::builder();

    if let Some(devices) = &data.devices {
        let online = devices
            .iter()
            .filter(|d| d.status == ConnectionStatus::Online)
            .count();
        let offline = devices.len() - online;

        #[allow(clippy::cast_precision_loss)]
        builder
            .gauge(names::CONNECTED_DEVICES, "DHCP clients by connection status")
            .set_labeled(labels(&[("status", "online")]), online as f64)
            .set_labeled(labels(&[("status", "offline")]), offline as f64);

        let active = builder.gauge(
            names::DEVICE_ACTIVE,
            "Per-device connection status (1=online, 0=offline)",
        );
        for device in devices {
            let value = if device.status == ConnectionStatus::Online {
                1.0
            } else {
                0.0
            };
            active.set_labeled(
                labels(&[
                    ("mac_address", &device.mac_address),
                    ("hostname", &device.hostname),
                    ("ip_address", &device.ip_address),
                ]),
                value,
            );
        }

        let last_seen = builder.gauge(
            names::DEVICE_LAST_SEEN,
            "Unix timestamp a device was last seen by the router",
        );
        for device in devices {
            #[allow(clippy::cast_precision_loss)]
            last_seen.set_labeled(
                labels(&[("mac_address", &device.mac_address)]),
                device.last_seen as f64,
            );
        }
    }

    if let Some(info) = &data.router_info {
        #[allow(clippy::cast_precision_loss)]
        builder
            .gauge(names::ROUTER_UPTIME, "Router uptime in seconds")
            .set(info.uptime_seconds as f64);
        #[allow(clippy::cast_precision_loss)]
        builder
            .gauge(names::ROUTER_REBOOTS, "Number of router reboots")
            .set(info.reboot_count as f64);
        builder
            .gauge(names::ROUTER_INFO, "Static router identity (value=1)")
            .set_labeled(
                labels(&[
                    ("software_version", &info.software_version),
                    ("build", &info.build_date),
                    ("model", &info.model_name),
                    ("serial", &info.serial_number),
                    ("mac", &info.mac_address),
                ]),
                1.0,
            );
    }

    if let Some(radios) = &data.wifi {
        let channel = builder.gauge(names::WIFI_CHANNEL, "Current channel per WiFi band");
        for radio in radios {
            channel.set_labeled(
                labels(&[("band", radio.band.as_str())]),
                f64::from(radio.channel),
            );
        }
        let width = builder.gauge(
            names::WIFI_CHANNEL_WIDTH,
            "Channel bandwidth in MHz per WiFi band",
        );
        for radio in radios {
            width.set_labeled(
                labels(&[("band", radio.band.as_str())]),
                f64::from(radio.width_mhz),
            );
        }
    }

    if let Some(mappings) = &data.port_mappings {
        let enabled = builder.gauge(
            names::PORT_MAPPING_ENABLED,
            "NAT port-forwarding rule state (1=enabled, 0=disabled)",
        );
        for mapping in mappings {
            enabled.set_labeled(
                labels(&[
                    ("rule", &mapping.rule_name),
                    ("protocol", mapping.protocol.as_str()),
                    ("external_port", &mapping.external_port.to_string()),
                    ("internal_port", &mapping.internal_port.to_string()),
                ]),
                if mapping.enabled { 1.0 } else { 0.0 },
            );
        }
    }

    if let Some(speedtest) = &data.speedtest {
        builder
            .gauge(names::SPEEDTEST_DOWNLOAD, "Download speed in Mbps")
            .set(speedtest.download_mbps);
        builder
            .gauge(names::SPEEDTEST_UPLOAD, "Upload speed in Mbps")
            .set(speedtest.upload_mbps);
        #[allow(clippy::cast_precision_loss)]
        builder
            .gauge(
                names::SPEEDTEST_TIMESTAMP,
                "Unix timestamp of the last speedtest",
            )
            .set(speedtest.measured_at as f64);
    }

    if let Some(ping) = &data.ping {
        builder
            .gauge(names::PING_LATENCY, "Latency probe round trip in ms")
            .set_labeled(labels(&[("target", &ping.target)]), ping.latency_ms);
        builder
            .gauge(names::PING_SUCCESS, "Latency probe outcome (1=reply)")
            .set_labeled(
                labels(&[("target", &ping.target)]),
                if ping.success { 1.0 } else { 0.0 },
            );
    }

    if let Some(address) = &data.public_ip {
        builder
            .gauge(names::PUBLIC_IP_INFO, "Current public IP (value=1)")
            .set_labeled(labels(&[("address", address)]), 1.0);
    }

    let domain_up = builder.gauge(
        names::DOMAIN_UP,
        "Whether the last fetch of a data domain succeeded",
    );
    for (domain, up) in data.domain_outcomes() {
        domain_up.set_labeled(
            labels(&[("domain", domain.as_str())]),
            if up { 1.0 } else { 0.0 },
        );
    }

    builder
        .gauge(
            names::LAST_COLLECTION_SUCCESS,
            "Whether the most recent collection cycle succeeded",
        )
        .set(1.0);
    builder
        .gauge(
            names::COLLECTION_DURATION,
            "Duration of the last collection cycle in seconds",
        )
        .set(duration.as_secs_f64());
    #[allow(clippy::cast_precision_loss)]
    builder
        .counter(names::COLLECTION_CYCLES, "Completed collection cycles")
        .set(cycles_total as f64);
    #[allow(clippy::cast_precision_loss)]
    builder
        .counter(
            names::SKIPPED_TICKS,
            "Scheduler ticks skipped because a cycle was still running",
        )
        .set(skipped_ticks as f64);
    builder
        .gauge(names::EXPORTER_INFO, "Exporter build info (value=1)")
        .set_labeled(labels(&[("version", env!("CARGO_PKG_VERSION"))]), 1.0);

    builder.build()
}

impl CycleData {
    /// Per-domain success flags for the degraded-domain gauge
    fn domain_outcomes(&self) -> [(Domain, bool); 7] {
        [
            (Domain::Devices, self.devices.is_some()),
            (Domain::RouterInfo, self.router_info.is_some()),
            (Domain::Wifi, self.wifi.is_some()),
            (Domain::PortMappings, self.port_mappings.is_some()),
            (Domain::Speedtest, self.speedtest.is_some()),
            (Domain::Ping, self.ping.is_some()),
            (Domain::PublicIp, self.public_ip.is_some()),
        ]
    }
}
