//! Exported metric names
//!
//! Counter names are registered without the `_total` suffix; the encoder
//! appends it.

pub const ROUTER_UPTIME: &str = "sagemcom_router_uptime_seconds";
pub const ROUTER_REBOOTS: &str = "sagemcom_router_reboot_count";
pub const ROUTER_INFO: &str = "sagemcom_router_info";

pub const CONNECTED_DEVICES: &str = "sagemcom_connected_devices";
pub const DEVICE_ACTIVE: &str = "sagemcom_device_active";
pub const DEVICE_LAST_SEEN: &str = "sagemcom_device_last_seen_timestamp_seconds";

pub const WIFI_CHANNEL: &str = "sagemcom_wifi_channel";
pub const WIFI_CHANNEL_WIDTH: &str = "sagemcom_wifi_channel_width_mhz";

pub const PORT_MAPPING_ENABLED: &str = "sagemcom_port_mapping_enabled";

pub const SPEEDTEST_DOWNLOAD: &str = "sagemcom_speedtest_download_mbps";
pub const SPEEDTEST_UPLOAD: &str = "sagemcom_speedtest_upload_mbps";
pub const SPEEDTEST_TIMESTAMP: &str = "sagemcom_speedtest_timestamp_seconds";

pub const PING_LATENCY: &str = "sagemcom_ping_latency_milliseconds";
pub const PING_SUCCESS: &str = "sagemcom_ping_success";

pub const PUBLIC_IP_INFO: &str = "sagemcom_public_ip_info";

pub const DOMAIN_UP: &str = "sagemcom_domain_up";
pub const LAST_COLLECTION_SUCCESS: &str = "sagemcom_last_collection_success";
pub const COLLECTION_DURATION: &str = "sagemcom_collection_duration_seconds";
pub const COLLECTION_CYCLES: &str = "sagemcom_collection_cycles";
pub const SKIPPED_TICKS: &str = "sagemcom_scheduler_skipped_ticks";
pub const EXPORTER_INFO: &str = "sagemcom_exporter_info";
