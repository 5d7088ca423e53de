//! Scripted [`RouterClient`] double for collector and scheduler tests

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::ClientError;
use crate::sagemcom::{
    ConnectionStatus, DeviceLease, PingResult, PortMapping, Protocol, RouterClient, RouterInfo,
    SpeedtestResult, WifiBand, WifiChannel,
};

#[derive(Clone, Copy)]
enum AuthScript {
    Succeed,
    Reject,
    Unreachable,
}

/// Programmable client covering the collector's failure scenarios
pub(crate) struct ScriptedClient {
    auth: AuthScript,
    wifi_fails: bool,
    port_mappings_expire: bool,
    cycle_delay: Duration,
    authenticate_calls: AtomicUsize,
    device_list_calls: AtomicUsize,
    speedtest_calls: AtomicUsize,
    invalidated: AtomicBool,
    cycle_starts: Mutex<Vec<tokio::time::Instant>>,
}

impl ScriptedClient {
    pub fn healthy() -> Self {
        Self {
            auth: AuthScript::Succeed,
            wifi_fails: false,
            port_mappings_expire: false,
            cycle_delay: Duration::ZERO,
            authenticate_calls: AtomicUsize::new(0),
            device_list_calls: AtomicUsize::new(0),
            speedtest_calls: AtomicUsize::new(0),
            invalidated: AtomicBool::new(false),
            cycle_starts: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            auth: AuthScript::Unreachable,
            ..Self::healthy()
        }
    }

    pub fn with_auth_failure(mut self) -> Self {
        self.auth = AuthScript::Reject;
        self
    }

    pub fn with_wifi_fetch_error(mut self) -> Self {
        self.wifi_fails = true;
        self
    }

    pub fn with_session_expiry_on_port_mappings(mut self) -> Self {
        self.port_mappings_expire = true;
        self
    }

    /// Makes every cycle take `delay` (spent inside `authenticate`)
    pub fn with_cycle_delay(mut self, delay: Duration) -> Self {
        self.cycle_delay = delay;
        self
    }

    pub fn authenticate_calls(&self) -> usize {
        self.authenticate_calls.load(Ordering::Relaxed)
    }

    pub fn device_list_calls(&self) -> usize {
        self.device_list_calls.load(Ordering::Relaxed)
    }

    pub fn speedtest_calls(&self) -> usize {
        self.speedtest_calls.load(Ordering::Relaxed)
    }

    pub fn session_invalidated(&self) -> bool {
        self.invalidated.load(Ordering::Relaxed)
    }

    /// Start instants of each cycle, for drift assertions
    pub fn cycle_starts(&self) -> Vec<tokio::time::Instant> {
        self.cycle_starts.lock().expect("lock poisoned").clone()
    }
}

pub(crate) fn test_config() -> Config {
    Config {
        router_host: "10.0.0.1".to_string(),
        router_username: "admin".to_string(),
        router_password: "secret".to_string(),
        collection_interval_secs: 300,
        server_port: 8000,
        speedtest_interval_secs: 3600,
        ping_target: "example.com".to_string(),
    }
}

fn lease(mac: &str, hostname: &str, ip: &str, status: ConnectionStatus) -> DeviceLease {
    DeviceLease {
        mac_address: mac.to_string(),
        hostname: hostname.to_string(),
        ip_address: ip.to_string(),
        status,
        last_seen: 1_700_000_000,
    }
}

#[async_trait]
impl RouterClient for ScriptedClient {
    async fn authenticate(&self) -> Result<(), ClientError> {
        self.authenticate_calls.fetch_add(1, Ordering::Relaxed);
        self.cycle_starts
            .lock()
            .expect("lock poisoned")
            .push(tokio::time::Instant::now());
        if !self.cycle_delay.is_zero() {
            tokio::time::sleep(self.cycle_delay).await;
        }
        match self.auth {
            AuthScript::Succeed => Ok(()),
            AuthScript::Reject => Err(ClientError::Auth("invalid credentials".to_string())),
            AuthScript::Unreachable => {
                Err(ClientError::Transport("connection refused".to_string()))
            }
        }
    }

    async fn invalidate_session(&self) {
        self.invalidated.store(true, Ordering::Relaxed);
    }

    async fn device_list(&self) -> Result<Vec<DeviceLease>, ClientError> {
        self.device_list_calls.fetch_add(1, Ordering::Relaxed);
        Ok(vec![
            lease(
                "AA:BB:CC:DD:EE:01",
                "laptop",
                "10.0.0.10",
                ConnectionStatus::Online,
            ),
            lease(
                "AA:BB:CC:DD:EE:02",
                "phone",
                "10.0.0.11",
                ConnectionStatus::Online,
            ),
            lease(
                "AA:BB:CC:DD:EE:03",
                "printer",
                "10.0.0.12",
                ConnectionStatus::Offline,
            ),
        ])
    }

    async fn router_info(&self) -> Result<RouterInfo, ClientError> {
        Ok(RouterInfo {
            software_version: "SGFB.10.57".to_string(),
            build_date: "2024-01-15".to_string(),
            model_name: "F@st 3896".to_string(),
            serial_number: "SN42".to_string(),
            mac_address: "00:11:22:33:44:55".to_string(),
            uptime_seconds: 86_400,
            reboot_count: 3,
        })
    }

    async fn wifi_info(&self) -> Result<Vec<WifiChannel>, ClientError> {
        if self.wifi_fails {
            return Err(ClientError::Fetch("radio table unavailable".to_string()));
        }
        Ok(vec![
            WifiChannel {
                band: WifiBand::Band2_4GHz,
                channel: 6,
                width_mhz: 20,
            },
            WifiChannel {
                band: WifiBand::Band5GHz,
                channel: 36,
                width_mhz: 80,
            },
        ])
    }

    async fn port_mappings(&self) -> Result<Vec<PortMapping>, ClientError> {
        if self.port_mappings_expire {
            return Err(ClientError::Auth("session expired".to_string()));
        }
        Ok(vec![
            PortMapping {
                rule_name: "ssh".to_string(),
                internal_port: 22,
                external_port: 2222,
                protocol: Protocol::Tcp,
                enabled: true,
            },
            PortMapping {
                rule_name: "game".to_string(),
                internal_port: 27_015,
                external_port: 27_015,
                protocol: Protocol::Udp,
                enabled: false,
            },
        ])
    }

    async fn run_speedtest(&self) -> Result<SpeedtestResult, ClientError> {
        self.speedtest_calls.fetch_add(1, Ordering::Relaxed);
        Ok(SpeedtestResult {
            download_mbps: 50.0,
            upload_mbps: 10.0,
            measured_at: 1_700_000_000,
        })
    }

    async fn run_ping(&self, target: &str) -> Result<PingResult, ClientError> {
        Ok(PingResult {
            target: target.to_string(),
            latency_ms: 12.5,
            success: true,
        })
    }

    async fn public_ip(&self) -> Result<String, ClientError> {
        Ok("203.0.113.7".to_string())
    }
}
