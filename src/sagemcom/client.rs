//! Thin client for the Sagemcom JSON-request management API
//!
//! Implements only the slice of the protocol the exporter needs: a login with
//! an MD5 credential digest and xpath value reads with a cached session.
//! Everything else about the vendor protocol stays out of scope; the
//! collector depends on the [`RouterClient`] trait, not on this type.

use std::time::Duration;

use serde_json::{Value, json};
use tokio::sync::Mutex;

use super::parse;
use super::probes;
use super::types::{
    DeviceLease, PingResult, PortMapping, RouterInfo, SpeedtestResult, WifiChannel,
};
use super::RouterClient;
use crate::config::Config;
use crate::error::ClientError;

const API_PATH: &str = "/cgi/json-req";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const XPATH_HOSTS: &str = "Device/Hosts/Hosts";
const XPATH_DEVICE_INFO: &str = "Device/DeviceInfo";
const XPATH_WIFI_RADIOS: &str = "Device/WiFi/Radios";
const XPATH_PORT_MAPPINGS: &str = "Device/NAT/PortMappings";

/// Reply codes the router uses for session problems
const AUTH_ERRORS: &[&str] = &[
    "XMO_AUTHENTICATION_ERR",
    "XMO_SESSION_EXPIRED_ERR",
    "XMO_MAX_SESSION_COUNT_ERR",
];

#[derive(Debug, Clone)]
struct Session {
    id: u64,
    nonce: String,
    request_id: u64,
}

/// Concrete [`RouterClient`] for Sagemcom gateways
pub struct SagemcomClient {
    base_url: String,
    username: String,
    password_digest: String,
    http: reqwest::Client,
    session: Mutex<Option<Session>>,
}

impl SagemcomClient {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: format!("http://{}{}", config.router_host, API_PATH),
            username: config.router_username.clone(),
            password_digest: md5_hex(config.router_password.as_bytes()),
            http: reqwest::Client::new(),
            session: Mutex::new(None),
        }
    }

    /// Logs in and stores the session
    async fn login(&self) -> Result<(), ClientError> {
        let nonce = String::new();
        let credential = self.credential_hash(&nonce);
        let request = json!({
            "request": {
                "id": 0,
                "session-id": 0,
                "priority": true,
                "actions": [{
                    "id": 0,
                    "method": "logIn",
                    "parameters": {
                        "user": self.username,
                        "persistent": "true",
                        "session-options": {
                            "nss": [{"name": "gtw", "uri": "http://sagemcom.com/gateway-data"}],
                            "language": "ident",
                            "context-flags": {"get-content-name": true, "local-time": true},
                            "capability-flags": {"interface": true},
                        }
                    }
                }],
                "cnonce": 0,
                "auth-key": auth_key(&credential, 0, &nonce),
            }
        });

        let reply = self.post(&request).await?;
        let session_id = reply
            .pointer("/reply/actions/0/callbacks/0/parameters/id")
            .and_then(Value::as_u64)
            .ok_or_else(|| ClientError::Auth("login reply carried no session id".to_string()))?;
        let nonce = reply
            .pointer("/reply/actions/0/callbacks/0/parameters/nonce")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let mut session = self.session.lock().await;
        *session = Some(Session {
            id: session_id,
            nonce,
            request_id: 0,
        });
        tracing::debug!("Logged in to router, session {}", session_id);
        Ok(())
    }

    /// Reads one value by xpath within the current session
    async fn get_value(&self, xpath: &str) -> Result<Value, ClientError> {
        let (session_id, nonce, request_id) = {
            let mut session = self.session.lock().await;
            let session = session
                .as_mut()
                .ok_or_else(|| ClientError::Auth("no active session".to_string()))?;
            session.request_id += 1;
            (session.id, session.nonce.clone(), session.request_id)
        };

        let credential = self.credential_hash(&nonce);
        let request = json!({
            "request": {
                "id": request_id,
                "session-id": session_id,
                "priority": false,
                "actions": [{
                    "id": 0,
                    "method": "getValue",
                    "xpath": xpath,
                }],
                "cnonce": 0,
                "auth-key": auth_key(&credential, request_id, &nonce),
            }
        });

        let reply = self.post(&request).await?;
        check_reply(&reply)?;
        reply
            .pointer("/reply/actions/0/callbacks/0/parameters/value")
            .cloned()
            .ok_or_else(|| ClientError::Fetch(format!("no value in reply for xpath {xpath}")))
    }

    async fn post(&self, request: &Value) -> Result<Value, ClientError> {
        let response = self
            .http
            .post(&self.base_url)
            .timeout(REQUEST_TIMEOUT)
            .form(&[("req", request.to_string())])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    fn credential_hash(&self, nonce: &str) -> String {
        md5_hex(format!("{}:{}:{}", self.username, nonce, self.password_digest).as_bytes())
    }
}

fn md5_hex(data: &[u8]) -> String {
    hex::encode(md5::compute(data).0)
}

fn auth_key(credential: &str, request_id: u64, nonce: &str) -> String {
    md5_hex(format!("{credential}:{request_id}:{nonce}:JSON:{API_PATH}").as_bytes())
}

/// Maps router error descriptions onto the error taxonomy
fn check_reply(reply: &Value) -> Result<(), ClientError> {
    let description = reply
        .pointer("/reply/error/description")
        .and_then(Value::as_str)
        .unwrap_or("XMO_REQUEST_NO_ERR");

    if description == "XMO_REQUEST_NO_ERR" || description == "Ok" {
        return Ok(());
    }
    if AUTH_ERRORS.contains(&description) {
        return Err(ClientError::Auth(description.to_string()));
    }
    Err(ClientError::Fetch(description.to_string()))
}

#[async_trait::async_trait]
impl RouterClient for SagemcomClient {
    async fn authenticate(&self) -> Result<(), ClientError> {
        if self.session.lock().await.is_some() {
            return Ok(());
        }
        self.login().await
    }

    async fn invalidate_session(&self) {
        let mut session = self.session.lock().await;
        if session.take().is_some() {
            tracing::debug!("Router session invalidated");
        }
    }

    async fn device_list(&self) -> Result<Vec<DeviceLease>, ClientError> {
        let value = self.get_value(XPATH_HOSTS).await?;
        parse::parse_hosts(value, probes::unix_now())
    }

    async fn router_info(&self) -> Result<RouterInfo, ClientError> {
        let value = self.get_value(XPATH_DEVICE_INFO).await?;
        parse::parse_device_info(value)
    }

    async fn wifi_info(&self) -> Result<Vec<WifiChannel>, ClientError> {
        let value = self.get_value(XPATH_WIFI_RADIOS).await?;
        parse::parse_wifi_radios(value)
    }

    async fn port_mappings(&self) -> Result<Vec<PortMapping>, ClientError> {
        let value = self.get_value(XPATH_PORT_MAPPINGS).await?;
        parse::parse_port_mappings(value)
    }

    async fn run_speedtest(&self) -> Result<SpeedtestResult, ClientError> {
        probes::http_speedtest(&self.http).await
    }

    async fn run_ping(&self, target: &str) -> Result<PingResult, ClientError> {
        Ok(probes::tcp_ping(target).await)
    }

    async fn public_ip(&self) -> Result<String, ClientError> {
        probes::fetch_public_ip(&self.http).await
    }
}
