//! Shared HTTP plumbing for the node and wallet services.

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_ALGOD_SERVER: &str = "http://localhost:4001";
pub const DEFAULT_KMD_SERVER: &str = "http://localhost:4002";

/// API token accepted by a stock local sandbox.
pub const SANDBOX_TOKEN: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

pub const CONTENT_BINARY: &str = "application/x-binary";
pub const CONTENT_MSGPACK: &str = "application/msgpack";

/// Endpoint, credentials and timeouts for one HTTP service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    pub token: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl ClientConfig {
    /// Default request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Default connect timeout in seconds.
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

    pub fn new(endpoint: &str, token: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            token: token.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(Self::DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeouts(mut self, timeout: Duration, connect_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.connect_timeout = connect_timeout;
        self
    }
}

/// A failed call to a remote service.
///
/// `status` is `None` when the request never produced an HTTP response
/// (connection refused, timeout, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcError {
    pub service: &'static str,
    pub path: String,
    pub status: Option<u16>,
    pub message: String,
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(
                f,
                "{} request {} failed with HTTP {}: {}",
                self.service, self.path, code, self.message
            ),
            None => write!(
                f,
                "{} request {} failed: {}",
                self.service, self.path, self.message
            ),
        }
    }
}

impl std::error::Error for RpcError {}

/// Join an endpoint and an API path without doubling slashes.
pub fn api_url(endpoint: &str, path: &str) -> String {
    format!(
        "{}/{}",
        endpoint.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Pull the human-readable message out of an error body.
///
/// Both services answer errors with `{"message": "..."}`; anything else is
/// returned verbatim.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}

/// One authenticated HTTP service (node or wallet).
#[derive(Clone)]
pub(crate) struct HttpService {
    name: &'static str,
    endpoint: String,
    token_header: &'static str,
    token: String,
    agent: ureq::Agent,
}

impl HttpService {
    pub(crate) fn new(name: &'static str, token_header: &'static str, config: &ClientConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .timeout_connect(config.connect_timeout)
            .build();
        Self {
            name,
            endpoint: config.endpoint.clone(),
            token_header,
            token: config.token.clone(),
            agent,
        }
    }

    pub(crate) fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub(crate) fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!(service = self.name, path, "GET");
        let response = self
            .agent
            .get(&api_url(&self.endpoint, path))
            .set(self.token_header, &self.token)
            .call()
            .map_err(|e| self.rpc_error(path, e))?;
        self.read_json(path, response)
    }

    pub(crate) fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        debug!(service = self.name, path, "POST json");
        let response = self
            .agent
            .post(&api_url(&self.endpoint, path))
            .set(self.token_header, &self.token)
            .send_json(body)
            .map_err(|e| self.rpc_error(path, e))?;
        self.read_json(path, response)
    }

    pub(crate) fn post_bytes<T: DeserializeOwned>(
        &self,
        path: &str,
        content_type: &str,
        body: &[u8],
    ) -> Result<T> {
        debug!(service = self.name, path, content_type, len = body.len(), "POST bytes");
        let response = self
            .agent
            .post(&api_url(&self.endpoint, path))
            .set(self.token_header, &self.token)
            .set("Content-Type", content_type)
            .send_bytes(body)
            .map_err(|e| self.rpc_error(path, e))?;
        self.read_json(path, response)
    }

    fn read_json<T: DeserializeOwned>(&self, path: &str, response: ureq::Response) -> Result<T> {
        response.into_json::<T>().map_err(|e| {
            RpcError {
                service: self.name,
                path: path.to_string(),
                status: None,
                message: format!("failed to parse response: {}", e),
            }
            .into()
        })
    }

    fn rpc_error(&self, path: &str, err: ureq::Error) -> anyhow::Error {
        let (status, message) = match err {
            ureq::Error::Status(code, response) => {
                let body = response.into_string().unwrap_or_default();
                (Some(code), error_message(&body))
            }
            ureq::Error::Transport(transport) => (None, transport.to_string()),
        };
        RpcError {
            service: self.name,
            path: path.to_string(),
            status,
            message,
        }
        .into()
    }
}
