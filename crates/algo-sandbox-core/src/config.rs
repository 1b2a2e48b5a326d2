//! Harness configuration.
//!
//! [`HarnessConfig`] collects every knob a scenario needs: where the node and
//! wallet service live, which wallet holds the funded keys, where dry-run
//! files are written and how long to wait for confirmation.
//!
//! # Example
//!
//! ```rust,ignore
//! use algo_sandbox_core::config::HarnessConfig;
//!
//! // Stock local sandbox, with environment overrides applied
//! let config = HarnessConfig::from_env()
//!     .with_dryrun_dir("target/dryruns")
//!     .with_confirmation_rounds(5);
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use algo_sandbox_types::env_utils::{env_string_or, env_var};
use algo_sandbox_types::StateSchema;
use algo_transport::network::{DEFAULT_ALGOD_SERVER, DEFAULT_KMD_SERVER, SANDBOX_TOKEN};
use algo_transport::ClientConfig;

// =============================================================================
// Default Configuration Constants
// =============================================================================

/// Wallet that a fresh sandbox creates with its genesis accounts.
pub const DEFAULT_WALLET_NAME: &str = "unencrypted-default-wallet";

pub const DEFAULT_DRYRUN_DIR: &str = "./dryruns";

/// Rounds to wait for a submitted transaction before giving up.
pub const DEFAULT_CONFIRMATION_ROUNDS: u64 = 3;

/// Amount (microalgos) sent from the funder to a fresh account.
pub const DEFAULT_FUNDING_AMOUNT: u64 = 10_000_000;

pub const DEFAULT_APPROVAL_PATH: &str = "approval.teal";
pub const DEFAULT_CLEAR_PATH: &str = "clear.teal";

/// Endpoint and API token of one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    pub server: String,
    pub token: String,
}

/// Storage an application reserves at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppSchema {
    pub global_ints: u64,
    pub global_bytes: u64,
    pub local_ints: u64,
    pub local_bytes: u64,
}

impl AppSchema {
    pub fn global(&self) -> StateSchema {
        StateSchema::new(self.global_ints, self.global_bytes)
    }

    pub fn local(&self) -> StateSchema {
        StateSchema::new(self.local_ints, self.local_bytes)
    }
}

/// Everything a scenario needs to reach the sandbox and run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub algod: ServiceEndpoint,
    pub kmd: ServiceEndpoint,

    /// Wallet holding the pre-funded keys.
    pub wallet_name: String,
    pub wallet_password: String,

    /// Directory that receives `<label>.dr` files (created on demand).
    pub dryrun_dir: PathBuf,

    pub confirmation_rounds: u64,
    pub funding_amount: u64,

    pub app_schema: AppSchema,
    pub approval_path: PathBuf,
    pub clear_path: PathBuf,

    /// Request timeout for both services.
    pub http_timeout_secs: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            algod: ServiceEndpoint {
                server: DEFAULT_ALGOD_SERVER.to_string(),
                token: SANDBOX_TOKEN.to_string(),
            },
            kmd: ServiceEndpoint {
                server: DEFAULT_KMD_SERVER.to_string(),
                token: SANDBOX_TOKEN.to_string(),
            },
            wallet_name: DEFAULT_WALLET_NAME.to_string(),
            wallet_password: String::new(),
            dryrun_dir: PathBuf::from(DEFAULT_DRYRUN_DIR),
            confirmation_rounds: DEFAULT_CONFIRMATION_ROUNDS,
            funding_amount: DEFAULT_FUNDING_AMOUNT,
            app_schema: AppSchema::default(),
            approval_path: PathBuf::from(DEFAULT_APPROVAL_PATH),
            clear_path: PathBuf::from(DEFAULT_CLEAR_PATH),
            http_timeout_secs: ClientConfig::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl HarnessConfig {
    /// Defaults with environment overrides applied.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `ALGOD_SERVER` / `ALGOD_TOKEN` | node endpoint |
    /// | `KMD_SERVER` / `KMD_TOKEN` | wallet service endpoint |
    /// | `KMD_WALLET` / `KMD_PASSWORD` | funded wallet |
    /// | `DRYRUN_DIR` | dry-run output directory |
    /// | `CONFIRMATION_ROUNDS` | confirmation bound |
    /// | `ALGO_HTTP_TIMEOUT_SECS` | request timeout |
    pub fn from_env() -> Self {
        Self::default().apply_env()
    }

    /// Apply environment overrides on top of `self`.
    pub fn apply_env(mut self) -> Self {
        self.algod.server = env_string_or("ALGOD_SERVER", &self.algod.server);
        self.algod.token = env_string_or("ALGOD_TOKEN", &self.algod.token);
        self.kmd.server = env_string_or("KMD_SERVER", &self.kmd.server);
        self.kmd.token = env_string_or("KMD_TOKEN", &self.kmd.token);
        self.wallet_name = env_string_or("KMD_WALLET", &self.wallet_name);
        self.wallet_password = env_string_or("KMD_PASSWORD", &self.wallet_password);
        if let Some(dir) = env_var::<PathBuf>("DRYRUN_DIR") {
            self.dryrun_dir = dir;
        }
        if let Some(rounds) = env_var("CONFIRMATION_ROUNDS") {
            self.confirmation_rounds = rounds;
        }
        if let Some(secs) = env_var("ALGO_HTTP_TIMEOUT_SECS") {
            self.http_timeout_secs = secs;
        }
        self
    }

    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Builder method: set the dry-run output directory.
    pub fn with_dryrun_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dryrun_dir = dir.into();
        self
    }

    /// Builder method: set the confirmation round bound.
    pub fn with_confirmation_rounds(mut self, rounds: u64) -> Self {
        self.confirmation_rounds = rounds;
        self
    }

    /// Builder method: set the program source paths.
    pub fn with_programs(mut self, approval: impl Into<PathBuf>, clear: impl Into<PathBuf>) -> Self {
        self.approval_path = approval.into();
        self.clear_path = clear.into();
        self
    }

    pub fn algod_client_config(&self) -> ClientConfig {
        self.client_config(&self.algod)
    }

    pub fn kmd_client_config(&self) -> ClientConfig {
        self.client_config(&self.kmd)
    }

    fn client_config(&self, service: &ServiceEndpoint) -> ClientConfig {
        let connect = Duration::from_secs(ClientConfig::DEFAULT_CONNECT_TIMEOUT_SECS)
            .min(Duration::from_secs(self.http_timeout_secs));
        ClientConfig::new(&service.server, &service.token)
            .with_timeouts(Duration::from_secs(self.http_timeout_secs), connect)
    }
}
