//! Algo Transport Layer
//!
//! Blocking HTTP clients for the two services a sandbox exposes:
//!
//! - [`algod`]: the node (transaction params, compile, submit, dry run, ledger reads)
//! - [`kmd`]: the wallet service (wallets, handles, key export)
//!
//! Both are reached through the [`NodeApi`] and [`WalletApi`] traits so that
//! callers can be exercised against in-memory fakes.
//!
//! # Example
//!
//! ```ignore
//! use algo_transport::{AlgodClient, ClientConfig, NodeApi};
//! use algo_transport::network::{DEFAULT_ALGOD_SERVER, SANDBOX_TOKEN};
//!
//! let algod = AlgodClient::new(&ClientConfig::new(DEFAULT_ALGOD_SERVER, SANDBOX_TOKEN));
//! let params = algod.suggested_params()?;
//! ```

pub mod algod;
pub mod kmd;
pub mod network;

#[cfg(test)]
pub(crate) mod test_utils;

use anyhow::Result;

use algo_sandbox_types::{
    AccountRecord, Address, ApplicationRecord, DryRunResponse, SuggestedParams, TransactionId,
};

// Re-export main types for convenience
pub use algod::{AlgodClient, CompileResult, NodeStatus, PendingTransaction};
pub use kmd::{KmdClient, WalletInfo};
pub use network::{ClientConfig, RpcError};

/// Operations the harness needs from a node.
pub trait NodeApi: Send + Sync {
    fn suggested_params(&self) -> Result<SuggestedParams>;

    /// Compile program source text into bytecode.
    fn compile(&self, source: &[u8]) -> Result<CompileResult>;

    /// Submit an encoded signed transaction (or concatenated group).
    fn send_raw_transaction(&self, signed: &[u8]) -> Result<TransactionId>;

    fn pending_transaction(&self, txid: &TransactionId) -> Result<PendingTransaction>;

    fn status(&self) -> Result<NodeStatus>;

    /// Block until the node has seen the round after `round`.
    fn status_after_block(&self, round: u64) -> Result<NodeStatus>;

    /// Run an encoded dry-run request.
    fn dryrun(&self, request: &[u8]) -> Result<DryRunResponse>;

    fn account_information(&self, address: &Address) -> Result<AccountRecord>;

    fn application(&self, app_id: u64) -> Result<ApplicationRecord>;

    fn asset_creator(&self, asset_id: u64) -> Result<Address>;
}

/// Operations the harness needs from a wallet service.
pub trait WalletApi: Send + Sync {
    fn list_wallets(&self) -> Result<Vec<WalletInfo>>;

    /// Open a session on a wallet. The returned token must be released.
    fn init_wallet_handle(&self, wallet_id: &str, password: &str) -> Result<String>;

    fn list_keys(&self, handle: &str) -> Result<Vec<Address>>;

    /// Export the 64-byte secret key for `address`.
    fn export_key(&self, handle: &str, password: &str, address: &Address) -> Result<Vec<u8>>;

    fn release_wallet_handle(&self, handle: &str) -> Result<()>;
}
