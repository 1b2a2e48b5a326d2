//! Dry-run request construction.
//!
//! [`DryRunBuilder::build`] decodes a list of signed transactions, gathers the
//! ledger state the simulation needs (accounts, applications), binds a logical
//! timestamp and writes the canonical msgpack encoding to
//! `<out_dir>/<label>.dr`. The returned [`DryRunHandle`] can then be submitted
//! to the node.
//!
//! ## Ledger context
//!
//! For every application call the request carries:
//! - the sender and every foreign account
//! - every foreign application, plus its escrow account
//! - the creator of every foreign asset
//!
//! An application create (app id 0) is represented by a synthetic record
//! with id [`algo_sandbox_types::DRYRUN_CREATE_APP_ID`] built from the
//! transaction itself. Records of existing applications and accounts are
//! fetched from the node.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use algo_sandbox_types::{
    application_address, AccountRecord, Address, ApplicationRecord, DryRunRequest,
    DryRunResponse, SignedTransaction, TxType, DEFAULT_LATEST_TIMESTAMP,
};
use algo_transport::NodeApi;

use crate::errors::HarnessError;

pub const DRYRUN_FILE_EXTENSION: &str = "dr";

/// A built and persisted dry-run request.
#[derive(Debug, Clone)]
pub struct DryRunHandle {
    request: DryRunRequest,
    encoded: Vec<u8>,
    path: PathBuf,
}

impl DryRunHandle {
    pub fn request(&self) -> &DryRunRequest {
        &self.request
    }

    /// Canonical msgpack bytes, identical to the file contents.
    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run the request on the node.
    pub fn submit(&self, node: &dyn NodeApi) -> Result<DryRunResponse> {
        let response = node
            .dryrun(&self.encoded)
            .with_context(|| format!("Dry run of {} failed", self.path.display()))?;
        if !response.error.is_empty() {
            return Err(HarnessError::DryRunFailed {
                message: response.error,
            }
            .into());
        }
        debug!(txns = response.txns.len(), "dry run complete");
        Ok(response)
    }
}

/// Path of the dry-run file for `label`.
pub fn dry_run_path(out_dir: &Path, label: &str) -> PathBuf {
    out_dir.join(format!("{}.{}", label, DRYRUN_FILE_EXTENSION))
}

/// Builds dry-run requests and persists them under one directory.
pub struct DryRunBuilder<'a> {
    node: &'a dyn NodeApi,
    out_dir: PathBuf,
}

impl<'a> DryRunBuilder<'a> {
    pub fn new(node: &'a dyn NodeApi, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            node,
            out_dir: out_dir.into(),
        }
    }

    /// Build, encode and write a dry run of `signed_txns` (wire bytes, in order).
    ///
    /// A missing or zero `timestamp` becomes [`DEFAULT_LATEST_TIMESTAMP`].
    pub fn build(
        &self,
        signed_txns: &[Vec<u8>],
        label: &str,
        timestamp: Option<u64>,
    ) -> Result<DryRunHandle> {
        let txns = decode_signed_txns(signed_txns)?;
        let request = assemble_request(self.node, txns, timestamp)?;
        let encoded = request.encode()?;

        std::fs::create_dir_all(&self.out_dir)
            .with_context(|| format!("Failed to create {}", self.out_dir.display()))?;
        let path = dry_run_path(&self.out_dir, label);
        std::fs::write(&path, &encoded)
            .with_context(|| format!("Failed to write dry run {}", path.display()))?;
        info!(
            path = %path.display(),
            txns = request.txns.len(),
            bytes = encoded.len(),
            "wrote dry run"
        );

        Ok(DryRunHandle {
            request,
            encoded,
            path,
        })
    }

    /// Same as [`build`](Self::build) for already-decoded transactions.
    pub fn build_from(
        &self,
        txns: &[SignedTransaction],
        label: &str,
        timestamp: Option<u64>,
    ) -> Result<DryRunHandle> {
        let encoded = txns
            .iter()
            .map(SignedTransaction::encode)
            .collect::<Result<Vec<_>>>()?;
        self.build(&encoded, label, timestamp)
    }
}

/// Decode wire bytes into signed transactions, keeping their order.
pub fn decode_signed_txns(signed_txns: &[Vec<u8>]) -> Result<Vec<SignedTransaction>> {
    if signed_txns.is_empty() {
        return Err(HarnessError::EmptyTransactionList.into());
    }
    signed_txns
        .iter()
        .enumerate()
        .map(|(index, bytes)| {
            SignedTransaction::decode(bytes).map_err(|e| {
                HarnessError::MalformedTransaction {
                    index,
                    reason: e.to_string(),
                }
                .into()
            })
        })
        .collect()
}

/// Assemble a request around `txns` with the ledger records they reference.
pub fn assemble_request(
    node: &dyn NodeApi,
    txns: Vec<SignedTransaction>,
    timestamp: Option<u64>,
) -> Result<DryRunRequest> {
    if txns.is_empty() {
        return Err(HarnessError::EmptyTransactionList.into());
    }
    let refs = LedgerRefs::collect(&txns);

    let mut accounts = refs.accounts;
    for asset_id in &refs.assets {
        let creator = node
            .asset_creator(*asset_id)
            .with_context(|| format!("Failed to fetch asset {}", asset_id))?;
        push_unique(&mut accounts, creator);
    }

    let mut apps = refs.created;
    for app_id in &refs.apps {
        let app = node
            .application(*app_id)
            .with_context(|| format!("Failed to fetch application {}", app_id))?;
        push_unique(&mut accounts, app.creator()?);
        apps.push(app);
    }

    let accounts = accounts
        .iter()
        .map(|address| {
            node.account_information(address)
                .with_context(|| format!("Failed to fetch account {}", address))
        })
        .collect::<Result<Vec<AccountRecord>>>()?;

    debug!(
        accounts = accounts.len(),
        apps = apps.len(),
        "collected dry-run ledger context"
    );

    Ok(DryRunRequest {
        accounts,
        apps,
        latest_timestamp: timestamp
            .filter(|t| *t != 0)
            .unwrap_or(DEFAULT_LATEST_TIMESTAMP),
        protocol_version: String::new(),
        round: 0,
        txns,
    })
}

/// Identifiers referenced by application calls, deduplicated in first-seen order.
#[derive(Debug, Default)]
struct LedgerRefs {
    accounts: Vec<Address>,
    apps: Vec<u64>,
    assets: Vec<u64>,
    created: Vec<ApplicationRecord>,
}

impl LedgerRefs {
    fn collect(txns: &[SignedTransaction]) -> Self {
        let mut refs = Self::default();
        for txn in txns.iter().map(|stx| &stx.txn) {
            if txn.tx_type != TxType::ApplicationCall {
                continue;
            }
            push_unique(&mut refs.accounts, txn.sender);
            for account in &txn.accounts {
                push_unique(&mut refs.accounts, *account);
            }
            for app_id in &txn.foreign_apps {
                push_unique(&mut refs.apps, *app_id);
                push_unique(&mut refs.accounts, application_address(*app_id));
            }
            for asset_id in &txn.foreign_assets {
                push_unique(&mut refs.assets, *asset_id);
            }

            if txn.is_app_create() {
                refs.created.push(ApplicationRecord::for_create(txn));
            } else {
                push_unique(&mut refs.apps, txn.app_id);
                push_unique(&mut refs.accounts, application_address(txn.app_id));
            }
        }
        refs
    }
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}
