//! The app-creation scenario.
//!
//! Setup provisions a funder from the wallet, funds a fresh creator account
//! (new accounts avoid the per-account app limit), builds the app-create
//! transaction and dry-runs it. Teardown sweeps the creator back to the
//! funder.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use tracing::info;

use algo_sandbox_core::provisioner::generate_account;
use algo_sandbox_types::{Account, DryRunResponse, DryRunTxnResult};
use algo_transport::{NodeApi, WalletApi};

use crate::harness::Harness;

/// Label of the persisted dry run.
pub const APP_CREATE_LABEL: &str = "app_create";

#[derive(Debug)]
pub struct AppCreationScenario {
    pub funder: Account,
    pub creator: Account,
    pub dry_run_path: PathBuf,
    pub dry_run: DryRunResponse,
}

impl AppCreationScenario {
    pub fn setup<N: NodeApi, W: WalletApi>(harness: &Harness<N, W>) -> Result<Self> {
        let funder = harness
            .funded_accounts()?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Wallet {} holds no accounts", harness.config().wallet_name))?;

        let creator = generate_account();
        harness.fund_account(&funder, &creator, harness.config().funding_amount)?;

        let app_txn = harness.create_app_txn(&creator)?;
        let handle = harness.dry_run(&[app_txn], APP_CREATE_LABEL, None)?;
        let dry_run = handle.submit(harness.node())?;
        info!(
            creator = %creator.address(),
            passed = dry_run.approval_passed(),
            "app creation dry run"
        );

        Ok(Self {
            funder,
            creator,
            dry_run_path: handle.path().to_path_buf(),
            dry_run,
        })
    }

    /// Trace of the app-create transaction.
    pub fn app_txn(&self) -> Option<&DryRunTxnResult> {
        self.dry_run.txns.first()
    }

    pub fn approval_passed(&self) -> bool {
        self.dry_run.approval_passed()
    }

    /// Close the creator's balance out to the funder.
    pub fn teardown<N: NodeApi, W: WalletApi>(self, harness: &Harness<N, W>) -> Result<()> {
        harness.close_account(&self.creator, &self.funder)?;
        info!(creator = %self.creator.address(), "closed creator account");
        Ok(())
    }
}
