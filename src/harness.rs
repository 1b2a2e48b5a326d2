//! A configured connection to the sandbox.
//!
//! [`Harness`] pairs a [`HarnessConfig`] with a node and a wallet service and
//! exposes the per-step operations a scenario is made of. The services are
//! generic so tests can substitute in-memory implementations.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use algo_sandbox_core::builder::{AppPrograms, TransactionBuilder};
use algo_sandbox_core::compiler::compile_file;
use algo_sandbox_core::dryrun::{DryRunBuilder, DryRunHandle};
use algo_sandbox_core::provisioner::list_funded_accounts;
use algo_sandbox_core::submit::send_transaction;
use algo_sandbox_core::HarnessConfig;
use algo_sandbox_types::{Account, SignedTransaction};
use algo_transport::{AlgodClient, KmdClient, NodeApi, PendingTransaction, WalletApi};

pub struct Harness<N, W> {
    config: HarnessConfig,
    node: N,
    wallet: W,
}

impl Harness<AlgodClient, KmdClient> {
    /// HTTP clients for the endpoints in `config`.
    pub fn connect(config: HarnessConfig) -> Self {
        let node = AlgodClient::new(&config.algod_client_config());
        let wallet = KmdClient::new(&config.kmd_client_config());
        info!(algod = %config.algod.server, kmd = %config.kmd.server, "connecting to sandbox");
        Self::with_services(config, node, wallet)
    }
}

impl<N: NodeApi, W: WalletApi> Harness<N, W> {
    pub fn with_services(config: HarnessConfig, node: N, wallet: W) -> Self {
        Self {
            config,
            node,
            wallet,
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    /// Accounts of the configured wallet. The first one funds the scenario.
    pub fn funded_accounts(&self) -> Result<Vec<Account>> {
        list_funded_accounts(
            &self.wallet,
            &self.config.wallet_name,
            &self.config.wallet_password,
        )
    }

    /// Pay `amount` from `from` to `to` and wait for confirmation.
    pub fn fund_account(&self, from: &Account, to: &Account, amount: u64) -> Result<PendingTransaction> {
        let signed = TransactionBuilder::new(&self.node).payment(from, &to.address(), amount)?;
        self.send(&signed)
            .with_context(|| format!("Funding {} failed", to.address()))
    }

    /// Sweep `account`'s balance to `close_to` and wait for confirmation.
    pub fn close_account(&self, account: &Account, close_to: &Account) -> Result<PendingTransaction> {
        let signed =
            TransactionBuilder::new(&self.node).close_account(account, &close_to.address())?;
        self.send(&signed)
            .with_context(|| format!("Closing {} failed", account.address()))
    }

    pub fn send(&self, signed: &SignedTransaction) -> Result<PendingTransaction> {
        send_transaction(&self.node, signed, self.config.confirmation_rounds)
    }

    pub fn compile_file(&self, path: &Path) -> Result<Vec<u8>> {
        compile_file(&self.node, path)
    }

    /// Compile the configured approval and clear programs.
    pub fn compile_programs(&self) -> Result<AppPrograms> {
        Ok(AppPrograms {
            approval: self.compile_file(&self.config.approval_path)?,
            clear: self.compile_file(&self.config.clear_path)?,
        })
    }

    /// Signed app-create transaction for the configured programs and schema.
    pub fn create_app_txn(&self, creator: &Account) -> Result<SignedTransaction> {
        let programs = self.compile_programs()?;
        let schema = self.config.app_schema;
        TransactionBuilder::new(&self.node).app_create(
            creator,
            &programs,
            schema.global(),
            schema.local(),
        )
    }

    /// Build and persist a dry run under the configured directory.
    pub fn dry_run(
        &self,
        txns: &[SignedTransaction],
        label: &str,
        timestamp: Option<u64>,
    ) -> Result<DryRunHandle> {
        DryRunBuilder::new(&self.node, &self.config.dryrun_dir).build_from(txns, label, timestamp)
    }
}
