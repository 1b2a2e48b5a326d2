//! In-memory node and wallet service.
//!
//! [`MockNode`] keeps balances, applies payments (including close-outs) when
//! they are submitted and answers dry runs with a canned trace. [`MockWallet`]
//! holds a fixed list of accounts and tracks handle lifecycle. Both log every
//! call so tests can assert on ordering, and both accept failure injection.

use std::collections::{HashMap, HashSet};

use anyhow::{anyhow, Result};
use parking_lot::Mutex;

use algo_sandbox_types::{
    Account, AccountRecord, Address, ApplicationRecord, DryRunRequest, DryRunResponse,
    DryRunTxnResult, HashDigest, SignedTransaction, StateDeltaEntry, SuggestedParams,
    TransactionId, TxType,
};
use algo_transport::{CompileResult, NodeApi, NodeStatus, PendingTransaction, WalletApi, WalletInfo};

/// What the mock pool reports for submitted transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolBehavior {
    Confirm,
    Reject,
    NeverConfirm,
}

pub struct MockNode {
    pub params: SuggestedParams,
    pub pool: PoolBehavior,
    /// Second app-call message reported by dry runs.
    pub approval_result: String,
    pub global_delta: Vec<StateDeltaEntry>,
    round: Mutex<u64>,
    balances: Mutex<HashMap<Address, u64>>,
    confirmed: Mutex<HashMap<String, u64>>,
    submitted: Mutex<Vec<SignedTransaction>>,
    dry_runs: Mutex<Vec<DryRunRequest>>,
    calls: Mutex<Vec<String>>,
}

impl MockNode {
    pub fn new() -> Self {
        Self {
            params: SuggestedParams {
                fee: 0,
                min_fee: 1000,
                flat_fee: false,
                first_valid: 1,
                last_valid: 1001,
                genesis_id: "sandnet-v1".to_string(),
                genesis_hash: HashDigest([1u8; 32]),
                consensus_version: "future".to_string(),
            },
            pool: PoolBehavior::Confirm,
            approval_result: "PASS".to_string(),
            global_delta: Vec::new(),
            round: Mutex::new(1),
            balances: Mutex::new(HashMap::new()),
            confirmed: Mutex::new(HashMap::new()),
            submitted: Mutex::new(Vec::new()),
            dry_runs: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_pool(mut self, pool: PoolBehavior) -> Self {
        self.pool = pool;
        self
    }

    pub fn with_balance(self, address: Address, amount: u64) -> Self {
        self.balances.lock().insert(address, amount);
        self
    }

    pub fn balance(&self, address: &Address) -> u64 {
        self.balances.lock().get(address).copied().unwrap_or(0)
    }

    pub fn submitted(&self) -> Vec<SignedTransaction> {
        self.submitted.lock().clone()
    }

    pub fn dry_runs(&self) -> Vec<DryRunRequest> {
        self.dry_runs.lock().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn round(&self) -> u64 {
        *self.round.lock()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }

    fn apply(&self, stx: &SignedTransaction) -> Result<()> {
        let txn = &stx.txn;
        let mut balances = self.balances.lock();
        let sender_balance = balances.get(&txn.sender).copied().unwrap_or(0);
        let debit = txn.amount + txn.fee;
        if sender_balance < debit {
            return Err(anyhow!("overspend: {} has {}", txn.sender, sender_balance));
        }
        balances.insert(txn.sender, sender_balance - debit);
        if txn.tx_type == TxType::Payment {
            if let Some(receiver) = txn.receiver {
                *balances.entry(receiver).or_insert(0) += txn.amount;
            }
            if let Some(close_to) = txn.close_remainder_to {
                let rest = balances.insert(txn.sender, 0).unwrap_or(0);
                *balances.entry(close_to).or_insert(0) += rest;
            }
        }
        Ok(())
    }
}

impl Default for MockNode {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeApi for MockNode {
    fn suggested_params(&self) -> Result<SuggestedParams> {
        self.record("params");
        Ok(self.params.clone())
    }

    fn compile(&self, source: &[u8]) -> Result<CompileResult> {
        self.record("compile");
        if source.is_empty() {
            return Err(anyhow!("empty program"));
        }
        Ok(CompileResult {
            hash: String::new(),
            program: vec![0x06, 0x81, 0x01],
        })
    }

    fn send_raw_transaction(&self, signed: &[u8]) -> Result<TransactionId> {
        self.record("send");
        let stx = SignedTransaction::decode(signed)?;
        let txid = stx.id()?;
        if self.pool == PoolBehavior::Confirm {
            self.apply(&stx)?;
            let round = self.round() + 1;
            self.confirmed.lock().insert(txid.to_string(), round);
        }
        self.submitted.lock().push(stx);
        Ok(txid)
    }

    fn pending_transaction(&self, txid: &TransactionId) -> Result<PendingTransaction> {
        self.record("pending");
        let mut pending = PendingTransaction::default();
        match self.pool {
            PoolBehavior::Reject => pending.pool_error = "transaction rejected by pool".into(),
            PoolBehavior::NeverConfirm => {}
            PoolBehavior::Confirm => {
                let confirmed = self.confirmed.lock().get(&txid.to_string()).copied();
                if confirmed.is_some_and(|r| r <= self.round()) {
                    pending.confirmed_round = confirmed;
                }
            }
        }
        Ok(pending)
    }

    fn status(&self) -> Result<NodeStatus> {
        self.record("status");
        Ok(NodeStatus {
            last_round: self.round(),
        })
    }

    fn status_after_block(&self, round: u64) -> Result<NodeStatus> {
        self.record(format!("wait:{}", round));
        let mut current = self.round.lock();
        *current = (*current).max(round + 1);
        Ok(NodeStatus {
            last_round: *current,
        })
    }

    fn dryrun(&self, request: &[u8]) -> Result<DryRunResponse> {
        self.record("dryrun");
        let request = DryRunRequest::decode(request)?;
        let txns = request
            .txns
            .iter()
            .map(|stx| match stx.txn.tx_type {
                TxType::ApplicationCall => DryRunTxnResult {
                    app_call_messages: vec![
                        "ApprovalProgram".to_string(),
                        self.approval_result.clone(),
                    ],
                    global_delta: self.global_delta.clone(),
                    cost: Some(2),
                    ..Default::default()
                },
                TxType::Payment => DryRunTxnResult::default(),
            })
            .collect();
        self.dry_runs.lock().push(request);
        Ok(DryRunResponse {
            error: String::new(),
            protocol_version: self.params.consensus_version.clone(),
            txns,
        })
    }

    fn account_information(&self, address: &Address) -> Result<AccountRecord> {
        self.record(format!("account:{}", address));
        let amount = self.balance(address);
        Ok(AccountRecord {
            address: address.to_string(),
            amount,
            amount_without_pending_rewards: amount,
            round: self.round(),
            status: "Offline".to_string(),
            ..Default::default()
        })
    }

    fn application(&self, app_id: u64) -> Result<ApplicationRecord> {
        self.record(format!("app:{}", app_id));
        Err(anyhow!("application does not exist"))
    }

    fn asset_creator(&self, asset_id: u64) -> Result<Address> {
        self.record(format!("asset:{}", asset_id));
        Err(anyhow!("asset does not exist"))
    }
}

pub const WALLET_ID: &str = "wallet-1";

pub struct MockWallet {
    pub name: String,
    pub accounts: Vec<Account>,
    pub fail_export_for: Option<Address>,
    next_handle: Mutex<u32>,
    open_handles: Mutex<HashSet<String>>,
    released: Mutex<Vec<String>>,
    calls: Mutex<Vec<String>>,
}

impl MockWallet {
    pub fn new(name: &str, accounts: Vec<Account>) -> Self {
        Self {
            name: name.to_string(),
            accounts,
            fail_export_for: None,
            next_handle: Mutex::new(0),
            open_handles: Mutex::new(HashSet::new()),
            released: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Wallet with `n` fresh accounts under the stock sandbox wallet name.
    pub fn with_accounts(n: usize) -> Self {
        Self::new(
            algo_sandbox_core::config::DEFAULT_WALLET_NAME,
            (0..n).map(|_| Account::generate()).collect(),
        )
    }

    pub fn open_handles(&self) -> usize {
        self.open_handles.lock().len()
    }

    pub fn released(&self) -> Vec<String> {
        self.released.lock().clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }

    fn check_handle(&self, handle: &str) -> Result<()> {
        if self.open_handles.lock().contains(handle) {
            Ok(())
        } else {
            Err(anyhow!("invalid wallet handle {}", handle))
        }
    }
}

impl WalletApi for MockWallet {
    fn list_wallets(&self) -> Result<Vec<WalletInfo>> {
        self.record("list_wallets");
        Ok(vec![WalletInfo {
            id: WALLET_ID.to_string(),
            name: self.name.clone(),
        }])
    }

    fn init_wallet_handle(&self, wallet_id: &str, _password: &str) -> Result<String> {
        self.record("init");
        if wallet_id != WALLET_ID {
            return Err(anyhow!("unknown wallet id {}", wallet_id));
        }
        let mut next = self.next_handle.lock();
        *next += 1;
        let handle = format!("handle-{}", *next);
        self.open_handles.lock().insert(handle.clone());
        Ok(handle)
    }

    fn list_keys(&self, handle: &str) -> Result<Vec<Address>> {
        self.record("list_keys");
        self.check_handle(handle)?;
        Ok(self.accounts.iter().map(Account::address).collect())
    }

    fn export_key(&self, handle: &str, _password: &str, address: &Address) -> Result<Vec<u8>> {
        self.record("export");
        self.check_handle(handle)?;
        if self.fail_export_for == Some(*address) {
            return Err(anyhow!("export of {} refused", address));
        }
        self.accounts
            .iter()
            .find(|a| a.address() == *address)
            .map(|a| a.secret_key().to_vec())
            .ok_or_else(|| anyhow!("key {} not in wallet", address))
    }

    fn release_wallet_handle(&self, handle: &str) -> Result<()> {
        self.record("release");
        self.check_handle(handle)?;
        self.open_handles.lock().remove(handle);
        self.released.lock().push(handle.to_string());
        Ok(())
    }
}
