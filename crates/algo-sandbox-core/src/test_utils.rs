//! In-memory node for unit tests.

use std::collections::VecDeque;

use anyhow::{anyhow, Result};
use parking_lot::Mutex;

use algo_sandbox_types::{
    AccountRecord, Address, ApplicationParams, ApplicationRecord, DryRunResponse, HashDigest,
    SuggestedParams, TransactionId,
};
use algo_transport::{CompileResult, NodeApi, NodeStatus, PendingTransaction};

/// Node that answers from canned data and logs every call.
pub struct ScriptedNode {
    pub last_round: u64,
    pub apps: Vec<ApplicationRecord>,
    pub asset_creators: Vec<(u64, Address)>,
    pub dryrun_response: DryRunResponse,
    pending: Mutex<VecDeque<PendingTransaction>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedNode {
    pub fn new() -> Self {
        Self {
            last_round: 10,
            apps: Vec::new(),
            asset_creators: Vec::new(),
            dryrun_response: DryRunResponse::default(),
            pending: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue pool states returned by successive pending lookups.
    pub fn with_pending(self, states: Vec<PendingTransaction>) -> Self {
        *self.pending.lock() = states.into();
        self
    }

    pub fn with_app(mut self, id: u64, creator: Address) -> Self {
        self.apps.push(ApplicationRecord {
            id,
            params: ApplicationParams {
                creator: creator.to_string(),
                ..Default::default()
            },
        });
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

pub fn test_params() -> SuggestedParams {
    SuggestedParams {
        fee: 1000,
        min_fee: 1000,
        flat_fee: true,
        first_valid: 10,
        last_valid: 1010,
        genesis_id: "sandnet-v1".to_string(),
        genesis_hash: HashDigest([9u8; 32]),
        consensus_version: "future".to_string(),
    }
}

impl NodeApi for ScriptedNode {
    fn suggested_params(&self) -> Result<SuggestedParams> {
        self.record("params".into());
        Ok(test_params())
    }

    fn compile(&self, source: &[u8]) -> Result<CompileResult> {
        self.record("compile".into());
        Ok(CompileResult {
            hash: String::new(),
            program: source.to_vec(),
        })
    }

    fn send_raw_transaction(&self, _signed: &[u8]) -> Result<TransactionId> {
        self.record("send".into());
        Ok(TransactionId("TXID".into()))
    }

    fn pending_transaction(&self, txid: &TransactionId) -> Result<PendingTransaction> {
        self.record(format!("pending:{}", txid));
        Ok(self.pending.lock().pop_front().unwrap_or_default())
    }

    fn status(&self) -> Result<NodeStatus> {
        self.record("status".into());
        Ok(NodeStatus {
            last_round: self.last_round,
        })
    }

    fn status_after_block(&self, round: u64) -> Result<NodeStatus> {
        self.record(format!("wait:{}", round));
        Ok(NodeStatus {
            last_round: round + 1,
        })
    }

    fn dryrun(&self, request: &[u8]) -> Result<DryRunResponse> {
        self.record(format!("dryrun:{}", request.len()));
        Ok(self.dryrun_response.clone())
    }

    fn account_information(&self, address: &Address) -> Result<AccountRecord> {
        self.record(format!("account:{}", address));
        Ok(AccountRecord {
            address: address.to_string(),
            amount: 1_000_000,
            ..Default::default()
        })
    }

    fn application(&self, app_id: u64) -> Result<ApplicationRecord> {
        self.record(format!("app:{}", app_id));
        self.apps
            .iter()
            .find(|app| app.id == app_id)
            .cloned()
            .ok_or_else(|| anyhow!("application {} does not exist", app_id))
    }

    fn asset_creator(&self, asset_id: u64) -> Result<Address> {
        self.record(format!("asset:{}", asset_id));
        self.asset_creators
            .iter()
            .find(|(id, _)| *id == asset_id)
            .map(|(_, creator)| *creator)
            .ok_or_else(|| anyhow!("asset {} does not exist", asset_id))
    }
}
