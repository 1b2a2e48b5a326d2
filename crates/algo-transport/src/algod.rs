//! Node (algod v2) client.
//!
//! ## Usage
//!
//! ```ignore
//! let client = AlgodClient::new(&ClientConfig::new(DEFAULT_ALGOD_SERVER, SANDBOX_TOKEN));
//! let params = client.suggested_params()?;
//! let status = client.status()?;
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use algo_sandbox_types::encoding::base64_decode;
use algo_sandbox_types::transaction::DEFAULT_VALIDITY_WINDOW;
use algo_sandbox_types::{
    AccountRecord, Address, ApplicationRecord, DryRunResponse, HashDigest, SuggestedParams,
    TransactionId,
};

use crate::network::{ClientConfig, HttpService, CONTENT_BINARY, CONTENT_MSGPACK};
use crate::NodeApi;

const TOKEN_HEADER: &str = "X-Algo-API-Token";

/// Raw `/v2/transactions/params` response.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionParamsResponse {
    #[serde(rename = "consensus-version", default)]
    pub consensus_version: String,
    pub fee: u64,
    #[serde(rename = "genesis-hash")]
    pub genesis_hash: String,
    #[serde(rename = "genesis-id")]
    pub genesis_id: String,
    #[serde(rename = "last-round")]
    pub last_round: u64,
    #[serde(rename = "min-fee")]
    pub min_fee: u64,
}

impl TransactionParamsResponse {
    /// Turn the node's view into parameters for a new transaction valid from
    /// the current round for [`DEFAULT_VALIDITY_WINDOW`] rounds.
    pub fn into_suggested(self) -> Result<SuggestedParams> {
        let hash = base64_decode(&self.genesis_hash, "genesis hash")?;
        let genesis_hash: [u8; 32] = hash
            .as_slice()
            .try_into()
            .map_err(|_| anyhow!("genesis hash must be 32 bytes, got {}", hash.len()))?;
        Ok(SuggestedParams {
            fee: self.fee,
            min_fee: self.min_fee,
            flat_fee: false,
            first_valid: self.last_round,
            last_valid: self.last_round + DEFAULT_VALIDITY_WINDOW,
            genesis_id: self.genesis_id,
            genesis_hash: HashDigest(genesis_hash),
            consensus_version: self.consensus_version,
        })
    }
}

/// Output of the compile endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileResult {
    /// Address of the program's logic-sig account.
    pub hash: String,
    pub program: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct CompileResponse {
    hash: String,
    result: String,
}

#[derive(Debug, Deserialize)]
struct PostTransactionsResponse {
    #[serde(rename = "txId")]
    tx_id: String,
}

/// Pool/confirmation state of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PendingTransaction {
    #[serde(rename = "confirmed-round", default)]
    pub confirmed_round: Option<u64>,
    #[serde(rename = "pool-error", default)]
    pub pool_error: String,
    #[serde(rename = "application-index", default)]
    pub application_index: Option<u64>,
}

impl PendingTransaction {
    pub fn is_confirmed(&self) -> bool {
        self.confirmed_round.unwrap_or(0) > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeStatus {
    #[serde(rename = "last-round")]
    pub last_round: u64,
}

#[derive(Debug, Deserialize)]
struct AssetResponse {
    params: AssetParams,
}

#[derive(Debug, Deserialize)]
struct AssetParams {
    creator: String,
}

/// Blocking algod client.
#[derive(Clone)]
pub struct AlgodClient {
    http: HttpService,
}

impl AlgodClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: HttpService::new("algod", TOKEN_HEADER, config),
        }
    }

    pub fn endpoint(&self) -> &str {
        self.http.endpoint()
    }
}

impl NodeApi for AlgodClient {
    fn suggested_params(&self) -> Result<SuggestedParams> {
        self.http
            .get_json::<TransactionParamsResponse>("/v2/transactions/params")?
            .into_suggested()
    }

    fn compile(&self, source: &[u8]) -> Result<CompileResult> {
        let resp: CompileResponse = self
            .http
            .post_bytes("/v2/teal/compile", CONTENT_BINARY, source)?;
        Ok(CompileResult {
            program: base64_decode(&resp.result, "compiled program")?,
            hash: resp.hash,
        })
    }

    fn send_raw_transaction(&self, signed: &[u8]) -> Result<TransactionId> {
        let resp: PostTransactionsResponse =
            self.http
                .post_bytes("/v2/transactions", CONTENT_BINARY, signed)?;
        Ok(TransactionId(resp.tx_id))
    }

    fn pending_transaction(&self, txid: &TransactionId) -> Result<PendingTransaction> {
        self.http
            .get_json(&format!("/v2/transactions/pending/{}", txid))
    }

    fn status(&self) -> Result<NodeStatus> {
        self.http.get_json("/v2/status")
    }

    fn status_after_block(&self, round: u64) -> Result<NodeStatus> {
        self.http
            .get_json(&format!("/v2/status/wait-for-block-after/{}", round))
    }

    fn dryrun(&self, request: &[u8]) -> Result<DryRunResponse> {
        self.http
            .post_bytes("/v2/teal/dryrun", CONTENT_MSGPACK, request)
    }

    fn account_information(&self, address: &Address) -> Result<AccountRecord> {
        self.http.get_json(&format!("/v2/accounts/{}", address))
    }

    fn application(&self, app_id: u64) -> Result<ApplicationRecord> {
        self.http.get_json(&format!("/v2/applications/{}", app_id))
    }

    fn asset_creator(&self, asset_id: u64) -> Result<Address> {
        let resp: AssetResponse = self.http.get_json(&format!("/v2/assets/{}", asset_id))?;
        resp.params.creator.parse()
    }
}
