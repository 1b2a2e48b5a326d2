//! Dry-run request and response wire types.

use serde::{Deserialize, Serialize};

use crate::encoding::{from_msgpack, is_zero, to_canonical_msgpack};
use crate::ledger::{AccountRecord, ApplicationRecord};
use crate::transaction::SignedTransaction;

/// Logical clock used when the caller does not pick one.
pub const DEFAULT_LATEST_TIMESTAMP: u64 = 1;

/// Simulation request sent to the node's dry-run endpoint.
///
/// Keys are in canonical order. Once built a request is not modified; a
/// different scenario needs a new request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DryRunRequest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<AccountRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub apps: Vec<ApplicationRecord>,
    #[serde(rename = "latest-timestamp", default, skip_serializing_if = "is_zero")]
    pub latest_timestamp: u64,
    #[serde(
        rename = "protocol-version",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub protocol_version: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub round: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub txns: Vec<SignedTransaction>,
}

impl DryRunRequest {
    pub fn encode(&self) -> anyhow::Result<Vec<u8>> {
        to_canonical_msgpack(self, "dry-run request")
    }

    pub fn decode(bytes: &[u8]) -> anyhow::Result<Self> {
        from_msgpack(bytes, "dry-run request")
    }
}

/// Message the approval program trace ends with when it accepts.
pub const APPROVAL_PASS: &str = "PASS";

/// Node response to a dry-run request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DryRunResponse {
    #[serde(default)]
    pub error: String,
    #[serde(rename = "protocol-version", default)]
    pub protocol_version: String,
    #[serde(default)]
    pub txns: Vec<DryRunTxnResult>,
}

impl DryRunResponse {
    /// Whether the first transaction's approval program accepted.
    ///
    /// The node reports `["ApprovalProgram", "PASS" | "REJECT", ...]`; only the
    /// second message is inspected.
    pub fn approval_passed(&self) -> bool {
        self.txns
            .first()
            .and_then(|txn| txn.app_call_messages.get(1))
            .is_some_and(|msg| msg == APPROVAL_PASS)
    }
}

/// Per-transaction simulation trace.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DryRunTxnResult {
    #[serde(rename = "app-call-messages", default)]
    pub app_call_messages: Vec<String>,
    #[serde(default)]
    pub disassembly: Vec<String>,
    #[serde(rename = "global-delta", default)]
    pub global_delta: Vec<StateDeltaEntry>,
    #[serde(rename = "local-deltas", default)]
    pub local_deltas: Vec<AccountStateDelta>,
    #[serde(rename = "logic-sig-messages", default)]
    pub logic_sig_messages: Vec<String>,
    /// Base64 encoded log entries.
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub cost: Option<u64>,
    #[serde(rename = "budget-consumed", default)]
    pub budget_consumed: Option<u64>,
}

/// One key/value change in an application's storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDeltaEntry {
    /// Base64 encoded state key.
    pub key: String,
    pub value: DeltaValue,
}

/// Tagged union value of a state delta.
///
/// `action` selects the variant (see [`DeltaAction`]); `bytes` (base64) or
/// `uint` carry the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeltaValue {
    pub action: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uint: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaAction {
    SetBytes = 1,
    SetUint = 2,
    Delete = 3,
}

impl TryFrom<u64> for DeltaAction {
    type Error = u64;

    fn try_from(value: u64) -> Result<Self, u64> {
        match value {
            1 => Ok(DeltaAction::SetBytes),
            2 => Ok(DeltaAction::SetUint),
            3 => Ok(DeltaAction::Delete),
            other => Err(other),
        }
    }
}

/// Local-state delta for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStateDelta {
    pub address: String,
    #[serde(default)]
    pub delta: Vec<StateDeltaEntry>,
}
