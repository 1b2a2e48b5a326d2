//! Ledger records as reported by the node and embedded in dry-run requests.
//!
//! The node returns these as JSON with base64 program bytes. Inside a dry-run
//! request they are msgpack maps with the same keys and raw program bytes;
//! [`flex_bytes`](crate::encoding::flex_bytes) reads both.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::address::Address;
use crate::encoding::{flex_bytes, is_zero};
use crate::transaction::Transaction;

/// Application id the dry-run service assigns to an app being created.
pub const DRYRUN_CREATE_APP_ID: u64 = 1_380_011_588;

/// Account state snapshot.
///
/// Fields an application call can observe are typed. Whatever else the node
/// reports lands in `other` and is written back unchanged, so a record taken
/// from the node reaches a dry-run request whole. Serialization merges both
/// into one map in sorted key order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct AccountRecord {
    pub address: String,
    #[serde(default)]
    pub amount: u64,
    #[serde(rename = "amount-without-pending-rewards", default)]
    pub amount_without_pending_rewards: u64,
    #[serde(rename = "apps-local-state", default)]
    pub apps_local_state: Vec<ApplicationLocalState>,
    #[serde(rename = "apps-total-schema", default)]
    pub apps_total_schema: Option<SchemaRecord>,
    #[serde(default)]
    pub assets: Vec<AssetHolding>,
    /// Address allowed to sign for this account after a rekey.
    #[serde(rename = "auth-addr", default)]
    pub auth_addr: Option<String>,
    #[serde(rename = "created-apps", default)]
    pub created_apps: Vec<ApplicationRecord>,
    #[serde(rename = "min-balance", default)]
    pub min_balance: u64,
    #[serde(rename = "pending-rewards", default)]
    pub pending_rewards: u64,
    #[serde(default)]
    pub rewards: u64,
    #[serde(default)]
    pub round: u64,
    #[serde(default)]
    pub status: String,
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

/// Borrowed value of one [`AccountRecord`] map entry.
#[derive(Serialize)]
#[serde(untagged)]
enum AccountField<'a> {
    Text(&'a str),
    Uint(u64),
    LocalStates(&'a [ApplicationLocalState]),
    Schema(&'a SchemaRecord),
    Assets(&'a [AssetHolding]),
    Apps(&'a [ApplicationRecord]),
    Other(&'a serde_json::Value),
}

impl Serialize for AccountRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<(&str, AccountField<'_>)> =
            vec![("address", AccountField::Text(&self.address))];
        let uints = [
            ("amount", self.amount),
            ("amount-without-pending-rewards", self.amount_without_pending_rewards),
            ("min-balance", self.min_balance),
            ("pending-rewards", self.pending_rewards),
            ("rewards", self.rewards),
            ("round", self.round),
        ];
        entries.extend(
            uints
                .into_iter()
                .filter(|(_, value)| *value != 0)
                .map(|(key, value)| (key, AccountField::Uint(value))),
        );
        if !self.apps_local_state.is_empty() {
            let states = AccountField::LocalStates(&self.apps_local_state);
            entries.push(("apps-local-state", states));
        }
        if let Some(schema) = &self.apps_total_schema {
            entries.push(("apps-total-schema", AccountField::Schema(schema)));
        }
        if !self.assets.is_empty() {
            entries.push(("assets", AccountField::Assets(&self.assets)));
        }
        if let Some(auth_addr) = &self.auth_addr {
            entries.push(("auth-addr", AccountField::Text(auth_addr)));
        }
        if !self.created_apps.is_empty() {
            entries.push(("created-apps", AccountField::Apps(&self.created_apps)));
        }
        if !self.status.is_empty() {
            entries.push(("status", AccountField::Text(&self.status)));
        }
        entries.extend(
            self.other
                .iter()
                .map(|(key, value)| (key.as_str(), AccountField::Other(value))),
        );
        entries.sort_by(|a, b| a.0.cmp(b.0));

        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in &entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// An account's opt-in to an application and its local key/value store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationLocalState {
    pub id: u64,
    #[serde(rename = "key-value", default, skip_serializing_if = "Vec::is_empty")]
    pub key_value: Vec<TealKeyValue>,
    #[serde(default)]
    pub schema: SchemaRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetHolding {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub amount: u64,
    #[serde(rename = "asset-id")]
    pub asset_id: u64,
    #[serde(rename = "is-frozen", default, skip_serializing_if = "is_false")]
    pub is_frozen: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Application id plus its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: u64,
    pub params: ApplicationParams,
}

impl ApplicationRecord {
    /// Synthetic record for an app-create transaction, as the dry-run service
    /// expects to find it.
    pub fn for_create(txn: &Transaction) -> Self {
        Self {
            id: DRYRUN_CREATE_APP_ID,
            params: ApplicationParams {
                approval_program: txn.approval_program.clone(),
                clear_state_program: txn.clear_program.clone(),
                creator: txn.sender.to_string(),
                extra_program_pages: txn.extra_pages,
                global_state: Vec::new(),
                global_state_schema: SchemaRecord::from_counts(
                    txn.global_schema.num_uints,
                    txn.global_schema.num_byte_slices,
                ),
                local_state_schema: SchemaRecord::from_counts(
                    txn.local_schema.num_uints,
                    txn.local_schema.num_byte_slices,
                ),
            },
        }
    }

    pub fn creator(&self) -> anyhow::Result<Address> {
        self.params.creator.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApplicationParams {
    #[serde(
        rename = "approval-program",
        default,
        with = "flex_bytes",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub approval_program: Vec<u8>,
    #[serde(
        rename = "clear-state-program",
        default,
        with = "flex_bytes",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub clear_state_program: Vec<u8>,
    pub creator: String,
    #[serde(rename = "extra-program-pages", default, skip_serializing_if = "is_zero")]
    pub extra_program_pages: u64,
    #[serde(rename = "global-state", default, skip_serializing_if = "Vec::is_empty")]
    pub global_state: Vec<TealKeyValue>,
    #[serde(
        rename = "global-state-schema",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub global_state_schema: Option<SchemaRecord>,
    #[serde(
        rename = "local-state-schema",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub local_state_schema: Option<SchemaRecord>,
}

/// Schema as reported by the node (long key names).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SchemaRecord {
    #[serde(rename = "num-byte-slice", default, skip_serializing_if = "is_zero")]
    pub num_byte_slice: u64,
    #[serde(rename = "num-uint", default, skip_serializing_if = "is_zero")]
    pub num_uint: u64,
}

impl SchemaRecord {
    fn from_counts(num_uint: u64, num_byte_slice: u64) -> Option<Self> {
        if num_uint == 0 && num_byte_slice == 0 {
            None
        } else {
            Some(Self {
                num_byte_slice,
                num_uint,
            })
        }
    }
}

/// Stored application state entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TealKeyValue {
    pub key: String,
    pub value: TealValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TealValue {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub bytes: String,
    #[serde(rename = "type")]
    pub value_type: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub uint: u64,
}
