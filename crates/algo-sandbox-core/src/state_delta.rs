//! Readable view of application state deltas.
//!
//! The node reports storage changes as `{key: base64, value: {action, bytes?, uint?}}`.
//! [`decode_state`] turns such a list into a map from key name to a
//! [`ReadableValue`]. Byte values are shown as an address when their
//! checksummed base32 form is a valid address, and as text otherwise.
//!
//! Any 32-byte value produces a valid checksum, so 32 bytes of text always
//! render as an address.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;

use algo_sandbox_types::address::encode_address_bytes;
use algo_sandbox_types::encoding::try_base64_decode;
use algo_sandbox_types::{
    is_valid_address, AccountStateDelta, DeltaAction, DeltaValue, DryRunTxnResult,
    StateDeltaEntry,
};

use crate::errors::HarnessError;

/// A decoded state value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReadableValue {
    Address(String),
    Text(String),
    Uint(u64),
    /// The key was removed. Serializes as `null`.
    Deleted,
}

/// Decoded key name to value. Duplicate keys keep the last entry.
pub type ReadableState = BTreeMap<String, ReadableValue>;

/// Decode a global (or single-account local) state delta.
pub fn decode_state(delta: &[StateDeltaEntry]) -> Result<ReadableState> {
    let mut state = ReadableState::new();
    for entry in delta {
        let key = decode_key(&entry.key)?;
        let value = resolve_value(&entry.key, &entry.value)?;
        state.insert(key, value);
    }
    Ok(state)
}

/// Decode per-account local deltas, keyed by account address.
pub fn decode_local_deltas(deltas: &[AccountStateDelta]) -> Result<BTreeMap<String, ReadableState>> {
    deltas
        .iter()
        .map(|account| Ok((account.address.clone(), decode_state(&account.delta)?)))
        .collect()
}

/// Base64 state key to its (lossy) UTF-8 name.
pub fn decode_key(key: &str) -> Result<String> {
    let raw = try_base64_decode(key).ok_or_else(|| malformed(key, "key is not valid base64"))?;
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

/// Resolve a tagged delta value.
///
/// A non-empty `bytes` payload wins over `uint`. Empty bytes defer to `uint`
/// when one is present, and decode to empty text otherwise. With neither
/// present the entry is a deletion.
pub fn resolve_value(key: &str, value: &DeltaValue) -> Result<ReadableValue> {
    DeltaAction::try_from(value.action)
        .map_err(|tag| malformed(key, &format!("unknown action {}", tag)))?;

    match (value.bytes.as_deref(), value.uint) {
        (Some(""), Some(uint)) | (None, Some(uint)) => Ok(ReadableValue::Uint(uint)),
        (Some(b64), _) => {
            let raw = try_base64_decode(b64)
                .ok_or_else(|| malformed(key, "bytes are not valid base64"))?;
            Ok(resolve_bytes(&raw))
        }
        (None, None) => Ok(ReadableValue::Deleted),
    }
}

/// Address if the bytes encode to a valid address, text otherwise.
pub fn resolve_bytes(raw: &[u8]) -> ReadableValue {
    let candidate = encode_address_bytes(raw);
    if is_valid_address(&candidate) {
        ReadableValue::Address(candidate)
    } else {
        ReadableValue::Text(String::from_utf8_lossy(raw).into_owned())
    }
}

fn malformed(key: &str, reason: &str) -> anyhow::Error {
    HarnessError::MalformedDelta {
        key: key.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

/// Readable deltas on a dry-run transaction result.
pub trait ReadableDelta {
    fn readable_global_delta(&self) -> Result<ReadableState>;
    fn readable_local_deltas(&self) -> Result<BTreeMap<String, ReadableState>>;
}

impl ReadableDelta for DryRunTxnResult {
    fn readable_global_delta(&self) -> Result<ReadableState> {
        decode_state(&self.global_delta)
    }

    fn readable_local_deltas(&self) -> Result<BTreeMap<String, ReadableState>> {
        decode_local_deltas(&self.local_deltas)
    }
}
