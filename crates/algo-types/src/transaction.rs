//! Transaction types and their canonical wire form.
//!
//! Every struct here is encoded as a msgpack map whose keys are the short
//! wire names (`amt`, `snd`, `type`, ...). Fields are declared in lexicographic
//! key order and empty values are skipped, so `rmp_serde::to_vec_named`
//! produces the canonical encoding that signatures and transaction ids are
//! computed over.
//!
//! Decoding is strict: a key this module does not model is a decode error, so
//! a decoded transaction always re-encodes to the bytes it was read from.

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use serde_bytes::ByteBuf;
use sha2::{Digest, Sha512_256};
use std::fmt;

use crate::address::Address;
use crate::encoding::{
    base32_encode, fixed_bytes_serde, from_msgpack, is_zero, to_canonical_msgpack,
};

/// Domain separation prefix for transaction signatures and ids.
pub const TX_PREFIX: &[u8] = b"TX";

/// Number of rounds a built transaction stays valid.
pub const DEFAULT_VALIDITY_WINDOW: u64 = 1000;

/// 32-byte hash (genesis hash, group id).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HashDigest(pub [u8; 32]);

fixed_bytes_serde!(HashDigest, 32);

impl fmt::Debug for HashDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashDigest({})", crate::encoding::base64_encode(&self.0))
    }
}

/// 64-byte ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

fixed_bytes_serde!(Signature, 64);

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", crate::encoding::base64_encode(&self.0))
    }
}

/// Transaction id: base32 of SHA-512/256 over the prefixed transaction bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub String);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxType {
    Payment,
    ApplicationCall,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Payment => "pay",
            TxType::ApplicationCall => "appl",
        }
    }
}

impl Serialize for TxType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TxType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.as_str() {
            "pay" => Ok(TxType::Payment),
            "appl" => Ok(TxType::ApplicationCall),
            other => Err(serde::de::Error::custom(format!(
                "unsupported transaction type '{}'",
                other
            ))),
        }
    }
}

/// What happens to the application after an application call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u64)]
pub enum OnComplete {
    #[default]
    NoOp = 0,
    OptIn = 1,
    CloseOut = 2,
    ClearState = 3,
    UpdateApplication = 4,
    DeleteApplication = 5,
}

impl OnComplete {
    pub fn is_noop(&self) -> bool {
        matches!(self, OnComplete::NoOp)
    }
}

impl TryFrom<u64> for OnComplete {
    type Error = anyhow::Error;

    fn try_from(value: u64) -> Result<Self> {
        Ok(match value {
            0 => OnComplete::NoOp,
            1 => OnComplete::OptIn,
            2 => OnComplete::CloseOut,
            3 => OnComplete::ClearState,
            4 => OnComplete::UpdateApplication,
            5 => OnComplete::DeleteApplication,
            other => return Err(anyhow!("Unknown on-completion value {}", other)),
        })
    }
}

impl Serialize for OnComplete {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(*self as u64)
    }
}

impl<'de> Deserialize<'de> for OnComplete {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u64::deserialize(deserializer)?;
        OnComplete::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// Storage schema of an application (global or local).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateSchema {
    #[serde(rename = "nbs", default, skip_serializing_if = "is_zero")]
    pub num_byte_slices: u64,
    #[serde(rename = "nui", default, skip_serializing_if = "is_zero")]
    pub num_uints: u64,
}

impl StateSchema {
    pub fn new(num_uints: u64, num_byte_slices: u64) -> Self {
        Self {
            num_byte_slices,
            num_uints,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.num_byte_slices == 0 && self.num_uints == 0
    }
}

/// Network parameters a transaction is built against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedParams {
    /// Fee per byte, or the total fee when `flat_fee` is set.
    pub fee: u64,
    pub min_fee: u64,
    pub flat_fee: bool,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_id: String,
    pub genesis_hash: HashDigest,
    pub consensus_version: String,
}

/// Box an application call may touch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoxReference {
    /// Index into the foreign apps (0 is the called app).
    #[serde(rename = "i", default, skip_serializing_if = "is_zero")]
    pub app_index: u64,
    #[serde(
        rename = "n",
        default,
        with = "serde_bytes",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub name: Vec<u8>,
}

/// A transaction in its decoded (structured) form.
///
/// Fields are kept in wire-key order; do not reorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Transaction {
    #[serde(rename = "amt", default, skip_serializing_if = "is_zero")]
    pub amount: u64,
    #[serde(rename = "apaa", default, skip_serializing_if = "Vec::is_empty")]
    pub app_args: Vec<ByteBuf>,
    #[serde(rename = "apan", default, skip_serializing_if = "OnComplete::is_noop")]
    pub on_complete: OnComplete,
    #[serde(
        rename = "apap",
        default,
        with = "serde_bytes",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub approval_program: Vec<u8>,
    #[serde(rename = "apas", default, skip_serializing_if = "Vec::is_empty")]
    pub foreign_assets: Vec<u64>,
    #[serde(rename = "apat", default, skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<Address>,
    #[serde(rename = "apbx", default, skip_serializing_if = "Vec::is_empty")]
    pub boxes: Vec<BoxReference>,
    #[serde(rename = "apep", default, skip_serializing_if = "is_zero")]
    pub extra_pages: u64,
    #[serde(rename = "apfa", default, skip_serializing_if = "Vec::is_empty")]
    pub foreign_apps: Vec<u64>,
    #[serde(rename = "apgs", default, skip_serializing_if = "StateSchema::is_empty")]
    pub global_schema: StateSchema,
    #[serde(rename = "apid", default, skip_serializing_if = "is_zero")]
    pub app_id: u64,
    #[serde(rename = "apls", default, skip_serializing_if = "StateSchema::is_empty")]
    pub local_schema: StateSchema,
    #[serde(
        rename = "apsu",
        default,
        with = "serde_bytes",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub clear_program: Vec<u8>,
    #[serde(rename = "close", default, skip_serializing_if = "Option::is_none")]
    pub close_remainder_to: Option<Address>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub fee: u64,
    #[serde(rename = "fv", default, skip_serializing_if = "is_zero")]
    pub first_valid: u64,
    #[serde(rename = "gen", default, skip_serializing_if = "String::is_empty")]
    pub genesis_id: String,
    #[serde(rename = "gh")]
    pub genesis_hash: HashDigest,
    #[serde(rename = "grp", default, skip_serializing_if = "Option::is_none")]
    pub group: Option<HashDigest>,
    #[serde(rename = "lv", default, skip_serializing_if = "is_zero")]
    pub last_valid: u64,
    #[serde(rename = "lx", default, skip_serializing_if = "Option::is_none")]
    pub lease: Option<HashDigest>,
    #[serde(
        default,
        with = "serde_bytes",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub note: Vec<u8>,
    #[serde(rename = "rcv", default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<Address>,
    #[serde(rename = "rekey", default, skip_serializing_if = "Option::is_none")]
    pub rekey_to: Option<Address>,
    #[serde(rename = "snd")]
    pub sender: Address,
    #[serde(rename = "type")]
    pub tx_type: TxType,
}

impl Transaction {
    /// Skeleton transaction of the given type with validity and network fields set.
    pub fn with_params(tx_type: TxType, sender: Address, params: &SuggestedParams) -> Self {
        Self {
            amount: 0,
            app_args: Vec::new(),
            on_complete: OnComplete::NoOp,
            approval_program: Vec::new(),
            foreign_assets: Vec::new(),
            accounts: Vec::new(),
            boxes: Vec::new(),
            extra_pages: 0,
            foreign_apps: Vec::new(),
            global_schema: StateSchema::default(),
            app_id: 0,
            local_schema: StateSchema::default(),
            clear_program: Vec::new(),
            close_remainder_to: None,
            fee: 0,
            first_valid: params.first_valid,
            genesis_id: params.genesis_id.clone(),
            genesis_hash: params.genesis_hash,
            group: None,
            last_valid: params.last_valid,
            lease: None,
            note: Vec::new(),
            receiver: None,
            rekey_to: None,
            sender,
            tx_type,
        }
    }

    /// Canonical msgpack bytes of this transaction.
    pub fn encode(&self) -> Result<Vec<u8>> {
        to_canonical_msgpack(self, "transaction")
    }

    /// Bytes covered by the sender's signature: `"TX" || encode()`.
    pub fn bytes_to_sign(&self) -> Result<Vec<u8>> {
        let encoded = self.encode()?;
        let mut out = Vec::with_capacity(TX_PREFIX.len() + encoded.len());
        out.extend_from_slice(TX_PREFIX);
        out.extend_from_slice(&encoded);
        Ok(out)
    }

    pub fn id(&self) -> Result<TransactionId> {
        let digest = Sha512_256::digest(self.bytes_to_sign()?);
        Ok(TransactionId(base32_encode(&digest)))
    }

    /// Whether this transaction creates a new application.
    pub fn is_app_create(&self) -> bool {
        self.tx_type == TxType::ApplicationCall && self.app_id == 0
    }

    /// Set the fee from suggested params.
    ///
    /// With a flat fee the suggested value is used as-is, even below the
    /// network minimum. Otherwise the fee is
    /// the per-byte rate times the size of the signed encoding, floored at the
    /// network minimum.
    pub fn assign_fee(&mut self, params: &SuggestedParams) -> Result<()> {
        if params.flat_fee {
            self.fee = params.fee;
            return Ok(());
        }
        let size = self.estimate_signed_size()? as u64;
        self.fee = params.fee.saturating_mul(size).max(params.min_fee);
        Ok(())
    }

    fn estimate_signed_size(&self) -> Result<usize> {
        let placeholder = SignedTransaction::with_sig(self.clone(), Signature([0u8; 64]));
        Ok(placeholder.encode()?.len())
    }
}

/// One participant slot of a multisignature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MultisigSubsig {
    pub pk: Address,
    #[serde(rename = "s", default, skip_serializing_if = "Option::is_none")]
    pub sig: Option<Signature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MultisigSig {
    #[serde(rename = "subsig", default, skip_serializing_if = "Vec::is_empty")]
    pub subsigs: Vec<MultisigSubsig>,
    #[serde(rename = "thr", default, skip_serializing_if = "is_zero")]
    pub threshold: u64,
    #[serde(rename = "v", default, skip_serializing_if = "is_zero")]
    pub version: u64,
}

/// Logic signature: a program (plus arguments) that approves the transaction,
/// optionally delegated by a single or multi signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogicSig {
    #[serde(rename = "arg", default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ByteBuf>,
    #[serde(rename = "l", default, with = "serde_bytes")]
    pub program: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msig: Option<MultisigSig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sig: Option<Signature>,
}

/// A transaction plus what authorizes it: exactly one of `sig`, `msig` or
/// `lsig`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignedTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lsig: Option<LogicSig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msig: Option<MultisigSig>,
    /// Authorizing address when the sender has been rekeyed.
    #[serde(rename = "sgnr", default, skip_serializing_if = "Option::is_none")]
    pub auth_address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sig: Option<Signature>,
    pub txn: Transaction,
}

impl SignedTransaction {
    /// A transaction authorized by a plain ed25519 signature.
    pub fn with_sig(txn: Transaction, sig: Signature) -> Self {
        Self {
            lsig: None,
            msig: None,
            auth_address: None,
            sig: Some(sig),
            txn,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        to_canonical_msgpack(self, "signed transaction")
    }

    /// Decode a signed transaction from its wire bytes.
    ///
    /// Fails on unknown keys and unless exactly one authorization is present.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let stx: SignedTransaction = from_msgpack(bytes, "signed transaction")?;
        let authorizations = [stx.sig.is_some(), stx.msig.is_some(), stx.lsig.is_some()]
            .into_iter()
            .filter(|present| *present)
            .count();
        match authorizations {
            0 => bail!("Signed transaction is missing its signature"),
            1 => Ok(stx),
            n => bail!("Signed transaction carries {} authorizations, expected one", n),
        }
    }

    pub fn id(&self) -> Result<TransactionId> {
        self.txn.id()
    }
}
