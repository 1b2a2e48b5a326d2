//! Shared types for the algo-sandbox workspace.
//!
//! This crate provides the ledger's data model and its canonical encodings,
//! used by both the transport and core crates.
//!
//! ## Modules
//!
//! - [`address`] - 32-byte addresses and their checksummed base32 form
//! - [`transaction`] - Transactions, signed transactions and suggested params
//! - [`account`] - ed25519 signing accounts
//! - [`ledger`] - Account and application records reported by the node
//! - [`dryrun`] - Dry-run request/response and state-delta wire types
//! - [`encoding`] - base64/base32/msgpack helpers
//! - [`env_utils`] - Environment variable parsing

pub mod account;
pub mod address;
pub mod dryrun;
pub mod encoding;
pub mod env_utils;
pub mod ledger;
pub mod transaction;

// Re-export commonly used types at crate root
pub use account::Account;
pub use address::{application_address, is_valid_address, Address};
pub use dryrun::{
    AccountStateDelta, DeltaAction, DeltaValue, DryRunRequest, DryRunResponse, DryRunTxnResult,
    StateDeltaEntry, APPROVAL_PASS, DEFAULT_LATEST_TIMESTAMP,
};
pub use ledger::{
    AccountRecord, ApplicationLocalState, ApplicationParams, ApplicationRecord, AssetHolding,
    DRYRUN_CREATE_APP_ID,
};
pub use transaction::{
    BoxReference, HashDigest, LogicSig, MultisigSig, MultisigSubsig, OnComplete, Signature,
    SignedTransaction, StateSchema, SuggestedParams, Transaction, TransactionId, TxType,
};
