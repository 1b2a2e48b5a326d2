//! Core of the contract test harness.
//!
//! The pieces a scenario strings together, leaves first:
//!
//! - [`provisioner`] - funded accounts from the wallet service, fresh accounts
//! - [`compiler`] - program source to bytecode through the node
//! - [`builder`] - payment, close-out and app-create transactions
//! - [`dryrun`] - simulation requests, persisted as `<label>.dr`
//! - [`state_delta`] - readable view of a simulation's state changes
//! - [`submit`] - submission and bounded confirmation polling
//!
//! All node and wallet access goes through [`algo_transport::NodeApi`] and
//! [`algo_transport::WalletApi`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use algo_sandbox_core::dryrun::DryRunBuilder;
//! use algo_sandbox_core::state_delta::ReadableDelta;
//!
//! let handle = DryRunBuilder::new(&algod, "./dryruns").build(&[signed], "app_create", None)?;
//! let response = handle.submit(&algod)?;
//! assert!(response.approval_passed());
//! let state = response.txns[0].readable_global_delta()?;
//! ```

pub mod builder;
pub mod compiler;
pub mod config;
pub mod dryrun;
pub mod errors;
pub mod provisioner;
pub mod state_delta;
pub mod submit;

#[cfg(test)]
pub(crate) mod test_utils;

pub use builder::{AppPrograms, TransactionBuilder};
pub use config::{AppSchema, HarnessConfig};
pub use dryrun::{DryRunBuilder, DryRunHandle};
pub use errors::{harness_error, HarnessError};
pub use provisioner::{generate_account, list_funded_accounts, WalletHandle};
pub use state_delta::{decode_state, ReadableDelta, ReadableState, ReadableValue};
pub use submit::{send_transaction, wait_for_confirmation};
