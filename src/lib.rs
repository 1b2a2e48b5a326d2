//! Algorand Sandbox Test Harness
//!
//! Tools for exercising smart contracts against a local sandbox node:
//!
//! - **Provisioning**: funded accounts from the wallet service, fresh accounts
//! - **Transactions**: payments, close-outs and app creation, signed locally
//! - **Dry runs**: simulation requests persisted as canonical msgpack
//! - **State deltas**: readable view of what a simulation changed
//!
//! See [`harness`] for the per-step API and [`scenario`] for the app-creation
//! scenario built on it.

pub mod harness;
pub mod scenario;

pub use harness::Harness;
pub use scenario::AppCreationScenario;
