#![allow(dead_code)]
#![allow(unused_imports)]
//! Shared test utilities for integration tests.
//!
//! # Modules
//!
//! - `fixtures`: Canned deltas, programs and config
//! - `mocks`: In-memory node and wallet service
//! - `network`: Gating for tests that need a running sandbox

pub mod fixtures;
pub mod mocks;
pub mod network;

pub use fixtures::{auction_delta, harness_config, write_programs};
pub use mocks::{MockNode, MockWallet};
