//! Network-dependent test utilities.
//!
//! Tests that talk to a real sandbox (algod on :4001, kmd on :4002) only run
//! when `RUN_NETWORK_TESTS` is set.

use algo_sandbox_types::env_utils::env_string;

/// Environment variable to enable network tests.
pub const RUN_NETWORK_TESTS_VAR: &str = "RUN_NETWORK_TESTS";

/// Check if network tests should be run.
///
/// Network tests are enabled when `RUN_NETWORK_TESTS` environment variable
/// is set to any non-empty value.
pub fn should_run_network_tests() -> bool {
    env_string(RUN_NETWORK_TESTS_VAR).is_some()
}

/// Macro to skip a test if network tests are not enabled.
///
/// Usage:
/// ```ignore
/// #[test]
/// fn test_against_sandbox() {
///     skip_if_no_network!();
///     // ... sandbox-dependent test code ...
/// }
/// ```
#[macro_export]
macro_rules! skip_if_no_network {
    () => {
        if !$crate::common::network::should_run_network_tests() {
            eprintln!(
                "Skipping {}: {} not set",
                module_path!(),
                $crate::common::network::RUN_NETWORK_TESTS_VAR
            );
            return;
        }
    };
}
