//! Environment variable parsing utilities.
//!
//! Type-safe helpers for reading configuration overrides from the environment
//! with default values, eliminating repeated boilerplate like:
//!
//! ```ignore
//! std::env::var("VAR_NAME")
//!     .ok()
//!     .and_then(|v| v.parse::<u64>().ok())
//!     .unwrap_or(default_value)
//! ```
//!
//! # Example
//!
//! ```
//! use algo_sandbox_types::env_utils::{env_var, env_string_or};
//!
//! let rounds: u64 = env_var("CONFIRMATION_ROUNDS").unwrap_or(3);
//! let server = env_string_or("ALGOD_SERVER", "http://localhost:4001");
//! ```

use std::str::FromStr;

/// Parse an environment variable into a type that implements `FromStr`.
///
/// Returns `None` if the variable is not set or cannot be parsed.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Get an environment variable as a string with a default value.
///
/// Unlike [`env_string`], an empty value is returned as-is, so credentials
/// such as an empty wallet password can be set explicitly.
pub fn env_string_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a non-empty environment variable.
pub fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
