//! Account address encoding and validation.
//!
//! This module is the canonical source for address handling in the workspace.
//! Other crates should import from here rather than defining their own logic.
//!
//! An address is a 32-byte ed25519 public key. Its textual form is the unpadded
//! base32 encoding of `public_key || checksum`, where the checksum is the last
//! four bytes of SHA-512/256 over the public key. That gives 58 characters:
//!
//! ```text
//! 4WJKB3WQUN33Z7KO4DJCSA6XJJTNSWPJFSHTSYCTWSI2OMWCRFBOCBYLIY
//! ```

use anyhow::{anyhow, Result};
use sha2::{Digest, Sha512_256};
use std::fmt;
use std::str::FromStr;

use crate::encoding::{base32_encode, fixed_bytes_serde, try_base32_decode};

/// Length of the public key an address wraps.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Trailing checksum bytes appended before base32 encoding.
pub const CHECKSUM_LENGTH: usize = 4;

/// Length of a textual address.
pub const ADDRESS_LENGTH: usize = 58;

const APP_ID_PREFIX: &[u8] = b"appID";

/// A 32-byte account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; PUBLIC_KEY_LENGTH]);

fixed_bytes_serde!(Address, 32);

impl Address {
    /// The all-zero address.
    pub const ZERO: Address = Address([0u8; PUBLIC_KEY_LENGTH]);

    pub fn new(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Build an address from a slice that must be exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; PUBLIC_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            anyhow!(
                "Invalid address length: expected {} bytes, got {}",
                PUBLIC_KEY_LENGTH,
                bytes.len()
            )
        })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    /// Textual (base32 + checksum) form of this address.
    pub fn encode(&self) -> String {
        encode_address_bytes(&self.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; PUBLIC_KEY_LENGTH]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.encode())
    }
}

impl FromStr for Address {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        decode_address(s)
    }
}

/// Last four bytes of SHA-512/256 over `bytes`.
pub fn checksum(bytes: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    let digest = Sha512_256::digest(bytes);
    let mut out = [0u8; CHECKSUM_LENGTH];
    out.copy_from_slice(&digest[digest.len() - CHECKSUM_LENGTH..]);
    out
}

/// Encode arbitrary bytes in address form.
///
/// No length check is performed: a slice that is not 32 bytes produces a
/// string that [`is_valid_address`] rejects. Callers that want a typed result
/// use [`Address::from_slice`] instead.
pub fn encode_address_bytes(bytes: &[u8]) -> String {
    let mut buf = Vec::with_capacity(bytes.len() + CHECKSUM_LENGTH);
    buf.extend_from_slice(bytes);
    buf.extend_from_slice(&checksum(bytes));
    base32_encode(&buf)
}

/// Parse a textual address, verifying its length and checksum.
pub fn decode_address(s: &str) -> Result<Address> {
    if s.len() != ADDRESS_LENGTH {
        return Err(anyhow!(
            "Invalid address '{}': expected {} characters, got {}",
            s,
            ADDRESS_LENGTH,
            s.len()
        ));
    }
    let raw = try_base32_decode(s).ok_or_else(|| anyhow!("Invalid address '{}': not base32", s))?;
    if raw.len() != PUBLIC_KEY_LENGTH + CHECKSUM_LENGTH {
        return Err(anyhow!("Invalid address '{}': wrong decoded length", s));
    }
    let (key, sum) = raw.split_at(PUBLIC_KEY_LENGTH);
    if checksum(key) != sum {
        return Err(anyhow!("Invalid address '{}': checksum mismatch", s));
    }
    Address::from_slice(key)
}

/// Check whether a string is a well-formed address with a matching checksum.
pub fn is_valid_address(s: &str) -> bool {
    decode_address(s).is_ok()
}

/// Escrow address controlled by an application.
pub fn application_address(app_id: u64) -> Address {
    let mut hasher = Sha512_256::new();
    hasher.update(APP_ID_PREFIX);
    hasher.update(app_id.to_be_bytes());
    let digest = hasher.finalize();
    let mut out = [0u8; PUBLIC_KEY_LENGTH];
    out.copy_from_slice(&digest);
    Address(out)
}
