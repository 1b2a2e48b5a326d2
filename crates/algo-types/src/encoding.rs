//! Encoding utilities for base64, base32 and canonical msgpack.
//!
//! Provides shared encoding/decoding functions used across workspace crates.
//! These eliminate repetitive error handling patterns.

use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

// =============================================================================
// Base64 Encoding/Decoding
// =============================================================================

/// Encode bytes to base64 string.
pub fn base64_encode(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Decode base64 string to bytes with context-aware error message.
///
/// # Arguments
/// * `b64` - Base64 encoded string
/// * `context` - Description for error messages (e.g., "state key", "compiled program")
pub fn base64_decode(b64: &str, context: &str) -> Result<Vec<u8>> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(b64)
        .map_err(|e| anyhow!("Failed to decode {} from base64: {}", context, e))
}

/// Decode base64 string to bytes, returning None on failure.
pub fn try_base64_decode(b64: &str) -> Option<Vec<u8>> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.decode(b64).ok()
}

// =============================================================================
// Base32 (addresses and transaction ids)
// =============================================================================

/// Encode bytes as unpadded RFC 4648 base32.
pub fn base32_encode(bytes: &[u8]) -> String {
    data_encoding::BASE32_NOPAD.encode(bytes)
}

/// Decode unpadded RFC 4648 base32, returning None on failure.
pub fn try_base32_decode(s: &str) -> Option<Vec<u8>> {
    data_encoding::BASE32_NOPAD.decode(s.as_bytes()).ok()
}

// =============================================================================
// Canonical msgpack
// =============================================================================

/// Serialize a value with the ledger's canonical msgpack encoding.
///
/// Structs are written as maps keyed by field name. Canonical form relies on
/// every wire struct declaring its fields in lexicographic key order and
/// skipping empty values, which all types in this crate do.
pub fn to_canonical_msgpack<T: Serialize + ?Sized>(value: &T, context: &str) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(value).map_err(|e| anyhow!("Failed to encode {}: {}", context, e))
}

/// Decode a msgpack value with context-aware error message.
pub fn from_msgpack<T: DeserializeOwned>(bytes: &[u8], context: &str) -> Result<T> {
    rmp_serde::from_slice(bytes).map_err(|e| anyhow!("Failed to decode {}: {}", context, e))
}

pub(crate) fn is_zero(value: &u64) -> bool {
    *value == 0
}

// =============================================================================
// Serde helpers
// =============================================================================

/// Bytes that are base64 text in JSON and raw bytes everywhere else.
///
/// Serializes as a binary blob (msgpack `bin`). Deserializes from either a
/// base64 string (node JSON responses) or a binary blob (msgpack files).
pub mod flex_bytes {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(bytes)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FlexVisitor;

        impl<'de> Visitor<'de> for FlexVisitor {
            type Value = Vec<u8>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("base64 string or byte array")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                super::try_base64_decode(v)
                    .ok_or_else(|| E::custom(format!("invalid base64 '{}'", v)))
            }

            fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
                Ok(v.to_vec())
            }

            fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
                Ok(v)
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut out = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(b) = seq.next_element::<u8>()? {
                    out.push(b);
                }
                Ok(out)
            }
        }

        deserializer.deserialize_any(FlexVisitor)
    }
}

/// Fixed-size byte arrays serialized as a single binary blob.
macro_rules! fixed_bytes_serde {
    ($ty:ident, $len:expr) => {
        impl serde::Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_bytes(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let bytes = $crate::encoding::flex_bytes::deserialize(deserializer)?;
                let arr: [u8; $len] = bytes.as_slice().try_into().map_err(|_| {
                    serde::de::Error::invalid_length(bytes.len(), &concat!(stringify!($len), " bytes"))
                })?;
                Ok($ty(arr))
            }
        }
    };
}

pub(crate) use fixed_bytes_serde;

/// Top-level keys of an encoded msgpack map, in encoded order.
#[cfg(test)]
pub(crate) fn map_keys(encoded: &[u8]) -> Vec<String> {
    use serde::de::{Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
    use std::fmt;

    struct KeyOrder(Vec<String>);

    impl<'de> Deserialize<'de> for KeyOrder {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            struct KeysVisitor;
            impl<'de> Visitor<'de> for KeysVisitor {
                type Value = KeyOrder;
                fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str("a map")
                }
                fn visit_map<A: MapAccess<'de>>(self, mut m: A) -> Result<KeyOrder, A::Error> {
                    let mut keys = Vec::new();
                    while let Some((k, _)) = m.next_entry::<String, IgnoredAny>()? {
                        keys.push(k);
                    }
                    Ok(KeyOrder(keys))
                }
            }
            d.deserialize_map(KeysVisitor)
        }
    }

    rmp_serde::from_slice::<KeyOrder>(encoded)
        .map(|keys| keys.0)
        .unwrap_or_default()
}
