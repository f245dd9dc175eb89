//! Serialization utilities shared across the verification crates.
//!
//! This module provides serde helpers for serializing numeric types as `0x`-prefixed
//! hex strings and for fixed-size arrays larger than serde's derive support.

#![allow(clippy::missing_errors_doc)]

use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

/// Serialize/deserialize `u64` as a `0x`-prefixed hex string.
pub mod hex_u64 {
    use super::*;

    /// Serialize a `u64` as a `0x`-prefixed hex string.
    pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{value:#x}"))
    }

    /// Deserialize a `u64` from a hex string (with or without `0x` prefix).
    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let s = s.trim_start_matches("0x");
        u64::from_str_radix(s, 16).map_err(|e| D::Error::custom(format!("invalid hex u64: {e}")))
    }
}

/// Serialize/deserialize fixed-size arrays via an intermediate slice.
///
/// Serde only derives arrays up to 32 elements; this helper covers the larger
/// fixed-size arrays used for Merkle paths and RSA limb vectors.
pub mod array_serde {
    use super::*;

    /// Serialize a fixed-size array as a sequence.
    pub fn serialize<S, T, const N: usize>(array: &[T; N], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        array.as_slice().serialize(serializer)
    }

    /// Deserialize a fixed-size array, rejecting sequences of any other length.
    pub fn deserialize<'de, D, T, const N: usize>(deserializer: D) -> Result<[T; N], D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        let vec = Vec::<T>::deserialize(deserializer)?;
        let len = vec.len();
        vec.try_into()
            .map_err(|_| D::Error::custom(format!("Expected array of size {N}, got {len}")))
    }
}
