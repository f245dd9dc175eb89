//! Base types for the zk-jwt protocol.
//!
//! It implements the primitives every other layer builds on: field elements,
//! bounded byte buffers, lane packing, public outputs, and the domain
//! membership proof.
//!
//! Importantly, this crate keeps dependencies to a minimum and does not
//! implement any verification logic beyond the invariants of the types
//! themselves.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![deny(clippy::all, clippy::nursery, missing_docs, dead_code)]

use ark_bn254::Fr;
use ark_ff::{BigInteger, Field, PrimeField, UniformRand};
use num_bigint::BigUint;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, ops::Deref, str::FromStr};

/// Fixed-capacity byte buffers with a logical length and the zero-padding
/// invariant, plus 31-byte lane packing.
pub mod bounded;
pub use bounded::{BoundedBytes, LANE_BYTES};

/// Rendering of verification instances into circuit signal maps.
///
/// These types are used to prepare the inputs consumed by the external
/// proving toolchain.
pub mod circuit_inputs;
pub use circuit_inputs::CircuitInput;

/// Poseidon hashing helpers over the proof system's field.
pub mod hash;

/// Contains base types for operations with Merkle trees.
pub mod merkle;
pub use merkle::DomainMembershipProof;

/// The ordered public-output bundle of a verification instance.
pub mod outputs;
pub use outputs::{AnonymityOutputs, JwtPublicOutputs};

pub mod serde_utils;

/// Represents an element of the field the proof system operates over.
///
/// The zk-jwt protocol works in the scalar field of the BN254 curve
/// throughout; every derived commitment, packed lane, and public output is
/// one of these.
///
/// This wrapper ensures consistent serialization and deserialization of field
/// elements, where string-based serialization is done with hex encoding and
/// binary serialization is done with byte vectors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FieldElement(Fr);

impl FieldElement {
    /// The additive identity of the field.
    pub const ZERO: Self = Self(Fr::ZERO);
    /// The multiplicative identity of the field.
    pub const ONE: Self = Self(Fr::ONE);

    /// Returns the 32-byte big-endian representation of this field element.
    #[must_use]
    pub fn to_be_bytes(&self) -> [u8; 32] {
        let repr = self.0.into_bigint().to_bytes_be();
        let mut out = [0u8; 32];
        out[32 - repr.len()..].copy_from_slice(&repr);
        out
    }

    /// Constructs a field element from a 32-byte big-endian representation.
    ///
    /// Unlike modulo-reducing conversions, this rejects values >= the field
    /// modulus.
    ///
    /// # Errors
    /// Returns [`PrimitiveError::NotInField`] if the value is >= the field
    /// modulus.
    pub fn from_be_bytes(be_bytes: &[u8; 32]) -> Result<Self, PrimitiveError> {
        if BigUint::from_bytes_be(be_bytes) >= Self::modulus() {
            return Err(PrimitiveError::NotInField);
        }
        Ok(Self(Fr::from_be_bytes_mod_order(be_bytes)))
    }

    /// Deserializes a field element from a big-endian byte slice.
    ///
    /// # Warning
    /// Use this function carefully. This function will perform modulo
    /// reduction on the input, which may lead to unexpected results if the
    /// input should not be reduced.
    #[must_use]
    pub fn from_be_bytes_mod_order(bytes: &[u8]) -> Self {
        Self(Fr::from_be_bytes_mod_order(bytes))
    }

    /// Generates a random field element using the provided CSPRNG.
    #[must_use]
    pub fn random<R: rand::CryptoRng + rand::RngCore>(rng: &mut R) -> Self {
        Self(Fr::rand(rng))
    }

    /// The field modulus as a big integer.
    pub(crate) fn modulus() -> BigUint {
        BigUint::from_bytes_be(&Fr::MODULUS.to_bytes_be())
    }
}

impl Deref for FieldElement {
    type Target = Fr;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromStr for FieldElement {
    type Err = PrimitiveError;

    /// Parses a field element from a hex string (with optional "0x" prefix).
    ///
    /// The value must be lower than the modulus and strictly 32 bytes with
    /// padding, so every element has exactly one accepted string encoding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim_start_matches("0x");
        let bytes = hex::decode(s)
            .map_err(|e| PrimitiveError::Deserialization(format!("Invalid hex encoding: {e}")))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| PrimitiveError::Deserialization("expected 32 bytes".to_string()))?;
        Self::from_be_bytes(&bytes)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_be_bytes()))
    }
}

impl From<Fr> for FieldElement {
    fn from(value: Fr) -> Self {
        Self(value)
    }
}

impl From<FieldElement> for Fr {
    fn from(value: FieldElement) -> Self {
        value.0
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self(Fr::from(value))
    }
}

impl From<u128> for FieldElement {
    fn from(value: u128) -> Self {
        Self(Fr::from(value))
    }
}

impl From<bool> for FieldElement {
    fn from(value: bool) -> Self {
        Self(Fr::from(u64::from(value)))
    }
}

impl Serialize for FieldElement {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            serializer.serialize_bytes(&self.to_be_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for FieldElement {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Self::from_str(&s).map_err(D::Error::custom)
        } else {
            let bytes = Vec::<u8>::deserialize(deserializer)?;
            let bytes: [u8; 32] = bytes
                .try_into()
                .map_err(|_| D::Error::custom("expected 32 bytes"))?;
            Self::from_be_bytes(&bytes).map_err(D::Error::custom)
        }
    }
}

/// Generic errors that may occur while constructing or serializing the base
/// types.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum PrimitiveError {
    /// Error that occurs when serializing a value. Generally not expected.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error that occurs when deserializing a value. This can happen often
    /// when not providing valid inputs.
    #[error("Deserialization error: {0}")]
    Deserialization(String),
    /// Number is equal or larger than the target field modulus.
    #[error("Provided value is not in the field")]
    NotInField,
    /// Index or length is out of bounds.
    #[error("Provided index is out of bounds")]
    OutOfBounds,
    /// A bounded buffer carried nonzero bytes beyond its logical length.
    #[error("bytes beyond the logical length must be zero")]
    NonZeroPadding,
    /// Invalid input provided (e.g., incorrect length, format, etc.)
    #[error("Invalid input at {attribute}: {reason}")]
    InvalidInput {
        /// The attribute that is invalid
        attribute: String,
        /// The reason the input is invalid
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HEX: &str = "0x11d223ce7b91ac212f42cf50f0a3439ae3fcdba4ea32acb7f194d1051ed324c2";

    fn sample() -> FieldElement {
        FieldElement::from_str(SAMPLE_HEX).unwrap()
    }

    #[test]
    fn test_field_element_encoding() {
        let root = sample();

        assert_eq!(
            serde_json::to_string(&root).unwrap(),
            format!("\"{SAMPLE_HEX}\"")
        );
        assert_eq!(root.to_string(), SAMPLE_HEX);

        assert_eq!(
            serde_json::to_string(&FieldElement::ONE).unwrap(),
            "\"0x0000000000000000000000000000000000000000000000000000000000000001\""
        );
        assert_eq!(
            serde_json::to_string(&FieldElement::ZERO).unwrap(),
            "\"0x0000000000000000000000000000000000000000000000000000000000000000\""
        );

        assert_eq!(*FieldElement::ONE, Fr::from(1u64));
    }

    #[test]
    fn test_field_element_decoding() {
        assert_eq!(
            serde_json::from_str::<FieldElement>(&format!("\"{SAMPLE_HEX}\"")).unwrap(),
            sample()
        );

        assert_eq!(
            FieldElement::from_str(
                "0x0000000000000000000000000000000000000000000000000000000000000001"
            )
            .unwrap(),
            FieldElement::ONE
        );
    }

    #[test]
    fn test_simple_bytes_encoding() {
        let fe = FieldElement::ONE;
        let bytes = fe.to_be_bytes();
        let mut expected = [0u8; 32];
        expected[31] = 1;
        assert_eq!(bytes, expected);

        let reversed = FieldElement::from_be_bytes(&bytes).unwrap();
        assert_eq!(reversed, fe);
    }

    #[test]
    fn test_field_element_cbor_encoding_roundtrip() {
        let root = sample();

        let mut buffer = Vec::new();
        ciborium::into_writer(&root, &mut buffer).unwrap();

        let decoded: FieldElement = ciborium::from_reader(&buffer[..]).unwrap();
        assert_eq!(root, decoded);
    }

    #[test]
    fn test_field_element_binary_encoding_format() {
        let root = sample();

        let mut buffer = Vec::new();
        ciborium::into_writer(&root, &mut buffer).unwrap();

        assert_eq!(buffer.len(), 34); // CBOR header (2 bytes) + field element (32 bytes)
        assert_eq!(buffer[0], 0x58); // CBOR byte string, 1-byte length follows
        assert_eq!(buffer[1], 0x20); // Length = 32 bytes

        let field_bytes = &buffer[2..];
        assert_eq!(field_bytes.len(), 32);

        let expected_be_bytes = hex::decode(SAMPLE_HEX.trim_start_matches("0x")).unwrap();
        assert_eq!(field_bytes, expected_be_bytes.as_slice());
    }

    #[test]
    fn test_to_be_bytes_from_be_bytes_roundtrip() {
        let values = [
            FieldElement::ZERO,
            FieldElement::ONE,
            FieldElement::from(255u64),
            FieldElement::from(u64::MAX),
            FieldElement::from(u128::MAX),
            sample(),
        ];
        for fe in values {
            let bytes = fe.to_be_bytes();
            let recovered = FieldElement::from_be_bytes(&bytes).unwrap();
            assert_eq!(fe, recovered);
        }
    }

    #[test]
    fn test_from_be_bytes_rejects_value_above_modulus() {
        // The BN254 scalar field is 254 bits
        let bytes = [0xFF; 32];
        assert_eq!(
            FieldElement::from_be_bytes(&bytes),
            Err(PrimitiveError::NotInField)
        );

        let mut modulus_bytes = [0u8; 32];
        let repr = FieldElement::modulus().to_bytes_be();
        modulus_bytes[32 - repr.len()..].copy_from_slice(&repr);
        assert_eq!(
            FieldElement::from_be_bytes(&modulus_bytes),
            Err(PrimitiveError::NotInField)
        );
    }

    #[test]
    fn test_from_be_bytes_mod_order_reduces() {
        let bytes = [0xFF; 32];
        let reduced = FieldElement::from_be_bytes_mod_order(&bytes);
        // The reduced value must round-trip strictly.
        let recovered = FieldElement::from_be_bytes(&reduced.to_be_bytes()).unwrap();
        assert_eq!(reduced, recovered);
    }

    #[test]
    fn test_from_str_rejects_wrong_length() {
        // Too short (< 64 hex chars)
        assert!(FieldElement::from_str("0x01").is_err());
        // Too long (> 64 hex chars)
        assert!(FieldElement::from_str(
            "0x000000000000000000000000000000000000000000000000000000000000000001"
        )
        .is_err());
        // Not hex
        assert!(FieldElement::from_str(
            "0xGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGG"
        )
        .is_err());
    }

    #[test]
    fn test_display_from_str_roundtrip() {
        let fe = sample();
        let s = fe.to_string();
        assert_eq!(FieldElement::from_str(&s).unwrap(), fe);
    }

    #[test]
    fn test_json_cbor_consistency() {
        // The same value serialized through JSON and CBOR should produce the
        // same FieldElement when deserialized back.
        let fe = sample();

        let json_str = serde_json::to_string(&fe).unwrap();
        let from_json: FieldElement = serde_json::from_str(&json_str).unwrap();

        let mut cbor_buf = Vec::new();
        ciborium::into_writer(&fe, &mut cbor_buf).unwrap();
        let from_cbor: FieldElement = ciborium::from_reader(&cbor_buf[..]).unwrap();

        assert_eq!(from_json, from_cbor);
    }

    #[test]
    fn test_to_be_bytes_is_big_endian() {
        let fe = FieldElement::from(1u64);
        let bytes = fe.to_be_bytes();
        assert_eq!(bytes[31], 1); // 1 is in LSB
        assert_eq!(bytes[..31], [0u8; 31]);

        let fe256 = FieldElement::from(256u64);
        let bytes = fe256.to_be_bytes();
        assert_eq!(bytes[30], 1);
        assert_eq!(bytes[31], 0);
    }

    #[test]
    fn test_random_is_strict_roundtrippable() {
        let mut rng = rand::thread_rng();
        for _ in 0..8 {
            let fe = FieldElement::random(&mut rng);
            let recovered = FieldElement::from_be_bytes(&fe.to_be_bytes()).unwrap();
            assert_eq!(fe, recovered);
        }
    }
}
