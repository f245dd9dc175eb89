//! Poseidon hashing over the BN254 scalar field.
//!
//! All hashes use the circom parameter set (x^5 S-box, BN254), so commitments
//! produced here match the ones computed inside the circuit byte for byte.

use crate::{FieldElement, PrimitiveError};
use ark_bn254::Fr;
use light_poseidon::{Poseidon, PoseidonHasher};

/// Hashes `inputs` with the circom Poseidon instance of matching arity.
///
/// # Errors
/// Returns [`PrimitiveError::InvalidInput`] when no parameter set exists for
/// the given arity (supported widths are 1 through 12 inputs).
pub fn poseidon_hash(inputs: &[FieldElement]) -> Result<FieldElement, PrimitiveError> {
    let elements: Vec<Fr> = inputs.iter().map(|fe| fe.0).collect();
    let mut hasher =
        Poseidon::<Fr>::new_circom(elements.len()).map_err(|e| PrimitiveError::InvalidInput {
            attribute: "poseidon".to_string(),
            reason: e.to_string(),
        })?;
    let digest = hasher
        .hash(&elements)
        .map_err(|e| PrimitiveError::InvalidInput {
            attribute: "poseidon".to_string(),
            reason: e.to_string(),
        })?;
    Ok(FieldElement::from(digest))
}

/// Two-to-one Poseidon compression used for Merkle tree nodes.
///
/// # Errors
/// Propagates [`PrimitiveError::InvalidInput`] from [`poseidon_hash`].
pub fn poseidon_compress(
    left: FieldElement,
    right: FieldElement,
) -> Result<FieldElement, PrimitiveError> {
    poseidon_hash(&[left, right])
}
