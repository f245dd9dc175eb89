//! One-way derivations binding a verified token to an identity.
//!
//! All commitments use Poseidon so the registry can recompute them from
//! public values; SHA-256 stays reserved for the token digest where standard
//! RSA tooling dictates the hash.

use ark_bn254::Fr;

use crate::error::VerificationError;
use crate::rsa::{LIMB_BITS, LIMB_COUNT};
use crate::{MAX_DOMAIN_LEN, MAX_EMAIL_LEN};
use zk_jwt_primitives::{hash::poseidon_hash, BoundedBytes, FieldElement};

/// Packs 17 limbs of 121 bits into 9 field elements, two limbs per element.
///
/// Each element carries `limb[2j] + limb[2j+1] * 2^121`, 242 bits and well
/// below the field modulus; the last element carries the final limb alone.
pub(crate) fn pair_limbs(limbs: &[u128; LIMB_COUNT]) -> Vec<FieldElement> {
    let shift = Fr::from(1u128 << LIMB_BITS);
    limbs
        .chunks(2)
        .map(|pair| {
            let mut element = Fr::from(pair[0]);
            if let Some(&high) = pair.get(1) {
                element += Fr::from(high) * shift;
            }
            FieldElement::from(element)
        })
        .collect()
}

/// Poseidon commitment to an RSA modulus.
///
/// # Errors
/// Propagates [`VerificationError::Primitive`] from the hash.
pub fn public_key_hash(modulus: &[u128; LIMB_COUNT]) -> Result<FieldElement, VerificationError> {
    Ok(poseidon_hash(&pair_limbs(modulus))?)
}

/// Poseidon commitment to an RSA signature, used externally to reject
/// replays of the same physical token.
///
/// # Errors
/// Propagates [`VerificationError::Primitive`] from the hash.
pub fn jwt_nullifier(signature: &[u128; LIMB_COUNT]) -> Result<FieldElement, VerificationError> {
    Ok(poseidon_hash(&pair_limbs(signature))?)
}

/// Poseidon commitment binding an email address to an account code.
///
/// The email enters as its 9 packed lanes followed by the code, so the salt
/// is deterministic per (email, code) pair and non-enumerable without the
/// code.
///
/// # Errors
/// Propagates [`VerificationError::Primitive`] from the hash.
pub fn account_salt(
    email: &BoundedBytes<MAX_EMAIL_LEN>,
    account_code: FieldElement,
) -> Result<FieldElement, VerificationError> {
    let mut inputs = email.to_lanes();
    inputs.push(account_code);
    Ok(poseidon_hash(&inputs)?)
}

/// Poseidon commitment to a domain name, used as the anonymity-set leaf.
///
/// # Errors
/// Propagates [`VerificationError::Primitive`] from the hash.
pub fn domain_leaf(
    domain: &BoundedBytes<MAX_DOMAIN_LEN>,
) -> Result<FieldElement, VerificationError> {
    Ok(poseidon_hash(&domain.to_lanes())?)
}

/// Extracts the domain part of an email address.
///
/// # Errors
/// Returns [`VerificationError::MalformedEmail`] unless the address contains
/// exactly one `@` with non-empty text on both sides, and
/// [`VerificationError::LengthOutOfBounds`] if the domain exceeds its
/// capacity.
pub fn email_domain(
    email: &BoundedBytes<MAX_EMAIL_LEN>,
) -> Result<BoundedBytes<MAX_DOMAIN_LEN>, VerificationError> {
    let data = email.as_slice();
    let mut positions = data.iter().enumerate().filter(|(_, &byte)| byte == b'@');
    let (at, _) = positions.next().ok_or(VerificationError::MalformedEmail)?;
    if positions.next().is_some() {
        return Err(VerificationError::MalformedEmail);
    }
    let domain = &data[at + 1..];
    if at == 0 || domain.is_empty() {
        return Err(VerificationError::MalformedEmail);
    }
    if domain.len() > MAX_DOMAIN_LEN {
        return Err(VerificationError::LengthOutOfBounds {
            attribute: "domain",
            len: domain.len(),
            max: MAX_DOMAIN_LEN,
        });
    }
    Ok(BoundedBytes::new(domain)?)
}
