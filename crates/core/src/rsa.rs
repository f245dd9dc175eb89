//! RS256 signature verification over 121-bit limb vectors.
//!
//! The circuit represents 2048-bit RSA integers as 17 limbs of 121 bits so
//! limb products fit the field during modular multiplication. This module
//! keeps that interface: moduli and signatures enter as limb vectors, range
//! checks happen per limb, and the final comparison is limb by limb. The
//! exponentiation itself runs on [`BigUint`], which commits to the same
//! square-and-multiply schedule for e = 65537.

use num_bigint::BigUint;

use crate::error::VerificationError;

/// Bits per limb.
pub const LIMB_BITS: usize = 121;
/// Limbs per 2048-bit integer (17 * 121 = 2057 bits).
pub const LIMB_COUNT: usize = 17;
/// Mask of the low [`LIMB_BITS`] bits.
pub const LIMB_MASK: u128 = (1u128 << LIMB_BITS) - 1;

/// DER prefix of the SHA-256 `DigestInfo` from PKCS#1 v1.5.
const SHA256_DIGEST_INFO: [u8; 19] = [
    0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01,
    0x05, 0x00, 0x04, 0x20,
];

/// Length of the 0xFF padding string for a 2048-bit modulus and SHA-256.
const PADDING_LEN: usize = 202;

/// Decomposes a big integer into [`LIMB_COUNT`] little-endian 121-bit limbs.
///
/// # Errors
/// Returns [`VerificationError::IntegerTooWide`] if the value needs more than
/// `LIMB_BITS * LIMB_COUNT` bits.
pub fn to_limbs(value: &BigUint) -> Result<[u128; LIMB_COUNT], VerificationError> {
    if value.bits() > (LIMB_BITS * LIMB_COUNT) as u64 {
        return Err(VerificationError::IntegerTooWide);
    }
    let mask = BigUint::from(LIMB_MASK);
    let mut rest = value.clone();
    let mut limbs = [0u128; LIMB_COUNT];
    for limb in &mut limbs {
        *limb = u128::try_from(&rest & &mask).map_err(|_| VerificationError::IntegerTooWide)?;
        rest >>= LIMB_BITS;
    }
    Ok(limbs)
}

/// Recomposes a limb vector into a big integer.
pub(crate) fn limbs_to_biguint(limbs: &[u128; LIMB_COUNT]) -> BigUint {
    let mut acc = BigUint::from(0u8);
    for &limb in limbs.iter().rev() {
        acc = (acc << LIMB_BITS) | BigUint::from(limb);
    }
    acc
}

/// Rejects any limb wider than [`LIMB_BITS`] bits.
fn check_limb_ranges(
    limbs: &[u128; LIMB_COUNT],
    attribute: &'static str,
) -> Result<(), VerificationError> {
    for (index, &limb) in limbs.iter().enumerate() {
        if limb > LIMB_MASK {
            return Err(VerificationError::LimbOutOfRange { attribute, index });
        }
    }
    Ok(())
}

/// Builds the limb vector of the full EMSA-PKCS1-v1_5 encoded message for
/// `digest`.
///
/// The constant prefix `0x00 0x01 || 0xFF.. || 0x00 || DigestInfo` sits above
/// bit 256, so its limb vector and the digest's can be added limb by limb:
/// only limb 2 is shared, where the prefix keeps its low 14 bits clear and
/// the digest contributes at most 14 bits. No carries can occur.
pub(crate) fn padded_message_limbs(
    digest: &[u8; 32],
) -> Result<[u128; LIMB_COUNT], VerificationError> {
    let mut prefix = vec![0x00, 0x01];
    prefix.extend_from_slice(&[0xFF; PADDING_LEN]);
    prefix.push(0x00);
    prefix.extend_from_slice(&SHA256_DIGEST_INFO);
    let mut limbs = to_limbs(&(BigUint::from_bytes_be(&prefix) << 256))?;
    let digest_limbs = to_limbs(&BigUint::from_bytes_be(digest))?;
    for (limb, digest_limb) in limbs.iter_mut().zip(digest_limbs.iter()) {
        *limb += digest_limb;
    }
    Ok(limbs)
}

/// Verifies an RS256 signature against a message digest.
///
/// Computes `signature^65537 mod modulus` as sixteen squarings followed by
/// one multiplication and compares the result against the encoded message,
/// limb by limb.
///
/// # Errors
/// Returns [`VerificationError`] in the following cases:
/// * `LimbOutOfRange` - a modulus or signature limb exceeds 121 bits.
/// * `ModulusBitLength` - the modulus is not exactly 2048 bits.
/// * `SignatureNotReduced` - the signature is not strictly below the modulus.
/// * `SignatureMismatch` - the decrypted signature differs from the encoded
///   message.
pub fn verify_rsa_signature(
    modulus: &[u128; LIMB_COUNT],
    signature: &[u128; LIMB_COUNT],
    digest: &[u8; 32],
) -> Result<(), VerificationError> {
    check_limb_ranges(modulus, "modulus")?;
    check_limb_ranges(signature, "signature")?;

    let n = limbs_to_biguint(modulus);
    if n.bits() != 2048 {
        return Err(VerificationError::ModulusBitLength { bits: n.bits() });
    }
    let s = limbs_to_biguint(signature);
    if s >= n {
        return Err(VerificationError::SignatureNotReduced);
    }

    let mut x = s.clone();
    for _ in 0..16 {
        x = &x * &x % &n;
    }
    x = x * &s % &n;

    if to_limbs(&x)? != padded_message_limbs(digest)? {
        return Err(VerificationError::SignatureMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limb_roundtrip() {
        let value = BigUint::from(7u8) << 1500;
        let limbs = to_limbs(&value).unwrap();
        assert_eq!(limbs_to_biguint(&limbs), value);
    }

    #[test]
    fn limb_boundaries() {
        let limbs = to_limbs(&(BigUint::from(1u8) << LIMB_BITS)).unwrap();
        assert_eq!(limbs[0], 0);
        assert_eq!(limbs[1], 1);

        let limbs = to_limbs(&BigUint::from(LIMB_MASK)).unwrap();
        assert_eq!(limbs[0], LIMB_MASK);
        assert_eq!(limbs[1], 0);
    }

    #[test]
    fn rejects_integers_beyond_limb_capacity() {
        let err = to_limbs(&(BigUint::from(1u8) << (LIMB_BITS * LIMB_COUNT))).unwrap_err();
        assert!(matches!(err, VerificationError::IntegerTooWide));
    }

    #[test]
    fn padded_message_matches_the_emsa_layout() {
        let digest = [0xAB; 32];
        let mut em = vec![0x00, 0x01];
        em.extend_from_slice(&[0xFF; PADDING_LEN]);
        em.push(0x00);
        em.extend_from_slice(&SHA256_DIGEST_INFO);
        em.extend_from_slice(&digest);
        assert_eq!(em.len(), 256);

        let expected = to_limbs(&BigUint::from_bytes_be(&em)).unwrap();
        assert_eq!(padded_message_limbs(&digest).unwrap(), expected);
    }

    #[test]
    fn prefix_keeps_the_shared_limb_carry_free() {
        // Limb 2 is the only limb both the prefix and the digest touch.
        let low = padded_message_limbs(&[0x00; 32]).unwrap();
        let high = padded_message_limbs(&[0xFF; 32]).unwrap();
        assert_eq!(low[2] & ((1 << 14) - 1), 0);
        assert_eq!(high[2] - low[2], (1 << 14) - 1);
        assert_eq!(low[3..], high[3..]);
    }

    #[test]
    fn rejects_oversized_limbs() {
        let mut modulus = [0u128; LIMB_COUNT];
        modulus[16] = 1 << 110;
        let mut signature = [0u128; LIMB_COUNT];
        signature[3] = LIMB_MASK + 1;
        let err = verify_rsa_signature(&modulus, &signature, &[0; 32]).unwrap_err();
        assert!(matches!(
            err,
            VerificationError::LimbOutOfRange {
                attribute: "signature",
                index: 3
            }
        ));
    }

    #[test]
    fn rejects_wrong_modulus_width() {
        let modulus = to_limbs(&(BigUint::from(1u8) << 2040)).unwrap();
        let signature = [0u128; LIMB_COUNT];
        let err = verify_rsa_signature(&modulus, &signature, &[0; 32]).unwrap_err();
        assert!(matches!(
            err,
            VerificationError::ModulusBitLength { bits: 2041 }
        ));
    }

    #[test]
    fn rejects_unreduced_signatures() {
        let n = (BigUint::from(1u8) << 2047) + 1u8;
        let modulus = to_limbs(&n).unwrap();
        let signature = to_limbs(&n).unwrap();
        let err = verify_rsa_signature(&modulus, &signature, &[0; 32]).unwrap_err();
        assert!(matches!(err, VerificationError::SignatureNotReduced));
    }

    #[test]
    fn rejects_a_garbage_signature() {
        let n = (BigUint::from(1u8) << 2047) + 1u8;
        let modulus = to_limbs(&n).unwrap();
        let signature = to_limbs(&BigUint::from(12345u64)).unwrap();
        let err = verify_rsa_signature(&modulus, &signature, &[0x42; 32]).unwrap_err();
        assert!(matches!(err, VerificationError::SignatureMismatch));
    }
}
