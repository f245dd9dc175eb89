//! Base64url decoding of JWT segments.
//!
//! JWT segments use the url-safe alphabet without padding. Decoding here
//! mirrors the circuit: it walks the logical region byte by byte, rejects any
//! byte outside the alphabet, and drops the dangling bits of a final partial
//! group instead of requiring them to be zero.

use crate::error::VerificationError;
use zk_jwt_primitives::BoundedBytes;

/// Maps one base64url character to its 6-bit value.
fn sextet(byte: u8, index: usize) -> Result<u8, VerificationError> {
    match byte {
        b'A'..=b'Z' => Ok(byte - b'A'),
        b'a'..=b'z' => Ok(byte - b'a' + 26),
        b'0'..=b'9' => Ok(byte - b'0' + 52),
        b'-' => Ok(62),
        b'_' => Ok(63),
        _ => Err(VerificationError::InvalidBase64Char { byte, index }),
    }
}

/// Decodes the logical region of an unpadded base64url segment.
///
/// The capacities must satisfy `IN % 4 == 0` and `OUT * 4 == IN * 3` so a
/// segment filling its buffer still fits after decoding.
///
/// # Errors
/// Returns [`VerificationError::InvalidBase64Length`] for capacities that
/// violate the relation above or a logical length of the form `4k + 1`, and
/// [`VerificationError::InvalidBase64Char`] for bytes outside the url-safe
/// alphabet (including `+`, `/` and `=` padding).
pub fn decode_base64url<const IN: usize, const OUT: usize>(
    segment: &BoundedBytes<IN>,
) -> Result<BoundedBytes<OUT>, VerificationError> {
    if IN % 4 != 0 || OUT * 4 != IN * 3 {
        return Err(VerificationError::InvalidBase64Length);
    }
    let data = segment.as_slice();
    let tail = match data.len() % 4 {
        0 => 0,
        2 => 1,
        3 => 2,
        // A single leftover character encodes at most 6 bits, less than one
        // byte; no encoder emits it.
        _ => return Err(VerificationError::InvalidBase64Length),
    };
    let full_groups = data.len() / 4;
    let out_len = full_groups * 3 + tail;

    let mut out = [0u8; OUT];
    for group in 0..full_groups {
        let i = group * 4;
        let v0 = sextet(data[i], i)?;
        let v1 = sextet(data[i + 1], i + 1)?;
        let v2 = sextet(data[i + 2], i + 2)?;
        let v3 = sextet(data[i + 3], i + 3)?;
        out[group * 3] = (v0 << 2) | (v1 >> 4);
        out[group * 3 + 1] = ((v1 & 0x0F) << 4) | (v2 >> 2);
        out[group * 3 + 2] = ((v2 & 0x03) << 6) | v3;
    }

    let i = full_groups * 4;
    match tail {
        1 => {
            let v0 = sextet(data[i], i)?;
            let v1 = sextet(data[i + 1], i + 1)?;
            // The low four bits of v1 fall past the segment end.
            out[full_groups * 3] = (v0 << 2) | (v1 >> 4);
        }
        2 => {
            let v0 = sextet(data[i], i)?;
            let v1 = sextet(data[i + 1], i + 1)?;
            let v2 = sextet(data[i + 2], i + 2)?;
            out[full_groups * 3] = (v0 << 2) | (v1 >> 4);
            // The low two bits of v2 fall past the segment end.
            out[full_groups * 3 + 1] = ((v1 & 0x0F) << 4) | (v2 >> 2);
        }
        _ => {}
    }

    Ok(BoundedBytes::from_array(out, out_len)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha12Rng;

    fn decode(segment: &[u8]) -> Result<BoundedBytes<150>, VerificationError> {
        decode_base64url::<200, 150>(&BoundedBytes::new(segment).unwrap())
    }

    #[test]
    fn matches_the_reference_decoder() {
        let mut rng = ChaCha12Rng::seed_from_u64(42);
        for len in 0..=60usize {
            let raw: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            let encoded = URL_SAFE_NO_PAD.encode(&raw);
            let decoded = decode(encoded.as_bytes()).unwrap();
            assert_eq!(decoded.as_slice(), raw.as_slice(), "len {len}");
        }
    }

    #[test]
    fn rejects_standard_alphabet_and_padding() {
        for segment in [&b"ab+d"[..], b"ab/d", b"abc="] {
            let err = decode(segment).unwrap_err();
            assert!(matches!(err, VerificationError::InvalidBase64Char { .. }));
        }
    }

    #[test]
    fn reports_the_offending_position() {
        let err = decode(b"abcdab!d").unwrap_err();
        assert!(matches!(
            err,
            VerificationError::InvalidBase64Char { byte: b'!', index: 6 }
        ));
    }

    #[test]
    fn rejects_impossible_length() {
        let err = decode(b"abcde").unwrap_err();
        assert!(matches!(err, VerificationError::InvalidBase64Length));
    }

    #[test]
    fn rejects_mismatched_capacities() {
        let segment = BoundedBytes::<200>::new(b"abcd").unwrap();
        let err = decode_base64url::<200, 100>(&segment).unwrap_err();
        assert!(matches!(err, VerificationError::InvalidBase64Length));
    }

    #[test]
    fn truncates_dangling_bits() {
        // "QQ" and "QR" differ only in bits past the decoded byte.
        let a = decode(b"QQ").unwrap();
        let b = decode(b"QR").unwrap();
        assert_eq!(a.as_slice(), b"A");
        assert_eq!(a, b);
    }

    #[test]
    fn decodes_the_empty_segment() {
        let decoded = decode(b"").unwrap();
        assert!(decoded.is_empty());
    }
}
