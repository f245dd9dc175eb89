//! In-band validation of claimed JSON structure.
//!
//! Offsets and lengths arrive from the prover and prove nothing by
//! themselves. Each claim is validated by matching the exact key pattern at
//! the claimed offset, counting that the pattern occurs exactly once in the
//! whole segment, and anchoring the value span with its closing quote.

use crate::error::VerificationError;
use crate::TIMESTAMP_DIGITS;
use zk_jwt_primitives::BoundedBytes;

pub const TYP_LITERAL: &[u8] = br#""typ":"JWT""#;
pub const ALG_LITERAL: &[u8] = br#""alg":"RS256""#;
pub const KID_PATTERN: &[u8] = br#""kid":""#;
pub const ISS_PATTERN: &[u8] = br#""iss":""#;
pub const AZP_PATTERN: &[u8] = br#""azp":""#;
pub const NONCE_PATTERN: &[u8] = br#""nonce":""#;
pub const IAT_PATTERN: &[u8] = br#""iat":"#;

/// Matches `literal` at the claimed `offset`.
pub fn require_literal(
    data: &[u8],
    offset: usize,
    literal: &'static [u8],
    attribute: &'static str,
) -> Result<(), VerificationError> {
    let end = offset
        .checked_add(literal.len())
        .ok_or(VerificationError::OffsetOutOfBounds { attribute })?;
    if end > data.len() {
        return Err(VerificationError::OffsetOutOfBounds { attribute });
    }
    if &data[offset..end] != literal {
        return Err(VerificationError::LiteralMismatch { attribute });
    }
    Ok(())
}

/// Counts occurrences of `pattern` across the whole logical region and
/// requires exactly one.
pub fn require_unique(
    data: &[u8],
    pattern: &'static [u8],
    attribute: &'static str,
) -> Result<(), VerificationError> {
    let count = data.windows(pattern.len()).filter(|w| *w == pattern).count();
    if count != 1 {
        return Err(VerificationError::KeyOccurrence { attribute, count });
    }
    Ok(())
}

/// Matches a key pattern at its claimed offset and requires it to be the only
/// occurrence in the segment.
pub fn require_unique_key_at(
    data: &[u8],
    offset: usize,
    pattern: &'static [u8],
    attribute: &'static str,
) -> Result<(), VerificationError> {
    require_literal(data, offset, pattern, attribute)?;
    require_unique(data, pattern, attribute)
}

/// Extracts a quoted string value of claimed length starting at
/// `value_start`.
///
/// The byte immediately after the span must be the closing quote and no
/// quote may occur inside the span, so over- and under-claimed lengths both
/// fail.
pub fn extract_string_value<const CAP: usize>(
    data: &[u8],
    value_start: usize,
    value_len: usize,
    attribute: &'static str,
) -> Result<BoundedBytes<CAP>, VerificationError> {
    if value_len > CAP {
        return Err(VerificationError::LengthOutOfBounds {
            attribute,
            len: value_len,
            max: CAP,
        });
    }
    let end = value_start
        .checked_add(value_len)
        .ok_or(VerificationError::OffsetOutOfBounds { attribute })?;
    if end >= data.len() {
        return Err(VerificationError::OffsetOutOfBounds { attribute });
    }
    if data[end] != b'"' {
        return Err(VerificationError::LiteralMismatch { attribute });
    }
    let value = &data[value_start..end];
    if value.contains(&b'"') {
        return Err(VerificationError::LiteralMismatch { attribute });
    }
    Ok(BoundedBytes::new(value)?)
}

/// Extracts the `iat` value as exactly [`TIMESTAMP_DIGITS`] ASCII digits
/// starting at `value_start`, requiring a non-digit terminator after them.
pub fn extract_timestamp(
    data: &[u8],
    value_start: usize,
) -> Result<u64, VerificationError> {
    let end = value_start
        .checked_add(TIMESTAMP_DIGITS)
        .ok_or(VerificationError::OffsetOutOfBounds { attribute: "iat" })?;
    // The terminator byte after the digits must exist.
    if end >= data.len() {
        return Err(VerificationError::OffsetOutOfBounds { attribute: "iat" });
    }
    let mut value = 0u64;
    for &byte in &data[value_start..end] {
        if !byte.is_ascii_digit() {
            return Err(VerificationError::MalformedTimestamp);
        }
        value = value * 10 + u64::from(byte - b'0');
    }
    if data[end].is_ascii_digit() {
        return Err(VerificationError::MalformedTimestamp);
    }
    Ok(value)
}
