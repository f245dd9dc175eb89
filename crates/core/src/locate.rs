//! Splitting the signing input at its claimed separator.
//!
//! The period position arrives as an untrusted claim and every property it
//! implies is re-checked in band: the byte at the claimed index is a period,
//! and both resulting segments fit their fixed capacities. Any extra period
//! elsewhere in a segment fails base64url decoding later, so uniqueness needs
//! no separate scan.

use crate::error::VerificationError;
use crate::{MAX_B64_HEADER_LEN, MAX_B64_PAYLOAD_LEN, MAX_MESSAGE_LEN};
use zk_jwt_primitives::BoundedBytes;

/// The two base64url segments of a signing input.
#[derive(Debug, Clone)]
pub struct Segments {
    header: BoundedBytes<MAX_B64_HEADER_LEN>,
    payload: BoundedBytes<MAX_B64_PAYLOAD_LEN>,
}

impl Segments {
    /// The base64url header segment.
    #[must_use]
    pub const fn header(&self) -> &BoundedBytes<MAX_B64_HEADER_LEN> {
        &self.header
    }

    /// The base64url payload segment.
    #[must_use]
    pub const fn payload(&self) -> &BoundedBytes<MAX_B64_PAYLOAD_LEN> {
        &self.payload
    }
}

/// Splits `message` into header and payload segments at `period_index`.
///
/// # Errors
/// Returns [`VerificationError`] in the following cases:
/// * `OffsetOutOfBounds` - the claimed index lies outside the logical
///   message.
/// * `SeparatorMismatch` - the byte at the claimed index is not a period.
/// * `LengthOutOfBounds` - either segment exceeds its fixed capacity.
pub fn split_segments(
    message: &BoundedBytes<MAX_MESSAGE_LEN>,
    period_index: usize,
) -> Result<Segments, VerificationError> {
    let data = message.as_slice();
    if period_index >= data.len() {
        return Err(VerificationError::OffsetOutOfBounds {
            attribute: "period",
        });
    }
    if data[period_index] != b'.' {
        return Err(VerificationError::SeparatorMismatch);
    }

    let header_len = period_index;
    if header_len > MAX_B64_HEADER_LEN {
        return Err(VerificationError::LengthOutOfBounds {
            attribute: "header segment",
            len: header_len,
            max: MAX_B64_HEADER_LEN,
        });
    }
    let payload_len = data.len() - period_index - 1;
    if payload_len > MAX_B64_PAYLOAD_LEN {
        return Err(VerificationError::LengthOutOfBounds {
            attribute: "payload segment",
            len: payload_len,
            max: MAX_B64_PAYLOAD_LEN,
        });
    }

    Ok(Segments {
        header: BoundedBytes::new(&data[..header_len])?,
        payload: BoundedBytes::new(&data[period_index + 1..])?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(content: &[u8]) -> BoundedBytes<MAX_MESSAGE_LEN> {
        BoundedBytes::new(content).unwrap()
    }

    #[test]
    fn splits_at_the_claimed_period() {
        let segments = split_segments(&message(b"aGVhZGVy.cGF5bG9hZA"), 8).unwrap();
        assert_eq!(segments.header().as_slice(), b"aGVhZGVy");
        assert_eq!(segments.payload().as_slice(), b"cGF5bG9hZA");
    }

    #[test]
    fn rejects_an_out_of_range_index() {
        let err = split_segments(&message(b"abc.def"), 7).unwrap_err();
        assert!(matches!(
            err,
            VerificationError::OffsetOutOfBounds { attribute: "period" }
        ));
    }

    #[test]
    fn rejects_a_non_period_byte() {
        let err = split_segments(&message(b"abc.def"), 2).unwrap_err();
        assert!(matches!(err, VerificationError::SeparatorMismatch));
    }

    #[test]
    fn rejects_an_overlong_header_segment() {
        let mut content = vec![b'a'; MAX_B64_HEADER_LEN + 1];
        content.push(b'.');
        content.push(b'b');
        let err = split_segments(&message(&content), MAX_B64_HEADER_LEN + 1).unwrap_err();
        assert!(matches!(
            err,
            VerificationError::LengthOutOfBounds {
                attribute: "header segment",
                ..
            }
        ));
    }

    #[test]
    fn rejects_an_overlong_payload_segment() {
        let mut content = vec![b'a'; 4];
        content.push(b'.');
        content.extend(vec![b'b'; MAX_B64_PAYLOAD_LEN + 1]);
        let err = split_segments(&message(&content), 4).unwrap_err();
        assert!(matches!(
            err,
            VerificationError::LengthOutOfBounds {
                attribute: "payload segment",
                ..
            }
        ));
    }

    #[test]
    fn allows_an_empty_payload_segment() {
        let segments = split_segments(&message(b"abcd."), 4).unwrap();
        assert!(segments.payload().is_empty());
    }
}
