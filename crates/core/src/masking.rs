//! Redaction of email addresses and invitation codes from the command.
//!
//! Two independent matchers run over the command: a finite-state recognizer
//! for `localpart@domain` spans and an end-anchored recognizer for the
//! `code <64 hex>` suffix. Each matcher yields a 0/1 reveal mask over the
//! whole buffer and every byte is reduced as
//! `byte - email_mask * byte - code_mask * byte`, so a matched span zeroes
//! out while the logical length never changes and the lane packing of a
//! masked command equals the packing of the residual text alone.

use crate::error::VerificationError;
use crate::{CODE_HEX_LEN, MAX_COMMAND_LEN};
use zk_jwt_primitives::{BoundedBytes, FieldElement};

/// Characters permitted in the local part of an email address.
const fn is_local_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'%' | b'+' | b'-')
}

/// Characters permitted in the domain part of an email address.
const fn is_domain_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'-')
}

const fn is_lower_hex_digit(byte: u8) -> bool {
    matches!(byte, b'0'..=b'9' | b'a'..=b'f')
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum EmailState {
    Idle,
    Local,
    At,
    Domain,
}

/// Finds the first maximal `localpart@domain` span.
///
/// The scan runs one position past the end with a virtual terminator so a
/// match reaching the end of the command closes like any other.
fn email_span(data: &[u8]) -> Option<(usize, usize)> {
    let mut state = EmailState::Idle;
    let mut start = 0;
    for i in 0..=data.len() {
        let byte = data.get(i).copied().unwrap_or(0);
        if state == EmailState::Domain && !is_domain_byte(byte) {
            return Some((start, i));
        }
        state = match state {
            EmailState::Idle => {
                if is_local_byte(byte) {
                    start = i;
                    EmailState::Local
                } else {
                    EmailState::Idle
                }
            }
            EmailState::Local => {
                if byte == b'@' {
                    EmailState::At
                } else if is_local_byte(byte) {
                    EmailState::Local
                } else {
                    EmailState::Idle
                }
            }
            EmailState::At => {
                if is_domain_byte(byte) {
                    EmailState::Domain
                } else if is_local_byte(byte) {
                    // A local-only character after `@` can open a new
                    // candidate.
                    start = i;
                    EmailState::Local
                } else {
                    EmailState::Idle
                }
            }
            EmailState::Domain => EmailState::Domain,
        };
    }
    None
}

const CODE_KEYWORD: &[u8] = b"code ";

/// Finds the `code <64 hex>` suffix anchored at the end of the command.
///
/// A space boundary before the keyword joins the span so masking strips it
/// too; at the start of the command the keyword anchors without one.
fn code_span(data: &[u8]) -> Option<(usize, usize)> {
    let keyword_start = data.len().checked_sub(CODE_KEYWORD.len() + CODE_HEX_LEN)?;
    if &data[keyword_start..keyword_start + CODE_KEYWORD.len()] != CODE_KEYWORD {
        return None;
    }
    if !data[keyword_start + CODE_KEYWORD.len()..]
        .iter()
        .all(|&byte| is_lower_hex_digit(byte))
    {
        return None;
    }
    match keyword_start.checked_sub(1) {
        Some(boundary) if data[boundary] == b' ' => Some((boundary, data.len())),
        Some(_) => None,
        None => Some((0, data.len())),
    }
}

/// A command with its matched spans zeroed.
#[derive(Debug, Clone)]
pub struct MaskedCommand {
    masked: BoundedBytes<MAX_COMMAND_LEN>,
    email_span: Option<(usize, usize)>,
    code_span: Option<(usize, usize)>,
}

impl MaskedCommand {
    /// The command with both matched spans zeroed, logical length unchanged.
    #[must_use]
    pub const fn masked(&self) -> &BoundedBytes<MAX_COMMAND_LEN> {
        &self.masked
    }

    /// Whether the command carried an invitation code suffix.
    #[must_use]
    pub const fn is_code_exist(&self) -> bool {
        self.code_span.is_some()
    }

    /// The masked email span, if one matched.
    #[must_use]
    pub const fn email_span(&self) -> Option<(usize, usize)> {
        self.email_span
    }

    /// The masked code span, if one matched.
    #[must_use]
    pub const fn code_span(&self) -> Option<(usize, usize)> {
        self.code_span
    }
}

/// Expands a matched span into a 0/1 reveal mask over the whole buffer.
fn reveal_mask(span: Option<(usize, usize)>) -> [u8; MAX_COMMAND_LEN] {
    let mut mask = [0u8; MAX_COMMAND_LEN];
    if let Some((start, end)) = span {
        mask[start..end].fill(1);
    }
    mask
}

/// Runs both matchers over `command` and zeroes every matched span.
///
/// Each byte is reduced per the reveal masks,
/// `byte - email_mask * byte - code_mask * byte`, with wrapping arithmetic.
/// The two spans cannot overlap in a well-formed command: the code span
/// starts at a space or at position zero and continues with keyword and hex
/// bytes only, none of which can complete an email that began earlier, since
/// the space ends any domain run. An overlap would leave an incorrect
/// residual, not a panic.
///
/// # Errors
/// Propagates [`VerificationError::Primitive`] if the masked buffer cannot
/// be rebuilt, which the padding invariant of `command` rules out.
pub fn mask_command(
    command: &BoundedBytes<MAX_COMMAND_LEN>,
) -> Result<MaskedCommand, VerificationError> {
    let data = command.as_slice();
    let email_span = email_span(data);
    let code_span = code_span(data);

    let email_mask = reveal_mask(email_span);
    let code_mask = reveal_mask(code_span);
    let mut bytes = *command.as_array();
    for (i, byte) in bytes.iter_mut().enumerate() {
        let b = *byte;
        *byte = b
            .wrapping_sub(email_mask[i] * b)
            .wrapping_sub(code_mask[i] * b);
    }
    Ok(MaskedCommand {
        masked: BoundedBytes::from_array(bytes, data.len())?,
        email_span,
        code_span,
    })
}

/// Decodes the 64 hex characters of a matched code span into a field
/// element.
///
/// # Errors
/// Returns [`VerificationError::Primitive`] with
/// [`PrimitiveError::NotInField`](zk_jwt_primitives::PrimitiveError::NotInField)
/// if the decoded value is not below the field modulus.
pub fn embedded_code(
    command: &BoundedBytes<MAX_COMMAND_LEN>,
    span: (usize, usize),
) -> Result<FieldElement, VerificationError> {
    let hex = &command.as_slice()[span.1 - CODE_HEX_LEN..span.1];
    let mut be = [0u8; 32];
    for (out, pair) in be.iter_mut().zip(hex.chunks_exact(2)) {
        *out = (nibble(pair[0]) << 4) | nibble(pair[1]);
    }
    Ok(FieldElement::from_be_bytes(&be)?)
}

// Span bytes are matcher-verified lowercase hex.
const fn nibble(byte: u8) -> u8 {
    match byte {
        b'0'..=b'9' => byte - b'0',
        b'a'..=b'f' => byte - b'a' + 10,
        _ => 0,
    }
}
