//! Error types for JWT statement verification.

use zk_jwt_primitives::PrimitiveError;

/// Error type for rejecting a JWT verification statement.
///
/// Verification is all-or-nothing: any variant means the statement admits no
/// witness and the whole instance is rejected. Callers wanting to distinguish
/// recoverable policy outcomes should use
/// [`PolicyError`](crate::PolicyError) instead.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    /// A claimed offset points outside the logical input region.
    #[error("claimed {attribute} offset is outside the logical input")]
    OffsetOutOfBounds {
        /// the claim or structural feature the offset belongs to
        attribute: &'static str,
    },
    /// The byte at the claimed separator position is not a period.
    #[error("expected a period at the claimed separator position")]
    SeparatorMismatch,
    /// A base64url segment has a length no encoder produces.
    #[error("base64url segment has an impossible length")]
    InvalidBase64Length,
    /// A byte inside a base64url segment is outside the alphabet.
    #[error("byte {byte:#04x} at segment offset {index} is not base64url")]
    InvalidBase64Char {
        /// the offending byte
        byte: u8,
        /// its offset within the segment
        index: usize,
    },
    /// The bytes at a claimed offset do not spell the required literal.
    #[error("the {attribute} bytes at the claimed offset do not match")]
    LiteralMismatch {
        /// the claim or structural feature being matched
        attribute: &'static str,
    },
    /// A JSON key did not occur exactly once in its segment.
    #[error("expected exactly one {attribute} key, found {count}")]
    KeyOccurrence {
        /// the JSON key being counted
        attribute: &'static str,
        /// the number of occurrences found
        count: usize,
    },
    /// A claimed length exceeds the fixed capacity reserved for it.
    #[error("{attribute} length {len} exceeds the maximum of {max}")]
    LengthOutOfBounds {
        /// the claim or buffer the length belongs to
        attribute: &'static str,
        /// the claimed length
        len: usize,
        /// the fixed capacity
        max: usize,
    },
    /// A 121-bit limb carries more than 121 bits.
    #[error("{attribute} limb {index} exceeds 121 bits")]
    LimbOutOfRange {
        /// the limb vector the limb belongs to
        attribute: &'static str,
        /// the index of the offending limb
        index: usize,
    },
    /// The RSA modulus is not exactly 2048 bits wide.
    #[error("modulus must be exactly 2048 bits, got {bits}")]
    ModulusBitLength {
        /// the actual bit length
        bits: u64,
    },
    /// The RSA signature is not strictly below the modulus.
    #[error("signature must be strictly below the modulus")]
    SignatureNotReduced,
    /// The RSA signature does not verify against the message digest.
    #[error("RSA signature does not verify against the message digest")]
    SignatureMismatch,
    /// The `iat` claim is not exactly ten ASCII digits.
    #[error("iat must be exactly ten ASCII digits")]
    MalformedTimestamp,
    /// The email address does not contain exactly one `@`.
    #[error("email address must contain exactly one '@'")]
    MalformedEmail,
    /// The code embedded in the command does not match the account code.
    #[error("embedded code does not match the account code")]
    CodeMismatch,
    /// The domain membership path does not reach the committed root.
    #[error("domain membership path does not reach the committed root")]
    RootMismatch,
    /// An integer does not fit the fixed limb vector.
    #[error("integer exceeds the limb vector capacity")]
    IntegerTooWide,
    /// Errors originating from the base types.
    #[error(transparent)]
    Primitive(#[from] PrimitiveError),
}
