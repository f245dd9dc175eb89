//! In-band verification of RS256-signed JWTs with selective disclosure.
//!
//! [`JwtProofInput::verify`] re-checks everything a prover claims about a
//! token: the RSA signature over the signing input, the period split, the
//! base64url decoding of both segments, the location and uniqueness of every
//! claim, the shape of the command carried in the nonce, and the Poseidon
//! commitments derived from the witness. Email addresses and embedded
//! invitation codes inside the command are zeroed before the command is
//! exposed, and an optional Merkle proof hides the email domain behind a
//! committed set.
//!
//! Verification is all-or-nothing: the first failed invariant rejects the
//! instance and no partial outputs escape.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

pub mod base64;

mod circuit_inputs;

pub mod derive;
pub mod digest;

mod error;
pub use error::VerificationError;

pub mod locate;

mod masking;
pub use masking::MaskedCommand;

mod registry;
pub use registry::{
    enforce_policy, InMemoryRegistry, IssuerKeyId, JwtKeyRegistry, PolicyError, RegisteredKey,
};

pub mod rsa;

mod validate;

mod verifier;
pub use verifier::{ClaimLocations, JwtProofInput};

pub use zk_jwt_primitives::{FieldElement, JwtPublicOutputs};

/// Re-export of all the primitive types.
pub mod primitives {
    pub use zk_jwt_primitives::*;
}

/// Capacity of the signing input in bytes, a multiple of the SHA-256 block
/// size so the padded digest fits whole compression blocks.
pub const MAX_MESSAGE_LEN: usize = 1024;

/// Capacity of the base64url header segment in bytes.
pub const MAX_B64_HEADER_LEN: usize = 200;

/// Capacity of the decoded header in bytes, three quarters of
/// [`MAX_B64_HEADER_LEN`].
pub const MAX_HEADER_LEN: usize = 150;

/// Capacity of the base64url payload segment in bytes.
pub const MAX_B64_PAYLOAD_LEN: usize = 800;

/// Capacity of the decoded payload in bytes, three quarters of
/// [`MAX_B64_PAYLOAD_LEN`].
pub const MAX_PAYLOAD_LEN: usize = 600;

/// Capacity of the command carried in the nonce claim.
pub const MAX_COMMAND_LEN: usize = 217;

/// Capacity of the email address buffer.
pub const MAX_EMAIL_LEN: usize = 256;

/// Capacity of the email domain buffer.
pub const MAX_DOMAIN_LEN: usize = 124;

/// Capacity of the key id value in the header.
pub const MAX_KID_LEN: usize = 62;

/// Capacity of the issuer value in the payload.
pub const MAX_ISS_LEN: usize = 62;

/// Capacity of the authorized party value in the payload.
pub const MAX_AZP_LEN: usize = 93;

/// Number of lowercase hex characters in an embedded invitation code.
pub const CODE_HEX_LEN: usize = 64;

/// Number of ASCII digits in the issued-at timestamp. Ten digits cover
/// Sep 2001 through Nov 2286.
pub const TIMESTAMP_DIGITS: usize = 10;

/// Height of the domain anonymity Merkle tree.
pub const TREE_DEPTH: usize = 16;
