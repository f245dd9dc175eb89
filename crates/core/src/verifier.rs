//! The end-to-end verification pass over one token.

use serde::{Deserialize, Serialize};

use zk_jwt_primitives::{
    serde_utils::array_serde, AnonymityOutputs, BoundedBytes, DomainMembershipProof, FieldElement,
    JwtPublicOutputs,
};

use crate::{
    base64::decode_base64url,
    derive::{account_salt, domain_leaf, email_domain, jwt_nullifier, public_key_hash},
    digest::message_digest,
    error::VerificationError,
    locate::split_segments,
    masking::{embedded_code, mask_command},
    rsa::{verify_rsa_signature, LIMB_COUNT},
    validate::{
        extract_string_value, extract_timestamp, require_literal, require_unique_key_at,
        ALG_LITERAL, AZP_PATTERN, IAT_PATTERN, ISS_PATTERN, KID_PATTERN, NONCE_PATTERN,
        TYP_LITERAL,
    },
    MAX_AZP_LEN, MAX_COMMAND_LEN, MAX_EMAIL_LEN, MAX_HEADER_LEN, MAX_ISS_LEN, MAX_KID_LEN,
    MAX_MESSAGE_LEN, MAX_PAYLOAD_LEN, TREE_DEPTH,
};

/// Prover-supplied offsets and lengths locating each claim.
///
/// Nothing here is trusted: every offset is re-validated in band against the
/// decoded segments before any value derived from it is used.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ClaimLocations {
    /// Offset of the `"typ":"JWT"` literal in the decoded header.
    pub typ_offset: usize,
    /// Offset of the `"alg":"RS256"` literal in the decoded header.
    pub alg_offset: usize,
    /// Offset of the `"kid":"` pattern in the decoded header.
    pub kid_key_offset: usize,
    /// Length of the key id value.
    pub kid_len: usize,
    /// Offset of the `"iss":"` pattern in the decoded payload.
    pub iss_key_offset: usize,
    /// Length of the issuer value.
    pub iss_len: usize,
    /// Offset of the `"iat":` pattern in the decoded payload.
    pub iat_key_offset: usize,
    /// Offset of the `"azp":"` pattern in the decoded payload.
    pub azp_key_offset: usize,
    /// Length of the authorized party value.
    pub azp_len: usize,
    /// Offset of the `"nonce":"` pattern in the decoded payload.
    pub nonce_key_offset: usize,
    /// Logical length of the command inside the nonce value.
    pub command_len: usize,
}

/// The full witness of one verification instance.
///
/// Constructed fresh per token and discarded after [`Self::verify`]; nothing
/// here outlives one pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtProofInput<const DEPTH: usize = TREE_DEPTH> {
    /// The signing input: base64url header, one period, base64url payload.
    pub message: BoundedBytes<MAX_MESSAGE_LEN>,
    /// Claimed offset of the period separator.
    pub period_index: usize,
    /// Claimed claim locations.
    pub locations: ClaimLocations,
    /// The RSA modulus as 121-bit limbs.
    #[serde(with = "array_serde")]
    pub modulus: [u128; LIMB_COUNT],
    /// The RSA signature as 121-bit limbs.
    #[serde(with = "array_serde")]
    pub signature: [u128; LIMB_COUNT],
    /// The email address the account salt binds.
    pub email: BoundedBytes<MAX_EMAIL_LEN>,
    /// The account secret code.
    pub account_code: FieldElement,
    /// Optional domain anonymity proof.
    pub anonymity: Option<DomainMembershipProof<DEPTH>>,
}

impl<const DEPTH: usize> JwtProofInput<DEPTH> {
    /// Runs the whole verification pass and produces the public outputs.
    ///
    /// The signature gate runs first, so structural validation only ever
    /// touches messages the key actually signed. Everything after is
    /// all-or-nothing: the first failed invariant rejects the instance and
    /// no partial outputs escape.
    ///
    /// # Errors
    /// Returns [`VerificationError`] in the following cases:
    /// * the RSA signature does not verify over the message digest,
    /// * a claimed offset, literal, key occurrence, or length check fails,
    /// * the embedded code disagrees with the account code,
    /// * the domain membership proof does not reach its committed root.
    pub fn verify(&self) -> Result<JwtPublicOutputs, VerificationError> {
        tracing::debug!("verifying rsa signature over the signing input");
        let digest = message_digest(&self.message);
        verify_rsa_signature(&self.modulus, &self.signature, &digest)?;

        tracing::debug!("splitting and decoding the jwt segments");
        let segments = split_segments(&self.message, self.period_index)?;
        let header: BoundedBytes<MAX_HEADER_LEN> = decode_base64url(segments.header())?;
        let payload: BoundedBytes<MAX_PAYLOAD_LEN> = decode_base64url(segments.payload())?;

        tracing::debug!("validating the header structure");
        let locations = &self.locations;
        let header_bytes = header.as_slice();
        require_literal(header_bytes, locations.typ_offset, TYP_LITERAL, "typ")?;
        require_literal(header_bytes, locations.alg_offset, ALG_LITERAL, "alg")?;
        require_unique_key_at(header_bytes, locations.kid_key_offset, KID_PATTERN, "kid")?;
        let kid: BoundedBytes<MAX_KID_LEN> = extract_string_value(
            header_bytes,
            locations.kid_key_offset + KID_PATTERN.len(),
            locations.kid_len,
            "kid",
        )?;

        tracing::debug!("extracting the payload claims");
        let payload_bytes = payload.as_slice();
        require_unique_key_at(payload_bytes, locations.iss_key_offset, ISS_PATTERN, "iss")?;
        let issuer: BoundedBytes<MAX_ISS_LEN> = extract_string_value(
            payload_bytes,
            locations.iss_key_offset + ISS_PATTERN.len(),
            locations.iss_len,
            "iss",
        )?;
        require_unique_key_at(payload_bytes, locations.iat_key_offset, IAT_PATTERN, "iat")?;
        let timestamp =
            extract_timestamp(payload_bytes, locations.iat_key_offset + IAT_PATTERN.len())?;
        require_unique_key_at(payload_bytes, locations.azp_key_offset, AZP_PATTERN, "azp")?;
        let azp: BoundedBytes<MAX_AZP_LEN> = extract_string_value(
            payload_bytes,
            locations.azp_key_offset + AZP_PATTERN.len(),
            locations.azp_len,
            "azp",
        )?;
        require_unique_key_at(payload_bytes, locations.nonce_key_offset, NONCE_PATTERN, "nonce")?;
        let command: BoundedBytes<MAX_COMMAND_LEN> = extract_string_value(
            payload_bytes,
            locations.nonce_key_offset + NONCE_PATTERN.len(),
            locations.command_len,
            "nonce",
        )?;

        tracing::debug!("masking the command");
        let masked = mask_command(&command)?;
        if let Some(span) = masked.code_span() {
            let code = embedded_code(&command, span)?;
            if code != self.account_code {
                return Err(VerificationError::CodeMismatch);
            }
        }

        tracing::debug!("deriving the identity commitments");
        let public_key_hash = public_key_hash(&self.modulus)?;
        let nullifier = jwt_nullifier(&self.signature)?;
        let salt = account_salt(&self.email, self.account_code)?;

        let anonymity = match &self.anonymity {
            Some(proof) => {
                tracing::debug!("checking domain membership");
                let domain = email_domain(&self.email)?;
                let leaf = domain_leaf(&domain)?;
                if !proof.is_valid(leaf)? {
                    return Err(VerificationError::RootMismatch);
                }
                Some(AnonymityOutputs {
                    domain: domain.to_lanes(),
                    root: proof.root,
                })
            }
            None => None,
        };

        Ok(JwtPublicOutputs {
            kid: kid.to_lanes(),
            issuer: issuer.to_lanes(),
            public_key_hash,
            jwt_nullifier: nullifier,
            timestamp: FieldElement::from(timestamp),
            masked_command: masked.masked().to_lanes(),
            account_salt: salt,
            azp: azp.to_lanes(),
            is_code_exist: FieldElement::from(masked.is_code_exist()),
            anonymity,
        })
    }
}
