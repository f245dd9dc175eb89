use std::sync::OnceLock;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use eyre::{eyre, Result};
use num_bigint::BigUint;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use rsa::pkcs1v15::SigningKey;
use rsa::sha2::Sha256;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use zk_jwt_core::rsa::{to_limbs, LIMB_COUNT};
use zk_jwt_core::{ClaimLocations, JwtProofInput, MAX_MESSAGE_LEN};
use zk_jwt_primitives::{BoundedBytes, FieldElement};

/// The claims of a well-formed test token.
pub struct TokenParts {
    pub kid: String,
    pub iss: String,
    pub azp: String,
    pub iat: u64,
    pub command: String,
}

impl Default for TokenParts {
    fn default() -> Self {
        Self {
            kid: "a1b2c3d4e5f6a7b8c9d0e1f2a3b4c5d6e7f8a9b0".to_string(),
            iss: "https://accounts.google.com".to_string(),
            azp: "407408718192.apps.googleusercontent.com".to_string(),
            iat: 1_712_345_678,
            command: "Send 0.1 ETH to alice@gmail.com".to_string(),
        }
    }
}

impl TokenParts {
    /// Renders the decoded header these parts describe.
    pub fn header_json(&self) -> String {
        format!(r#"{{"typ":"JWT","alg":"RS256","kid":"{}"}}"#, self.kid)
    }

    /// Renders the decoded payload these parts describe.
    pub fn payload_json(&self) -> String {
        format!(
            r#"{{"iss":"{}","azp":"{}","iat":{},"nonce":"{}"}}"#,
            self.iss, self.azp, self.iat, self.command
        )
    }

    /// Computes the honest claim locations for the rendered segments.
    pub fn locations(&self) -> Result<ClaimLocations> {
        let header = self.header_json();
        let payload = self.payload_json();
        Ok(ClaimLocations {
            typ_offset: offset_of(&header, r#""typ":"JWT""#)?,
            alg_offset: offset_of(&header, r#""alg":"RS256""#)?,
            kid_key_offset: offset_of(&header, r#""kid":""#)?,
            kid_len: self.kid.len(),
            iss_key_offset: offset_of(&payload, r#""iss":""#)?,
            iss_len: self.iss.len(),
            iat_key_offset: offset_of(&payload, r#""iat":"#)?,
            azp_key_offset: offset_of(&payload, r#""azp":""#)?,
            azp_len: self.azp.len(),
            nonce_key_offset: offset_of(&payload, r#""nonce":""#)?,
            command_len: self.command.len(),
        })
    }
}

fn offset_of(segment: &str, pattern: &str) -> Result<usize> {
    segment
        .find(pattern)
        .ok_or_else(|| eyre!("pattern {pattern} missing from {segment}"))
}

/// Returns the process-wide 2048-bit signing key. Generation is seeded, so
/// every test run sees the same key.
pub fn test_rsa_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| {
        let mut rng = ChaCha12Rng::seed_from_u64(0x5eed);
        RsaPrivateKey::new(&mut rng, 2048).expect("2048-bit key generation")
    })
}

/// The key modulus as 121-bit limbs.
pub fn modulus_limbs(key: &RsaPrivateKey) -> Result<[u128; LIMB_COUNT]> {
    let n = BigUint::from_bytes_be(&key.n().to_bytes_be());
    Ok(to_limbs(&n)?)
}

/// Signs `message` with PKCS#1 v1.5 over SHA-256 and returns the signature
/// as 121-bit limbs.
pub fn sign_message(key: &RsaPrivateKey, message: &[u8]) -> Result<[u128; LIMB_COUNT]> {
    let signing_key = SigningKey::<Sha256>::new(key.clone());
    let signature = signing_key.sign(message);
    let s = BigUint::from_bytes_be(&signature.to_bytes());
    Ok(to_limbs(&s)?)
}

/// A signing input assembled from two decoded segments, signed with the
/// process-wide test key.
pub struct SignedMessage {
    pub message: BoundedBytes<MAX_MESSAGE_LEN>,
    pub period_index: usize,
    pub modulus: [u128; LIMB_COUNT],
    pub signature: [u128; LIMB_COUNT],
}

/// Encodes, joins, and signs the given header and payload JSON.
///
/// The segments are taken verbatim, so tests can craft payloads with
/// duplicate keys or otherwise broken structure and still get a valid
/// signature over them.
pub fn sign_segments(header_json: &str, payload_json: &str) -> Result<SignedMessage> {
    let header_b64 = URL_SAFE_NO_PAD.encode(header_json);
    let payload_b64 = URL_SAFE_NO_PAD.encode(payload_json);
    let raw = format!("{header_b64}.{payload_b64}");
    let key = test_rsa_key();
    Ok(SignedMessage {
        message: BoundedBytes::new(raw.as_bytes())?,
        period_index: header_b64.len(),
        modulus: modulus_limbs(key)?,
        signature: sign_message(key, raw.as_bytes())?,
    })
}

/// Builds the complete witness for a well-formed token.
pub fn proof_input(
    parts: &TokenParts,
    email: &str,
    account_code: FieldElement,
) -> Result<JwtProofInput> {
    let signed = sign_segments(&parts.header_json(), &parts.payload_json())?;
    Ok(JwtProofInput {
        message: signed.message,
        period_index: signed.period_index,
        locations: parts.locations()?,
        modulus: signed.modulus,
        signature: signed.signature,
        email: BoundedBytes::new(email.as_bytes())?,
        account_code,
        anonymity: None,
    })
}

/// Appends `code <hex>` to a command prefix for the given account code.
///
/// The prefix must be empty or end with a space, otherwise the embedded
/// code has no boundary and will not be recognized.
pub fn command_with_code(prefix: &str, account_code: FieldElement) -> String {
    format!("{prefix}code {}", hex::encode(account_code.to_be_bytes()))
}

#[cfg(test)]
mod tests {
    use zk_jwt_core::digest::message_digest;
    use zk_jwt_core::rsa::verify_rsa_signature;

    use super::*;

    #[test]
    fn signed_segments_pass_the_rsa_gate() {
        let parts = TokenParts::default();
        let signed = sign_segments(&parts.header_json(), &parts.payload_json()).unwrap();
        let digest = message_digest(&signed.message);
        verify_rsa_signature(&signed.modulus, &signed.signature, &digest).unwrap();
    }

    #[test]
    fn period_index_lands_on_the_separator() {
        let signed = sign_segments(r#"{"alg":"RS256"}"#, r#"{"iss":"x"}"#).unwrap();
        assert_eq!(signed.message.as_slice()[signed.period_index], b'.');
    }

    #[test]
    fn default_locations_point_at_their_patterns() {
        let parts = TokenParts::default();
        let locations = parts.locations().unwrap();
        let header = parts.header_json();
        let payload = parts.payload_json();
        assert_eq!(&header[locations.typ_offset..locations.typ_offset + 11], r#""typ":"JWT""#);
        assert_eq!(&payload[locations.nonce_key_offset..locations.nonce_key_offset + 9], r#""nonce":""#);
        assert_eq!(locations.command_len, parts.command.len());
    }

    #[test]
    fn embedded_code_is_sixty_four_lowercase_hex() {
        let command = command_with_code("Use invite ", FieldElement::from(0xabcdu64));
        let tail = &command[command.len() - 64..];
        assert!(tail.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
        assert!(command.ends_with("abcd"));
    }
}
