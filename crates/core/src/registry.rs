//! Issuer key registry and client whitelist.
//!
//! Registry checks run strictly after a successful verification and their
//! failures are recoverable: the outputs stay correct, the surrounding layer
//! just refuses them. This mirrors the split between unsatisfiable
//! statements and policy rejections.

use serde::{Deserialize, Serialize};

use zk_jwt_primitives::{FieldElement, JwtPublicOutputs};

/// Identifies a signing key by its issuer and key id, both lane-packed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IssuerKeyId {
    /// The issuer packed into 31-byte lanes.
    pub issuer: Vec<FieldElement>,
    /// The key id packed into 31-byte lanes.
    pub kid: Vec<FieldElement>,
}

/// Recoverable rejection of valid outputs by the registry policy.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The public key hash is not registered for the issuer and key id.
    #[error("invalid public key hash")]
    InvalidPublicKeyHash,
    /// The authorized party is not whitelisted.
    #[error("azp is not whitelisted")]
    AzpNotWhitelisted,
}

/// The registry surface queried after verification.
pub trait JwtKeyRegistry {
    /// Whether `hash` is the registered key hash for `key`.
    fn is_public_key_hash_valid(&self, key: &IssuerKeyId, hash: &FieldElement) -> bool;
    /// Whether the lane-packed authorized party is whitelisted.
    fn is_client_whitelisted(&self, azp: &[FieldElement]) -> bool;
}

/// One registered signing key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredKey {
    /// The issuer and key id the hash belongs to.
    pub key: IssuerKeyId,
    /// The Poseidon commitment to the key's modulus.
    pub hash: FieldElement,
}

/// A registry backed by in-process lists, mainly for tests and local
/// tooling. Deployments back the same trait with their registry contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryRegistry {
    keys: Vec<RegisteredKey>,
    whitelist: Vec<Vec<FieldElement>>,
}

impl InMemoryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            keys: Vec::new(),
            whitelist: Vec::new(),
        }
    }

    /// Loads a registry from its JSON representation.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Registers a key hash for an issuer and key id.
    pub fn register_key(&mut self, key: IssuerKeyId, hash: FieldElement) {
        self.keys.push(RegisteredKey { key, hash });
    }

    /// Adds a lane-packed authorized party to the whitelist.
    pub fn whitelist_client(&mut self, azp: Vec<FieldElement>) {
        self.whitelist.push(azp);
    }
}

impl JwtKeyRegistry for InMemoryRegistry {
    fn is_public_key_hash_valid(&self, key: &IssuerKeyId, hash: &FieldElement) -> bool {
        self.keys
            .iter()
            .any(|entry| &entry.key == key && &entry.hash == hash)
    }

    fn is_client_whitelisted(&self, azp: &[FieldElement]) -> bool {
        self.whitelist.iter().any(|entry| entry.as_slice() == azp)
    }
}

/// Applies the registry policy to the outputs of a successful verification.
///
/// # Errors
/// Returns [`PolicyError`] in the following cases:
/// * `InvalidPublicKeyHash` - no registered key hash matches the outputs'
///   issuer and key id.
/// * `AzpNotWhitelisted` - the authorized party is unknown.
pub fn enforce_policy<R: JwtKeyRegistry + ?Sized>(
    registry: &R,
    outputs: &JwtPublicOutputs,
) -> Result<(), PolicyError> {
    let key = IssuerKeyId {
        issuer: outputs.issuer.clone(),
        kid: outputs.kid.clone(),
    };
    if !registry.is_public_key_hash_valid(&key, &outputs.public_key_hash) {
        tracing::error!("public key hash not registered for this issuer and key id");
        return Err(PolicyError::InvalidPublicKeyHash);
    }
    if !registry.is_client_whitelisted(&outputs.azp) {
        tracing::error!("authorized party is not whitelisted");
        return Err(PolicyError::AzpNotWhitelisted);
    }
    Ok(())
}
