use crate::FieldElement;
use serde::{Deserialize, Serialize};

/// Optional outputs produced when a domain anonymity proof is part of the
/// statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymityOutputs {
    /// The email domain packed into 31-byte lanes.
    pub domain: Vec<FieldElement>,
    /// The root of the domain anonymity Merkle tree.
    pub root: FieldElement,
}

/// The public outputs of a JWT verification statement.
///
/// Field order matches the order in which the outputs leave the circuit;
/// [`Self::to_vec`] flattens them in exactly that order so callers can bind
/// them against a proof's public signals positionally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtPublicOutputs {
    /// The key id claimed in the header, packed into 31-byte lanes.
    pub kid: Vec<FieldElement>,
    /// The issuer claimed in the payload, packed into 31-byte lanes.
    pub issuer: Vec<FieldElement>,
    /// Poseidon commitment to the RSA modulus limbs.
    pub public_key_hash: FieldElement,
    /// Poseidon commitment to the RSA signature limbs.
    pub jwt_nullifier: FieldElement,
    /// The `iat` claim as a scalar.
    pub timestamp: FieldElement,
    /// The nonce command with email and code occurrences zeroed, packed into
    /// 31-byte lanes.
    pub masked_command: Vec<FieldElement>,
    /// Poseidon commitment binding the email address to the account code.
    pub account_salt: FieldElement,
    /// The authorized party claimed in the payload, packed into 31-byte lanes.
    pub azp: Vec<FieldElement>,
    /// 1 when the command carried an embedded account code, 0 otherwise.
    pub is_code_exist: FieldElement,
    /// Domain outputs, present only for anonymity-mode statements.
    pub anonymity: Option<AnonymityOutputs>,
}

impl JwtPublicOutputs {
    /// Flattens the outputs into the positional order of the circuit's public
    /// signals.
    #[must_use]
    pub fn to_vec(&self) -> Vec<FieldElement> {
        let anonymity_len = self
            .anonymity
            .as_ref()
            .map_or(0, |anonymity| anonymity.domain.len() + 1);
        let mut out = Vec::with_capacity(
            self.kid.len()
                + self.issuer.len()
                + self.masked_command.len()
                + self.azp.len()
                + 5
                + anonymity_len,
        );
        out.extend_from_slice(&self.kid);
        out.extend_from_slice(&self.issuer);
        out.push(self.public_key_hash);
        out.push(self.jwt_nullifier);
        out.push(self.timestamp);
        out.extend_from_slice(&self.masked_command);
        out.push(self.account_salt);
        out.extend_from_slice(&self.azp);
        out.push(self.is_code_exist);
        if let Some(anonymity) = &self.anonymity {
            out.extend_from_slice(&anonymity.domain);
            out.push(anonymity.root);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentinel_outputs() -> JwtPublicOutputs {
        JwtPublicOutputs {
            kid: vec![FieldElement::from(1u64), FieldElement::from(2u64)],
            issuer: vec![FieldElement::from(3u64), FieldElement::from(4u64)],
            public_key_hash: FieldElement::from(5u64),
            jwt_nullifier: FieldElement::from(6u64),
            timestamp: FieldElement::from(7u64),
            masked_command: vec![FieldElement::from(8u64), FieldElement::from(9u64)],
            account_salt: FieldElement::from(10u64),
            azp: vec![FieldElement::from(11u64)],
            is_code_exist: FieldElement::from(1u64),
            anonymity: Some(AnonymityOutputs {
                domain: vec![FieldElement::from(12u64), FieldElement::from(13u64)],
                root: FieldElement::from(14u64),
            }),
        }
    }

    #[test]
    fn flattening_preserves_signal_order() {
        let expected: Vec<FieldElement> = [1u64, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 1, 12, 13, 14]
            .iter()
            .map(|&v| FieldElement::from(v))
            .collect();
        assert_eq!(sentinel_outputs().to_vec(), expected);
    }

    #[test]
    fn anonymity_outputs_are_omitted_when_absent() {
        let mut outputs = sentinel_outputs();
        outputs.anonymity = None;
        let flat = outputs.to_vec();
        assert_eq!(flat.len(), 12);
        assert_eq!(flat.last(), Some(&FieldElement::from(1u64)));
    }

    #[test]
    fn serde_roundtrip() {
        let outputs = sentinel_outputs();
        let json = serde_json::to_string(&outputs).unwrap();
        let back: JwtPublicOutputs = serde_json::from_str(&json).unwrap();
        assert_eq!(back, outputs);
    }
}
