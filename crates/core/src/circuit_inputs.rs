//! Witness serialization for the proving backend.

use std::collections::HashMap;

use zk_jwt_primitives::circuit_inputs::{
    bytes_to_decimal, field_to_decimal, field_seq_to_decimal, limbs_to_decimal, CircuitInput,
};

use crate::verifier::JwtProofInput;

impl<const DEPTH: usize> CircuitInput for JwtProofInput<DEPTH> {
    fn prepare_input(&self) -> HashMap<String, Vec<String>> {
        let mut inputs = HashMap::new();
        inputs.insert(
            "message".to_string(),
            bytes_to_decimal(self.message.as_array()),
        );
        inputs.insert(
            "messageLength".to_string(),
            vec![self.message.len().to_string()],
        );
        inputs.insert(
            "periodIndex".to_string(),
            vec![self.period_index.to_string()],
        );

        let locations = &self.locations;
        inputs.insert(
            "typStartIndex".to_string(),
            vec![locations.typ_offset.to_string()],
        );
        inputs.insert(
            "algStartIndex".to_string(),
            vec![locations.alg_offset.to_string()],
        );
        inputs.insert(
            "kidStartIndex".to_string(),
            vec![locations.kid_key_offset.to_string()],
        );
        inputs.insert("kidLength".to_string(), vec![locations.kid_len.to_string()]);
        inputs.insert(
            "issKeyStartIndex".to_string(),
            vec![locations.iss_key_offset.to_string()],
        );
        inputs.insert("issLength".to_string(), vec![locations.iss_len.to_string()]);
        inputs.insert(
            "iatKeyStartIndex".to_string(),
            vec![locations.iat_key_offset.to_string()],
        );
        inputs.insert(
            "azpKeyStartIndex".to_string(),
            vec![locations.azp_key_offset.to_string()],
        );
        inputs.insert("azpLength".to_string(), vec![locations.azp_len.to_string()]);
        inputs.insert(
            "nonceKeyStartIndex".to_string(),
            vec![locations.nonce_key_offset.to_string()],
        );
        inputs.insert(
            "commandLength".to_string(),
            vec![locations.command_len.to_string()],
        );

        inputs.insert("pubkey".to_string(), limbs_to_decimal(&self.modulus));
        inputs.insert("signature".to_string(), limbs_to_decimal(&self.signature));
        inputs.insert(
            "emailAddress".to_string(),
            bytes_to_decimal(self.email.as_array()),
        );
        inputs.insert(
            "emailAddressLength".to_string(),
            vec![self.email.len().to_string()],
        );
        inputs.insert(
            "accountCode".to_string(),
            vec![field_to_decimal(self.account_code)],
        );

        if let Some(proof) = &self.anonymity {
            inputs.insert(
                "domainTreeRoot".to_string(),
                vec![field_to_decimal(proof.root)],
            );
            inputs.insert(
                "domainLeafIndex".to_string(),
                vec![proof.leaf_index.to_string()],
            );
            inputs.insert(
                "domainPathSiblings".to_string(),
                field_seq_to_decimal(&proof.siblings),
            );
            inputs.insert(
                "domainPathSelectors".to_string(),
                proof.selectors.iter().map(ToString::to_string).collect(),
            );
        }
        inputs
    }
}

#[cfg(test)]
mod tests {
    use zk_jwt_primitives::{BoundedBytes, DomainMembershipProof, FieldElement};

    use super::*;
    use crate::{rsa::LIMB_COUNT, verifier::ClaimLocations, MAX_MESSAGE_LEN};

    fn sample_input() -> JwtProofInput<2> {
        JwtProofInput {
            message: BoundedBytes::new(b"aGVhZGVy.cGF5bG9hZA").unwrap(),
            period_index: 8,
            locations: ClaimLocations {
                kid_len: 4,
                command_len: 10,
                ..ClaimLocations::default()
            },
            modulus: [3u128; LIMB_COUNT],
            signature: [4u128; LIMB_COUNT],
            email: BoundedBytes::new(b"alice@example.com").unwrap(),
            account_code: FieldElement::from(5u64),
            anonymity: None,
        }
    }

    #[test]
    fn scalar_signals_are_single_entries() {
        let inputs = sample_input().prepare_input();
        assert_eq!(inputs["messageLength"], vec!["19".to_string()]);
        assert_eq!(inputs["periodIndex"], vec!["8".to_string()]);
        assert_eq!(inputs["kidLength"], vec!["4".to_string()]);
        assert_eq!(inputs["commandLength"], vec!["10".to_string()]);
        assert_eq!(inputs["accountCode"], vec!["5".to_string()]);
    }

    #[test]
    fn message_signal_covers_the_whole_capacity() {
        let inputs = sample_input().prepare_input();
        assert_eq!(inputs["message"].len(), MAX_MESSAGE_LEN);
        assert_eq!(inputs["message"][0], "97");
        assert_eq!(inputs["message"][19], "0");
    }

    #[test]
    fn limb_signals_keep_their_length() {
        let inputs = sample_input().prepare_input();
        assert_eq!(inputs["pubkey"].len(), LIMB_COUNT);
        assert_eq!(inputs["signature"], vec!["4".to_string(); LIMB_COUNT]);
    }

    #[test]
    fn anonymity_signals_only_appear_when_present() {
        let mut input = sample_input();
        assert!(!input.prepare_input().contains_key("domainTreeRoot"));

        input.anonymity = Some(DomainMembershipProof::new(
            FieldElement::from(9u64),
            2,
            [FieldElement::ZERO; 2],
            [0, 1],
        ));
        let inputs = input.prepare_input();
        assert_eq!(inputs["domainTreeRoot"], vec!["9".to_string()]);
        assert_eq!(inputs["domainLeafIndex"], vec!["2".to_string()]);
        assert_eq!(inputs["domainPathSiblings"].len(), 2);
        assert_eq!(
            inputs["domainPathSelectors"],
            vec!["0".to_string(), "1".to_string()]
        );
    }
}
