use crate::{
    hash::poseidon_compress,
    serde_utils::{array_serde, hex_u64},
    FieldElement, PrimitiveError,
};
use serde::{Deserialize, Serialize};

/// Artifact required to prove membership of an email domain in an anonymity
/// set.
///
/// Each leaf of the tree commits to one allowed domain; the prover shows a
/// sibling path from its own domain's leaf up to the published root without
/// revealing which leaf it is.
///
/// The path direction bits are carried explicitly in `selectors` in addition
/// to `leaf_index`. Both encode the same positions and are cross-checked
/// during validation, mirroring the redundancy the circuit enforces on its
/// own inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainMembershipProof<const TREE_DEPTH: usize> {
    /// The root hash of the Merkle tree.
    pub root: FieldElement,
    /// The leaf position in the Merkle tree.
    #[serde(with = "hex_u64")]
    pub leaf_index: u64,
    /// The sibling path up to the Merkle root.
    #[serde(with = "array_serde")]
    pub siblings: [FieldElement; TREE_DEPTH],
    /// Per-level direction bits: 0 places the running hash on the left,
    /// 1 on the right.
    #[serde(with = "array_serde")]
    pub selectors: [u8; TREE_DEPTH],
}

impl<const TREE_DEPTH: usize> DomainMembershipProof<TREE_DEPTH> {
    /// Creates a new domain membership proof.
    #[must_use]
    pub const fn new(
        root: FieldElement,
        leaf_index: u64,
        siblings: [FieldElement; TREE_DEPTH],
        selectors: [u8; TREE_DEPTH],
    ) -> Self {
        Self {
            root,
            leaf_index,
            siblings,
            selectors,
        }
    }

    /// Recomputes the root from `leaf` along the sibling path and compares it
    /// against the committed root.
    ///
    /// # Errors
    /// Returns [`PrimitiveError::InvalidInput`] if a selector is not a bit or
    /// disagrees with the bit decomposition of `leaf_index`.
    pub fn is_valid(&self, leaf: FieldElement) -> Result<bool, PrimitiveError> {
        let mut computed = leaf;
        for (idx, (sibling, &selector)) in
            self.siblings.iter().zip(self.selectors.iter()).enumerate()
        {
            if selector > 1 {
                return Err(PrimitiveError::InvalidInput {
                    attribute: "selectors".to_string(),
                    reason: format!("level {idx} selector must be 0 or 1, got {selector}"),
                });
            }
            if u64::from(selector) != (self.leaf_index >> idx) & 1 {
                return Err(PrimitiveError::InvalidInput {
                    attribute: "selectors".to_string(),
                    reason: format!("level {idx} selector disagrees with the leaf index"),
                });
            }
            computed = if selector == 0 {
                poseidon_compress(computed, *sibling)?
            } else {
                poseidon_compress(*sibling, computed)?
            };
        }
        Ok(computed == self.root)
    }
}
