use eyre::{eyre, Result};
use zk_jwt_core::derive::domain_leaf;
use zk_jwt_core::MAX_DOMAIN_LEN;
use zk_jwt_primitives::{
    hash::poseidon_compress, BoundedBytes, DomainMembershipProof, FieldElement,
};

/// A fully materialized anonymity set with every intermediate node retained,
/// so a membership witness for any leaf is a plain lookup.
pub struct DomainTree<const DEPTH: usize> {
    levels: Vec<Vec<FieldElement>>,
}

impl<const DEPTH: usize> DomainTree<DEPTH> {
    /// Builds the tree over the given leaves, padding the level with zero
    /// leaves up to `2^DEPTH`.
    pub fn build(leaves: &[FieldElement]) -> Result<Self> {
        let width = 1usize << DEPTH;
        if leaves.len() > width {
            return Err(eyre!("anonymity set of {} exceeds 2^{DEPTH} leaves", leaves.len()));
        }
        let mut level = vec![FieldElement::ZERO; width];
        level[..leaves.len()].copy_from_slice(leaves);
        let mut levels = vec![level];
        for depth in 0..DEPTH {
            let below = &levels[depth];
            let mut above = Vec::with_capacity(below.len() / 2);
            for pair in below.chunks(2) {
                above.push(poseidon_compress(pair[0], pair[1])?);
            }
            levels.push(above);
        }
        Ok(Self { levels })
    }

    /// The committed root of the set.
    pub fn root(&self) -> FieldElement {
        self.levels[DEPTH][0]
    }

    /// Builds the membership witness for the leaf at `index`.
    pub fn proof(&self, index: usize) -> Result<DomainMembershipProof<DEPTH>> {
        if index >= 1 << DEPTH {
            return Err(eyre!("leaf index {index} outside the tree"));
        }
        let mut siblings = [FieldElement::ZERO; DEPTH];
        let mut selectors = [0u8; DEPTH];
        let mut position = index;
        for depth in 0..DEPTH {
            selectors[depth] = (position & 1) as u8;
            siblings[depth] = self.levels[depth][position ^ 1];
            position >>= 1;
        }
        Ok(DomainMembershipProof::new(
            self.root(),
            index as u64,
            siblings,
            selectors,
        ))
    }
}

/// Hashes a domain string into its anonymity-set leaf.
pub fn domain_leaf_for(domain: &str) -> Result<FieldElement> {
    let bytes: BoundedBytes<MAX_DOMAIN_LEN> = BoundedBytes::new(domain.as_bytes())?;
    Ok(domain_leaf(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_leaf_proof_reaches_the_root() {
        let leaves: Vec<_> = (1u64..=5).map(FieldElement::from).collect();
        let tree: DomainTree<3> = DomainTree::build(&leaves).unwrap();
        for (index, leaf) in leaves.iter().enumerate() {
            let proof = tree.proof(index).unwrap();
            assert!(proof.is_valid(*leaf).unwrap());
        }
    }

    #[test]
    fn padded_slots_hold_zero_leaves() {
        let tree: DomainTree<3> = DomainTree::build(&[FieldElement::from(7u64)]).unwrap();
        let proof = tree.proof(6).unwrap();
        assert!(proof.is_valid(FieldElement::ZERO).unwrap());
    }

    #[test]
    fn overfull_sets_are_rejected() {
        let leaves = vec![FieldElement::ONE; 9];
        assert!(DomainTree::<3>::build(&leaves).is_err());
    }
}
