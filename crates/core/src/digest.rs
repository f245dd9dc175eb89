//! SHA-256 digest of the JWT signing input.

use sha2::{Digest, Sha256};
use zk_jwt_primitives::BoundedBytes;

/// Hashes the logical region of the signing input.
///
/// Padding never reaches the hash, so two buffers with the same logical
/// content digest identically regardless of capacity.
#[must_use]
pub fn message_digest<const N: usize>(message: &BoundedBytes<N>) -> [u8; 32] {
    Sha256::digest(message.as_slice()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_the_sha256_test_vector() {
        let message = BoundedBytes::<64>::new(b"abc").unwrap();
        assert_eq!(
            hex::encode(message_digest(&message)),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn capacity_does_not_affect_the_digest() {
        let small = BoundedBytes::<64>::new(b"abc").unwrap();
        let large = BoundedBytes::<1024>::new(b"abc").unwrap();
        assert_eq!(message_digest(&small), message_digest(&large));
    }
}
