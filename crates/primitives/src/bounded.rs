use crate::{FieldElement, PrimitiveError};
use ark_bn254::Fr;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Number of bytes packed into one scalar lane.
///
/// 31 bytes are 248 bits, strictly below the 254-bit BN254 scalar field, so
/// every lane is a canonical field element.
pub const LANE_BYTES: usize = 31;

/// A fixed-capacity byte buffer with a logical length.
///
/// The invariant maintained by every constructor: `len <= N` and all bytes at
/// positions `>= len` are zero. Verification code relies on this to scan the
/// full capacity at fixed cost while behaving as if only the logical region
/// existed.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BoundedBytes<const N: usize> {
    bytes: [u8; N],
    len: usize,
}

impl<const N: usize> BoundedBytes<N> {
    /// An empty buffer (logical length zero).
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            bytes: [0u8; N],
            len: 0,
        }
    }

    /// Copies `data` into a zero-initialized buffer.
    ///
    /// # Errors
    /// Returns [`PrimitiveError::OutOfBounds`] if `data` exceeds the
    /// capacity.
    pub fn new(data: &[u8]) -> Result<Self, PrimitiveError> {
        if data.len() > N {
            return Err(PrimitiveError::OutOfBounds);
        }
        let mut bytes = [0u8; N];
        bytes[..data.len()].copy_from_slice(data);
        Ok(Self {
            bytes,
            len: data.len(),
        })
    }

    /// Adopts a raw array and a claimed logical length, checking the padding
    /// invariant explicitly.
    ///
    /// # Errors
    /// Returns [`PrimitiveError::OutOfBounds`] if `len > N` and
    /// [`PrimitiveError::NonZeroPadding`] if any byte at position `>= len`
    /// is nonzero.
    pub fn from_array(bytes: [u8; N], len: usize) -> Result<Self, PrimitiveError> {
        if len > N {
            return Err(PrimitiveError::OutOfBounds);
        }
        if bytes[len..].iter().any(|&b| b != 0) {
            return Err(PrimitiveError::NonZeroPadding);
        }
        Ok(Self { bytes, len })
    }

    /// The logical content of the buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The full zero-padded backing array.
    #[must_use]
    pub const fn as_array(&self) -> &[u8; N] {
        &self.bytes
    }

    /// The logical length.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the logical length is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The fixed capacity `N`.
    #[must_use]
    pub const fn capacity() -> usize {
        N
    }

    /// Number of 31-byte lanes this buffer packs into.
    #[must_use]
    pub const fn lane_count() -> usize {
        N.div_ceil(LANE_BYTES)
    }

    /// Packs the buffer into scalar lanes of [`LANE_BYTES`] bytes each,
    /// little-endian within a lane (`lane = sum(byte[31j + b] * 256^b)`).
    ///
    /// The padding invariant guarantees trailing lanes encode zeros, so the
    /// packing of a buffer depends only on its logical content.
    #[must_use]
    pub fn to_lanes(&self) -> Vec<FieldElement> {
        self.bytes
            .chunks(LANE_BYTES)
            .map(|chunk| {
                let mut acc = Fr::from(0u64);
                for &byte in chunk.iter().rev() {
                    acc = acc * Fr::from(256u64) + Fr::from(u64::from(byte));
                }
                FieldElement::from(acc)
            })
            .collect()
    }

    /// Rebuilds a buffer from its lane packing and a logical length.
    ///
    /// This is the inverse of [`Self::to_lanes`] and rejects every
    /// non-canonical encoding.
    ///
    /// # Errors
    /// Returns [`PrimitiveError::InvalidInput`] on a wrong lane count,
    /// [`PrimitiveError::NotInField`] if a lane exceeds 2^248 or encodes
    /// bytes beyond the capacity, [`PrimitiveError::OutOfBounds`] if
    /// `len > N`, and [`PrimitiveError::NonZeroPadding`] if the decoded
    /// bytes violate the padding invariant.
    pub fn from_lanes(lanes: &[FieldElement], len: usize) -> Result<Self, PrimitiveError> {
        if lanes.len() != Self::lane_count() {
            return Err(PrimitiveError::InvalidInput {
                attribute: "lanes".to_string(),
                reason: format!("expected {} lanes, got {}", Self::lane_count(), lanes.len()),
            });
        }
        if len > N {
            return Err(PrimitiveError::OutOfBounds);
        }
        let mut bytes = [0u8; N];
        for (j, lane) in lanes.iter().enumerate() {
            let be = lane.to_be_bytes();
            // A canonical lane keeps its top byte clear (value < 2^248).
            if be[0] != 0 {
                return Err(PrimitiveError::NotInField);
            }
            let covered = LANE_BYTES.min(N - j * LANE_BYTES);
            for b in 0..LANE_BYTES {
                // be[31 - b] is the little-endian byte at in-lane position b.
                let value = be[31 - b];
                if b < covered {
                    bytes[j * LANE_BYTES + b] = value;
                } else if value != 0 {
                    return Err(PrimitiveError::NotInField);
                }
            }
        }
        Self::from_array(bytes, len)
    }
}

impl<const N: usize> Default for BoundedBytes<N> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const N: usize> fmt::Debug for BoundedBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedBytes")
            .field("capacity", &N)
            .field("len", &self.len)
            .field("bytes", &format_args!("0x{}", hex::encode(self.as_slice())))
            .finish()
    }
}

impl<const N: usize> Serialize for BoundedBytes<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&format!("0x{}", hex::encode(self.as_slice())))
        } else {
            serializer.serialize_bytes(self.as_slice())
        }
    }
}

impl<'de, const N: usize> Deserialize<'de> for BoundedBytes<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let data = if deserializer.is_human_readable() {
            let hex_str = String::deserialize(deserializer)?;
            let hex_str = hex_str.strip_prefix("0x").unwrap_or(&hex_str);
            hex::decode(hex_str).map_err(D::Error::custom)?
        } else {
            Vec::<u8>::deserialize(deserializer)?
        };
        Self::new(&data).map_err(D::Error::custom)
    }
}
