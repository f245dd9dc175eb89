use std::collections::HashMap;

use num_bigint::BigUint;

use crate::FieldElement;

/// Types that can be exported as a witness input map for a circom circuit.
///
/// Keys are circuit signal names; values are the signal assignments as
/// decimal strings, the format witness generators consume.
pub trait CircuitInput {
    /// Prepares the full signal assignment for witness generation.
    fn prepare_input(&self) -> HashMap<String, Vec<String>>;
}

/// Renders a field element as a decimal signal value.
#[must_use]
pub fn field_to_decimal(f: FieldElement) -> String {
    BigUint::from_bytes_be(&f.to_be_bytes()).to_str_radix(10)
}

/// Renders a sequence of field elements as decimal signal values.
#[must_use]
pub fn field_seq_to_decimal(fs: &[FieldElement]) -> Vec<String> {
    fs.iter().map(|&f| field_to_decimal(f)).collect()
}

/// Renders raw bytes as one decimal signal value per byte.
#[must_use]
pub fn bytes_to_decimal(bytes: &[u8]) -> Vec<String> {
    bytes.iter().map(|b| b.to_string()).collect()
}

/// Renders 121-bit limbs as decimal signal values.
#[must_use]
pub fn limbs_to_decimal(limbs: &[u128]) -> Vec<String> {
    limbs.iter().map(|limb| limb.to_string()).collect()
}
