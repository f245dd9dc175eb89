//! Fixtures shared by the verification tests: deterministically signed
//! tokens and prebuilt domain anonymity sets.

pub mod fixtures;
pub mod merkle;
