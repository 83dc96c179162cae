//! Core compute primitives.
//!
//! [`Matrix`] is the single container shared by the validator, the
//! factorizer and the statistics engine.

mod matrix;

pub use matrix::Matrix;

#[cfg(test)]
#[path = "tests_matrix_contract.rs"]
mod tests_matrix_contract;
