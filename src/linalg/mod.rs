//! Matrix validation and QR decomposition.
//!
//! # Examples
//!
//! ```
//! use qrstat::linalg::factorize;
//!
//! let factors = factorize(&[vec![1.0, 2.0], vec![3.0, 4.0]]).expect("rectangular input");
//! let back = factors.reconstruct();
//! assert!((back.get(1, 0) - 3.0).abs() < 1e-9);
//! ```

mod qr;
mod validate;

pub use qr::{factorize, householder_qr, QrFactors};
pub use validate::validate;

#[cfg(test)]
#[path = "tests_qr_contract.rs"]
mod tests_qr_contract;
