//! qrstat: Householder QR factorization and statistics over its factors.
//!
//! The crate is the numeric core behind the `qrs` services: it validates a
//! nested-row matrix, factorizes it into an orthogonal `Q` and an
//! upper-triangular `R`, and summarizes the pair.
//!
//! # Quick Start
//!
//! ```
//! use qrstat::prelude::*;
//!
//! let factors = factorize(&[
//!     vec![12.0, -51.0],
//!     vec![6.0, 167.0],
//!     vec![-4.0, 24.0],
//! ]).unwrap();
//!
//! let stats = calculate_stats(&factors.q, &factors.r);
//! assert!(!stats.is_r_diagonal);
//! assert!(stats.max >= stats.min);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: the [`Matrix`](primitives::Matrix) container
//! - [`linalg`]: shape validation and Householder QR
//! - [`stats`]: summary statistics and the diagonal check
//! - [`error`]: validation and factorization errors

pub mod error;
pub mod linalg;
pub mod prelude;
pub mod primitives;
pub mod stats;
