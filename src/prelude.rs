//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use qrstat::prelude::*;
//! ```

pub use crate::error::{FactorizationError, ValidationError};
pub use crate::linalg::{factorize, householder_qr, validate, QrFactors};
pub use crate::primitives::Matrix;
pub use crate::stats::{calculate_stats, is_diagonal, StatisticsResult, DEFAULT_TOLERANCE};
