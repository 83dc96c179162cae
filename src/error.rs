//! Error types for qrstat operations.
//!
//! Display strings are the messages surfaced to API clients, so they are
//! kept stable.

use std::fmt;

/// Shape violation detected before factorization.
///
/// # Examples
///
/// ```
/// use qrstat::error::ValidationError;
///
/// let err = ValidationError::EmptyMatrix;
/// assert_eq!(err.to_string(), "Matriz vacía");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The matrix has no rows (or its first row has no columns).
    EmptyMatrix,

    /// A row's length differs from the first row's length.
    IrregularShape {
        /// Index of the first offending row
        row: usize,
        /// Length of row 0
        expected: usize,
        /// Length of the offending row
        found: usize,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyMatrix => write!(f, "Matriz vacía"),
            // Row and lengths stay in Debug; the client message is fixed.
            ValidationError::IrregularShape { .. } => write!(f, "La matriz no es rectangular"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Failure of [`crate::linalg::factorize`].
///
/// The Householder step itself never fails for a well-formed matrix, so the
/// only source is the validation error, passed through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorizationError {
    /// Input rejected by the validator.
    InvalidInput(ValidationError),
}

impl fmt::Display for FactorizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactorizationError::InvalidInput(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for FactorizationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FactorizationError::InvalidInput(e) => Some(e),
        }
    }
}

impl From<ValidationError> for FactorizationError {
    fn from(err: ValidationError) -> Self {
        FactorizationError::InvalidInput(err)
    }
}

impl FactorizationError {
    /// The validation error behind this failure.
    #[must_use]
    pub fn validation(&self) -> ValidationError {
        match self {
            FactorizationError::InvalidInput(e) => *e,
        }
    }
}
