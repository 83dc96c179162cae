//! Shape checks run before factorization.

use crate::error::ValidationError;

/// Checks that nested rows form a non-empty rectangular matrix.
///
/// A 1×1 matrix is valid. A first row of length zero counts as an empty
/// matrix since the column count must be at least one.
///
/// # Errors
///
/// - [`ValidationError::EmptyMatrix`] if there are no rows or no columns.
/// - [`ValidationError::IrregularShape`] for the first row whose length
///   differs from row 0.
///
/// # Examples
///
/// ```
/// use qrstat::linalg::validate;
/// use qrstat::error::ValidationError;
///
/// assert!(validate(&[vec![1.0]]).is_ok());
/// assert_eq!(validate::<f64>(&[]), Err(ValidationError::EmptyMatrix));
/// ```
pub fn validate<T>(rows: &[Vec<T>]) -> Result<(), ValidationError> {
    let Some(first) = rows.first() else {
        return Err(ValidationError::EmptyMatrix);
    };
    let expected = first.len();
    if expected == 0 {
        return Err(ValidationError::EmptyMatrix);
    }
    if let Some((row, found)) = rows
        .iter()
        .map(Vec::len)
        .enumerate()
        .find(|&(_, len)| len != expected)
    {
        return Err(ValidationError::IrregularShape {
            row,
            expected,
            found,
        });
    }
    Ok(())
}
