//! Tolerance-based diagonal check.

use crate::primitives::Matrix;

/// Off-diagonal magnitude at or above which a matrix is not diagonal.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Returns `true` when every off-diagonal entry is strictly below
/// `tolerance` in absolute value.
///
/// Every position `(i, j)` with `i != j` inside the matrix extent is
/// checked, including positions of a rectangular matrix that have no
/// diagonal counterpart. An entry equal to the tolerance fails the check,
/// and so does a `NaN` entry.
///
/// # Examples
///
/// ```
/// use qrstat::primitives::Matrix;
/// use qrstat::stats::{is_diagonal, DEFAULT_TOLERANCE};
///
/// let almost = Matrix::from_rows(&[vec![1.0, 1e-7]]).expect("valid");
/// assert!(is_diagonal(&almost, DEFAULT_TOLERANCE));
///
/// let boundary = Matrix::from_rows(&[vec![1.0, 1e-6]]).expect("valid");
/// assert!(!is_diagonal(&boundary, DEFAULT_TOLERANCE));
/// ```
#[must_use]
#[allow(clippy::neg_cmp_op_on_partial_ord)] // NaN must fail the check
pub fn is_diagonal(matrix: &Matrix<f64>, tolerance: f64) -> bool {
    let (rows, cols) = matrix.shape();
    for i in 0..rows {
        for j in 0..cols {
            if i != j && !(matrix.get(i, j).abs() < tolerance) {
                return false;
            }
        }
    }
    true
}
