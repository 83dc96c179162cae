//! Householder QR decomposition.
//!
//! For an `m × n` matrix `A` the complete factorization returns an
//! orthogonal `Q` (`m × m`) and an upper-triangular `R` (`m × n`) with
//! `A = Q R`. Column `k` is reduced with the reflector
//! `H = I - 2 v vᵀ` (`‖v‖ = 1`) that maps `A[k.., k]` onto
//! `alpha · e₁`, with `alpha = -sign(a_kk) ‖A[k.., k]‖` so that forming
//! `v = x - alpha e₁` never cancels.
//!
//! # References
//!
//! - Golub & Van Loan (2013) "Matrix Computations", §5.1–5.2

use crate::error::FactorizationError;
use crate::primitives::Matrix;

/// The `(Q, R)` pair produced by [`factorize`].
#[derive(Debug, Clone, PartialEq)]
pub struct QrFactors {
    /// Orthogonal factor.
    pub q: Matrix<f64>,
    /// Upper-triangular factor.
    pub r: Matrix<f64>,
}

impl QrFactors {
    /// Returns the thin factorization: `Q` is `m × k`, `R` is `k × n`,
    /// `k = min(m, n)`.
    ///
    /// For `m ≤ n` this is the same as the complete form.
    #[must_use]
    pub fn reduced(&self) -> Self {
        let (m, n) = (self.q.n_rows(), self.r.n_cols());
        let k = m.min(n);
        Self {
            q: self.q.leading_block(m, k),
            r: self.r.leading_block(k, n),
        }
    }

    /// Multiplies the factors back together.
    #[must_use]
    pub fn reconstruct(&self) -> Matrix<f64> {
        // Shapes agree by construction: Q has as many columns as R has rows.
        self.q
            .matmul(&self.r)
            .unwrap_or_else(|_| Matrix::zeros(self.q.n_rows(), self.r.n_cols()))
    }
}

/// Validates nested rows and computes their complete QR factorization.
///
/// # Errors
///
/// Returns [`FactorizationError::InvalidInput`] carrying the validator's
/// error when the input is empty or ragged.
///
/// # Examples
///
/// ```
/// use qrstat::linalg::factorize;
///
/// let factors = factorize(&[vec![12.0, -51.0], vec![6.0, 167.0], vec![-4.0, 24.0]])
///     .expect("rectangular input");
/// assert_eq!(factors.q.shape(), (3, 3));
/// assert_eq!(factors.r.shape(), (3, 2));
/// assert!((factors.r.get(0, 0).abs() - 14.0).abs() < 1e-9);
/// ```
pub fn factorize(rows: &[Vec<f64>]) -> Result<QrFactors, FactorizationError> {
    let matrix = Matrix::from_rows(rows)?;
    Ok(householder_qr(&matrix))
}

/// Complete Householder QR of an already validated matrix.
///
/// Never fails. Non-finite entries are not rejected; they propagate into
/// the factors.
#[must_use]
pub fn householder_qr(a: &Matrix<f64>) -> QrFactors {
    let (m, n) = a.shape();
    let mut r = a.clone();
    let mut q = Matrix::eye(m);
    let mut v = vec![0.0; m];

    for k in 0..m.min(n) {
        let len = m - k;
        for (i, slot) in v[..len].iter_mut().enumerate() {
            *slot = r.get(k + i, k);
        }

        let tail = stable_norm(&v[1..len]);
        if tail == 0.0 {
            // Nothing below the pivot: identity reflector.
            continue;
        }

        let x_norm = v[0].hypot(tail);
        let alpha = if v[0] >= 0.0 { -x_norm } else { x_norm };
        v[0] -= alpha;
        let v_norm = stable_norm(&v[..len]);
        for x in &mut v[..len] {
            *x /= v_norm;
        }
        let v = &v[..len];

        // R[k.., k..] <- H R[k.., k..]
        for j in k..n {
            let s: f64 = (0..len).map(|i| v[i] * r.get(k + i, j)).sum();
            for (i, &vi) in v.iter().enumerate() {
                r.set(k + i, j, r.get(k + i, j) - 2.0 * s * vi);
            }
        }
        r.set(k, k, alpha);
        for i in 1..len {
            r.set(k + i, k, 0.0);
        }

        // Q[.., k..] <- Q[.., k..] H
        for row in 0..m {
            let s: f64 = (0..len).map(|l| q.get(row, k + l) * v[l]).sum();
            for (l, &vl) in v.iter().enumerate() {
                q.set(row, k + l, q.get(row, k + l) - 2.0 * s * vl);
            }
        }
    }

    QrFactors { q, r }
}

/// Euclidean norm accumulated with `hypot`, immune to intermediate overflow.
fn stable_norm(xs: &[f64]) -> f64 {
    xs.iter().fold(0.0_f64, |acc, &x| acc.hypot(x))
}

#[cfg(test)]
#[path = "qr_tests.rs"]
mod tests;
