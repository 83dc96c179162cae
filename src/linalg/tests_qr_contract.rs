// =========================================================================
// FALSIFY-QR: Householder QR contract
//
// Each test tries to break one invariant of A = QR on a fixed family of
// shapes (tall, square, wide, degenerate).
//
// References:
//   - Golub & Van Loan (2013) "Matrix Computations", Algorithm 5.2.1
// =========================================================================

use super::*;
use crate::primitives::Matrix;

fn shapes() -> Vec<Vec<Vec<f64>>> {
    vec![
        vec![vec![12.0, -51.0], vec![6.0, 167.0], vec![-4.0, 24.0]],
        vec![
            vec![12.0, -51.0, 4.0],
            vec![6.0, 167.0, -68.0],
            vec![-4.0, 24.0, -41.0],
        ],
        vec![vec![2.0, -1.0, 0.5, 3.0], vec![1.0, 4.0, -2.0, 0.0]],
        vec![vec![0.0, 1.0], vec![0.0, 2.0]],
        vec![vec![-7.25]],
        vec![vec![1.0], vec![-1.0], vec![1.0], vec![-1.0]],
    ]
}

/// FALSIFY-QR-001: Reconstruction: QR = A
#[test]
fn falsify_qr_001_reconstruction() {
    for rows in shapes() {
        let a = Matrix::from_rows(&rows).expect("valid");
        let f = factorize(&rows).expect("valid");
        let err = f.reconstruct().max_abs_diff(&a);
        assert!(err < 1e-6, "FALSIFIED QR-001: |QR - A| = {err} for {rows:?}");
    }
}

/// FALSIFY-QR-002: Orthogonality: Q^T Q = I
#[test]
fn falsify_qr_002_orthogonality() {
    for rows in shapes() {
        let f = factorize(&rows).expect("valid");
        let qtq = f.q.transpose().matmul(&f.q).expect("square");
        let err = qtq.max_abs_diff(&Matrix::eye(f.q.n_rows()));
        assert!(err < 1e-6, "FALSIFIED QR-002: |Q^T Q - I| = {err} for {rows:?}");
    }
}

/// FALSIFY-QR-003: Triangularity: R[i][j] = 0 for i > j
#[test]
fn falsify_qr_003_upper_triangular() {
    for rows in shapes() {
        let f = factorize(&rows).expect("valid");
        for i in 0..f.r.n_rows() {
            for j in 0..f.r.n_cols().min(i) {
                assert!(
                    f.r.get(i, j).abs() < 1e-6,
                    "FALSIFIED QR-003: R[{i}][{j}] = {} for {rows:?}",
                    f.r.get(i, j)
                );
            }
        }
    }
}

/// FALSIFY-QR-004: Shape: Q is m×m and R is m×n
#[test]
fn falsify_qr_004_shapes() {
    for rows in shapes() {
        let (m, n) = (rows.len(), rows[0].len());
        let f = factorize(&rows).expect("valid");
        assert_eq!(f.q.shape(), (m, m), "FALSIFIED QR-004: Q shape");
        assert_eq!(f.r.shape(), (m, n), "FALSIFIED QR-004: R shape");
    }
}

/// FALSIFY-QR-005: Column norms are preserved: ‖R[.., j]‖ = ‖A[.., j]‖
#[test]
fn falsify_qr_005_column_norms_preserved() {
    for rows in shapes() {
        let a = Matrix::from_rows(&rows).expect("valid");
        let f = factorize(&rows).expect("valid");
        for j in 0..a.n_cols() {
            let na: f64 = a.column(j).iter().map(|x| x * x).sum::<f64>().sqrt();
            let nr: f64 = f.r.column(j).iter().map(|x| x * x).sum::<f64>().sqrt();
            assert!(
                (na - nr).abs() < 1e-9 * na.max(1.0),
                "FALSIFIED QR-005: column {j} norm {na} vs {nr}"
            );
        }
    }
}

/// FALSIFY-QR-006: Determinism: identical input gives bit-identical factors
#[test]
fn falsify_qr_006_deterministic() {
    for rows in shapes() {
        let first = factorize(&rows).expect("valid");
        let second = factorize(&rows).expect("valid");
        assert_eq!(first, second, "FALSIFIED QR-006: nondeterministic output");
    }
}
