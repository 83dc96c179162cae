// =========================================================================
// FALSIFY-MX: Matrix primitives contract
//
// References:
//   - Golub & Van Loan (2013) "Matrix Computations"
// =========================================================================

use super::*;

/// FALSIFY-MX-001: Transpose involution: (A^T)^T = A
#[test]
fn falsify_mx_001_transpose_involution() {
    let a = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("valid");
    let att = a.transpose().transpose();

    assert_eq!(att.shape(), a.shape(), "FALSIFIED MX-001: shape mismatch");
    assert!(
        att.max_abs_diff(&a) < 1e-12,
        "FALSIFIED MX-001: (A^T)^T != A"
    );
}

/// FALSIFY-MX-002: Matmul shape: (m×k) * (k×n) = (m×n)
#[test]
fn falsify_mx_002_matmul_shape() {
    let a = Matrix::from_vec(2, 3, vec![1.0; 6]).expect("valid");
    let b = Matrix::from_vec(3, 4, vec![1.0; 12]).expect("valid");
    let c = a.matmul(&b).expect("compatible dims");

    assert_eq!(
        c.shape(),
        (2, 4),
        "FALSIFIED MX-002: (2x3)*(3x4) shape={:?}, expected (2,4)",
        c.shape()
    );
}

/// FALSIFY-MX-003: Identity matmul: A * I = A and I * A = A
#[test]
fn falsify_mx_003_identity_matmul() {
    let a = Matrix::from_vec(3, 2, vec![12.0, -51.0, 6.0, 167.0, -4.0, 24.0]).expect("valid");
    let right = a.matmul(&Matrix::eye(2)).expect("compatible dims");
    let left = Matrix::eye(3).matmul(&a).expect("compatible dims");

    assert!(right.max_abs_diff(&a) < 1e-12, "FALSIFIED MX-003: A*I != A");
    assert!(left.max_abs_diff(&a) < 1e-12, "FALSIFIED MX-003: I*A != A");
}

/// FALSIFY-MX-004: Transpose of product: (AB)^T = B^T A^T
#[test]
fn falsify_mx_004_transpose_of_product() {
    let a = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("valid");
    let b = Matrix::from_vec(3, 2, vec![7.0, 8.0, 9.0, 10.0, 11.0, 12.0]).expect("valid");

    let lhs = a.matmul(&b).expect("compatible dims").transpose();
    let rhs = b
        .transpose()
        .matmul(&a.transpose())
        .expect("compatible dims");

    assert!(
        lhs.max_abs_diff(&rhs) < 1e-9,
        "FALSIFIED MX-004: (AB)^T != B^T A^T"
    );
}
