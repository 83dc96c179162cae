//! Summary statistics over a pair of QR factors.

use serde::{Deserialize, Serialize};

use super::diagonal::{is_diagonal, DEFAULT_TOLERANCE};
use crate::primitives::Matrix;

/// Decimal places kept in every numeric statistic.
pub const DECIMALS: i32 = 4;

/// Aggregates over all entries of `Q` followed by all entries of `R`.
///
/// Field names serialize in camelCase (`isQDiagonal`, `isRDiagonal`), the
/// shape expected on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResult {
    /// Largest entry.
    pub max: f64,
    /// Smallest entry.
    pub min: f64,
    /// Arithmetic mean of all entries.
    pub average: f64,
    /// Sum of all entries.
    pub total: f64,
    /// Whether `Q` is diagonal within [`DEFAULT_TOLERANCE`].
    pub is_q_diagonal: bool,
    /// Whether `R` is diagonal within [`DEFAULT_TOLERANCE`].
    pub is_r_diagonal: bool,
}

/// Computes max, min, total and average over the entries of `q` then `r`
/// (both row-major), each rounded to [`DECIMALS`] places, plus the diagonal
/// flags of both factors.
///
/// `q` and `r` are expected to be non-empty; the function does not defend
/// against empty input. `NaN` entries are skipped by `max`/`min` but
/// poison `total` and `average`.
///
/// # Examples
///
/// ```
/// use qrstat::primitives::Matrix;
/// use qrstat::stats::calculate_stats;
///
/// let q = Matrix::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0]]).expect("valid");
/// let r = Matrix::from_rows(&[vec![2.0, 3.0], vec![0.0, 4.0]]).expect("valid");
/// let stats = calculate_stats(&q, &r);
/// assert_eq!(stats.total, 11.0);
/// assert_eq!(stats.average, 1.375);
/// assert!(stats.is_q_diagonal);
/// assert!(!stats.is_r_diagonal);
/// ```
#[must_use]
pub fn calculate_stats(q: &Matrix<f64>, r: &Matrix<f64>) -> StatisticsResult {
    let values = q.as_slice().iter().chain(r.as_slice().iter()).copied();

    let mut max = f64::NEG_INFINITY;
    let mut min = f64::INFINITY;
    let mut total = 0.0;
    let mut count = 0usize;
    for x in values {
        max = max.max(x);
        min = min.min(x);
        total += x;
        count += 1;
    }
    let average = total / count as f64;

    StatisticsResult {
        max: round_decimals(max, DECIMALS),
        min: round_decimals(min, DECIMALS),
        average: round_decimals(average, DECIMALS),
        total: round_decimals(total, DECIMALS),
        is_q_diagonal: is_diagonal(q, DEFAULT_TOLERANCE),
        is_r_diagonal: is_diagonal(r, DEFAULT_TOLERANCE),
    }
}

/// Fraction digits needed to print any finite `f64` exactly.
const EXACT_FRACTION_DIGITS: usize = 1074;

/// Rounds to `decimals` places, ties away from zero.
///
/// Rounding is decided on the exact decimal value of `x`, not on `x`
/// scaled by a power of ten, so a value stored just below a half-way point
/// (`2.00005` is `2.0000499999…`) rounds down. Non-finite values are
/// returned unchanged.
///
/// ```
/// use qrstat::stats::round_decimals;
///
/// assert_eq!(round_decimals(0.03125, 4), 0.0313);
/// assert_eq!(round_decimals(-0.03125, 4), -0.0313);
/// assert_eq!(round_decimals(2.00005, 4), 2.0);
/// ```
#[must_use]
pub fn round_decimals(x: f64, decimals: i32) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let places = usize::try_from(decimals).unwrap_or(0);
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, x.abs());
    let Some((int_part, frac_part)) = exact.split_once('.') else {
        return x;
    };

    let round_up = frac_part.as_bytes().get(places).is_some_and(|&d| d >= b'5');
    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(places))
        .collect();
    if round_up {
        increment_decimal(&mut digits);
    }

    let split = digits.len() - places;
    let mut text = String::with_capacity(digits.len() + 1);
    text.extend(digits[..split].iter().map(|&d| char::from(d)));
    if places > 0 {
        text.push('.');
        text.extend(digits[split..].iter().map(|&d| char::from(d)));
    }
    let magnitude = text.parse::<f64>().unwrap_or(x.abs());

    // No negative zero in the output.
    if magnitude == 0.0 {
        0.0
    } else {
        magnitude.copysign(x)
    }
}

/// Adds one unit in the last place to a string of ASCII digits.
fn increment_decimal(digits: &mut Vec<u8>) {
    for d in digits.iter_mut().rev() {
        if *d == b'9' {
            *d = b'0';
        } else {
            *d += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}
