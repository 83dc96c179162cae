//! Statistics over QR factors.
//!
//! - [`calculate_stats`]: extremal values, total and average over `Q` and
//!   `R`, rounded to four decimals
//! - [`is_diagonal`]: tolerance-based diagonal check
//!
//! Both are pure functions of their input.

mod diagonal;
mod summary;

pub use diagonal::{is_diagonal, DEFAULT_TOLERANCE};
pub use summary::{calculate_stats, round_decimals, StatisticsResult, DECIMALS};
