//! Terminal output helpers.

use colored::Colorize;
use qrstat::primitives::Matrix;

/// Print a section header
pub(crate) fn section(title: &str) {
    println!("\n{}", format!("=== {title} ===").cyan().bold());
}

/// Print a key-value pair
pub(crate) fn kv(key: &str, value: impl std::fmt::Display) {
    println!("  {}: {}", key.white().bold(), value);
}

/// Print a success message
pub(crate) fn success(msg: &str) {
    println!("{} {}", "[PASS]".green().bold(), msg);
}

/// Print a warning message
pub(crate) fn warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// Print a matrix row by row with aligned columns.
pub(crate) fn matrix(name: &str, m: &Matrix<f64>) {
    let (rows, cols) = m.shape();
    println!("  {} {}", name.white().bold(), format!("({rows}x{cols})").dimmed());
    for i in 0..rows {
        let cells: Vec<String> = m.row(i).iter().map(|v| format_cell(*v)).collect();
        println!("    [{}]", cells.join(" "));
    }
}

fn format_cell(v: f64) -> String {
    // -0.0 prints as 0 so zeroed entries line up
    let v = if v == 0.0 { 0.0 } else { v };
    format!("{v:>12.6}")
}

/// Print a yes/no flag, green when it holds.
pub(crate) fn flag(key: &str, value: bool) {
    let shown = if value { "yes".green() } else { "no".yellow() };
    kv(key, shown);
}
