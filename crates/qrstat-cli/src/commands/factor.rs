//! `qrs factor`: factorize a matrix file locally.
//!
//! Accepts either `{"matrix": [[...], ...]}` (the request body of
//! `POST /api/qr`) or a bare `[[...], ...]`. Statistics are computed in
//! process; nothing touches the network.

use std::path::Path;

use qrstat::error::FactorizationError;
use qrstat::linalg::householder_qr;
use qrstat::primitives::Matrix;
use qrstat::stats::calculate_stats;
use serde::Deserialize;

use crate::error::{CliError, Result};
use crate::output;
use crate::types::FactorizationResponse;

#[derive(Deserialize)]
#[serde(untagged)]
enum MatrixFile {
    Wrapped { matrix: Vec<Vec<f64>> },
    Bare(Vec<Vec<f64>>),
}

impl MatrixFile {
    fn into_rows(self) -> Vec<Vec<f64>> {
        match self {
            MatrixFile::Wrapped { matrix } | MatrixFile::Bare(matrix) => matrix,
        }
    }
}

/// Parse the matrix file contents.
pub(crate) fn parse_matrix(text: &str) -> Result<Vec<Vec<f64>>> {
    serde_json::from_str::<MatrixFile>(text)
        .map(MatrixFile::into_rows)
        .map_err(|_| {
            CliError::InvalidFormat(
                "expected {\"matrix\": [[...]]} or a JSON array of numeric rows".to_string(),
            )
        })
}

pub(crate) fn run(path: &Path, reduced: bool, json: bool) -> Result<()> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }
    let rows = parse_matrix(&std::fs::read_to_string(path)?)?;

    let input = Matrix::from_rows(&rows).map_err(FactorizationError::from)?;
    let factors = householder_qr(&input);
    let factors = if reduced { factors.reduced() } else { factors };
    let stats = calculate_stats(&factors.q, &factors.r);

    if json {
        let response = FactorizationResponse {
            q: factors.q.to_rows(),
            r: factors.r.to_rows(),
            stats,
        };
        let text = serde_json::to_string_pretty(&response)
            .map_err(|e| CliError::InvalidFormat(e.to_string()))?;
        println!("{text}");
        return Ok(());
    }

    output::section(if reduced { "Reduced QR" } else { "QR" });
    output::kv("Input", path.display());
    output::matrix("Q", &factors.q);
    output::matrix("R", &factors.r);

    output::section("Statistics");
    output::kv("max", stats.max);
    output::kv("min", stats.min);
    output::kv("average", stats.average);
    output::kv("total", stats.total);
    output::flag("Q diagonal", stats.is_q_diagonal);
    output::flag("R diagonal", stats.is_r_diagonal);

    let residual = factors.reconstruct().max_abs_diff(&input);
    if residual < 1e-6 {
        output::success(&format!("Q·R reconstructs the input (max |Δ| = {residual:.2e})"));
    } else {
        output::warning(&format!("Q·R differs from the input by up to {residual:.2e}"));
    }
    Ok(())
}
