//! Ordinary least squares with an intercept.
//!
//! Features are centred and scaled to unit norm, the normal equations are
//! diagonalised with cyclic Jacobi rotations, and near-zero eigen-directions
//! are dropped. The result is the minimum-norm least-squares solution in
//! the scaled space: a feature that is constant over the training rows gets
//! a coefficient of exactly 0 instead of making the system singular.

use crate::error::{AnalyticsError, AnalyticsResult};
use serde::{Deserialize, Serialize};

/// Relative cut-off below which a scaled column or an eigenvalue counts as zero.
const RANK_TOLERANCE: f64 = 1e-10;
const MAX_JACOBI_SWEEPS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    /// Fit `y ≈ intercept + x · coefficients`. Every row of `x` must have
    /// the same width; at least one row is required.
    pub fn fit(x: &[Vec<f64>], y: &[f64]) -> AnalyticsResult<Self> {
        if x.is_empty() {
            return Err(AnalyticsError::InsufficientData {
                required: 1,
                available: 0,
            });
        }
        if x.len() != y.len() {
            return Err(AnalyticsError::data_format(
                0,
                "revenue",
                format!("{} feature rows but {} targets", x.len(), y.len()),
            ));
        }
        let p = x[0].len();
        if let Some(i) = x.iter().position(|row| row.len() != p) {
            return Err(AnalyticsError::data_format(
                i + 1,
                "<features>",
                format!("expected {p} features, got {}", x[i].len()),
            ));
        }

        let n = x.len() as f64;
        let x_mean: Vec<f64> = (0..p)
            .map(|j| x.iter().map(|row| row[j]).sum::<f64>() / n)
            .collect();
        let y_mean = y.iter().sum::<f64>() / n;

        // Column norms of the centred design; ~0 means the feature is constant.
        let norms: Vec<f64> = (0..p)
            .map(|j| {
                let norm = x.iter().map(|row| (row[j] - x_mean[j]).powi(2)).sum::<f64>().sqrt();
                let scale = x_mean[j].abs().max(1.0) * n.sqrt();
                if norm <= RANK_TOLERANCE * scale {
                    0.0
                } else {
                    norm
                }
            })
            .collect();

        let z = |row: &[f64], j: usize| -> f64 {
            if norms[j] == 0.0 {
                0.0
            } else {
                (row[j] - x_mean[j]) / norms[j]
            }
        };

        let mut gram = vec![vec![0.0; p]; p];
        let mut rhs = vec![0.0; p];
        for (row, &target) in x.iter().zip(y) {
            let yc = target - y_mean;
            for a in 0..p {
                let za = z(row, a);
                rhs[a] += za * yc;
                for b in a..p {
                    gram[a][b] += za * z(row, b);
                }
            }
        }
        for a in 0..p {
            for b in 0..a {
                gram[a][b] = gram[b][a];
            }
        }

        let (eigenvalues, eigenvectors) = symmetric_eigen(gram);
        let lambda_max = eigenvalues.iter().cloned().fold(0.0_f64, f64::max);

        let mut scaled = vec![0.0; p];
        if lambda_max > 0.0 {
            for (k, &lambda) in eigenvalues.iter().enumerate() {
                if lambda <= RANK_TOLERANCE * lambda_max {
                    continue;
                }
                let projection: f64 = (0..p).map(|i| eigenvectors[i][k] * rhs[i]).sum::<f64>() / lambda;
                for (i, coef) in scaled.iter_mut().enumerate() {
                    *coef += projection * eigenvectors[i][k];
                }
            }
        }

        let coefficients: Vec<f64> = scaled
            .iter()
            .zip(&norms)
            .map(|(&c, &norm)| if norm == 0.0 { 0.0 } else { c / norm })
            .collect();
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(&x_mean)
                .map(|(c, m)| c * m)
                .sum::<f64>();

        Ok(Self {
            intercept,
            coefficients,
        })
    }

    /// Prediction for one feature row of the fitted width.
    pub fn predict(&self, features: &[f64]) -> f64 {
        debug_assert_eq!(features.len(), self.coefficients.len());
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }
}

/// Eigen-decomposition of a symmetric matrix by cyclic Jacobi rotations.
/// Returns the eigenvalues and a matrix whose columns are the eigenvectors.
fn symmetric_eigen(mut a: Vec<Vec<f64>>) -> (Vec<f64>, Vec<Vec<f64>>) {
    let n = a.len();
    let mut v: Vec<Vec<f64>> = (0..n)
        .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect();

    for _ in 0..MAX_JACOBI_SWEEPS {
        let off: f64 = (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .map(|(i, j)| a[i][j] * a[i][j])
            .sum();
        let diag: f64 = (0..n).map(|i| a[i][i] * a[i][i]).sum();
        if off <= f64::EPSILON * f64::EPSILON * diag || off == 0.0 {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                if a[p][q] == 0.0 {
                    continue;
                }
                let theta = (a[q][q] - a[p][p]) / (2.0 * a[p][q]);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for row in a.iter_mut() {
                    let (kp, kq) = (row[p], row[q]);
                    row[p] = c * kp - s * kq;
                    row[q] = s * kp + c * kq;
                }
                for k in 0..n {
                    let (pk, qk) = (a[p][k], a[q][k]);
                    a[p][k] = c * pk - s * qk;
                    a[q][k] = s * pk + c * qk;
                }
                for row in v.iter_mut() {
                    let (kp, kq) = (row[p], row[q]);
                    row[p] = c * kp - s * kq;
                    row[q] = s * kp + c * kq;
                }
            }
        }
    }

    let eigenvalues = (0..n).map(|i| a[i][i]).collect();
    (eigenvalues, v)
}
