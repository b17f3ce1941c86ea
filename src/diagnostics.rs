//! Diagnostic measures for bases and fits: residuals, roughness and partition of unity.

use crate::types::BasisMatrix;
use ndarray::{Array1, ArrayView1};

/// Computes raw response residuals: y - fitted.
pub fn response_residuals(y: &Array1<f64>, fitted: &Array1<f64>) -> Array1<f64> {
    y - fitted
}

/// Residual sum of squares: Σ(y - fitted)².
pub fn residual_sum_of_squares(y: &Array1<f64>, fitted: &Array1<f64>) -> f64 {
    let r = response_residuals(y, fitted);
    r.dot(&r)
}

/// `order`-th differences of a coefficient vector. Empty when `order >= len`.
pub fn differences(coefficients: ArrayView1<'_, f64>, order: usize) -> Array1<f64> {
    let mut current = coefficients.to_owned();
    for _ in 0..order {
        if current.len() < 2 {
            return Array1::zeros(0);
        }
        let n = current.len();
        current = Array1::from_shape_fn(n - 1, |i| current[i + 1] - current[i]);
    }
    current
}

/// Sum of squared `order`-th differences; smaller means smoother coefficients.
pub fn roughness(coefficients: ArrayView1<'_, f64>, order: usize) -> f64 {
    let d = differences(coefficients, order);
    d.dot(&d)
}

/// Row sums of a basis matrix. Inside the fully supported interval every sum is 1.
pub fn row_sums(basis: &BasisMatrix) -> Array1<f64> {
    basis.rows().into_iter().map(|row| row.sum()).collect()
}

/// Largest deviation of a row sum from 1 over the rows selected by `mask`.
pub fn partition_of_unity_error(basis: &BasisMatrix, mask: impl Fn(usize) -> bool) -> f64 {
    row_sums(basis)
        .iter()
        .enumerate()
        .filter(|(i, _)| mask(*i))
        .fold(0.0_f64, |acc, (_, &s)| acc.max((s - 1.0).abs()))
}
