use super::SplineError;
use crate::preprocessing::validate_finite;
use crate::splines::{difference_penalty, first_difference_matrix};
use crate::types::{BasisMatrix, PenaltyMatrix};
use log::debug;
use ndarray::{Array1, Array2};

/// The pieces of `(BᵗB + λ·DᵗD) α = Bᵗy` that do not depend on `λ`.
#[derive(Debug, Clone)]
pub struct NormalEquations {
    pub(crate) b_t_b: Array2<f64>,
    pub(crate) b_t_y: Array1<f64>,
    pub(crate) d_t_d: Array2<f64>,
}

impl NormalEquations {
    pub fn n_coeffs(&self) -> usize {
        self.b_t_b.nrows()
    }

    /// `BᵗB + λ·DᵗD`
    pub fn system_matrix(&self, lambda: f64) -> Array2<f64> {
        let mut lhs = self.b_t_b.clone();
        if lambda > 0.0 {
            lhs.scaled_add(lambda, &self.d_t_d);
        }
        lhs
    }
}

/// Checks shapes and builds the cross products shared by every `λ`.
pub fn assemble_normal_equations(
    basis: &BasisMatrix,
    y: &Array1<f64>,
    penalty: &PenaltyMatrix,
) -> Result<NormalEquations, SplineError> {
    let (n_obs, n_coeffs) = basis.dim();

    if n_coeffs == 0 {
        return Err(SplineError::DimensionMismatch(
            "basis matrix has no columns".to_string(),
        ));
    }
    if y.len() != n_obs {
        return Err(SplineError::DimensionMismatch(format!(
            "basis has {} rows but response has {} values",
            n_obs,
            y.len()
        )));
    }
    if penalty.ncols() != n_coeffs {
        return Err(SplineError::DimensionMismatch(format!(
            "penalty is {} x {} but basis has {} columns",
            penalty.nrows(),
            penalty.ncols(),
            n_coeffs
        )));
    }

    validate_finite("basis", basis.iter())?;
    validate_finite("y", y)?;
    validate_finite("penalty", penalty.iter())?;

    let b_t_b = basis.t().dot(&basis.0);
    let b_t_y = basis.t().dot(y);
    let d_t_d = penalty.t().dot(&penalty.0);

    debug!(
        "assembled normal equations: {} observations, {} coefficients, {} penalty rows",
        n_obs,
        n_coeffs,
        penalty.nrows()
    );

    Ok(NormalEquations {
        b_t_b,
        b_t_y,
        d_t_d,
    })
}

/// Penalty operator for `n_basis` coefficients.
///
/// Order 1 gives the square first-difference matrix (first coefficient included);
/// higher orders give the banded difference operator.
pub fn build_penalty(n_basis: usize, penalty_order: usize) -> Result<PenaltyMatrix, SplineError> {
    match penalty_order {
        1 => Ok(first_difference_matrix(n_basis)),
        _ => difference_penalty(n_basis, penalty_order),
    }
}
