use super::assembler::NormalEquations;
use super::{Coefficients, SplineError};
use crate::linalg;
use log::{debug, warn};
use ndarray::Array2;

/// Pivot ratio below which a successful factorization is still reported as ill-conditioned.
const ILL_CONDITIONED_RATIO: f64 = 1e-8;

pub(crate) struct PenalizedSolution {
    pub(crate) coefficients: Coefficients,
    pub(crate) l_factor: Array2<f64>,
}

/// Solves the penalized normal equations:
///   (B'B + lambda * D'D) * alpha = B'y
///
/// The system matrix is symmetric positive semi-definite, so it is factored with
/// Cholesky and solved with two triangular solves. A factorization whose smallest
/// squared pivot is negligible next to the largest diagonal entry is treated as
/// singular.
pub(crate) fn solve_penalized(
    equations: &NormalEquations,
    lambda: f64,
    singular_tolerance: f64,
) -> Result<PenalizedSolution, SplineError> {
    let lhs = equations.system_matrix(lambda);

    let scale = lhs.diag().iter().fold(0.0_f64, |acc, &v| acc.max(v));
    if scale <= 0.0 {
        return Err(SplineError::SingularSystem(format!(
            "system matrix is zero (lambda = {})",
            lambda
        )));
    }

    let l_factor = linalg::cholesky_lower(&lhs).map_err(|e| match e {
        SplineError::SingularSystem(msg) => {
            SplineError::SingularSystem(format!("{} (lambda = {})", msg, lambda))
        }
        other => other,
    })?;

    let min_pivot = l_factor
        .diag()
        .iter()
        .fold(f64::INFINITY, |acc, &v| acc.min(v * v));
    let pivot_ratio = min_pivot / scale;

    if !(pivot_ratio > singular_tolerance) {
        return Err(SplineError::SingularSystem(format!(
            "smallest pivot {:.3e} is negligible relative to scale {:.3e} (lambda = {})",
            min_pivot, scale, lambda
        )));
    }
    if pivot_ratio < ILL_CONDITIONED_RATIO {
        warn!(
            "penalized system is ill-conditioned: pivot ratio {:.3e} at lambda = {}",
            pivot_ratio, lambda
        );
    }

    let alpha = linalg::cholesky_solve(&l_factor, &equations.b_t_y)?;
    debug!(
        "solved {}-coefficient penalized system at lambda = {}",
        alpha.len(),
        lambda
    );

    Ok(PenalizedSolution {
        coefficients: Coefficients(alpha),
        l_factor,
    })
}

/// Effective degrees of freedom, tr((B'B + lambda*D'D)^-1 B'B).
///
/// With M = LL', the trace equals tr(L^-1 B'B L^-T), so only the triangular
/// factor is inverted. Ranges from 0 (lambda -> inf) to the number of coefficients
/// (lambda = 0).
pub(crate) fn effective_degrees_of_freedom(
    equations: &NormalEquations,
    l_factor: &Array2<f64>,
) -> Result<f64, SplineError> {
    let l_inv = linalg::inv_lower_triangular(l_factor)?;
    let left = l_inv.dot(&equations.b_t_b);
    Ok((&left * &l_inv).sum())
}
