//! Linear algebra backend abstraction layer.
//!
//! This module provides a unified interface for the factorizations the fitter needs,
//! supporting multiple backends:
//! - `pure-rust`: Uses faer (default, no system libraries required)
//! - `openblas`: Uses ndarray-linalg with OpenBLAS (takes precedence when both are enabled)
//!
//! The backend is selected at compile time via feature flags.

use crate::error::SplineError;
use ndarray::{Array1, Array2};

/// Result type for linear algebra operations.
pub type Result<T> = std::result::Result<T, SplineError>;

/// Solves `A x = b` for symmetric positive definite `A` given its lower Cholesky factor.
pub fn cholesky_solve(l: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    let y = solve_triangular_lower(l, b)?;
    let lt = l.t().to_owned();
    solve_triangular_upper(&lt, &y)
}

// =============================================================================
// OpenBLAS Backend
// =============================================================================

#[cfg(feature = "openblas")]
pub fn cholesky_lower(a: &Array2<f64>) -> Result<Array2<f64>> {
    use ndarray_linalg::{Cholesky, UPLO};
    a.cholesky(UPLO::Lower)
        .map_err(|e| SplineError::SingularSystem(format!("Cholesky decomposition failed: {}", e)))
}

/// Solves the lower triangular system L * x = b for x.
#[cfg(feature = "openblas")]
pub fn solve_triangular_lower(l: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    use ndarray_linalg::triangular::{Diag, SolveTriangular};
    use ndarray_linalg::UPLO;
    Ok(l.solve_triangular(UPLO::Lower, Diag::NonUnit, b)?)
}

/// Solves the upper triangular system U * x = b for x.
#[cfg(feature = "openblas")]
pub fn solve_triangular_upper(u: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    use ndarray_linalg::triangular::{Diag, SolveTriangular};
    use ndarray_linalg::UPLO;
    Ok(u.solve_triangular(UPLO::Upper, Diag::NonUnit, b)?)
}

/// Computes the inverse of a lower triangular matrix L.
///
/// The inverse is computed by solving L * X = I for X.
#[cfg(feature = "openblas")]
pub fn inv_lower_triangular(l: &Array2<f64>) -> Result<Array2<f64>> {
    use ndarray_linalg::triangular::{Diag, SolveTriangular};
    use ndarray_linalg::UPLO;
    let n = l.nrows();
    let identity = Array2::<f64>::eye(n);
    Ok(l.solve_triangular(UPLO::Lower, Diag::NonUnit, &identity)?)
}

// =============================================================================
// Pure Rust Backend (faer)
// =============================================================================

#[cfg(all(feature = "pure-rust", not(feature = "openblas")))]
pub fn cholesky_lower(a: &Array2<f64>) -> Result<Array2<f64>> {
    let a_faer = ndarray_to_faer_mat(a);

    let chol = a_faer.cholesky(faer::Side::Lower).map_err(|_| {
        SplineError::SingularSystem(
            "Cholesky decomposition failed (matrix not positive definite)".to_string(),
        )
    })?;

    let l_faer = chol.compute_l();
    Ok(faer_mat_to_ndarray(&l_faer))
}

/// Solves the lower triangular system L * x = b for x.
#[cfg(all(feature = "pure-rust", not(feature = "openblas")))]
pub fn solve_triangular_lower(l: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    let l_faer = ndarray_to_faer_mat(l);
    let mut x_faer = ndarray_to_faer_col(b);
    faer::linalg::triangular_solve::solve_lower_triangular_in_place(
        l_faer.as_ref(),
        x_faer.as_mut().as_2d_mut(),
        faer::Parallelism::None,
    );
    Ok(faer_col_to_ndarray(&x_faer))
}

/// Solves the upper triangular system U * x = b for x.
#[cfg(all(feature = "pure-rust", not(feature = "openblas")))]
pub fn solve_triangular_upper(u: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    let u_faer = ndarray_to_faer_mat(u);
    let mut x_faer = ndarray_to_faer_col(b);
    faer::linalg::triangular_solve::solve_upper_triangular_in_place(
        u_faer.as_ref(),
        x_faer.as_mut().as_2d_mut(),
        faer::Parallelism::None,
    );
    Ok(faer_col_to_ndarray(&x_faer))
}

/// Computes the inverse of a lower triangular matrix L.
#[cfg(all(feature = "pure-rust", not(feature = "openblas")))]
pub fn inv_lower_triangular(l: &Array2<f64>) -> Result<Array2<f64>> {
    let l_faer = ndarray_to_faer_mat(l);
    let n = l_faer.nrows();
    let mut dst = faer::Mat::<f64>::zeros(n, n);
    faer::linalg::triangular_inverse::invert_lower_triangular(
        dst.as_mut(),
        l_faer.as_ref(),
        faer::Parallelism::None,
    );
    Ok(faer_mat_to_ndarray(&dst))
}

// =============================================================================
// Conversion Helpers: ndarray <-> faer
// =============================================================================

#[cfg(all(feature = "pure-rust", not(feature = "openblas")))]
fn ndarray_to_faer_mat(arr: &Array2<f64>) -> faer::Mat<f64> {
    let (nrows, ncols) = arr.dim();
    faer::Mat::from_fn(nrows, ncols, |i, j| arr[[i, j]])
}

#[cfg(all(feature = "pure-rust", not(feature = "openblas")))]
fn ndarray_to_faer_col(arr: &Array1<f64>) -> faer::Col<f64> {
    faer::Col::from_fn(arr.len(), |i| arr[i])
}

#[cfg(all(feature = "pure-rust", not(feature = "openblas")))]
fn faer_mat_to_ndarray(mat: &faer::Mat<f64>) -> Array2<f64> {
    let (nrows, ncols) = (mat.nrows(), mat.ncols());
    Array2::from_shape_fn((nrows, ncols), |(i, j)| mat.read(i, j))
}

#[cfg(all(feature = "pure-rust", not(feature = "openblas")))]
fn faer_col_to_ndarray(col: &faer::Col<f64>) -> Array1<f64> {
    Array1::from_shape_fn(col.nrows(), |i| col.read(i))
}

// =============================================================================
// Tests
// =============================================================================
