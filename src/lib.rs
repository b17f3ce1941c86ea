//! B-spline basis evaluation (Cox-de Boor) and penalized least-squares (P-spline)
//! smoothing.
//!
//! ```
//! use ndarray::Array1;
//! use pspline_rs::{uniform_knots, PSplineModel};
//!
//! let x = Array1::linspace(0.0, 10.0, 200);
//! let y = x.mapv(f64::sin);
//! let knots = uniform_knots(0.0, 10.0, 20, 4).unwrap();
//!
//! let model = PSplineModel::fit(&x, &y, knots, 3.0).unwrap();
//! let curve = model.predict(&Array1::linspace(1.0, 9.0, 50)).unwrap();
//! assert_eq!(curve.len(), 50);
//! ```

#[cfg(not(any(feature = "pure-rust", feature = "openblas")))]
compile_error!("enable one linear algebra backend: `pure-rust` or `openblas`");

pub mod diagnostics;
mod error;
pub mod fitting;
mod linalg;
pub mod preprocessing;
mod splines;
mod types;

pub use error::{Result, SplineError};
pub use fitting::{FitConfig, PSplineFit, PenalizedFitter};
pub use splines::{
    blend_order, create_basis_matrix, difference_penalty, first_difference_matrix,
    quantile_knots, uniform_knots, BasisEvaluator, DEFAULT_ORDER,
};
pub use types::*;

use fitting::assembler::build_penalty;
use ndarray::Array1;

/// A fitted P-spline: knots, order and coefficients, enough to evaluate the curve anywhere.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PSplineModel {
    pub knots: KnotSequence,
    pub order: usize,
    pub penalty_order: usize,
    pub lambda: f64,
    pub coefficients: Coefficients,
    pub fitted_values: Array1<f64>,
    pub rss: f64,
    pub edf: Option<f64>,
}

impl PSplineModel {
    pub fn fit(
        points: &Array1<f64>,
        y: &Array1<f64>,
        knots: KnotSequence,
        lambda: f64,
    ) -> Result<Self> {
        Self::fit_with_config(points, y, knots, lambda, FitConfig::default())
    }

    pub fn fit_with_config(
        points: &Array1<f64>,
        y: &Array1<f64>,
        knots: KnotSequence,
        lambda: f64,
        config: FitConfig,
    ) -> Result<Self> {
        let evaluator = BasisEvaluator::new(knots, config.order)?;
        let basis = evaluator.evaluate(points)?;
        let penalty = build_penalty(basis.n_basis(), config.penalty_order)?;

        let fit = PenalizedFitter::with_config(config.clone()).fit(&basis, y, lambda, &penalty)?;

        Ok(Self {
            knots: evaluator.knots().clone(),
            order: config.order,
            penalty_order: config.penalty_order,
            lambda,
            coefficients: fit.coefficients,
            fitted_values: fit.fitted_values,
            rss: fit.rss,
            edf: fit.edf,
        })
    }

    /// Evaluates the fitted curve at new points. Points outside the knot span give 0.
    pub fn predict(&self, points: &Array1<f64>) -> Result<Array1<f64>> {
        let evaluator = BasisEvaluator::new(self.knots.clone(), self.order)?;
        let basis = evaluator.evaluate(points)?;
        if basis.n_basis() != self.coefficients.len() {
            return Err(SplineError::DimensionMismatch(format!(
                "model has {} coefficients but its knots define {} basis functions",
                self.coefficients.len(),
                basis.n_basis()
            )));
        }
        Ok(basis.dot(&self.coefficients.0))
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| SplineError::Serialization(e.to_string()))
    }

    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SplineError::Serialization(e.to_string()))
    }
}
