pub mod assembler;
mod solver;

use self::assembler::{assemble_normal_equations, NormalEquations};
use self::solver::{effective_degrees_of_freedom, solve_penalized};

use super::diagnostics::response_residuals;
use super::error::SplineError;
use super::preprocessing::validate_penalty_weight;
use super::splines::DEFAULT_ORDER;
use super::types::*;
use log::debug;
use ndarray::Array1;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

const DEFAULT_PENALTY_ORDER: usize = 1;
const DEFAULT_SINGULAR_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone)]
pub struct FitConfig {
    /// Spline order (4 = cubic).
    pub order: usize,
    /// 1 selects the square first-difference penalty, higher values the banded operator.
    pub penalty_order: usize,
    /// Relative pivot threshold below which the penalized system counts as singular.
    pub singular_tolerance: f64,
    pub compute_edf: bool,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
            penalty_order: DEFAULT_PENALTY_ORDER,
            singular_tolerance: DEFAULT_SINGULAR_TOLERANCE,
            compute_edf: true,
        }
    }
}

/// Result of one penalized least-squares fit.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PSplineFit {
    pub coefficients: Coefficients,
    pub fitted_values: Array1<f64>,
    pub residuals: Array1<f64>,
    pub rss: f64,
    /// `None` when `FitConfig::compute_edf` is off.
    pub edf: Option<f64>,
    pub lambda: f64,
}

/// Fits basis coefficients minimizing `‖y - Bα‖² + λ‖Dα‖²`.
#[derive(Debug, Clone, Default)]
pub struct PenalizedFitter {
    config: FitConfig,
}

impl PenalizedFitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    /// Solves `(BᵗB + λ·DᵗD) α = Bᵗy` and evaluates the fitted curve `Bα`.
    pub fn fit(
        &self,
        basis: &BasisMatrix,
        y: &Array1<f64>,
        lambda: f64,
        penalty: &PenaltyMatrix,
    ) -> Result<PSplineFit, SplineError> {
        validate_penalty_weight(lambda)?;
        let equations = assemble_normal_equations(basis, y, penalty)?;
        self.fit_assembled(&equations, basis, y, lambda)
    }

    /// Fits every penalty weight in `lambdas`, sharing the cross products.
    ///
    /// Fails on the first invalid weight or singular system; results keep the
    /// order of `lambdas`.
    pub fn fit_sweep(
        &self,
        basis: &BasisMatrix,
        y: &Array1<f64>,
        lambdas: &[f64],
        penalty: &PenaltyMatrix,
    ) -> Result<Vec<PSplineFit>, SplineError> {
        for &lambda in lambdas {
            validate_penalty_weight(lambda)?;
        }
        let equations = assemble_normal_equations(basis, y, penalty)?;
        debug!("sweeping {} penalty weights", lambdas.len());

        #[cfg(feature = "parallel")]
        {
            lambdas
                .par_iter()
                .map(|&lambda| self.fit_assembled(&equations, basis, y, lambda))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            lambdas
                .iter()
                .map(|&lambda| self.fit_assembled(&equations, basis, y, lambda))
                .collect()
        }
    }

    fn fit_assembled(
        &self,
        equations: &NormalEquations,
        basis: &BasisMatrix,
        y: &Array1<f64>,
        lambda: f64,
    ) -> Result<PSplineFit, SplineError> {
        let solution = solve_penalized(equations, lambda, self.config.singular_tolerance)?;

        let edf = if self.config.compute_edf {
            Some(effective_degrees_of_freedom(equations, &solution.l_factor)?)
        } else {
            None
        };

        let fitted_values = basis.dot(&solution.coefficients.0);
        let residuals = response_residuals(y, &fitted_values);
        let rss = residuals.dot(&residuals);

        Ok(PSplineFit {
            coefficients: solution.coefficients,
            fitted_values,
            residuals,
            rss,
            edf,
            lambda,
        })
    }
}
