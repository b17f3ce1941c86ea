use log::debug;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::error::SplineError;
use crate::preprocessing::{validate_finite, validate_order};
use crate::types::{BasisMatrix, KnotSequence, PenaltyMatrix};

/// Cubic splines.
pub const DEFAULT_ORDER: usize = 4;

/// Evaluates B-spline basis functions of a fixed order over a fixed knot sequence
/// using the Cox-de Boor recursion.
///
/// Column `k` of the result is the basis function supported on `[u_k, u_{k+order})`,
/// so an evaluator over `U` knots produces `U - order` columns.
#[derive(Debug, Clone)]
pub struct BasisEvaluator {
    knots: KnotSequence,
    order: usize,
}

impl BasisEvaluator {
    pub fn new(knots: KnotSequence, order: usize) -> Result<Self, SplineError> {
        validate_order(order, knots.len())?;
        Ok(Self { knots, order })
    }

    /// Builds an evaluator with the default (cubic) order.
    pub fn cubic(knots: KnotSequence) -> Result<Self, SplineError> {
        Self::new(knots, DEFAULT_ORDER)
    }

    pub fn knots(&self) -> &KnotSequence {
        &self.knots
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn n_basis(&self) -> usize {
        self.knots.n_basis(self.order)
    }

    /// Evaluates the basis at `points`, returning an `X x (U - order)` matrix.
    ///
    /// Only the previous order's slice is kept alive while the next one is built.
    pub fn evaluate(&self, points: &Array1<f64>) -> Result<BasisMatrix, SplineError> {
        validate_finite("points", points.view())?;
        log_out_of_span(&self.knots, points.view());

        let mut basis = indicator_basis(&self.knots, points.view());
        for order in 2..=self.order {
            basis = blend(&self.knots, points.view(), basis.view(), order);
        }

        debug!(
            "evaluated order-{} basis: {} points x {} functions",
            self.order,
            basis.nrows(),
            basis.ncols()
        );

        Ok(BasisMatrix(basis))
    }

    /// Evaluates every order from 1 up to `self.order()`.
    ///
    /// Entry `i` holds the order `i + 1` basis with `U - (i + 1)` columns.
    pub fn evaluate_all_orders(&self, points: &Array1<f64>) -> Result<Vec<BasisMatrix>, SplineError> {
        validate_finite("points", points.view())?;

        let mut levels = Vec::with_capacity(self.order);
        let mut basis = indicator_basis(&self.knots, points.view());
        for order in 2..=self.order {
            let next = blend(&self.knots, points.view(), basis.view(), order);
            levels.push(BasisMatrix(basis));
            basis = next;
        }
        levels.push(BasisMatrix(basis));

        Ok(levels)
    }
}

/// One-shot evaluation: validates `knots` and `order`, then evaluates at `points`.
pub fn create_basis_matrix(
    knots: &[f64],
    order: usize,
    points: &Array1<f64>,
) -> Result<BasisMatrix, SplineError> {
    let knots = KnotSequence::try_from(knots)?;
    BasisEvaluator::new(knots, order)?.evaluate(points)
}

/// Applies one step of the Cox-de Boor recursion, turning an order `order - 1`
/// basis (`U - order + 1` columns) into the order `order` basis (`U - order` columns).
pub fn blend_order(
    knots: &KnotSequence,
    points: &Array1<f64>,
    previous: &BasisMatrix,
    order: usize,
) -> Result<BasisMatrix, SplineError> {
    if order < 2 {
        return Err(SplineError::InvalidOrder {
            order,
            max: knots.len() - 1,
        });
    }
    validate_order(order, knots.len())?;

    let expected_cols = knots.len() - order + 1;
    if previous.dim() != (points.len(), expected_cols) {
        return Err(SplineError::DimensionMismatch(format!(
            "order-{} basis must be {} x {}, got {} x {}",
            order - 1,
            points.len(),
            expected_cols,
            previous.nrows(),
            previous.ncols()
        )));
    }

    Ok(BasisMatrix(blend(
        knots,
        points.view(),
        previous.view(),
        order,
    )))
}

// Order 1: B[j,k] = 1 when u_k <= x_j < u_{k+1}.
fn indicator_basis(knots: &[f64], points: ArrayView1<'_, f64>) -> Array2<f64> {
    let n_intervals = knots.len() - 1;
    let mut basis = Array2::<f64>::zeros((points.len(), n_intervals));

    for (j, &x) in points.iter().enumerate() {
        // intervals are disjoint, so at most one hit per point
        if let Some(k) = (0..n_intervals).find(|&k| knots[k] <= x && x < knots[k + 1]) {
            basis[[j, k]] = 1.0;
        }
    }

    basis
}

fn blend(
    knots: &[f64],
    points: ArrayView1<'_, f64>,
    previous: ArrayView2<'_, f64>,
    order: usize,
) -> Array2<f64> {
    let n_basis = knots.len() - order;
    let mut current = Array2::<f64>::zeros((points.len(), n_basis));

    for (j, &x) in points.iter().enumerate() {
        for k in 0..n_basis {
            let left = previous[[j, k]];
            let right = previous[[j, k + 1]];

            // Zero-width spans (repeated knots) contribute nothing.
            let mut value = 0.0;
            let denominator1 = knots[k + order - 1] - knots[k];
            if left != 0.0 && denominator1 > 0.0 {
                value += (x - knots[k]) / denominator1 * left;
            }
            let denominator2 = knots[k + order] - knots[k + 1];
            if right != 0.0 && denominator2 > 0.0 {
                value += (knots[k + order] - x) / denominator2 * right;
            }

            current[[j, k]] = value;
        }
    }

    current
}

fn log_out_of_span(knots: &KnotSequence, points: ArrayView1<'_, f64>) {
    let (lo, hi) = knots.span();
    let outside = points.iter().filter(|&&x| x < lo || x >= hi).count();
    if outside > 0 {
        debug!(
            "{} of {} points fall outside the knot span [{}, {}) and evaluate to zero",
            outside,
            points.len(),
            lo,
            hi
        );
    }
}

// ----- Knot placement

/// Right boundary offset of `quantile_knots`, relative to the data range.
const BOUNDARY_MARGIN: f64 = 1e-6;

/// Equally spaced knots over `[min, max]`, extended by `order - 1` spacings on each
/// side so the whole data range is covered by a full partition of unity.
///
/// Produces `n_segments + 2 * order - 1` knots and `n_segments + order - 1` basis
/// functions.
pub fn uniform_knots(
    min: f64,
    max: f64,
    n_segments: usize,
    order: usize,
) -> Result<KnotSequence, SplineError> {
    if order < 1 {
        return Err(SplineError::InvalidKnots(
            "uniform placement needs a spline order of at least 1".to_string(),
        ));
    }
    if n_segments == 0 {
        return Err(SplineError::InvalidKnots(
            "uniform placement needs at least one segment".to_string(),
        ));
    }
    if !(min.is_finite() && max.is_finite()) || max <= min {
        return Err(SplineError::InvalidKnots(format!(
            "uniform placement needs a finite range with min < max, got [{}, {}]",
            min, max
        )));
    }

    let spacing = (max - min) / n_segments as f64;
    let n_knots = n_segments + 2 * order - 1;
    let start = min - (order - 1) as f64 * spacing;

    let knots = (0..n_knots)
        .map(|i| start + i as f64 * spacing)
        .collect::<Vec<_>>();

    KnotSequence::new(knots)
}

/// Interior knots at data quantiles, with `order` repeated knots at each boundary.
///
/// The left boundary sits on the smallest point. The right boundary sits a relative
/// `BOUNDARY_MARGIN` above the largest point so that point keeps full support.
///
/// Produces `n_interior + 2 * order` knots and `n_interior + order` basis functions.
pub fn quantile_knots(
    points: &Array1<f64>,
    n_interior: usize,
    order: usize,
) -> Result<KnotSequence, SplineError> {
    if order < 1 {
        return Err(SplineError::InvalidKnots(
            "quantile placement needs a spline order of at least 1".to_string(),
        ));
    }
    validate_finite("points", points.view())?;

    let mut sorted_x = points.to_vec();
    sorted_x.sort_unstable_by(f64::total_cmp);

    let (min_val, max_val) = match (sorted_x.first(), sorted_x.last()) {
        (Some(&lo), Some(&hi)) if lo < hi => (lo, hi),
        _ => {
            return Err(SplineError::InvalidKnots(
                "quantile placement needs at least two distinct points".to_string(),
            ))
        }
    };

    let mut knots = Vec::with_capacity(n_interior + 2 * order);
    knots.extend(std::iter::repeat(min_val).take(order));

    let n_segments = (n_interior + 1) as f64;
    for i in 1..=n_interior {
        let quantile = i as f64 / n_segments;
        let index = (quantile * (sorted_x.len() - 1) as f64).round() as usize;
        knots.push(sorted_x[index]);
    }

    let right = max_val + BOUNDARY_MARGIN * (max_val - min_val);
    knots.extend(std::iter::repeat(right).take(order));

    KnotSequence::new(knots)
}

// ----- Penalty matrices

/// The square first-difference matrix: `D[0,0] = 1`, `D[i,i] = 1`, `D[i,i-1] = -1`.
///
/// Because the first coefficient is also penalized, `DᵗD` is positive definite and
/// any `λ > 0` regularizes a rank-deficient basis.
pub fn first_difference_matrix(n_basis: usize) -> PenaltyMatrix {
    let mut d_matrix = Array2::<f64>::eye(n_basis);
    for i in 1..n_basis {
        d_matrix[[i, i - 1]] = -1.0;
    }
    PenaltyMatrix(d_matrix)
}

/// Banded difference operator of the given order, shape `(n_basis - order) x n_basis`.
///
/// Order 1 rows are `[1, -1]`, order 2 rows are `[1, -2, 1]`, and so on.
pub fn difference_penalty(n_basis: usize, order: usize) -> Result<PenaltyMatrix, SplineError> {
    if order < 1 || order >= n_basis {
        return Err(SplineError::InvalidPenaltyOrder {
            order,
            max: n_basis.saturating_sub(1),
            n_basis,
        });
    }

    let mut d_matrix = Array2::<f64>::eye(n_basis);
    for _ in 0..order {
        let n_rows = d_matrix.nrows() - 1;
        let mut next = Array2::<f64>::zeros((n_rows, n_basis));
        for i in 0..n_rows {
            let row = &d_matrix.row(i) - &d_matrix.row(i + 1);
            next.row_mut(i).assign(&row);
        }
        d_matrix = next;
    }

    Ok(PenaltyMatrix(d_matrix))
}
