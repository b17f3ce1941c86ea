use crate::error::SplineError;

/// Checks that knots are finite, non-decreasing and at least two long.
pub fn validate_knots(knots: &[f64]) -> Result<(), SplineError> {
    if knots.len() < 2 {
        return Err(SplineError::InvalidKnots(format!(
            "need at least 2 knots, got {}",
            knots.len()
        )));
    }

    if let Some(pos) = knots.iter().position(|u| !u.is_finite()) {
        return Err(SplineError::InvalidKnots(format!(
            "knot {} is not finite ({})",
            pos, knots[pos]
        )));
    }

    if let Some(pos) = knots.windows(2).position(|w| w[1] < w[0]) {
        return Err(SplineError::InvalidKnots(format!(
            "knots must be non-decreasing, but u[{}] = {} > u[{}] = {}",
            pos,
            knots[pos],
            pos + 1,
            knots[pos + 1]
        )));
    }

    Ok(())
}

/// Checks `1 <= order <= n_knots - 1`.
pub fn validate_order(order: usize, n_knots: usize) -> Result<(), SplineError> {
    let max = n_knots.saturating_sub(1);
    if order < 1 || order > max {
        return Err(SplineError::InvalidOrder { order, max });
    }
    Ok(())
}

pub fn validate_penalty_weight(lambda: f64) -> Result<(), SplineError> {
    if !lambda.is_finite() || lambda < 0.0 {
        return Err(SplineError::InvalidPenalty(lambda));
    }
    Ok(())
}

pub fn validate_finite<'a>(
    name: &str,
    values: impl IntoIterator<Item = &'a f64>,
) -> Result<(), SplineError> {
    let non_finite_count = values.into_iter().filter(|v| !v.is_finite()).count();

    if non_finite_count > 0 {
        return Err(SplineError::NonFiniteValues {
            name: name.to_string(),
            count: non_finite_count,
        });
    }

    Ok(())
}
