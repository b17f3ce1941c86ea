use thiserror::Error;

#[derive(Debug, Error)]
pub enum SplineError {
    #[error("Invalid spline order {order}: must be between 1 and {max} for this knot sequence")]
    InvalidOrder { order: usize, max: usize },

    #[error("Invalid penalty order {order}: must be between 1 and {max} for {n_basis} coefficients")]
    InvalidPenaltyOrder {
        order: usize,
        max: usize,
        n_basis: usize,
    },

    #[error("Invalid knot sequence: {0}")]
    InvalidKnots(String),

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Penalized system is singular: {0}")]
    SingularSystem(String),

    #[error("Invalid penalty weight {0}: lambda must be finite and non-negative")]
    InvalidPenalty(f64),

    #[error("Input '{name}' contains {count} non-finite values")]
    NonFiniteValues { name: String, count: usize },

    #[cfg(feature = "serde")]
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[cfg(feature = "openblas")]
    #[error("Linear algebra error: {0}")]
    Linalg(#[from] ndarray_linalg::error::LinalgError),
}

pub type Result<T> = std::result::Result<T, SplineError>;
