use ndarray::{Array1, Array2};
use std::ops::{Deref, DerefMut};

use crate::error::SplineError;
use crate::preprocessing::validate_knots;

// ----- Newtypes for Safety (Vectors)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Coefficients(pub Array1<f64>);

impl Deref for Coefficients {
    type Target = Array1<f64>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Coefficients {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// A validated, non-decreasing sequence of finite knots. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct KnotSequence(Vec<f64>);

impl KnotSequence {
    pub fn new(knots: Vec<f64>) -> Result<Self, SplineError> {
        validate_knots(&knots)?;
        Ok(Self(knots))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of basis functions of the given order supported by these knots.
    pub fn n_basis(&self, order: usize) -> usize {
        self.0.len().saturating_sub(order)
    }

    /// First and last knot.
    pub fn span(&self) -> (f64, f64) {
        (self.0[0], self.0[self.0.len() - 1])
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl Deref for KnotSequence {
    type Target = [f64];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl TryFrom<Vec<f64>> for KnotSequence {
    type Error = SplineError;
    fn try_from(knots: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(knots)
    }
}

impl TryFrom<&[f64]> for KnotSequence {
    type Error = SplineError;
    fn try_from(knots: &[f64]) -> Result<Self, Self::Error> {
        Self::new(knots.to_vec())
    }
}

// Deserialization goes through the validating constructor.
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for KnotSequence {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<f64>::deserialize(deserializer)?;
        KnotSequence::new(raw).map_err(serde::de::Error::custom)
    }
}

// ----- Newtypes for Safety (Matrices)

/// Rows are query points, columns are basis functions.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisMatrix(pub Array2<f64>);

/// Difference operator `D`; the fitter penalizes `λ·‖Dα‖²`.
#[derive(Debug, Clone, PartialEq)]
pub struct PenaltyMatrix(pub Array2<f64>);

macro_rules! impl_deref_for_matrix_wrapper {
    ($t:ty) => {
        impl Deref for $t {
            type Target = Array2<f64>;
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
        impl DerefMut for $t {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }
    };
}

impl_deref_for_matrix_wrapper!(BasisMatrix);
impl_deref_for_matrix_wrapper!(PenaltyMatrix);

impl BasisMatrix {
    pub fn n_points(&self) -> usize {
        self.0.nrows()
    }

    pub fn n_basis(&self) -> usize {
        self.0.ncols()
    }

    pub fn into_inner(self) -> Array2<f64> {
        self.0
    }
}
