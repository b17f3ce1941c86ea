#![allow(dead_code)]

use ndarray::Array1;
use rand::prelude::*;
use rand_distr::{Distribution, Normal};

pub struct Generator {
    pub rng: StdRng,
}

impl Generator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// `n` equally spaced points on `[0, 10)` with `y = sin(x) + N(0, sigma²)`.
    pub fn noisy_sine(&mut self, n: usize, sigma: f64) -> (Array1<f64>, Array1<f64>) {
        let x: Vec<f64> = (0..n).map(|i| i as f64 / n as f64 * 10.0).collect();
        let noise = Normal::new(0.0, sigma).unwrap();
        let y: Vec<f64> = x
            .iter()
            .map(|&x_val| x_val.sin() + noise.sample(&mut self.rng))
            .collect();

        (Array1::from_vec(x), Array1::from_vec(y))
    }

    /// Sorted knots on `[0, span]`, with every `repeat_every`-th knot duplicated.
    pub fn random_knots(&mut self, n: usize, span: f64, repeat_every: usize) -> Vec<f64> {
        let mut knots = Vec::with_capacity(n);
        while knots.len() < n {
            let u: f64 = self.rng.random_range(0.0..span);
            knots.push(u);
            if repeat_every > 0 && knots.len() % repeat_every == 0 && knots.len() < n {
                knots.push(u);
            }
        }
        knots.sort_by(f64::total_cmp);
        knots
    }

    /// Unsorted points drawn uniformly from `[lo, hi)`.
    pub fn random_points(&mut self, n: usize, lo: f64, hi: f64) -> Array1<f64> {
        (0..n).map(|_| self.rng.random_range(lo..hi)).collect()
    }
}

/// Textbook recursive Cox-de Boor evaluation of a single basis function.
pub fn reference_basis(knots: &[f64], k: usize, order: usize, x: f64) -> f64 {
    if order == 1 {
        return if knots[k] <= x && x < knots[k + 1] {
            1.0
        } else {
            0.0
        };
    }

    let mut value = 0.0;
    let left_span = knots[k + order - 1] - knots[k];
    if left_span > 0.0 {
        value += (x - knots[k]) / left_span * reference_basis(knots, k, order - 1, x);
    }
    let right_span = knots[k + order] - knots[k + 1];
    if right_span > 0.0 {
        value += (knots[k + order] - x) / right_span * reference_basis(knots, k + 1, order - 1, x);
    }
    value
}
