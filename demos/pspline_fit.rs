use ndarray::Array1;
use pspline_rs::{
    first_difference_matrix, uniform_knots, BasisEvaluator, PenalizedFitter, SplineError,
};
use rand::Rng;

fn main() -> Result<(), SplineError> {
    // Generate Synthetic Data

    let mut rng = rand::rng();
    let n = 200;

    let x_vals: Vec<f64> = (0..n).map(|i| (i as f64) * 0.5).collect();
    let y_vals: Vec<f64> = x_vals
        .iter()
        .map(|&x| (x / 10.0).sin() + rng.random_range(-0.3..0.3))
        .collect();

    let x = Array1::from_vec(x_vals);
    let y = Array1::from_vec(y_vals);

    // Uniform cubic basis, extended past the data range
    let knots = uniform_knots(0.0, 100.0, 33, 4)?;
    let basis = BasisEvaluator::cubic(knots)?.evaluate(&x)?;
    let penalty = first_difference_matrix(basis.n_basis());

    println!("basis: {} points x {} functions", basis.n_points(), basis.n_basis());

    let fits = PenalizedFitter::new().fit_sweep(&basis, &y, &[1.0, 3.0, 10.0, 100.0], &penalty)?;

    for fit in &fits {
        println!(
            "lambda = {:>6}: rss = {:.4}, edf = {:.2}",
            fit.lambda,
            fit.rss,
            fit.edf.unwrap_or(f64::NAN)
        );
    }

    Ok(())
}
