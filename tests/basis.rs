mod common;

use approx::assert_abs_diff_eq;
use common::{reference_basis, Generator};
use ndarray::Array1;
use pspline_rs::diagnostics::{partition_of_unity_error, row_sums};
use pspline_rs::{blend_order, create_basis_matrix, BasisEvaluator, KnotSequence, SplineError};

#[test]
fn test_local_support_random_knots() {
    let mut rng = Generator::new(7);

    for order in 1..=5 {
        let knots = KnotSequence::new(rng.random_knots(14, 20.0, 4)).unwrap();
        let points = rng.random_points(300, -2.0, 22.0);
        let basis = BasisEvaluator::new(knots.clone(), order)
            .unwrap()
            .evaluate(&points)
            .unwrap();

        assert_eq!(basis.ncols(), knots.len() - order);

        for (j, &x) in points.iter().enumerate() {
            for k in 0..basis.ncols() {
                let value = basis[[j, k]];
                assert!(value >= 0.0, "negative basis value {} at x = {}", value, x);
                if x < knots[k] || x >= knots[k + order] {
                    assert!(
                        value.abs() < 1e-12,
                        "column {} of order {} is {} at x = {}, outside [{}, {})",
                        k,
                        order,
                        value,
                        x,
                        knots[k],
                        knots[k + order]
                    );
                }
            }
        }
    }
}

#[test]
fn test_partition_of_unity_random_knots() {
    let mut rng = Generator::new(11);

    for order in 1..=5 {
        let knots = KnotSequence::new(rng.random_knots(16, 10.0, 5)).unwrap();
        let lo = knots[order - 1];
        let hi = knots[knots.len() - order];
        if hi <= lo {
            continue;
        }

        let points = rng.random_points(500, lo, hi);
        let basis = BasisEvaluator::new(knots, order)
            .unwrap()
            .evaluate(&points)
            .unwrap();

        let err = partition_of_unity_error(&basis, |_| true);
        assert!(err < 1e-10, "order {}: row sums deviate by {}", order, err);
    }
}

#[test]
fn test_order_one_is_indicator() {
    let knots = KnotSequence::new(vec![0.0, 1.0, 2.5, 4.0, 7.0]).unwrap();
    let points = Array1::from_vec(vec![0.3, 1.7, 2.9, 6.99, 3.999, 0.0001]);
    let basis = BasisEvaluator::new(knots, 1)
        .unwrap()
        .evaluate(&points)
        .unwrap();

    for row in basis.rows() {
        assert_eq!(row.iter().filter(|&&v| v == 1.0).count(), 1);
        assert_eq!(row.iter().filter(|&&v| v == 0.0).count(), row.len() - 1);
    }
}

#[test]
fn test_matches_recursive_reference() {
    let mut rng = Generator::new(3);
    let knots = rng.random_knots(12, 5.0, 3);
    let points = rng.random_points(200, -0.5, 5.5);

    for order in 1..=6 {
        let basis = create_basis_matrix(&knots, order, &points).unwrap();
        for (j, &x) in points.iter().enumerate() {
            for k in 0..basis.ncols() {
                assert_abs_diff_eq!(
                    basis[[j, k]],
                    reference_basis(&knots, k, order, x),
                    epsilon = 1e-12
                );
            }
        }
    }
}

#[test]
fn test_recursion_consistency() {
    let knots = KnotSequence::new((0..=12).map(|i| i as f64 * 0.75).collect()).unwrap();
    let points = Array1::linspace(-0.5, 9.5, 137);

    for order in 2..=6 {
        let direct = BasisEvaluator::new(knots.clone(), order)
            .unwrap()
            .evaluate(&points)
            .unwrap();
        let lower = BasisEvaluator::new(knots.clone(), order - 1)
            .unwrap()
            .evaluate(&points)
            .unwrap();
        let blended = blend_order(&knots, &points, &lower, order).unwrap();

        assert_eq!(direct.dim(), blended.dim());
        for (a, b) in direct.iter().zip(blended.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-14);
        }
    }
}

#[test]
fn test_all_orders_match_direct_evaluation() {
    let knots = KnotSequence::new(vec![0.0, 0.0, 1.0, 2.0, 3.0, 3.5, 5.0, 5.0]).unwrap();
    let points = Array1::linspace(0.0, 5.0, 41);
    let evaluator = BasisEvaluator::new(knots.clone(), 4).unwrap();
    let levels = evaluator.evaluate_all_orders(&points).unwrap();

    assert_eq!(levels.len(), 4);
    for (i, level) in levels.iter().enumerate() {
        let direct = BasisEvaluator::new(knots.clone(), i + 1)
            .unwrap()
            .evaluate(&points)
            .unwrap();
        assert_eq!(level, &direct);
    }
}

#[test]
fn test_cubic_decade_knots_scenario() {
    let knots: Vec<f64> = (0..=10).map(|i| i as f64 * 10.0).collect();
    let points = Array1::linspace(1.0, 99.0, 991);

    let basis = create_basis_matrix(&knots, 4, &points).unwrap();

    assert_eq!(basis.dim(), (991, 7));
    let sums = row_sums(&basis);
    for (&x, &s) in points.iter().zip(sums.iter()) {
        if x > 30.0 && x < 70.0 {
            assert_abs_diff_eq!(s, 1.0, epsilon = 1e-12);
        } else {
            assert!(s < 1.0 + 1e-12);
        }
    }
}

#[test]
fn test_repeated_knots_stay_finite() {
    let knots = vec![0.0, 1.0, 2.0, 2.0, 3.0, 4.0, 5.0];
    let points = Array1::linspace(0.0, 5.0, 101);

    for order in 1..=4 {
        let basis = create_basis_matrix(&knots, order, &points).unwrap();
        assert!(basis.iter().all(|v| v.is_finite()));
    }

    // Order 2 column 2 sits on [2, 2, 3): its left ramp has zero width, so the basis
    // is only the falling ramp 3 - x on [2, 3).
    let basis = create_basis_matrix(&knots, 2, &points).unwrap();
    for (j, &x) in points.iter().enumerate() {
        let expected = if (2.0..3.0).contains(&x) { 3.0 - x } else { 0.0 };
        assert_abs_diff_eq!(basis[[j, 2]], expected, epsilon = 1e-12);
    }
    // The order-1 indicator for the empty interval [2, 2) never fires.
    let indicator = create_basis_matrix(&knots, 1, &points).unwrap();
    assert_eq!(indicator.column(2).sum(), 0.0);
}

#[test]
fn test_clamped_knots_interpolate_endpoint() {
    let knots = vec![0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 3.0, 3.0, 3.0];
    let points = Array1::from_vec(vec![0.0, 1.5, 2.999]);
    let basis = create_basis_matrix(&knots, 4, &points).unwrap();

    assert_eq!(basis.ncols(), 6);
    assert_abs_diff_eq!(basis[[0, 0]], 1.0, epsilon = 1e-12);
    for s in row_sums(&basis).iter() {
        assert_abs_diff_eq!(*s, 1.0, epsilon = 1e-12);
    }
}

#[test]
fn test_unsorted_points_match_sorted() {
    let knots = KnotSequence::new((0..10).map(|i| i as f64).collect()).unwrap();
    let evaluator = BasisEvaluator::new(knots, 3).unwrap();

    let points = Array1::from_vec(vec![4.2, 0.5, 8.1, 2.2]);
    let sorted = Array1::from_vec(vec![0.5, 2.2, 4.2, 8.1]);
    let a = evaluator.evaluate(&points).unwrap();
    let b = evaluator.evaluate(&sorted).unwrap();

    assert_eq!(a.row(0), b.row(2));
    assert_eq!(a.row(1), b.row(0));
    assert_eq!(a.row(2), b.row(3));
    assert_eq!(a.row(3), b.row(1));
}

#[test]
fn test_points_outside_knots_are_zero() {
    let knots = vec![0.0, 1.0, 2.0, 3.0, 4.0];
    let points = Array1::from_vec(vec![-1.0, 4.0, 100.0]);
    let basis = create_basis_matrix(&knots, 2, &points).unwrap();
    assert!(basis.iter().all(|&v| v == 0.0));
}

#[test]
fn test_invalid_inputs() {
    let points = Array1::from_vec(vec![0.5]);

    assert!(matches!(
        create_basis_matrix(&[0.0, 1.0, 2.0], 0, &points),
        Err(SplineError::InvalidOrder { .. })
    ));
    assert!(matches!(
        create_basis_matrix(&[0.0, 1.0, 2.0], 3, &points),
        Err(SplineError::InvalidOrder { order: 3, max: 2 })
    ));
    assert!(matches!(
        create_basis_matrix(&[0.0, 2.0, 1.0], 1, &points),
        Err(SplineError::InvalidKnots(_))
    ));
    assert!(matches!(
        create_basis_matrix(&[1.0], 1, &points),
        Err(SplineError::InvalidKnots(_))
    ));
}

#[test]
fn test_empty_points() {
    let basis = create_basis_matrix(&[0.0, 1.0, 2.0, 3.0], 2, &Array1::zeros(0)).unwrap();
    assert_eq!(basis.dim(), (0, 2));
}
