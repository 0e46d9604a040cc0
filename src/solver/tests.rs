use approx::assert_relative_eq;
use ndarray::{array, Array1, Array2};

use crate::datafits::BinaryCrossEntropy;
use crate::datasets::*;
use crate::helpers::test_helpers::*;
use crate::solver::*;

fn toy_dataset() -> DatasetBase<Array2<f64>, Array1<f64>> {
    DatasetBase::from((array![[1., 2.], [1., -1.]], array![1., 0.]))
}

#[test]
fn test_single_iteration() {
    let dataset = toy_dataset();
    let out = gradient_descent(
        &dataset,
        &BinaryCrossEntropy::new(),
        Array1::zeros(2),
        0.5,
        1,
        1e-6,
        true,
        false,
    );
    assert_eq!(out.losses.len(), 1);
    assert_eq!(out.n_iterations, 1);
    assert!(!out.converged);
    assert_relative_eq!(out.losses[0], std::f64::consts::LN_2, epsilon = 1e-15);
    assert_array_all_close(out.weights.view(), array![0., 0.375].view(), 1e-12);
}

#[test]
fn test_converged_update_is_committed() {
    let dataset = toy_dataset();
    let out = gradient_descent(
        &dataset,
        &BinaryCrossEntropy::new(),
        Array1::zeros(2),
        1e-9,
        100,
        1e-6,
        true,
        false,
    );
    assert!(out.converged);
    assert_eq!(out.n_iterations, 1);
    assert_eq!(out.losses.len(), 1);
    assert_array_all_close(out.weights.view(), array![0., 7.5e-10].view(), 1e-18);
}

#[test]
fn test_converged_update_is_discarded() {
    let dataset = toy_dataset();
    let w0 = array![0.25, -0.5];
    let out = gradient_descent(
        &dataset,
        &BinaryCrossEntropy::new(),
        w0.clone(),
        1e-9,
        100,
        1e-6,
        false,
        false,
    );
    assert!(out.converged);
    assert_eq!(out.losses.len(), 1);
    assert_eq!(out.weights, w0);
}

#[test]
fn test_iteration_cap() {
    let (x, y) = generate_random_data(30, 4);
    let dataset = DatasetBase::new(x.with_bias(), y);
    let out = gradient_descent(
        &dataset,
        &BinaryCrossEntropy::new(),
        Array1::zeros(5),
        0.1,
        25,
        0.,
        true,
        false,
    );
    assert!(!out.converged);
    assert_eq!(out.n_iterations, 25);
    assert_eq!(out.losses.len(), 25);
}

#[test]
fn test_loss_decreases_with_small_steps() {
    let (x, y) = generate_random_data(50, 3);
    let dataset = DatasetBase::new(x.with_bias(), y);
    let out = gradient_descent(
        &dataset,
        &BinaryCrossEntropy::new(),
        Array1::zeros(4),
        0.1,
        200,
        1e-8,
        true,
        false,
    );
    for pair in out.losses.windows(2) {
        assert!(pair[1] <= pair[0] + 1e-12);
    }
    assert!(out.losses.iter().all(|&l| l >= 0.));
    assert!(out.losses.last().unwrap() < &out.losses[0]);
}
