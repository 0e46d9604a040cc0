use ndarray::{array, Array1, Array2};

use crate::datasets::*;
use crate::helpers::test_helpers::*;

#[test]
fn test_with_bias_prepends_ones() {
    let x: Array2<f64> = array![[3.4, 2.1], [-1.2, 0.2], [0.5, 7.]];
    let x_aug = x.with_bias();
    assert_eq!(x_aug, array![[1., 3.4, 2.1], [1., -1.2, 0.2], [1., 0.5, 7.]]);
}

#[test]
fn test_compute_fit_and_transpose_dot() {
    let x: Array2<f64> = array![[1., 2.], [3., 4.], [5., 6.]];
    let w = array![0.5, -1.];
    let xw = x.compute_fit(w.view());
    assert_array_all_close(xw.view(), array![-1.5, -2.5, -3.5].view(), 1e-12);

    let r = array![1., 0., -1.];
    let xtr = x.compute_transpose_dot(r.view());
    assert_array_all_close(xtr.view(), array![-4., -4.].view(), 1e-12);
}

#[test]
fn test_dataset_shapes() {
    let x = Array2::<f64>::zeros((4, 3));
    let y = Array1::<f64>::zeros(4);
    let dataset = DatasetBase::from((x, y));
    assert_eq!(dataset.n_samples(), 4);
    assert_eq!(dataset.n_features(), 3);
    assert_eq!(dataset.targets().n_samples(), 4);
}

#[test]
fn test_first_non_binary() {
    let binary: Array1<f64> = array![0., 1., 1., 0.];
    let fractional: Array1<f64> = array![0., 1., 0.5, 2.];
    let negative: Array1<f32> = array![-1., 0.];
    assert_eq!(binary.first_non_binary(), None);
    assert_eq!(fractional.first_non_binary(), Some(2));
    assert_eq!(negative.first_non_binary(), Some(0));
}

#[test]
fn test_train_test_split_sizes() {
    let (x, y) = generate_two_clusters(25, 2, 10., 3);
    let dataset = DatasetBase::from((x, y));
    let (train, test) = train_test_split(&dataset, 0.2, 42);
    assert_eq!(test.n_samples(), 10);
    assert_eq!(train.n_samples(), 40);
    assert_eq!(train.n_features(), 2);
    assert_eq!(test.targets().len(), 10);
}

#[test]
fn test_train_test_split_is_seeded() {
    let (x, y) = generate_two_clusters(20, 3, 5., 11);
    let dataset = DatasetBase::from((x, y));
    let (train_a, test_a) = train_test_split(&dataset, 0.25, 7);
    let (train_b, test_b) = train_test_split(&dataset, 0.25, 7);
    assert_eq!(train_a, train_b);
    assert_eq!(test_a, test_b);
}

#[test]
fn test_train_test_split_keeps_pairs() {
    // Each row carries its own label in its first column.
    let x = array![[0., 10.], [1., 11.], [1., 12.], [0., 13.], [1., 14.]];
    let y = array![0., 1., 1., 0., 1.];
    let dataset = DatasetBase::from((x, y));
    let (train, test) = train_test_split(&dataset, 0.4, 1);
    for part in [&train, &test] {
        for (row, &label) in part.design_matrix().rows().into_iter().zip(part.targets()) {
            assert_eq!(row[0], label);
        }
    }
    assert_eq!(train.n_samples() + test.n_samples(), 5);
}

#[test]
fn test_train_test_split_clamps_ratio() {
    let x = Array2::<f64>::zeros((6, 2));
    let y = Array1::<f64>::zeros(6);
    let dataset = DatasetBase::from((x, y));
    let (train, test) = train_test_split(&dataset, 1.5, 0);
    assert_eq!(test.n_samples(), 6);
    assert_eq!(train.n_samples(), 0);
}
