
/// This module contains the numerical building blocks of the logistic model.
pub mod helpers {
    use crate::Float;
    use ndarray::ArrayView1;

    /// Linear scores are clipped to `[-SIGMOID_CLIP, SIGMOID_CLIP]` before
    /// exponentiation.
    pub const SIGMOID_CLIP: f64 = 500.;

    /// Probabilities are clipped to `[PROBA_EPS, 1 - PROBA_EPS]` before taking
    /// logarithms.
    pub const PROBA_EPS: f64 = 1e-15;

    pub fn clip<F: Float>(x: F, lower: F, upper: F) -> F {
        if x < lower {
            lower
        } else if x > upper {
            upper
        } else {
            x
        }
    }

    /// The logistic function `1 / (1 + exp(-z))`. The input is clipped so that
    /// the exponential never overflows.
    pub fn sigmoid<F: Float>(z: F) -> F {
        let bound = F::cast(SIGMOID_CLIP);
        let z = clip(z, -bound, bound);
        F::one() / (F::one() + (-z).exp())
    }

    /// Clips a probability away from `0` and `1`. For single precision floats
    /// the margin is raised to the machine epsilon, otherwise `1 - PROBA_EPS`
    /// would round to `1`.
    pub fn clip_proba<F: Float>(p: F) -> F {
        let eps = F::cast(PROBA_EPS).max(F::epsilon());
        clip(p, eps, F::one() - eps)
    }

    /// Elementwise closeness `|a - b| <= tol + tol * |b|`, with the same value
    /// used as absolute and relative tolerance.
    pub fn is_close<F: Float>(a: F, b: F, tolerance: F) -> bool {
        (a - b).abs() <= tolerance + tolerance * b.abs()
    }

    /// Returns `true` when every pair of components is close, see
    /// [`is_close`].
    pub fn all_close<F: Float>(a: ArrayView1<F>, b: ArrayView1<F>, tolerance: F) -> bool {
        a.len() == b.len()
            && a.iter()
                .zip(b.iter())
                .all(|(&a_i, &b_i)| is_close(a_i, b_i, tolerance))
    }
}

/// This module contains helpers functions to efficiently write tests.
pub mod test_helpers {
    use crate::Float;
    use approx::AbsDiffEq;
    use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    pub fn assert_array_all_close<F>(x: ArrayView1<F>, y: ArrayView1<F>, delta: F)
    where
        F: Float + AbsDiffEq<Epsilon = F>,
    {
        assert_eq!(x.len(), y.len());
        for i in 0..x.len() {
            if x[i].abs_diff_ne(&y[i], delta) {
                panic!("x: {}, y: {} ; with precision level {}", x[i], y[i], delta);
            }
        }
    }

    pub fn assert_array2d_all_close<F>(x: ArrayView2<F>, y: ArrayView2<F>, delta: F)
    where
        F: Float + AbsDiffEq<Epsilon = F>,
    {
        assert_eq!(x.shape()[0], y.shape()[0]);
        assert_eq!(x.shape()[1], y.shape()[1]);
        for i in 0..x.shape()[0] {
            for j in 0..x.shape()[1] {
                if x[[i, j]].abs_diff_ne(&y[[i, j]], delta) {
                    panic!(
                        "x: {}, y: {} ; with precision level {}",
                        x[[i, j]],
                        y[[i, j]],
                        delta
                    );
                }
            }
        }
    }

    pub fn fill_random_vector(capacity: usize, seed: u64) -> Vec<f64> {
        let mut r = StdRng::seed_from_u64(seed);
        let normal = Normal::new(0., 1.).unwrap();

        let mut data_x: Vec<f64> = Vec::with_capacity(capacity);
        for _ in 0..data_x.capacity() {
            data_x.push(normal.sample(&mut r));
        }
        data_x
    }

    /// Generates two Gaussian clusters of unit variance. The first
    /// `n_per_class` rows are centered at the origin and labelled `0`, the next
    /// `n_per_class` rows are centered at `(separation, ..., separation)` and
    /// labelled `1`.
    pub fn generate_two_clusters(
        n_per_class: usize,
        n_features: usize,
        separation: f64,
        seed: u64,
    ) -> (Array2<f64>, Array1<f64>) {
        let n_samples = 2 * n_per_class;
        let noise = fill_random_vector(n_samples * n_features, seed);
        let X = Array2::from_shape_fn((n_samples, n_features), |(i, j)| {
            let center = if i < n_per_class { 0. } else { separation };
            center + noise[i * n_features + j]
        });
        let y = Array1::from_shape_fn(n_samples, |i| if i < n_per_class { 0. } else { 1. });
        (X, y)
    }

    /// Generates a noisy linearly separable problem: labels are the sign of
    /// `X w_true + noise`, encoded as `0` / `1`.
    pub fn generate_random_data(n_samples: usize, n_features: usize) -> (Array2<f64>, Array1<f64>) {
        let data_x = fill_random_vector(n_samples * n_features, 42);
        let data_w = fill_random_vector(n_features, 43);
        let data_e = fill_random_vector(n_samples, 44);
        let X = Array2::from_shape_vec((n_samples, n_features), data_x).unwrap();
        let true_w = Array1::from_shape_vec(n_features, data_w).unwrap();
        let noise = Array1::from_shape_vec(n_samples, data_e).unwrap() * 0.1;
        let y = (X.dot(&true_w) + noise).mapv(|v| if v > 0. { 1. } else { 0. });

        (X, y)
    }
}
