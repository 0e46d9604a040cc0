use std::collections::BTreeMap;

use ndarray::{s, Array1, ArrayBase, ArrayView1, Data, Ix2};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use super::error::{EstimatorError, Result};
use super::hyperparams::{LogisticRegressionParams, LogisticRegressionValidParams};
use super::traits::Fit;
use crate::datafits::BinaryCrossEntropy;
use crate::datasets::{DatasetBase, DesignMatrix, Targets};
use crate::helpers::helpers::sigmoid;
use crate::solver::gradient_descent;
use crate::Float;

/// Standard deviation of the normal distribution the initial weights are drawn
/// from.
pub const WEIGHT_INIT_STD: f64 = 0.01;

/// Default decision threshold of [`LogisticRegression::predict`].
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// The fitted weights split into intercept and per-feature coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedWeights<'a, F> {
    pub intercept: F,
    pub coefficients: ArrayView1<'a, F>,
}

/// Binary logistic regression
///
/// The estimator maps a weighted sum of the features through the logistic
/// function to obtain the probability of the positive class. Weights are
/// estimated by batch gradient descent on the binary cross-entropy, starting
/// from small random values.
///
/// A freshly built estimator holds no weights: every prediction method fails
/// with [`EstimatorError::NotFitted`] until [`LogisticRegression::fit`]
/// succeeds. Each call to `fit` replaces the previous weights entirely.
/// Prediction only borrows the estimator, so a fitted instance can be shared
/// across threads; refitting needs exclusive access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "RawLogisticRegression<F>",
    bound(deserialize = "F: Float + Deserialize<'de>")
)]
pub struct LogisticRegression<F> {
    params: LogisticRegressionValidParams<F>,
    weights: Option<Array1<F>>,
    losses: Vec<F>,
    n_iterations: usize,
    converged: bool,
}

/// Serialized layout of [`LogisticRegression`], before the weights are
/// checked.
#[derive(Deserialize)]
#[serde(bound(deserialize = "F: Float + Deserialize<'de>"))]
struct RawLogisticRegression<F> {
    params: LogisticRegressionValidParams<F>,
    weights: Option<Array1<F>>,
    losses: Vec<F>,
    n_iterations: usize,
    converged: bool,
}

impl<F: Float> TryFrom<RawLogisticRegression<F>> for LogisticRegression<F> {
    type Error = EstimatorError;

    fn try_from(raw: RawLogisticRegression<F>) -> Result<Self> {
        let model = match raw.weights {
            Some(weights) => LogisticRegression::from_weights(raw.params, weights)?,
            None => LogisticRegression::new(raw.params),
        };
        Ok(LogisticRegression {
            losses: raw.losses,
            n_iterations: raw.n_iterations,
            converged: raw.converged,
            ..model
        })
    }
}

impl<F: Float> Default for LogisticRegression<F> {
    fn default() -> Self {
        Self::new(LogisticRegressionValidParams::default())
    }
}

impl<F: Float> LogisticRegression<F> {
    /// This method returns a builder for the hyperparameters of the estimator,
    /// initialized with the default values.
    pub fn params() -> LogisticRegressionParams<F> {
        LogisticRegressionParams::new()
    }

    /// This method creates an unfitted estimator from checked
    /// hyperparameters.
    pub fn new(params: LogisticRegressionValidParams<F>) -> Self {
        LogisticRegression {
            params,
            weights: None,
            losses: Vec::new(),
            n_iterations: 0,
            converged: false,
        }
    }

    /// This method restores a fitted estimator from a weight vector laid out
    /// as `[intercept, w_1, ..., w_n]`, e.g. one previously obtained from
    /// [`LogisticRegression::raw_weights`].
    pub fn from_weights(
        params: LogisticRegressionValidParams<F>,
        weights: Array1<F>,
    ) -> Result<Self> {
        if weights.is_empty() {
            return Err(EstimatorError::EmptyWeights);
        }
        Ok(LogisticRegression {
            weights: Some(weights),
            ..Self::new(params)
        })
    }

    /// This method fits the estimator to a dataset and returns the loss
    /// trajectory, one value per completed iteration.
    ///
    /// The weights are initialized from the seed of the hyperparameters if
    /// one was set, from entropy otherwise.
    pub fn fit<DM, T>(&mut self, dataset: &DatasetBase<DM, T>) -> Result<&[F]>
    where
        DM: DesignMatrix<Elem = F>,
        T: Targets<Elem = F>,
    {
        let mut rng = match self.params.seed() {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        self.fit_with_rng(dataset, &mut rng)
    }

    /// This method fits the estimator with weights initialized from the given
    /// random number generator.
    pub fn fit_with_rng<DM, T, R>(
        &mut self,
        dataset: &DatasetBase<DM, T>,
        rng: &mut R,
    ) -> Result<&[F]>
    where
        DM: DesignMatrix<Elem = F>,
        T: Targets<Elem = F>,
        R: Rng + ?Sized,
    {
        let n_samples = dataset.design_matrix().n_samples();
        let n_targets = dataset.targets().n_samples();
        if n_samples == 0 {
            return Err(EstimatorError::EmptyDataset);
        }
        if n_samples != n_targets {
            return Err(EstimatorError::SampleMismatch {
                n_samples,
                n_targets,
            });
        }
        if let Some(idx) = dataset.targets().first_non_binary() {
            return Err(EstimatorError::NonBinaryTarget(idx));
        }

        let X_aug = dataset.design_matrix().with_bias();
        let augmented = DatasetBase::new(X_aug, dataset.targets().as_single_target());

        let std = F::cast(WEIGHT_INIT_STD);
        let w0 = Array1::from_shape_fn(augmented.n_features(), |_| {
            F::cast(rng.sample::<f64, _>(StandardNormal)) * std
        });

        let out = gradient_descent(
            &augmented,
            &BinaryCrossEntropy::new(),
            w0,
            self.params.learning_rate(),
            self.params.max_iterations(),
            self.params.tolerance(),
            self.params.commit_converged_update(),
            self.params.verbose(),
        );

        self.weights = Some(out.weights);
        self.losses = out.losses;
        self.n_iterations = out.n_iterations;
        self.converged = out.converged;
        Ok(&self.losses)
    }

    /// This method returns the raw linear scores `Xw + b`, one per row.
    pub fn decision_function<S: Data<Elem = F>>(
        &self,
        X: &ArrayBase<S, Ix2>,
    ) -> Result<Array1<F>> {
        let w = self.checked_weights(X.ncols())?;
        let intercept = w[0];
        Ok(X.dot(&w.slice(s![1..])).mapv(|xw| xw + intercept))
    }

    /// This method returns the probability of the positive class for every
    /// row.
    pub fn predict_proba<S: Data<Elem = F>>(&self, X: &ArrayBase<S, Ix2>) -> Result<Array1<F>> {
        Ok(self.decision_function(X)?.mapv(sigmoid))
    }

    /// This method predicts class labels with the default threshold of `0.5`.
    pub fn predict<S: Data<Elem = F>>(&self, X: &ArrayBase<S, Ix2>) -> Result<Array1<usize>> {
        self.predict_with_threshold(X, F::cast(DEFAULT_THRESHOLD))
    }

    /// This method predicts class `1` for every row whose probability is
    /// greater than or equal to `threshold`, class `0` otherwise.
    pub fn predict_with_threshold<S: Data<Elem = F>>(
        &self,
        X: &ArrayBase<S, Ix2>,
        threshold: F,
    ) -> Result<Array1<usize>> {
        Ok(self
            .predict_proba(X)?
            .mapv(|p| if p >= threshold { 1 } else { 0 }))
    }

    /// This method returns the intercept and the feature weights, or `None`
    /// if the estimator has not been fitted.
    pub fn weights(&self) -> Option<FittedWeights<'_, F>> {
        let w = self.fitted_weights().ok()?;
        Some(FittedWeights {
            intercept: w[0],
            coefficients: w.slice(s![1..]),
        })
    }

    /// This method is a getter for the full weight vector, intercept first.
    pub fn raw_weights(&self) -> Option<ArrayView1<F>> {
        self.weights.as_ref().map(|w| w.view())
    }

    /// This method maps each feature name to the absolute value of its
    /// weight. The intercept is excluded. Without names, features are called
    /// `feature_0`, `feature_1`, ...
    pub fn feature_importance(
        &self,
        feature_names: Option<&[&str]>,
    ) -> Result<BTreeMap<String, F>> {
        let w = self.fitted_weights()?;
        let coefficients = w.slice(s![1..]);
        let names: Vec<String> = match feature_names {
            Some(names) => {
                if names.len() != coefficients.len() {
                    return Err(EstimatorError::FeatureNamesMismatch {
                        expected: coefficients.len(),
                        found: names.len(),
                    });
                }
                names.iter().map(|name| name.to_string()).collect()
            }
            None => (0..coefficients.len())
                .map(|j| format!("feature_{}", j))
                .collect(),
        };
        Ok(names
            .into_iter()
            .zip(coefficients.iter().map(|w_j| w_j.abs()))
            .collect())
    }

    /// This method returns the number of features seen during training.
    pub fn n_features(&self) -> Option<usize> {
        self.weights.as_ref().and_then(|w| w.len().checked_sub(1))
    }

    pub fn is_fitted(&self) -> bool {
        self.weights.is_some()
    }

    /// This method is a getter for the loss trajectory of the last fit.
    pub fn losses(&self) -> &[F] {
        &self.losses
    }

    pub fn n_iterations(&self) -> usize {
        self.n_iterations
    }

    /// Whether the last fit stopped on the tolerance criterion.
    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn hyperparameters(&self) -> &LogisticRegressionValidParams<F> {
        &self.params
    }

    /// The weight vector, holding at least the intercept.
    fn fitted_weights(&self) -> Result<&Array1<F>> {
        match &self.weights {
            None => Err(EstimatorError::NotFitted),
            Some(w) if w.is_empty() => Err(EstimatorError::EmptyWeights),
            Some(w) => Ok(w),
        }
    }

    fn checked_weights(&self, n_features: usize) -> Result<&Array1<F>> {
        let w = self.fitted_weights()?;
        let expected = w.len() - 1;
        if expected != n_features {
            return Err(EstimatorError::ShapeMismatch {
                expected,
                found: n_features,
            });
        }
        Ok(w)
    }
}

/// This implements batch gradient descent for any design matrix, returning a
/// freshly fitted estimator.
impl<F: Float, DM: DesignMatrix<Elem = F>, T: Targets<Elem = F>> Fit<DM, T, EstimatorError>
    for LogisticRegressionValidParams<F>
{
    /// If successful, the output of gradient descent is an instance of
    /// [`LogisticRegression`] holding the fitted weights.
    type Object = LogisticRegression<F>;

    fn fit(&self, dataset: &DatasetBase<DM, T>) -> Result<Self::Object> {
        let mut model = LogisticRegression::new(self.clone());
        model.fit(dataset)?;
        Ok(model)
    }
}
