use serde::{Deserialize, Serialize};

use super::error::{EstimatorError, Result};
use super::param_guard::ParamGuard;
use crate::Float;

/// A verified hyperparameter set ready for the fitting of a logistic
/// regression model
///
/// Deserialization goes through the same checks as
/// [`LogisticRegressionParams`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "RawParams<F>",
    bound(deserialize = "F: Float + Deserialize<'de>")
)]
pub struct LogisticRegressionValidParams<F> {
    learning_rate: F,
    max_iterations: usize,
    tolerance: F,
    seed: Option<u64>,
    commit_converged_update: bool,
    verbose: bool,
}

impl<F: Float> LogisticRegressionValidParams<F> {
    pub fn learning_rate(&self) -> F {
        self.learning_rate
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> F {
        self.tolerance
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn commit_converged_update(&self) -> bool {
        self.commit_converged_update
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

impl<F: Float> Default for LogisticRegressionValidParams<F> {
    fn default() -> Self {
        LogisticRegressionParams::new().0
    }
}

/// Serialized layout of [`LogisticRegressionValidParams`], not yet checked.
#[derive(Deserialize)]
struct RawParams<F> {
    learning_rate: F,
    max_iterations: usize,
    tolerance: F,
    seed: Option<u64>,
    commit_converged_update: bool,
    verbose: bool,
}

impl<F: Float> TryFrom<RawParams<F>> for LogisticRegressionValidParams<F> {
    type Error = EstimatorError;

    fn try_from(raw: RawParams<F>) -> Result<Self> {
        LogisticRegressionParams(LogisticRegressionValidParams {
            learning_rate: raw.learning_rate,
            max_iterations: raw.max_iterations,
            tolerance: raw.tolerance,
            seed: raw.seed,
            commit_converged_update: raw.commit_converged_update,
            verbose: raw.verbose,
        })
        .check()
    }
}

/// A hyper-parameter set during construction
///
/// Configures batch gradient descent on the binary cross-entropy:
/// ```ignore
/// -1 / n_samples * sum(y * log(sigmoid(Xw)) + (1 - y) * log(1 - sigmoid(Xw)))
/// ```
/// where `X` carries a leading column of ones for the intercept.
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegressionParams<F>(LogisticRegressionValidParams<F>);

impl<F: Float> Default for LogisticRegressionParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Configure and fit a logistic regression model
impl<F: Float> LogisticRegressionParams<F> {
    /// Create default logistic regression hyper parameters
    pub fn new() -> LogisticRegressionParams<F> {
        Self(LogisticRegressionValidParams {
            learning_rate: F::cast(0.01),
            max_iterations: 1000,
            tolerance: F::cast(1e-6),
            seed: None,
            commit_converged_update: true,
            verbose: false,
        })
    }

    /// Set the step size of gradient descent.
    ///
    /// Defaults to `0.01` if not set.
    pub fn learning_rate(mut self, learning_rate: F) -> Self {
        self.0.learning_rate = learning_rate;
        self
    }

    /// Set the maximum number of gradient descent iterations.
    ///
    /// Defaults to `1000` if not set.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.0.max_iterations = max_iterations;
        self
    }

    /// Set the stopping criterion on the change of the weight vector between
    /// two iterations. It is used both as absolute and relative tolerance.
    ///
    /// Defaults to `1e-6` if not set.
    pub fn tolerance(mut self, tolerance: F) -> Self {
        self.0.tolerance = tolerance;
        self
    }

    /// Seed the random initialization of the weights. Two fits with the same
    /// seed on the same data produce identical weights and losses.
    ///
    /// Defaults to an entropy-seeded generator if not set.
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = Some(seed);
        self
    }

    /// Keep the candidate weights of the iteration that meets the tolerance
    /// criterion. When `false`, that last update is discarded and the weights
    /// of the previous iteration are kept.
    ///
    /// Defaults to `true` if not set.
    pub fn commit_converged_update(mut self, commit_converged_update: bool) -> Self {
        self.0.commit_converged_update = commit_converged_update;
        self
    }

    /// Sets the verbosity level of the solver. Progress is logged at the info
    /// level when `true`, at the debug level otherwise.
    ///
    /// Defaults to `false` if not set.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.0.verbose = verbose;
        self
    }
}

impl<F: Float> ParamGuard for LogisticRegressionParams<F> {
    type Checked = LogisticRegressionValidParams<F>;
    type Error = EstimatorError;

    /// Validate the hyper parameters
    fn check_ref(&self) -> Result<&Self::Checked> {
        let learning_rate = self.0.learning_rate;
        let tolerance = self.0.tolerance;
        if !learning_rate.is_finite() || learning_rate <= F::zero() {
            Err(EstimatorError::InvalidLearningRate(
                learning_rate.to_f32().unwrap_or(f32::NAN),
            ))
        } else if tolerance.is_nan() || tolerance < F::zero() {
            Err(EstimatorError::InvalidTolerance(
                tolerance.to_f32().unwrap_or(f32::NAN),
            ))
        } else if self.0.max_iterations == 0 {
            Err(EstimatorError::InvalidMaxIterations(self.0.max_iterations))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
