use thiserror::Error;

/// Simplified `Result` using [`EstimatorError`] as error type
pub type Result<T> = std::result::Result<T, EstimatorError>;

/// Error variants from hyperparameter checking, model estimation or
/// prediction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimatorError {
    #[error("invalid learning rate {0}")]
    InvalidLearningRate(f32),
    #[error("invalid tolerance {0}")]
    InvalidTolerance(f32),
    #[error("invalid max_iterations {0}")]
    InvalidMaxIterations(usize),
    /// A prediction was requested before any successful fit
    #[error("the model is not fitted, call `fit` first")]
    NotFitted,
    /// The number of columns differs from the one seen during training
    #[error("expected {expected} features, found {found}")]
    ShapeMismatch { expected: usize, found: usize },
    #[error("the design matrix has {n_samples} rows but there are {n_targets} targets")]
    SampleMismatch { n_samples: usize, n_targets: usize },
    #[error("cannot fit on an empty dataset")]
    EmptyDataset,
    #[error("target at index {0} is neither 0 nor 1")]
    NonBinaryTarget(usize),
    #[error("expected {expected} feature names, found {found}")]
    FeatureNamesMismatch { expected: usize, found: usize },
    #[error("a weight vector needs at least the intercept")]
    EmptyWeights,
}
