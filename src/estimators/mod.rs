
pub mod error;
pub mod hyperparams;
pub mod logistic_regression;
pub mod param_guard;
pub mod traits;

pub use error::EstimatorError;
pub use hyperparams::{LogisticRegressionParams, LogisticRegressionValidParams};
pub use logistic_regression::{FittedWeights, LogisticRegression};
pub use param_guard::ParamGuard;
pub use traits::Fit;
