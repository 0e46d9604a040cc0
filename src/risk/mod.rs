//! Malignancy risk scoring on top of the logistic regression estimator.
//!
//! A [`RiskModel`] bundles everything needed to score a new tumor
//! observation: the standardization learned on the training set, the fitted
//! estimator and the ordered feature names. It is built once, either by
//! training or by restoring a [`RiskModelArtifact`], and then only borrowed
//! by the scoring methods.

use std::collections::HashMap;
use std::fmt;

use ndarray::{Array1, ArrayBase, Axis, Data, Ix1, Ix2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::datasets::{DatasetBase, Targets};
use crate::estimators::{EstimatorError, LogisticRegression, LogisticRegressionValidParams};
use crate::metrics::{ClassificationReport, MetricsError};
use crate::preprocessing::{PreprocessingError, StandardScaler};
use crate::Float;

#[cfg(test)]
mod tests;

/// Simplified `Result` using [`RiskError`] as error type
pub type Result<T> = std::result::Result<T, RiskError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    #[error(transparent)]
    Estimator(#[from] EstimatorError),
    #[error(transparent)]
    Preprocessing(#[from] PreprocessingError),
    #[error(transparent)]
    Metrics(#[from] MetricsError),
    #[error("missing value for feature {0:?}")]
    MissingFeature(String),
    #[error("expected {expected} feature names, found {found}")]
    FeatureNamesMismatch { expected: usize, found: usize },
}

/// The 30 measurements of a breast mass cell nuclei image, in the column
/// order the model expects them.
pub const TUMOR_FEATURES: [&str; 30] = [
    "radius_mean",
    "texture_mean",
    "perimeter_mean",
    "area_mean",
    "smoothness_mean",
    "compactness_mean",
    "concavity_mean",
    "concave points_mean",
    "symmetry_mean",
    "fractal_dimension_mean",
    "radius_se",
    "texture_se",
    "perimeter_se",
    "area_se",
    "smoothness_se",
    "compactness_se",
    "concavity_se",
    "concave points_se",
    "symmetry_se",
    "fractal_dimension_se",
    "radius_worst",
    "texture_worst",
    "perimeter_worst",
    "area_worst",
    "smoothness_worst",
    "compactness_worst",
    "concavity_worst",
    "concave points_worst",
    "symmetry_worst",
    "fractal_dimension_worst",
];

/// Qualitative band of a malignancy probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    VeryLow,
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Bands: `[0, 0.3)` very low, `[0.3, 0.5)` low, `[0.5, 0.7)` moderate,
    /// `[0.7, 1]` high.
    pub fn from_probability<F: Float>(probability: F) -> Self {
        if probability < F::cast(0.3) {
            RiskLevel::VeryLow
        } else if probability < F::cast(0.5) {
            RiskLevel::Low
        } else if probability < F::cast(0.7) {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskLevel::VeryLow => "Very Low",
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        };
        f.write_str(name)
    }
}

/// The outcome of scoring one observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment<F> {
    /// Probability of malignancy.
    pub probability: F,
    /// `1` for malignant, `0` for benign.
    pub label: usize,
    pub level: RiskLevel,
    /// Distance of the probability from the decision boundary, `2 |p - 0.5|`,
    /// from `0` (undecided) to `1` (certain).
    pub confidence: F,
}

impl<F: Float> RiskAssessment<F> {
    pub fn from_probability(probability: F) -> Self {
        RiskAssessment {
            probability,
            label: if probability >= F::cast(0.5) { 1 } else { 0 },
            level: RiskLevel::from_probability(probability),
            confidence: F::cast(2.) * (probability - F::cast(0.5)).abs(),
        }
    }

    pub fn is_malignant(&self) -> bool {
        self.label == 1
    }
}

/// Plain-value form of a trained [`RiskModel`], suitable for storage by a
/// caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "F: Float + Deserialize<'de>"))]
pub struct RiskModelArtifact<F> {
    pub feature_names: Vec<String>,
    pub mean: Array1<F>,
    pub scale: Array1<F>,
    /// Intercept first.
    pub weights: Array1<F>,
    pub hyperparameters: LogisticRegressionValidParams<F>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskModel<F> {
    scaler: StandardScaler<F>,
    estimator: LogisticRegression<F>,
    feature_names: Vec<String>,
}

impl<F: Float> RiskModel<F> {
    /// This method standardizes the training features, fits the estimator on
    /// the standardized data and logs a summary of the run.
    pub fn train<S, T>(
        X: &ArrayBase<S, Ix2>,
        y: &T,
        feature_names: Vec<String>,
        params: LogisticRegressionValidParams<F>,
    ) -> Result<Self>
    where
        S: Data<Elem = F>,
        T: Targets<Elem = F>,
    {
        if feature_names.len() != X.ncols() {
            return Err(RiskError::FeatureNamesMismatch {
                expected: X.ncols(),
                found: feature_names.len(),
            });
        }
        let (scaler, X_scaled) = StandardScaler::fit_transform(X)?;
        let dataset = DatasetBase::new(X_scaled, y);

        let mut estimator = LogisticRegression::new(params);
        let losses = estimator.fit(&dataset)?;
        let final_loss = losses.last().copied().unwrap_or_else(F::nan);

        let targets = y.as_single_target();
        let n_malignant = targets.iter().filter(|&&t| t == F::one()).count();
        log::info!(
            "trained risk model on {} samples ({} malignant, {} benign) with {} features",
            targets.len(),
            n_malignant,
            targets.len() - n_malignant,
            X.ncols(),
        );
        log::info!(
            "final loss {:.6} after {} iterations (converged: {})",
            final_loss,
            estimator.n_iterations(),
            estimator.converged(),
        );

        Ok(RiskModel {
            scaler,
            estimator,
            feature_names,
        })
    }

    /// This method scores one observation given in raw units, with one value
    /// per feature in training order.
    pub fn assess<S: Data<Elem = F>>(&self, x: &ArrayBase<S, Ix1>) -> Result<RiskAssessment<F>> {
        let x_scaled = self.scaler.transform_row(x)?.insert_axis(Axis(0));
        let proba = self.estimator.predict_proba(&x_scaled)?;
        Ok(RiskAssessment::from_probability(proba[0]))
    }

    /// This method scores one observation given as a map from feature name
    /// to raw value. Every training feature must be present, extra entries
    /// are ignored.
    pub fn assess_named(&self, values: &HashMap<String, F>) -> Result<RiskAssessment<F>> {
        let x = self
            .feature_names
            .iter()
            .map(|name| {
                values
                    .get(name)
                    .copied()
                    .ok_or_else(|| RiskError::MissingFeature(name.clone()))
            })
            .collect::<Result<Array1<F>>>()?;
        self.assess(&x)
    }

    pub fn assess_batch<S: Data<Elem = F>>(
        &self,
        X: &ArrayBase<S, Ix2>,
    ) -> Result<Vec<RiskAssessment<F>>> {
        let X_scaled = self.scaler.transform(X)?;
        Ok(self
            .estimator
            .predict_proba(&X_scaled)?
            .iter()
            .map(|&p| RiskAssessment::from_probability(p))
            .collect())
    }

    /// This method scores a labelled set given in raw units.
    pub fn evaluate<S, T>(&self, X: &ArrayBase<S, Ix2>, y: &T) -> Result<ClassificationReport>
    where
        S: Data<Elem = F>,
        T: Targets<Elem = F>,
    {
        if let Some(idx) = y.first_non_binary() {
            return Err(EstimatorError::NonBinaryTarget(idx).into());
        }
        let y_true = y
            .as_single_target()
            .mapv(|t| if t == F::one() { 1 } else { 0 });
        let X_scaled = self.scaler.transform(X)?;
        let proba = self.estimator.predict_proba(&X_scaled)?;
        let y_pred = proba.mapv(|p| if p >= F::cast(0.5) { 1 } else { 0 });
        Ok(ClassificationReport::evaluate(
            y_true.view(),
            y_pred.view(),
            Some(proba.view()),
        )?)
    }

    /// This method returns the `k` features with the largest absolute weight
    /// on the standardized scale, most important first.
    pub fn top_features(&self, k: usize) -> Result<Vec<(String, F)>> {
        let names: Vec<&str> = self.feature_names.iter().map(String::as_str).collect();
        let mut ranked: Vec<(String, F)> = self
            .estimator
            .feature_importance(Some(names.as_slice()))?
            .into_iter()
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(k);
        Ok(ranked)
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn scaler(&self) -> &StandardScaler<F> {
        &self.scaler
    }

    pub fn estimator(&self) -> &LogisticRegression<F> {
        &self.estimator
    }

    pub fn to_artifact(&self) -> Result<RiskModelArtifact<F>> {
        let weights = self
            .estimator
            .raw_weights()
            .ok_or(EstimatorError::NotFitted)?
            .to_owned();
        Ok(RiskModelArtifact {
            feature_names: self.feature_names.clone(),
            mean: self.scaler.mean().clone(),
            scale: self.scaler.scale().clone(),
            weights,
            hyperparameters: self.estimator.hyperparameters().clone(),
        })
    }

    pub fn from_artifact(artifact: RiskModelArtifact<F>) -> Result<Self> {
        let RiskModelArtifact {
            feature_names,
            mean,
            scale,
            weights,
            hyperparameters,
        } = artifact;

        let scaler = StandardScaler::from_parts(mean, scale)?;
        if feature_names.len() != scaler.n_features() {
            return Err(RiskError::FeatureNamesMismatch {
                expected: scaler.n_features(),
                found: feature_names.len(),
            });
        }
        let estimator = LogisticRegression::from_weights(hyperparameters, weights)?;
        if estimator.n_features() != Some(scaler.n_features()) {
            return Err(EstimatorError::ShapeMismatch {
                expected: scaler.n_features(),
                found: estimator.n_features().unwrap_or(0),
            }
            .into());
        }

        Ok(RiskModel {
            scaler,
            estimator,
            feature_names,
        })
    }

    /// This function builds the model a service scores with: it restores
    /// `artifact` when one is given and valid, and calls `train` otherwise.
    pub fn load_or_train<Tr>(artifact: Option<RiskModelArtifact<F>>, train: Tr) -> Result<Self>
    where
        Tr: FnOnce() -> Result<Self>,
    {
        if let Some(artifact) = artifact {
            match Self::from_artifact(artifact) {
                Ok(model) => {
                    log::info!("restored risk model from artifact");
                    return Ok(model);
                }
                Err(err) => {
                    log::warn!("could not restore risk model ({}), training a new one", err)
                }
            }
        }
        train()
    }
}
