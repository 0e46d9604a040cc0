//! Feature preparation applied before fitting: column standardization,
//! mean imputation of missing values and diagnosis label encoding.

use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix1, Ix2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Float;


/// Simplified `Result` using [`PreprocessingError`] as error type
pub type Result<T> = std::result::Result<T, PreprocessingError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreprocessingError {
    #[error("cannot fit a scaler on an empty design matrix")]
    EmptyInput,
    #[error("expected {expected} features, found {found}")]
    ShapeMismatch { expected: usize, found: usize },
    #[error("mean and scale have different lengths ({n_mean} and {n_scale})")]
    InconsistentParts { n_mean: usize, n_scale: usize },
    #[error("scale of feature {0} is not strictly positive")]
    InvalidScale(usize),
    #[error("unknown diagnosis label {0:?}, expected \"M\" or \"B\"")]
    UnknownDiagnosis(String),
}

/// Column standardizer
///
/// Centers each column on its mean and divides by its population standard
/// deviation. Columns with zero variance keep a scale of `1`, so they are
/// only centered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler<F> {
    mean: Array1<F>,
    scale: Array1<F>,
}

impl<F: Float> StandardScaler<F> {
    /// This method learns the per-column mean and scale of `X`.
    pub fn fit<S: Data<Elem = F>>(X: &ArrayBase<S, Ix2>) -> Result<Self> {
        if X.nrows() == 0 || X.ncols() == 0 {
            return Err(PreprocessingError::EmptyInput);
        }
        let n_samples = F::cast(X.nrows());
        let mean = X.sum_axis(Axis(0)) / n_samples;
        let scale = Array1::from_shape_fn(X.ncols(), |j| {
            let mu = mean[j];
            let var = X.column(j).fold(F::zero(), |acc, &x| acc + (x - mu).powi(2)) / n_samples;
            let std = var.sqrt();
            if std > F::zero() {
                std
            } else {
                F::one()
            }
        });
        Ok(StandardScaler { mean, scale })
    }

    /// This method restores a scaler from previously learned parameters.
    pub fn from_parts(mean: Array1<F>, scale: Array1<F>) -> Result<Self> {
        if mean.len() != scale.len() {
            return Err(PreprocessingError::InconsistentParts {
                n_mean: mean.len(),
                n_scale: scale.len(),
            });
        }
        if let Some(j) = scale.iter().position(|&s| !s.is_finite() || s <= F::zero()) {
            return Err(PreprocessingError::InvalidScale(j));
        }
        Ok(StandardScaler { mean, scale })
    }

    pub fn transform<S: Data<Elem = F>>(&self, X: &ArrayBase<S, Ix2>) -> Result<Array2<F>> {
        self.check_features(X.ncols())?;
        Ok((X - &self.mean) / &self.scale)
    }

    /// This method standardizes a single observation.
    pub fn transform_row<S: Data<Elem = F>>(&self, x: &ArrayBase<S, Ix1>) -> Result<Array1<F>> {
        self.check_features(x.len())?;
        Ok((x - &self.mean) / &self.scale)
    }

    /// This method fits a scaler on `X` and returns it alongside the
    /// standardized matrix.
    pub fn fit_transform<S: Data<Elem = F>>(X: &ArrayBase<S, Ix2>) -> Result<(Self, Array2<F>)> {
        let scaler = Self::fit(X)?;
        let X_scaled = scaler.transform(X)?;
        Ok((scaler, X_scaled))
    }

    /// This method maps standardized values back to the original units.
    pub fn inverse_transform<S: Data<Elem = F>>(&self, X: &ArrayBase<S, Ix2>) -> Result<Array2<F>> {
        self.check_features(X.ncols())?;
        Ok(X * &self.scale + &self.mean)
    }

    pub fn mean(&self) -> &Array1<F> {
        &self.mean
    }

    pub fn scale(&self) -> &Array1<F> {
        &self.scale
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn check_features(&self, found: usize) -> Result<()> {
        if found != self.n_features() {
            return Err(PreprocessingError::ShapeMismatch {
                expected: self.n_features(),
                found,
            });
        }
        Ok(())
    }
}

/// This function replaces every NaN entry with the mean of the non-missing
/// entries of its column and returns the number of replaced entries. A
/// column without any observed value is filled with zeros.
pub fn impute_mean<F: Float>(X: &mut Array2<F>) -> usize {
    let mut n_replaced = 0;
    for mut column in X.columns_mut() {
        let (sum, count) = column
            .iter()
            .filter(|x| !x.is_nan())
            .fold((F::zero(), 0usize), |(s, c), &x| (s + x, c + 1));
        if count == column.len() {
            continue;
        }
        let fill = if count == 0 {
            F::zero()
        } else {
            sum / F::cast(count)
        };
        for x in column.iter_mut().filter(|x| x.is_nan()) {
            *x = fill;
            n_replaced += 1;
        }
    }
    if n_replaced > 0 {
        log::warn!("replaced {} missing values with their column mean", n_replaced);
    }
    n_replaced
}

/// This function encodes diagnosis labels as binary targets: `"M"`
/// (malignant) becomes `1`, `"B"` (benign) becomes `0`.
pub fn encode_diagnosis<F: Float, L: AsRef<str>>(labels: &[L]) -> Result<Array1<F>> {
    labels
        .iter()
        .map(|label| match label.as_ref().trim() {
            "M" => Ok(F::one()),
            "B" => Ok(F::zero()),
            other => Err(PreprocessingError::UnknownDiagnosis(other.to_string())),
        })
        .collect::<Result<Vec<F>>>()
        .map(Array1::from)
}
