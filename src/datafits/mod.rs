use ndarray::{Array1, ArrayView1};

use super::Float;
use crate::datasets::{DatasetBase, DesignMatrix, Targets};
use crate::helpers::helpers::clip_proba;


/// This trait provides the two quantities the gradient descent routine needs
/// at every iteration: the value of the loss and its gradient with respect to
/// the weight vector. Both are computed from the predicted probabilities of
/// the current iterate.
pub trait Datafit<F: Float, DM: DesignMatrix<Elem = F>, T: Targets<Elem = F>> {
    /// This method computes the value of the datafit given the predicted
    /// probabilities.
    fn value(&self, dataset: &DatasetBase<DM, T>, proba: ArrayView1<F>) -> F;

    /// This method computes the full gradient of the datafit with respect to
    /// the weight vector.
    fn full_grad(&self, dataset: &DatasetBase<DM, T>, proba: ArrayView1<F>) -> Array1<F>;
}

/// Binary cross-entropy datafit
///
/// The negative log-likelihood of binary labels under the predicted
/// probabilities, averaged over samples:
/// ```ignore
/// -1 / n_samples * sum(y * log(p) + (1 - y) * log(1 - p))
/// ```
/// Probabilities are clipped away from `0` and `1` before taking logarithms.
/// No regularization term is added.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BinaryCrossEntropy;

impl BinaryCrossEntropy {
    pub fn new() -> Self {
        BinaryCrossEntropy
    }
}

impl<F: Float, DM: DesignMatrix<Elem = F>, T: Targets<Elem = F>> Datafit<F, DM, T>
    for BinaryCrossEntropy
{
    fn value(&self, dataset: &DatasetBase<DM, T>, proba: ArrayView1<F>) -> F {
        let y = dataset.targets().as_single_target();
        let log_likelihood = y
            .iter()
            .zip(proba.iter())
            .map(|(&y_i, &p_i)| {
                let p_i = clip_proba(p_i);
                y_i * p_i.ln() + (F::one() - y_i) * (F::one() - p_i).ln()
            })
            .sum::<F>();
        -log_likelihood / F::cast(y.len())
    }

    /// The gradient `X^T (p - y) / n_samples`, where `X` already carries the
    /// bias column.
    fn full_grad(&self, dataset: &DatasetBase<DM, T>, proba: ArrayView1<F>) -> Array1<F> {
        let y = dataset.targets().as_single_target();
        let residuals = &proba - &y;
        let n_samples = F::cast(y.len());
        dataset
            .design_matrix()
            .compute_transpose_dot(residuals.view())
            / n_samples
    }
}
