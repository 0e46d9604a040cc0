extern crate ndarray;

use ndarray::{Array1, Array2, ArrayView1};

mod impl_datasets;
mod impl_design_matrix;
mod impl_targets;

#[cfg(test)]
mod tests;

pub use impl_datasets::train_test_split;

/// A dataset pairs a design matrix (one row per sample) with the targets of
/// every sample.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetBase<DM, T>
where
    DM: DesignMatrix,
{
    pub design_matrix: DM,
    pub targets: T,
}

/// An owned dense dataset, the shape returned by splitting or scaling.
pub type DenseDataset<F> = DatasetBase<Array2<F>, Array1<F>>;

/// This trait abstracts over the matrix-vector products needed by the
/// gradient descent routine.
pub trait DesignMatrix: Sized {
    type Elem;

    fn n_samples(&self) -> usize;

    fn n_features(&self) -> usize;

    /// This method returns a copy of the matrix with a leading column of ones,
    /// so that the first weight acts as the intercept.
    fn with_bias(&self) -> Array2<Self::Elem>;

    /// This method computes the model fit `Xw`.
    fn compute_fit(&self, w: ArrayView1<Self::Elem>) -> Array1<Self::Elem>;

    /// This method computes the product `X^T r`, used to build gradients from
    /// per-sample residuals.
    fn compute_transpose_dot(&self, r: ArrayView1<Self::Elem>) -> Array1<Self::Elem>;
}

/// Binary targets, stored as floats equal to `0` or `1`.
pub trait Targets: Sized {
    type Elem;

    fn n_samples(&self) -> usize;

    fn as_single_target(&self) -> ArrayView1<Self::Elem>;

    /// Returns the index of the first target that is neither `0` nor `1`.
    fn first_non_binary(&self) -> Option<usize>;
}
