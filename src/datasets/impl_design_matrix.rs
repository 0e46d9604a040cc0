use super::DesignMatrix;
use crate::Float;
use ndarray::{s, Array1, Array2, ArrayBase, ArrayView1, Axis, Data, Ix2};

/// This implements the [`DesignMatrix`] trait for dense matrices.
impl<F: Float, S: Data<Elem = F>> DesignMatrix for ArrayBase<S, Ix2> {
    type Elem = F;

    fn n_samples(&self) -> usize {
        self.len_of(Axis(0))
    }

    fn n_features(&self) -> usize {
        self.len_of(Axis(1))
    }

    fn with_bias(&self) -> Array2<F> {
        let mut X_aug = Array2::<F>::ones((self.nrows(), self.ncols() + 1));
        X_aug.slice_mut(s![.., 1..]).assign(self);
        X_aug
    }

    fn compute_fit(&self, w: ArrayView1<F>) -> Array1<F> {
        self.dot(&w)
    }

    fn compute_transpose_dot(&self, r: ArrayView1<F>) -> Array1<F> {
        self.t().dot(&r)
    }
}

/// This implements the [`DesignMatrix`] trait for references.
impl<DM: DesignMatrix> DesignMatrix for &DM {
    type Elem = DM::Elem;

    fn n_samples(&self) -> usize {
        (*self).n_samples()
    }

    fn n_features(&self) -> usize {
        (*self).n_features()
    }

    fn with_bias(&self) -> Array2<Self::Elem> {
        (*self).with_bias()
    }

    fn compute_fit(&self, w: ArrayView1<Self::Elem>) -> Array1<Self::Elem> {
        (*self).compute_fit(w)
    }

    fn compute_transpose_dot(&self, r: ArrayView1<Self::Elem>) -> Array1<Self::Elem> {
        (*self).compute_transpose_dot(r)
    }
}
