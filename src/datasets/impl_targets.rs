use super::Targets;
use crate::Float;
use ndarray::{ArrayBase, ArrayView1, Axis, Data, Ix1};

impl<F: Float, S: Data<Elem = F>> Targets for ArrayBase<S, Ix1> {
    type Elem = F;

    fn n_samples(&self) -> usize {
        self.len_of(Axis(0))
    }

    fn as_single_target(&self) -> ArrayView1<F> {
        self.view()
    }

    fn first_non_binary(&self) -> Option<usize> {
        self.iter()
            .position(|&y_i| y_i != F::zero() && y_i != F::one())
    }
}

impl<T: Targets> Targets for &T {
    type Elem = T::Elem;

    fn n_samples(&self) -> usize {
        (*self).n_samples()
    }

    fn as_single_target(&self) -> ArrayView1<Self::Elem> {
        (*self).as_single_target()
    }

    fn first_non_binary(&self) -> Option<usize> {
        (*self).first_non_binary()
    }
}
