use super::{DatasetBase, DenseDataset, DesignMatrix, Targets};
use crate::Float;
use ndarray::{ArrayBase, Axis, Data, Ix1, Ix2};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// This implementation block provides a method for the creation of datasets
/// from dense matrices.
impl<F: Float, D: Data<Elem = F>, T: Targets> From<(ArrayBase<D, Ix2>, T)>
    for DatasetBase<ArrayBase<D, Ix2>, T>
{
    fn from(data: (ArrayBase<D, Ix2>, T)) -> Self {
        DatasetBase {
            design_matrix: data.0,
            targets: data.1,
        }
    }
}

/// This implementation block provides methods to get record and target objects
/// from the dataset.
impl<DM: DesignMatrix, T: Targets> DatasetBase<DM, T> {
    /// This method instantiates a new dataset from a design matrix and targets.
    pub fn new(design_matrix: DM, targets: T) -> DatasetBase<DM, T> {
        DatasetBase {
            design_matrix,
            targets,
        }
    }

    /// This method is a getter for the targets.
    pub fn targets(&self) -> &T {
        &self.targets
    }

    /// This method is a getter for the design matrix.
    pub fn design_matrix(&self) -> &DM {
        &self.design_matrix
    }

    pub fn n_samples(&self) -> usize {
        self.design_matrix.n_samples()
    }

    pub fn n_features(&self) -> usize {
        self.design_matrix.n_features()
    }
}

/// Shuffles the rows of a dataset with a seeded generator and splits them in a
/// training and a test set.
///
/// The test set holds `ceil(n_samples * test_ratio)` rows, with `test_ratio`
/// clamped to `[0, 1]`.
pub fn train_test_split<F, D1, D2>(
    dataset: &DatasetBase<ArrayBase<D1, Ix2>, ArrayBase<D2, Ix1>>,
    test_ratio: f64,
    seed: u64,
) -> (DenseDataset<F>, DenseDataset<F>)
where
    F: Float,
    D1: Data<Elem = F>,
    D2: Data<Elem = F>,
{
    let n_samples = dataset.n_samples();
    let n_test = ((n_samples as f64) * test_ratio.clamp(0., 1.)).ceil() as usize;
    let n_test = n_test.min(n_samples);

    let mut indices: Vec<usize> = (0..n_samples).collect();
    let mut rng = SmallRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let (test_idx, train_idx) = indices.split_at(n_test);

    let X = dataset.design_matrix();
    let y = dataset.targets();
    let train = DatasetBase::new(X.select(Axis(0), train_idx), y.select(Axis(0), train_idx));
    let test = DatasetBase::new(X.select(Axis(0), test_idx), y.select(Axis(0), test_idx));
    (train, test)
}
