use ndarray::Array1;

use crate::datafits::Datafit;
use crate::datasets::{DatasetBase, DesignMatrix, Targets};
use crate::helpers::helpers::{all_close, sigmoid};
use crate::Float;

#[cfg(test)]
mod tests;

/// Progress is reported every `LOG_EVERY` iterations.
pub const LOG_EVERY: usize = 100;

/// The outcome of a gradient descent run.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientDescentOutput<F> {
    /// The final weight vector, intercept first.
    pub weights: Array1<F>,
    /// One loss value per completed iteration, in iteration order.
    pub losses: Vec<F>,
    /// Number of completed iterations.
    pub n_iterations: usize,
    /// Whether the loop stopped on the tolerance criterion rather than on the
    /// iteration cap.
    pub converged: bool,
}

/// Batch gradient descent.
///
/// The design matrix of `dataset` must already carry the bias column. Every
/// iteration computes the probabilities of the current iterate, records the
/// loss, and takes a step of size `learning_rate` against the full gradient.
/// The loop stops when the candidate weights are close to the current ones
/// (see [`all_close`]) or after `max_iterations` iterations.
///
/// When the stopping criterion fires, `commit_converged_update` decides
/// whether the candidate weights are kept or discarded in favour of the
/// previous iterate.
#[allow(clippy::too_many_arguments)]
pub fn gradient_descent<F, DM, T, DF>(
    dataset: &DatasetBase<DM, T>,
    datafit: &DF,
    w0: Array1<F>,
    learning_rate: F,
    max_iterations: usize,
    tolerance: F,
    commit_converged_update: bool,
    verbose: bool,
) -> GradientDescentOutput<F>
where
    F: Float,
    DM: DesignMatrix<Elem = F>,
    T: Targets<Elem = F>,
    DF: Datafit<F, DM, T>,
{
    let level = if verbose {
        log::Level::Info
    } else {
        log::Level::Debug
    };

    let X = dataset.design_matrix();
    let mut w = w0;
    let mut losses = Vec::with_capacity(max_iterations);
    let mut converged = false;

    for iter in 0..max_iterations {
        let Xw = X.compute_fit(w.view());
        let proba = Xw.mapv(sigmoid);

        let loss = datafit.value(dataset, proba.view());
        losses.push(loss);

        let grad = datafit.full_grad(dataset, proba.view());
        let w_new = &w - &(grad * learning_rate);

        if all_close(w.view(), w_new.view(), tolerance) {
            if commit_converged_update {
                w = w_new;
            }
            converged = true;
            log::log!(level, "Convergence reached at iteration {}", iter);
            break;
        }

        w = w_new;

        if iter % LOG_EVERY == 0 {
            log::log!(level, "Iteration {}: loss = {:.6}", iter, loss);
        }
    }

    if !converged {
        log::warn!(
            "Gradient descent did not converge after {} iterations (tolerance {})",
            max_iterations,
            tolerance
        );
    }

    GradientDescentOutput {
        weights: w,
        n_iterations: losses.len(),
        losses,
        converged,
    }
}
