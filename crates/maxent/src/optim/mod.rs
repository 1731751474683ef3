//! Generic first-order optimization.
pub mod gradient_descent;

pub use gradient_descent::{GradientDescent, Minimization};

use crate::parallel::WorkerPool;

/// A differentiable function of an n-dimensional point.
///
/// `grad` may use the optimizer's worker pool to split its work; it receives
/// the whole of `x` read-only and must fill every component of `out`.
pub trait Objective {
    /// Value at `x`. Only used for reporting.
    fn value(&self, x: &[f64]) -> f64;

    /// Write ∇f(x) into `out`, which has the same length as `x`.
    fn grad(&mut self, x: &[f64], out: &mut [f64], pool: &WorkerPool);
}
