//! Dense numeric buffers used by the optimizer and the objective.
//!
//! `NdVector` is the parameter/gradient vector; `ProbabilityMatrix` caches
//! P(c | d; x) for every (class, document) pair under the flat key
//! `class * num_docs + doc`.
pub mod matrix;
pub mod vector;

pub use matrix::{DocBlockMut, ProbabilityMatrix};
pub use vector::NdVector;
