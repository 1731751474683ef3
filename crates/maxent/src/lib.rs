//! maxent: maximum-entropy (multinomial log-linear) text classification.
//!
//! Training minimizes the negative conditional log-likelihood of a labeled
//! corpus by batch gradient descent. The two numeric engines are the generic
//! optimizer in [`optim`] and the [`loglik`] objective, whose gradient is
//! assembled in parallel from a precomputed inverted index.
//!
//! Both engines share one [`parallel::WorkerPool`]; every parallel write is
//! partitioned into disjoint contiguous ranges so no locking is required.
pub mod config;
pub mod corpus;
pub mod error;
pub mod loglik;
pub mod math;
pub mod optim;
pub mod parallel;
pub mod weights;
