use crate::config::GradientDescentConfig;
use crate::error::ConfigError;
use crate::math::NdVector;
use crate::optim::Objective;
use crate::parallel::WorkerPool;

/// Batch gradient descent: `x ← x − η·∇f(x)` until every gradient component
/// is below the threshold or the iteration cap is reached.
#[derive(Debug, Clone)]
pub struct GradientDescent {
    config: GradientDescentConfig,
}

/// Outcome of a [`GradientDescent::minimize`] run.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimization {
    pub x: NdVector,
    pub iterations: usize,
    /// False when the loop stopped on the iteration cap.
    pub converged: bool,
}

impl GradientDescent {
    pub fn new(config: GradientDescentConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GradientDescentConfig {
        &self.config
    }

    /// Minimize `f` starting from `x0`, returning the final point.
    pub fn optimize<F>(&self, f: &mut F, x0: NdVector) -> Result<NdVector, ConfigError>
    where
        F: Objective + ?Sized,
    {
        Ok(self.minimize(f, x0)?.x)
    }

    /// Minimize `f` on a worker pool of `config.threads` workers scoped to this call.
    pub fn minimize<F>(&self, f: &mut F, x0: NdVector) -> Result<Minimization, ConfigError>
    where
        F: Objective + ?Sized,
    {
        let pool = WorkerPool::new(self.config.threads)?;
        Ok(self.minimize_with_pool(f, x0, &pool))
    }

    /// Minimize `f` on a caller-provided pool. The same pool is handed to `f.grad`.
    pub fn minimize_with_pool<F>(&self, f: &mut F, x0: NdVector, pool: &WorkerPool) -> Minimization
    where
        F: Objective + ?Sized,
    {
        let eta = self.config.learning_rate;
        let tau = self.config.threshold;
        let max_iter = self.config.max_iter;

        let mut x = x0;
        let mut fp = NdVector::zeros(x.len());
        let mut iterations = 0usize;
        let mut converged = false;

        while !converged && max_iter.map_or(true, |m| iterations < m) {
            f.grad(x.as_slice(), fp.as_mut_slice(), pool);

            let grad = fp.as_slice();
            // Each block reports its own AND; the reduction happens after the barrier.
            let block_converged = pool.map_blocks(x.as_mut_slice(), |start, block| {
                let end = start + block.len();
                let mut ok = true;
                for (xi, gi) in block.iter_mut().zip(&grad[start..end]) {
                    *xi -= eta * gi;
                    ok &= gi.abs() < tau;
                }
                ok
            });
            converged = block_converged.into_iter().all(|ok| ok);
            iterations += 1;

            if self.config.log_every > 0
                && iterations % self.config.log_every == 0
                && log::log_enabled!(log::Level::Debug)
            {
                log::debug!(
                    "Iteration {}: max |gradient| = {:.6e}",
                    iterations,
                    fp.max_abs()
                );
            }
        }

        if converged {
            log::info!("Gradient descent converged after {} iterations", iterations);
        } else {
            log::info!(
                "Gradient descent stopped at the iteration cap ({} iterations)",
                iterations
            );
        }

        Minimization {
            x,
            iterations,
            converged,
        }
    }
}
