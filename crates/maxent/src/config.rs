use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Settings for one batch gradient descent run.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GradientDescentConfig {
    /// Step size η applied to every gradient component.
    pub learning_rate: f64,
    /// Convergence is declared once every |∂f/∂x_i| is below this value.
    pub threshold: f64,
    /// Upper bound on iterations. `None` runs until convergence.
    pub max_iter: Option<usize>,
    /// Number of workers in the pool shared by the optimizer and objective.
    pub threads: usize,
    /// Emit a debug progress line every this many iterations (0 disables).
    pub log_every: usize,
}

impl GradientDescentConfig {
    pub fn new(learning_rate: f64, threshold: f64, max_iter: Option<usize>, threads: usize) -> Self {
        Self {
            learning_rate,
            threshold,
            max_iter,
            threads,
            ..Self::default()
        }
    }

    /// Map a signed iteration cap onto `max_iter`; any negative value means no cap.
    pub fn max_iter_from_signed(max_iter: i64) -> Option<usize> {
        usize::try_from(max_iter).ok()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ConfigError::LearningRate(self.learning_rate));
        }
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(ConfigError::Threshold(self.threshold));
        }
        if self.threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        Ok(())
    }
}

impl Default for GradientDescentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            threshold: 0.01,
            max_iter: None,
            threads: default_threads(),
            log_every: 100,
        }
    }
}

/// Host CPU count, falling back to a single worker when it cannot be queried.
pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_cap_means_unbounded() {
        assert_eq!(GradientDescentConfig::max_iter_from_signed(-1), None);
        assert_eq!(GradientDescentConfig::max_iter_from_signed(0), Some(0));
        assert_eq!(GradientDescentConfig::max_iter_from_signed(250), Some(250));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut cfg = GradientDescentConfig::new(0.1, 0.01, None, 1);
        assert!(cfg.validate().is_ok());

        cfg.learning_rate = 0.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::LearningRate(_))));

        cfg.learning_rate = 0.1;
        cfg.threshold = f64::NAN;
        assert!(matches!(cfg.validate(), Err(ConfigError::Threshold(_))));

        cfg.threshold = 0.01;
        cfg.threads = 0;
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroThreads)));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: GradientDescentConfig =
            serde_json::from_str(r#"{"learning_rate": 0.5, "max_iter": 20}"#).unwrap();
        assert_eq!(cfg.learning_rate, 0.5);
        assert_eq!(cfg.max_iter, Some(20));
        assert_eq!(cfg.threshold, 0.01);
        assert!(cfg.threads >= 1);
    }
}
