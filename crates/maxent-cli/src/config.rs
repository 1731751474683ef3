use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use maxent::config::GradientDescentConfig;

/// Everything needed for one training run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrainConfig {
    /// Corpus JSON. Standard input when absent.
    pub input: Option<PathBuf>,
    /// Learned weights JSON. Standard output when absent.
    pub output: Option<PathBuf>,
    pub optimizer: GradientDescentConfig,
}

/// Load a training configuration from a JSON file.
pub fn load_train_config<P: AsRef<Path>>(path: P) -> Result<TrainConfig> {
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: TrainConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

impl TrainConfig {
    /// Start from the `--config` file (or defaults) and apply command-line overrides.
    pub fn from_arguments(matches: &ArgMatches) -> Result<Self> {
        let mut config = match matches.get_one::<PathBuf>("config") {
            Some(path) => {
                log::info!("[maxent] Using config: {:?}", path);
                load_train_config(path)?
            }
            None => TrainConfig::default(),
        };

        if let Some(input) = matches.get_one::<PathBuf>("input") {
            config.input = Some(input.clone());
        }
        if let Some(output) = matches.get_one::<PathBuf>("output") {
            config.output = Some(output.clone());
        }
        if let Some(reserved) = matches.get_one::<String>("reserved") {
            log::warn!(
                "[maxent] Ignoring third positional argument {:?}; use --threads to set the worker count",
                reserved
            );
        }

        let optimizer = &mut config.optimizer;
        if let Some(&learning_rate) = matches.get_one::<f64>("learning_rate") {
            optimizer.learning_rate = learning_rate;
        }
        if let Some(&threshold) = matches.get_one::<f64>("threshold") {
            optimizer.threshold = threshold;
        }
        if let Some(&max_iter) = matches.get_one::<i64>("max_iter") {
            optimizer.max_iter = GradientDescentConfig::max_iter_from_signed(max_iter);
        }
        if let Some(&threads) = matches.get_one::<usize>("threads") {
            optimizer.threads = threads;
        }

        optimizer.validate()?;
        Ok(config)
    }
}
