use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};

use maxent::corpus::Corpus;
use maxent::loglik::ConditionalLogLikelihood;
use maxent::math::NdVector;
use maxent::optim::{GradientDescent, Objective};
use maxent::weights::FeatureWeights;

use crate::config::TrainConfig;

/// Read the corpus, fit the weights from an all-zeros start, and return them
/// keyed by feature name. The final log-likelihood goes to standard error.
pub fn run_training(config: &TrainConfig) -> Result<FeatureWeights> {
    let corpus = match &config.input {
        Some(path) => Corpus::from_path(path)
            .with_context(|| format!("Failed to load corpus: {}", path.display()))?,
        None => Corpus::from_reader(io::stdin().lock())
            .context("Failed to load corpus from standard input")?,
    };

    let mut objective = ConditionalLogLikelihood::new(corpus);
    objective.set_threads(config.optimizer.threads);

    let optimizer = GradientDescent::new(config.optimizer.clone())?;
    log::info!(
        "[maxent] Training {} features on {} threads (learning rate {}, threshold {})",
        objective.dim(),
        config.optimizer.threads,
        config.optimizer.learning_rate,
        config.optimizer.threshold
    );
    let x0 = NdVector::zeros(objective.dim());
    let result = optimizer.minimize(&mut objective, x0)?;

    eprintln!("Loglikelihood: {}", objective.value(&result.x));

    Ok(FeatureWeights::new(objective.feature_map(), &result.x)?)
}

/// Write the weights to the configured output file, or standard output.
pub fn write_weights(config: &TrainConfig, weights: &FeatureWeights) -> Result<()> {
    match &config.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output: {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            weights.write_json(&mut writer)?;
            writer
                .flush()
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            weights.write_json(&mut writer)?;
            writer.flush().context("Failed to write to standard output")?;
        }
    }
    Ok(())
}
