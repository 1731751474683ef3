use anyhow::Result;
use log::LevelFilter;

use maxent_cli::cli::build_cli;
use maxent_cli::config::TrainConfig;
use maxent_cli::train::{run_training, write_weights};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("MAXENT_LOG", "error,maxent=info"))
        .init();

    let matches = build_cli().get_matches();

    let config = match TrainConfig::from_arguments(&matches) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {:#}", e);
            std::process::exit(1)
        }
    };

    if matches.get_flag("print_config") {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let weights = match run_training(&config) {
        Ok(weights) => weights,
        Err(e) => {
            log::error!("Training failed: {:#}", e);
            std::process::exit(1)
        }
    };

    if let Err(e) = write_weights(&config, &weights) {
        log::error!("Writing weights failed: {:#}", e);
        std::process::exit(1)
    }

    log::info!("[maxent] Wrote {} feature weights", weights.len());
    Ok(())
}
