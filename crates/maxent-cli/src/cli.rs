use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, ValueHint};

/// Argument definitions for the `maxent` binary.
pub fn build_cli() -> Command {
    Command::new("maxent")
        .version(clap::crate_version!())
        .about("Train a maximum-entropy text classifier by parallel batch gradient descent")
        .long_about(
            "Reads a JSON array of labeled documents (one key per class mapping to feature \
             names, plus \"__label__\" naming the gold class) and writes a JSON object mapping \
             every feature name to its learned weight. Without positional arguments the corpus \
             is read from standard input and the weights are written to standard output.",
        )
        .arg(
            Arg::new("input")
                .help("Path to the training corpus (JSON)")
                .index(1)
                .requires("output")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("output")
                .help("Path that the learned weights (JSON) will be written to")
                .index(2)
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("reserved")
                .index(3)
                .hide(true)
                .value_parser(clap::builder::NonEmptyStringValueParser::new()),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to a JSON training configuration file")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("learning_rate")
                .long("learning-rate")
                .help("Gradient descent step size. Overrides the configuration file.")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("threshold")
                .long("threshold")
                .help(
                    "Stop once every gradient component is below this value. \
                     Overrides the configuration file.",
                )
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("max_iter")
                .long("max-iter")
                .help("Iteration cap; a negative value means no cap. Overrides the configuration file.")
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .help("Number of worker threads. Defaults to the host CPU count.")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("print_config")
                .long("print-config")
                .help("Print the effective configuration as JSON and exit")
                .action(ArgAction::SetTrue),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn input_without_output_is_rejected() {
        assert!(build_cli().try_get_matches_from(["maxent", "in.json"]).is_err());
        assert!(build_cli()
            .try_get_matches_from(["maxent", "in.json", "out.json"])
            .is_ok());
    }
}
