//! Helpers behind the `maxent` command-line trainer.
pub mod cli;
pub mod config;
pub mod train;
