//! autotx library root.
//!
//! Wraps bursts of write statements in one transaction and commits it after a
//! short idle delay. SELECT statements pass straight through.

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod gate;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use errors::AppResult;

pub use config::GateOptions;
pub use engine::{Engine, Rows, SqliteEngine};
pub use errors::AppError;
pub use gate::{AutoCommitGate, DebouncedTransactionGate, is_read};

/// Central command dispatcher
pub fn dispatch(cli: &Cli) -> AppResult<()> {
    match &cli.command {
        Commands::Exec { .. } => cli::commands::exec::handle(cli),
        Commands::Remove => cli::commands::remove::handle(cli),
        Commands::Config => cli::commands::config::handle(cli),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();
    dispatch(&cli)
}
