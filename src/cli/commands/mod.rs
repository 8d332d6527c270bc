pub mod config;
pub mod exec;
pub mod remove;

use crate::cli::parser::Cli;
use crate::config::GateOptions;
use crate::errors::AppResult;

/// Gate options from the config file (if any) with command-line overrides.
pub fn resolve_options(cli: &Cli) -> AppResult<GateOptions> {
    let mut options = match &cli.config {
        Some(path) => GateOptions::from_yaml_file(path)?,
        None => GateOptions::default(),
    };

    if let Some(db) = &cli.db {
        options.database_name = Some(db.clone());
    }
    if let Some(ms) = cli.delay_ms {
        options.autocommit_delay_ms = ms;
    }
    if cli.no_transactions {
        options.no_transactions = true;
    }
    if cli.encrypted {
        options.encrypted = true;
    }
    if let Some(password) = &cli.password {
        options.password = Some(password.clone());
    }

    Ok(options)
}
