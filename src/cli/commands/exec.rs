use crate::cli::commands::resolve_options;
use crate::cli::parser::{Cli, Commands};
use crate::engine::SqliteEngine;
use crate::errors::{AppError, AppResult};
use crate::gate::{AutoCommitGate, DebouncedTransactionGate, GateStats};
use crate::ui::messages::info;
use crate::utils::output::{OutputFormat, render};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Handle the `exec` command
///
/// Writes are committed when input pauses for the auto-commit delay and once
/// more when input ends.
pub fn handle(cli: &Cli) -> AppResult<()> {
    if let Commands::Exec {
        file,
        format,
        stats,
    } = &cli.command
    {
        let options = resolve_options(cli)?;
        let gate = DebouncedTransactionGate::sqlite(options);
        if !gate.is_loaded() {
            return Err(AppError::Config("database could not be opened".into()));
        }
        let mut gate = AutoCommitGate::spawn(gate)?;

        let reader = open_input(file.as_deref())?;
        run_statements(&gate, reader, *format)?;

        gate.close()?;

        if *stats {
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&gate.stats())?),
                _ => print_stats(&gate.stats()),
            }
        }
    }

    Ok(())
}

fn open_input(file: Option<&Path>) -> AppResult<Box<dyn BufRead>> {
    match file {
        Some(path) if path != Path::new("-") => Ok(Box::new(BufReader::new(File::open(path)?))),
        _ => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

/// One statement per line. Blank lines and `--` comment lines are skipped.
fn run_statements(
    gate: &AutoCommitGate<SqliteEngine>,
    reader: Box<dyn BufRead>,
    format: OutputFormat,
) -> AppResult<()> {
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("--") {
            continue;
        }

        if let Some(rows) = gate.execute(line.trim_end())? {
            print!("{}", render(&rows, format)?);
        }
    }
    Ok(())
}

fn print_stats(stats: &GateStats) {
    info(format!("reads:                  {}", stats.reads));
    info(format!("writes:                 {}", stats.writes));
    info(format!("transactions committed: {}", stats.transactions_committed));
    info(format!("statements committed:   {}", stats.statements_committed));
    info(format!("rollbacks:              {}", stats.rollbacks));
}
