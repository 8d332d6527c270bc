use crate::utils::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for autotx
/// Feeds SQL statements through a debounced auto-commit transaction gate
#[derive(Parser)]
#[command(
    name = "autotx",
    version = env!("CARGO_PKG_VERSION"),
    about = "Run SQL statements against SQLite, batching writes into auto-committed transactions",
    long_about = None
)]
pub struct Cli {
    /// Database name or path (overrides the config file)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// YAML file with gate options
    #[arg(global = true, long = "config")]
    pub config: Option<PathBuf>,

    /// Idle delay in milliseconds before pending writes are committed
    #[arg(global = true, long = "delay-ms")]
    pub delay_ms: Option<u64>,

    /// Run every statement standalone, without BEGIN/COMMIT wrapping
    #[arg(global = true, long = "no-transactions")]
    pub no_transactions: bool,

    /// Open the database as an encrypted database
    #[arg(global = true, long = "encrypted")]
    pub encrypted: bool,

    /// Password for an encrypted database
    #[arg(global = true, long = "password")]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute statements, one per line, from a file or stdin
    Exec {
        /// File with statements ("-" or absent reads stdin)
        file: Option<PathBuf>,

        #[arg(
            long = "format",
            value_enum,
            default_value_t = OutputFormat::Table,
            help = "Output format for SELECT results"
        )]
        format: OutputFormat,

        #[arg(long = "stats", help = "Print gate counters when done")]
        stats: bool,
    },

    /// Delete the database file
    Remove,

    /// Print the effective gate options as YAML
    Config,
}
