use crate::cli::commands::resolve_options;
use crate::cli::parser::Cli;
use crate::errors::{AppError, AppResult};
use crate::gate::DebouncedTransactionGate;
use crate::ui::messages::success;

/// Handle the `remove` command
pub fn handle(cli: &Cli) -> AppResult<()> {
    let options = resolve_options(cli)?;
    let mut gate = DebouncedTransactionGate::sqlite(options);
    if !gate.is_loaded() {
        return Err(AppError::Config("database could not be opened".into()));
    }

    gate.remove()?;
    gate.close()?;
    success("Database removed.");
    Ok(())
}
