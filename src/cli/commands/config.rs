use crate::cli::commands::resolve_options;
use crate::cli::parser::Cli;
use crate::errors::AppResult;

const MASK: &str = "********";

/// Handle the `config` command
pub fn handle(cli: &Cli) -> AppResult<()> {
    let mut options = resolve_options(cli)?;
    if options.password.is_some() {
        options.password = Some(MASK.to_string());
    }
    print!("{}", options.to_yaml()?);
    Ok(())
}
