//! Printing of SELECT results in the formats the CLI offers.

use crate::engine::Rows;
use crate::engine::rows::cell_to_string;
use crate::errors::{AppError, AppResult};
use crate::utils::table::Table;
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

pub fn render(rows: &Rows, format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Table => Ok(Table::from_rows(rows).render()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&rows.to_json())?),
        OutputFormat::Csv => render_csv(rows),
    }
}

fn render_csv(rows: &Rows) -> AppResult<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(&rows.columns)?;
    for row in &rows.rows {
        wtr.write_record(row.iter().map(cell_to_string))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Other(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
