//! Table rendering for SELECT results.

use crate::engine::Rows;
use crate::engine::rows::cell_to_string;
use crate::utils::colors::{RESET, color_for_cell};
use rusqlite::types::Value;

const NULL: &str = "NULL";

pub struct Column {
    pub header: String,
    pub width: usize,
}

pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<(String, bool)>>,
}

impl Table {
    /// Column widths fit the longest header or cell.
    pub fn from_rows(result: &Rows) -> Self {
        let mut columns: Vec<Column> = result
            .columns
            .iter()
            .map(|h| Column {
                header: h.clone(),
                width: h.chars().count(),
            })
            .collect();

        let rows: Vec<Vec<(String, bool)>> = result
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Value::Null => (NULL.to_string(), true),
                        other => (cell_to_string(other), false),
                    })
                    .collect()
            })
            .collect();

        for row in &rows {
            for (col, (text, _)) in columns.iter_mut().zip(row) {
                col.width = col.width.max(text.chars().count());
            }
        }

        Self { columns, rows }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        // Header
        for col in &self.columns {
            out.push_str(&format!("{:<width$} ", col.header, width = col.width));
        }
        out.push('\n');

        // Rows
        for row in &self.rows {
            for (col, (text, is_null)) in self.columns.iter().zip(row) {
                out.push_str(&format!(
                    "{}{:<width$}{} ",
                    color_for_cell(*is_null),
                    text,
                    RESET,
                    width = col.width
                ));
            }
            out.push('\n');
        }

        out
    }
}
