//! Result set returned for SELECT statements.

use rusqlite::types::Value;
use serde_json::{Map, Number, Value as JsonValue};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Rows {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell lookup by row index and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(idx)
    }

    /// One JSON object per row, keyed by column name.
    pub fn to_json(&self) -> JsonValue {
        let items = self
            .rows
            .iter()
            .map(|row| {
                let mut obj = Map::new();
                for (col, cell) in self.columns.iter().zip(row) {
                    obj.insert(col.clone(), cell_to_json(cell));
                }
                JsonValue::Object(obj)
            })
            .collect();
        JsonValue::Array(items)
    }
}

fn cell_to_json(cell: &Value) -> JsonValue {
    match cell {
        Value::Null => JsonValue::Null,
        Value::Integer(i) => JsonValue::Number((*i).into()),
        // NaN and infinities have no JSON form
        Value::Real(f) => Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
        Value::Text(s) => JsonValue::String(s.clone()),
        Value::Blob(b) => JsonValue::String(hex(b)),
    }
}

/// Text form of a cell, as printed in tables and CSV. NULL becomes "".
pub fn cell_to_string(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::Integer(i) => i.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Text(s) => s.clone(),
        Value::Blob(b) => hex(b),
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
