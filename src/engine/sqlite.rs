//! rusqlite-backed engine.

use crate::engine::{Engine, Rows};
use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use rusqlite::{Connection, OptionalExtension};
use rusqlite::types::Value;
use std::fs;
use std::io;
use std::path::PathBuf;

const MEMORY: &str = ":memory:";

/// Side files SQLite may leave next to the main database file.
const SIDE_SUFFIXES: [&str; 3] = ["-journal", "-wal", "-shm"];

pub struct SqliteHandle {
    pub conn: Connection,
    /// None for in-memory databases.
    path: Option<PathBuf>,
}

impl SqliteHandle {
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteEngine;

impl SqliteEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Engine for SqliteEngine {
    type Handle = SqliteHandle;

    fn open(&self, name: &str) -> AppResult<SqliteHandle> {
        if name == MEMORY {
            let conn = Connection::open_in_memory()?;
            return Ok(SqliteHandle { conn, path: None });
        }
        let path = expand_tilde(name);
        let conn = Connection::open(&path)?;
        Ok(SqliteHandle {
            conn,
            path: Some(path),
        })
    }

    fn open_encrypted(&self, name: &str, password: &str) -> AppResult<SqliteHandle> {
        let handle = self.open(name)?;
        handle.conn.pragma_update(None, "key", password)?;
        // Plain SQLite ignores `PRAGMA key` and would store everything in clear.
        let cipher: Option<String> = handle
            .conn
            .query_row("PRAGMA cipher_version", [], |row| row.get(0))
            .optional()?;
        if cipher.is_none() {
            return Err(AppError::Engine(
                "encryption not supported by this build".into(),
            ));
        }
        // A wrong key only shows up on the first read; surface it at open time.
        handle
            .conn
            .query_row("SELECT count(*) FROM sqlite_master", [], |_| Ok(()))?;
        Ok(handle)
    }

    fn query(&self, handle: &mut SqliteHandle, sql: &str) -> AppResult<Rows> {
        let mut stmt = handle.conn.prepare(sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let width = columns.len();

        let mut out = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(width);
            for i in 0..width {
                cells.push(row.get::<_, Value>(i)?);
            }
            out.push(cells);
        }

        Ok(Rows::new(columns, out))
    }

    fn execute(&self, handle: &mut SqliteHandle, sql: &str) -> AppResult<()> {
        handle.conn.execute_batch(sql)?;
        Ok(())
    }

    fn close(&self, handle: SqliteHandle) -> AppResult<()> {
        handle.conn.close().map_err(|(_, e)| AppError::Db(e))
    }

    fn remove(&self, handle: &SqliteHandle) -> AppResult<()> {
        let Some(path) = &handle.path else {
            return Ok(());
        };

        remove_if_exists(path.clone())?;
        for suffix in SIDE_SUFFIXES {
            let mut side = path.clone().into_os_string();
            side.push(suffix);
            remove_if_exists(PathBuf::from(side))?;
        }
        Ok(())
    }
}

fn remove_if_exists(path: PathBuf) -> io::Result<()> {
    match fs::remove_file(&path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
