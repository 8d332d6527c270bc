//! Engine capability consumed by the gate.
//!
//! The gate only ever talks to an engine through this trait, so the state
//! machine can be driven by a fake in tests and by SQLite in the binary.

pub mod rows;
pub mod sqlite;

pub use rows::Rows;
pub use sqlite::{SqliteEngine, SqliteHandle};

use crate::errors::AppResult;

pub trait Engine {
    /// An open connection.
    type Handle;

    fn open(&self, name: &str) -> AppResult<Self::Handle>;

    /// Open an encrypted database and apply the password before any other use.
    fn open_encrypted(&self, name: &str, password: &str) -> AppResult<Self::Handle>;

    /// Run a statement that produces rows.
    fn query(&self, handle: &mut Self::Handle, sql: &str) -> AppResult<Rows>;

    /// Run a statement for its side effects only.
    fn execute(&self, handle: &mut Self::Handle, sql: &str) -> AppResult<()>;

    fn close(&self, handle: Self::Handle) -> AppResult<()>;

    /// Delete the backing store. The handle is left as is.
    fn remove(&self, handle: &Self::Handle) -> AppResult<()>;
}
