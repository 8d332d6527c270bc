//! Debounced transaction gate.
//!
//! Write statements are wrapped in a single transaction that is committed
//! once no write has arrived for the auto-commit delay. SELECT statements go
//! straight to the engine and never touch the transaction.

pub mod clock;
pub mod session;
pub mod worker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use session::{GateStats, Session};
pub use worker::AutoCommitGate;

use crate::config::GateOptions;
use crate::engine::{Engine, Rows, SqliteEngine};
use crate::errors::AppResult;
use crate::ui::diagnostics::{ConsoleDiagnostics, Diagnostics};
use std::time::Instant;

pub const BEGIN: &str = "BEGIN TRANSACTION;";
pub const COMMIT: &str = "COMMIT;";
pub const ROLLBACK: &str = "ROLLBACK;";

const PREFIX: &str = "autotx: ";

/// True when the statement is a read.
///
/// Literal prefix test on the lowercased text: leading whitespace or
/// comments make a SELECT count as a write.
pub fn is_read(sql: &str) -> bool {
    sql.to_lowercase().starts_with("select")
}

pub struct DebouncedTransactionGate<E: Engine> {
    engine: E,
    handle: Option<E::Handle>,
    session: Session,
    options: GateOptions,
    diagnostics: Box<dyn Diagnostics + Send>,
    clock: Box<dyn Clock + Send>,
    stats: GateStats,
}

impl DebouncedTransactionGate<SqliteEngine> {
    /// SQLite gate reporting to the console.
    pub fn sqlite(options: GateOptions) -> Self {
        Self::new(SqliteEngine::new(), options, Box::new(ConsoleDiagnostics))
    }
}

impl<E: Engine> DebouncedTransactionGate<E> {
    /// Build the gate and open the database right away.
    pub fn new(engine: E, options: GateOptions, diagnostics: Box<dyn Diagnostics + Send>) -> Self {
        Self::with_clock(engine, options, diagnostics, Box::new(SystemClock))
    }

    pub fn with_clock(
        engine: E,
        options: GateOptions,
        diagnostics: Box<dyn Diagnostics + Send>,
        clock: Box<dyn Clock + Send>,
    ) -> Self {
        let mut gate = Self {
            engine,
            handle: None,
            session: Session::Closed,
            options: options.with_defaults(),
            diagnostics,
            clock,
            stats: GateStats::default(),
        };
        if gate.configure() {
            gate.open();
        }
        gate
    }

    /// Check the options carry a database name, logging when they don't.
    pub fn configure(&mut self) -> bool {
        if self.options.database().is_none() {
            self.log_error("No database name provided");
            return false;
        }
        true
    }

    /// Open the engine described by the options.
    ///
    /// Misconfiguration or an engine failure is logged and leaves the gate
    /// without a database; later calls then degrade to no-ops. Opening an
    /// already loaded gate does nothing.
    pub fn open(&mut self) {
        if self.handle.is_some() {
            return;
        }

        let Some(name) = self.options.database().map(str::to_owned) else {
            self.configure();
            return;
        };
        if let Err(problem) = self.options.validate() {
            self.log_error(problem);
            return;
        }

        let opened = match (&self.options.password, self.options.encrypted) {
            (Some(password), true) => self.engine.open_encrypted(&name, password),
            _ => self.engine.open(&name),
        };

        match opened {
            Ok(handle) => self.handle = Some(handle),
            Err(e) => self.log_error(&format!("cannot open database {}: {}", name, e)),
        }
    }

    /// Run one statement.
    ///
    /// Reads return their rows. Writes return `None`, open the transaction if
    /// needed and push the deferred commit back by the auto-commit delay.
    /// Engine errors are returned unchanged.
    pub fn execute(&mut self, sql: &str) -> AppResult<Option<Rows>> {
        let Some(handle) = self.handle.as_mut() else {
            self.log_error(&format!("CANNOT EXECUTE; NO DATABASE LOADED; {}", sql));
            return Ok(None);
        };

        if is_read(sql) {
            let rows = self.engine.query(handle, sql)?;
            self.stats.reads += 1;
            return Ok(Some(rows));
        }

        if !self.options.transactions_enabled() {
            self.engine.execute(handle, sql)?;
            self.stats.writes += 1;
            return Ok(None);
        }

        let began = if self.session.is_open() {
            false
        } else {
            self.engine.execute(handle, BEGIN)?;
            true
        };

        let commit_at = self.clock.now() + self.options.autocommit_delay();
        match self.engine.execute(handle, sql) {
            Ok(()) => {
                self.session.record_write(commit_at);
                self.stats.writes += 1;
                Ok(None)
            }
            Err(e) if began => {
                // Nothing but the failed write was in this transaction.
                if let Err(rb) = self.engine.execute(handle, ROLLBACK) {
                    self.log_error(&format!("rollback of empty transaction failed: {}", rb));
                }
                self.session = Session::Closed;
                Err(e)
            }
            Err(e) => {
                self.session.rearm(commit_at);
                Err(e)
            }
        }
    }

    /// Commit the open transaction. No-op when nothing is pending.
    pub fn commit(&mut self) -> AppResult<()> {
        let pending = self.session.pending();
        if !self.finish_ready() {
            return Ok(());
        }
        self.log_info(&format!("committing transaction with {} queries", pending));
        self.finish(COMMIT)?;
        self.stats.transactions_committed += 1;
        self.stats.statements_committed += pending as u64;
        Ok(())
    }

    /// Roll back the open transaction. No-op when nothing is pending.
    pub fn rollback(&mut self) -> AppResult<()> {
        if !self.finish_ready() {
            return Ok(());
        }
        self.finish(ROLLBACK)?;
        self.stats.rollbacks += 1;
        Ok(())
    }

    /// Flush pending writes, then release the engine handle.
    ///
    /// The handle is released even when the flush fails; the flush error is
    /// returned in that case.
    pub fn close(&mut self) -> AppResult<()> {
        let flushed = self.commit();
        self.reset();
        let closed = match self.handle.take() {
            Some(handle) => self.engine.close(handle),
            None => Ok(()),
        };
        flushed.and(closed)
    }

    /// Delete the backing store. The handle is not closed first.
    pub fn remove(&mut self) -> AppResult<()> {
        let Some(handle) = self.handle.as_ref() else {
            self.log_error("CANNOT REMOVE; NO DATABASE LOADED");
            return Ok(());
        };
        self.engine.remove(handle)?;
        let name = self.options.database().unwrap_or_default().to_owned();
        self.log_info(&format!("Database {} has been removed.", name));
        self.reset();
        Ok(())
    }

    /// Fire the deferred commit if its deadline has passed.
    ///
    /// Returns whether a commit was issued. A failed commit is not retried:
    /// the session is already back to `Closed` and the error is returned.
    pub fn tick(&mut self) -> AppResult<bool> {
        if !self.session.is_due(self.clock.now()) {
            return Ok(false);
        }
        self.commit()?;
        Ok(true)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.session.commit_at()
    }

    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn is_loaded(&self) -> bool {
        self.handle.is_some()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }

    pub fn pending(&self) -> usize {
        self.session.pending()
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn options(&self) -> &GateOptions {
        &self.options
    }

    pub fn stats(&self) -> GateStats {
        self.stats
    }

    pub fn handle(&self) -> Option<&E::Handle> {
        self.handle.as_ref()
    }

    pub(crate) fn log_error(&self, msg: &str) {
        self.diagnostics.error(&format!("{}{}", PREFIX, msg));
    }

    fn log_info(&self, msg: &str) {
        self.diagnostics.info(&format!("{}{}", PREFIX, msg));
    }

    fn finish_ready(&self) -> bool {
        self.handle.is_some()
            && self.options.transactions_enabled()
            && self.session.pending() > 0
    }

    /// Issue COMMIT or ROLLBACK. The session ends whatever the engine says,
    /// so a failed statement is reported once and never retried.
    fn finish(&mut self, stmt: &str) -> AppResult<()> {
        let outcome = match self.handle.as_mut() {
            Some(handle) => self.engine.execute(handle, stmt),
            None => Ok(()),
        };
        self.reset();
        outcome
    }

    fn reset(&mut self) {
        self.session = Session::Closed;
    }
}

impl<E: Engine> Drop for DebouncedTransactionGate<E> {
    /// Pending writes are committed rather than lost with the connection.
    fn drop(&mut self) {
        if let Err(e) = self.commit() {
            self.log_error(&format!("commit on drop failed: {}", e));
        }
    }
}
