#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use autotx::config::GateOptions;
use autotx::engine::{Engine, Rows};
use autotx::errors::{AppError, AppResult};
use autotx::gate::{DebouncedTransactionGate, ManualClock};
use autotx::ui::Diagnostics;
use rusqlite::types::Value;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub fn autotx() -> Command {
    cargo_bin_cmd!("autotx")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_autotx.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Write a statements file next to the test DB
pub fn temp_script(name: &str, lines: &[&str]) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_autotx.sql", name));
    fs::write(&path, lines.join("\n")).expect("write script");
    path.to_string_lossy().to_string()
}

/// Statements containing this marker are rejected by the fake engine.
pub const FAIL_MARKER: &str = "INVALID";

/// Database name the fake engine refuses to open.
pub const UNOPENABLE: &str = "unopenable.db";

#[derive(Debug, Clone)]
pub struct FakeHandle {
    pub name: String,
    pub password: Option<String>,
}

/// Engine that records every call instead of touching a database.
#[derive(Clone, Default)]
pub struct RecordingEngine {
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Engine for RecordingEngine {
    type Handle = FakeHandle;

    fn open(&self, name: &str) -> AppResult<FakeHandle> {
        if name == UNOPENABLE {
            return Err(AppError::Engine("unable to open".into()));
        }
        self.record(format!("OPEN {}", name));
        Ok(FakeHandle {
            name: name.to_string(),
            password: None,
        })
    }

    fn open_encrypted(&self, name: &str, password: &str) -> AppResult<FakeHandle> {
        self.record(format!("OPEN_ENCRYPTED {}", name));
        Ok(FakeHandle {
            name: name.to_string(),
            password: Some(password.to_string()),
        })
    }

    fn query(&self, _handle: &mut FakeHandle, sql: &str) -> AppResult<Rows> {
        if sql.contains(FAIL_MARKER) {
            return Err(AppError::Engine(format!("bad query: {}", sql)));
        }
        self.record(sql.to_string());
        Ok(Rows::new(
            vec!["sql".to_string()],
            vec![vec![Value::Text(sql.to_string())]],
        ))
    }

    fn execute(&self, _handle: &mut FakeHandle, sql: &str) -> AppResult<()> {
        if sql.contains(FAIL_MARKER) {
            return Err(AppError::Engine(format!("bad statement: {}", sql)));
        }
        self.record(sql.to_string());
        Ok(())
    }

    fn close(&self, handle: FakeHandle) -> AppResult<()> {
        self.record(format!("CLOSE {}", handle.name));
        Ok(())
    }

    fn remove(&self, handle: &FakeHandle) -> AppResult<()> {
        self.record(format!("REMOVE {}", handle.name));
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct RecordingDiagnostics {
    errors: Arc<Mutex<Vec<String>>>,
    infos: Arc<Mutex<Vec<String>>>,
}

impl RecordingDiagnostics {
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn error(&self, msg: &str) {
        self.errors.lock().unwrap().push(msg.to_string());
    }

    fn info(&self, msg: &str) {
        self.infos.lock().unwrap().push(msg.to_string());
    }
}

/// A gate over the recording engine with a manual clock, plus handles to
/// inspect what it did.
pub struct Harness {
    pub gate: DebouncedTransactionGate<RecordingEngine>,
    pub engine: RecordingEngine,
    pub diagnostics: RecordingDiagnostics,
    pub clock: ManualClock,
}

pub fn harness(options: GateOptions) -> Harness {
    let engine = RecordingEngine::new();
    let diagnostics = RecordingDiagnostics::default();
    let clock = ManualClock::new();
    let gate = DebouncedTransactionGate::with_clock(
        engine.clone(),
        options,
        Box::new(diagnostics.clone()),
        Box::new(clock.clone()),
    );
    Harness {
        gate,
        engine,
        diagnostics,
        clock,
    }
}

/// Gate over `app.db` with the default 50ms delay.
pub fn default_harness() -> Harness {
    harness(GateOptions::new("app.db"))
}
