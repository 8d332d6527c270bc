//! Diagnostics sink injected into the gate.
//!
//! The gate never reports configuration problems as errors; it writes them
//! here and degrades to a no-op instead.

use crate::ui::messages;

pub trait Diagnostics {
    fn error(&self, msg: &str);
    fn info(&self, msg: &str);
}

/// Prints through the console message helpers (errors on stderr).
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleDiagnostics;

impl Diagnostics for ConsoleDiagnostics {
    fn error(&self, msg: &str) {
        messages::error(msg);
    }

    fn info(&self, msg: &str) {
        messages::info(msg);
    }
}

/// Drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentDiagnostics;

impl Diagnostics for SilentDiagnostics {
    fn error(&self, _msg: &str) {}

    fn info(&self, _msg: &str) {}
}
