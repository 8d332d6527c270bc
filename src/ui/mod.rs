pub mod diagnostics;
pub mod messages;

pub use diagnostics::{ConsoleDiagnostics, Diagnostics, SilentDiagnostics};
