use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_AUTOCOMMIT_DELAY_MS: u64 = 50;

/// Construction options of a transaction gate.
///
/// Fixed once the gate is built. Can be written by hand or loaded from a
/// YAML file:
///
/// ```yaml
/// database_name: ~/app/data.sqlite
/// autocommit_delay_ms: 100
/// no_transactions: false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateOptions {
    #[serde(default)]
    pub database_name: Option<String>,
    #[serde(default)]
    pub encrypted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default = "default_autocommit_delay_ms")]
    pub autocommit_delay_ms: u64,
    /// Disable flag: when set, statements run standalone and no
    /// BEGIN/COMMIT/ROLLBACK is ever issued.
    #[serde(default)]
    pub no_transactions: bool,
}

fn default_autocommit_delay_ms() -> u64 {
    DEFAULT_AUTOCOMMIT_DELAY_MS
}

impl Default for GateOptions {
    fn default() -> Self {
        Self {
            database_name: None,
            encrypted: false,
            password: None,
            autocommit_delay_ms: default_autocommit_delay_ms(),
            no_transactions: false,
        }
    }
}

impl GateOptions {
    pub fn new(database_name: impl Into<String>) -> Self {
        Self {
            database_name: Some(database_name.into()),
            ..Self::default()
        }
    }

    pub fn encrypted(mut self, password: Option<String>) -> Self {
        self.encrypted = true;
        self.password = password;
        self
    }

    pub fn autocommit_delay_ms(mut self, ms: u64) -> Self {
        self.autocommit_delay_ms = ms;
        self
    }

    pub fn no_transactions(mut self, disabled: bool) -> Self {
        self.no_transactions = disabled;
        self
    }

    pub fn transactions_enabled(&self) -> bool {
        !self.no_transactions
    }

    /// Idle delay before the deferred commit fires.
    /// A zero delay counts as unset and falls back to the default.
    pub fn autocommit_delay(&self) -> Duration {
        let ms = if self.autocommit_delay_ms == 0 {
            DEFAULT_AUTOCOMMIT_DELAY_MS
        } else {
            self.autocommit_delay_ms
        };
        Duration::from_millis(ms)
    }

    /// Options with unset values filled in. A zero delay counts as unset.
    pub fn with_defaults(mut self) -> Self {
        if self.autocommit_delay_ms == 0 {
            self.autocommit_delay_ms = DEFAULT_AUTOCOMMIT_DELAY_MS;
        }
        self
    }

    /// Non-empty database name, if any.
    pub fn database(&self) -> Option<&str> {
        self.database_name.as_deref().filter(|n| !n.trim().is_empty())
    }

    /// Check the options are usable for opening a database.
    /// Only the first problem found is reported.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.database().is_none() {
            return Err("No database name provided");
        }
        if self.encrypted && self.password.as_deref().is_none_or(str::is_empty) {
            return Err("Password not provided for encrypted database");
        }
        Ok(())
    }

    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load options from a YAML file
    pub fn from_yaml_file(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Err(AppError::ConfigLoad(format!(
                "file not found: {}",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
