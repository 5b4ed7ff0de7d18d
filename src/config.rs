//! Check configuration from a TOML file and command-line overrides.
//!
//! ```toml
//! log = "/var/log/app.log"
//! state_dir = "/var/cache/logmon"
//! warning = "^WARN"
//! critical = "^(FATAL|ERROR)"
//! ok = "^SUCCESS"
//! rotation = "/var/log/app.log.*"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MonitorError, Result};
use crate::fs::StateStore;
use crate::monitor::Monitor;
use crate::patterns::PatternSet;
use crate::rotation;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Log file to check
    pub log: Option<PathBuf>,
    /// Directory holding per-log state files
    pub state_dir: Option<PathBuf>,
    pub warning: Option<String>,
    pub critical: Option<String>,
    pub ok: Option<String>,
    /// Glob matching where the log is rotated to
    pub rotation: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MonitorError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        toml::from_str(&content)
            .map_err(|e| MonitorError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Fields set in `overrides` replace ours.
    pub fn merge(self, overrides: Config) -> Config {
        Config {
            log: overrides.log.or(self.log),
            state_dir: overrides.state_dir.or(self.state_dir),
            warning: overrides.warning.or(self.warning),
            critical: overrides.critical.or(self.critical),
            ok: overrides.ok.or(self.ok),
            rotation: overrides.rotation.or(self.rotation),
        }
    }

    /// State directory, defaulting to the system temp directory.
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn log_path(&self) -> Result<&Path> {
        self.log
            .as_deref()
            .ok_or_else(|| MonitorError::Config("no log file given".to_string()))
    }

    pub fn state_store(&self) -> Result<StateStore> {
        Ok(StateStore::new(self.log_path()?, &self.state_dir()))
    }

    /// Validate everything and build the monitor. Touches no state.
    pub fn build(&self) -> Result<Monitor> {
        let patterns = PatternSet::new(
            self.warning.as_deref(),
            self.critical.as_deref(),
            self.ok.as_deref(),
        )?;
        let log = self.log_path()?;
        if let Some(pattern) = &self.rotation {
            rotation::validate(pattern)?;
        }
        Ok(Monitor::new(
            log,
            &self.state_dir(),
            patterns,
            self.rotation.clone(),
        ))
    }
}
