//! Line classification patterns.
//!
//! Patterns are anchored at the start of the line but not at the end, so
//! `^FATAL` and `FATAL` both match `"FATAL disk full"`. Matching is done
//! against the line with its terminator stripped.

use regex::Regex;

use crate::error::{MonitorError, Result};
use crate::models::Severity;

#[derive(Debug, Clone)]
pub struct PatternSet {
    warning: Option<Regex>,
    critical: Option<Regex>,
    ok: Option<Regex>,
}

fn compile(pattern: Option<&str>) -> Result<Option<Regex>> {
    pattern
        .map(|p| {
            Regex::new(&format!(r"\A(?:{p})")).map_err(|source| MonitorError::InvalidPattern {
                pattern: p.to_string(),
                source,
            })
        })
        .transpose()
}

impl PatternSet {
    /// Compile the patterns. At least one of `warning`/`critical` is required.
    pub fn new(warning: Option<&str>, critical: Option<&str>, ok: Option<&str>) -> Result<Self> {
        if warning.is_none() && critical.is_none() {
            return Err(MonitorError::PatternConfiguration(
                "at least one of the warning or critical patterns must be supplied".to_string(),
            ));
        }

        Ok(Self {
            warning: compile(warning)?,
            critical: compile(critical)?,
            ok: compile(ok)?,
        })
    }

    pub fn has_ok(&self) -> bool {
        self.ok.is_some()
    }

    pub fn is_ok(&self, line: &str) -> bool {
        self.ok.as_ref().is_some_and(|re| re.is_match(line))
    }

    /// Severities a line matches. A line can be both warning and critical.
    pub fn classify(&self, line: &str) -> Vec<Severity> {
        let mut matched = Vec::with_capacity(2);
        if self.critical.as_ref().is_some_and(|re| re.is_match(line)) {
            matched.push(Severity::Critical);
        }
        if self.warning.as_ref().is_some_and(|re| re.is_match(line)) {
            matched.push(Severity::Warning);
        }
        matched
    }
}
