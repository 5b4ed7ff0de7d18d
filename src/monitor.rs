//! One check run: restore, optional predecessor sweep, scan, persist, tally.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::Result;
use crate::fs::StateStore;
use crate::models::{Finding, Findings};
use crate::patterns::PatternSet;
use crate::rotation;
use crate::scanner::Scanner;

/// Outcome reported to the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    pub fn exit_code(self) -> u8 {
        match self {
            Status::Ok => 0,
            Status::Warning => 2,
            Status::Critical | Status::Unknown => 3,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Ok => write!(f, "OK"),
            Status::Warning => write!(f, "WARNING"),
            Status::Critical => write!(f, "CRITICAL"),
            Status::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct Report {
    pub status: Status,
    /// Offset persisted for the next run
    pub offset: u64,
    /// Findings left at the end of the run (what gets carried)
    pub findings: Findings,
}

impl Report {
    fn tally(findings: Findings, offset: u64) -> Self {
        let status = if !findings.critical().is_empty() {
            Status::Critical
        } else if !findings.warning().is_empty() {
            Status::Warning
        } else {
            Status::Ok
        };
        Self {
            status,
            offset,
            findings,
        }
    }

    /// Findings for the reported severity only; criticals win over warnings.
    pub fn reported(&self) -> &[Finding] {
        match self.status {
            Status::Critical => self.findings.critical(),
            Status::Warning => self.findings.warning(),
            Status::Ok | Status::Unknown => &[],
        }
    }
}

pub struct Monitor {
    store: StateStore,
    patterns: PatternSet,
    rotation: Option<String>,
}

impl Monitor {
    pub fn new(
        log_path: impl Into<PathBuf>,
        state_dir: &Path,
        patterns: PatternSet,
        rotation: Option<String>,
    ) -> Self {
        Self {
            store: StateStore::new(log_path, state_dir),
            patterns,
            rotation,
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Perform one check.
    pub fn run(&self) -> Result<Report> {
        let log_path = self.store.log_path();
        let restored = self.store.restore()?;
        let scanner = Scanner::new(&self.patterns);

        // Without an ok pattern nothing could ever clear carried findings
        let mut findings = restored.findings;
        if !self.patterns.has_ok() {
            findings.clear();
        }

        let start = if restored.rotated {
            if let Some(pattern) = &self.rotation {
                match rotation::resolve(pattern, log_path)? {
                    Some(predecessor) => {
                        // Sweep the tail the previous run never saw; does not
                        // advance the current file's offset.
                        let swept =
                            scanner.scan(&predecessor, restored.previous_offset, &mut findings)?;
                        info!(
                            predecessor = %predecessor.display(),
                            from = restored.previous_offset,
                            swept,
                            "swept rotated log"
                        );
                    }
                    None => info!(pattern = %pattern, "no rotated predecessor found"),
                }
            }
            0
        } else {
            restored.offset
        };

        let consumed = scanner.scan_complete(log_path, start, &mut findings)?;
        let offset = start + consumed;

        if !restored.existed && offset == 0 && findings.is_empty() {
            debug!("nothing read on cold start, state not written");
        } else {
            self.store.persist(offset, &findings)?;
        }

        Ok(Report::tally(findings, offset))
    }
}
