//! Per-log persisted scan state.
//!
//! A state file records the offset the next check resumes from, a checksum of
//! decoded bytes `[0, offset)` and any findings carried over. A checksum that no
//! longer matches the current file is the only rotation signal; file size is
//! never compared.

use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::locking::{locked_read, locked_write};
use crate::codec;
use crate::error::{MonitorError, Result};
use crate::models::{Findings, MonitorState};

const STATE_FILE_SUFFIX: &str = "_logmonitor_cached.dat";

/// Derive the state file for `log_path`: directory components and everything
/// from the first `.` of the file name are dropped.
pub fn state_file_path(state_dir: &Path, log_path: &Path) -> PathBuf {
    let file_name = log_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name.split('.').next().unwrap_or_default();
    state_dir.join(format!("{stem}{STATE_FILE_SUFFIX}"))
}

/// SHA-256 (hex) of the first `offset` decoded bytes of `log_path`.
///
/// If the file holds fewer than `offset` bytes the digest covers what exists,
/// which can never equal a digest taken over the full range.
pub fn checksum(log_path: &Path, offset: u64) -> Result<String> {
    let reader = codec::open_at(log_path, 0)?;
    let mut hasher = Sha256::new();
    io::copy(&mut reader.take(offset), &mut hasher)
        .map_err(|e| MonitorError::missing_log(log_path, e))?;
    Ok(hex::encode(hasher.finalize()))
}

/// Outcome of restoring state at the start of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Restored {
    /// Stored checksum no longer matches the log's prefix
    pub rotated: bool,
    /// Where the current file's scan resumes (0 when rotated or cold)
    pub offset: u64,
    /// Offset recorded by the previous run, kept for the predecessor sweep
    pub previous_offset: u64,
    /// Carried findings from the previous run
    pub findings: Findings,
    /// A usable state file was found
    pub existed: bool,
}

pub struct StateStore {
    log_path: PathBuf,
    state_path: PathBuf,
}

impl StateStore {
    pub fn new(log_path: impl Into<PathBuf>, state_dir: &Path) -> Self {
        let log_path = log_path.into();
        let state_path = state_file_path(state_dir, &log_path);
        Self {
            log_path,
            state_path,
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// Read the persisted state, if any.
    ///
    /// A missing file is `Ok(None)`; unparsable content is `MalformedStateFile`.
    pub fn load(&self) -> Result<Option<MonitorState>> {
        let content = match locked_read(&self.state_path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(MonitorError::state_io(&self.state_path, e)),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| MonitorError::MalformedStateFile {
                path: self.state_path.clone(),
                reason: e.to_string(),
            })
    }

    /// Restore where the last run left off.
    ///
    /// Cold starts (no state, or a malformed state file) resume from zero.
    /// Carried findings are returned whether or not the log was rotated.
    pub fn restore(&self) -> Result<Restored> {
        let state = match self.load() {
            Ok(Some(state)) => state,
            Ok(None) => {
                debug!(state = %self.state_path.display(), "no prior state, cold start");
                return Ok(Restored::default());
            }
            Err(err @ MonitorError::MalformedStateFile { .. }) => {
                warn!("{err}; treating as cold start");
                return Ok(Restored::default());
            }
            Err(err) => return Err(err),
        };

        let current = checksum(&self.log_path, state.offset)?;
        let rotated = current != state.checksum;
        if rotated {
            info!(
                log = %self.log_path.display(),
                previous_offset = state.offset,
                "checksum mismatch, log was rotated"
            );
        }

        Ok(Restored {
            rotated,
            offset: if rotated { 0 } else { state.offset },
            previous_offset: state.offset,
            findings: state.findings(),
            existed: true,
        })
    }

    /// Overwrite the state file with `new_offset` and the remaining findings.
    pub fn persist(&self, new_offset: u64, findings: &Findings) -> Result<()> {
        let state = MonitorState::new(new_offset, checksum(&self.log_path, new_offset)?, findings);
        let json = serde_json::to_string(&state)
            .map_err(|e| MonitorError::state_io(&self.state_path, io::Error::other(e)))?;

        if let Some(parent) = self.state_path.parent() {
            fs::create_dir_all(parent).map_err(|e| MonitorError::state_io(parent, e))?;
        }
        locked_write(&self.state_path, &json)
            .map_err(|e| MonitorError::state_io(&self.state_path, e))?;
        debug!(state = %self.state_path.display(), offset = new_offset, "state persisted");
        Ok(())
    }

    /// Delete the state file. Returns whether one existed.
    pub fn reset(&self) -> Result<bool> {
        match fs::remove_file(&self.state_path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(MonitorError::state_io(&self.state_path, e)),
        }
    }
}
