//! Incremental line scanner.

use std::io::BufRead;
use std::path::Path;
use tracing::debug;

use crate::codec;
use crate::error::{MonitorError, Result};
use crate::models::{Finding, Findings};
use crate::patterns::PatternSet;

pub struct Scanner<'a> {
    patterns: &'a PatternSet,
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

impl<'a> Scanner<'a> {
    pub fn new(patterns: &'a PatternSet) -> Self {
        Self { patterns }
    }

    /// Classify every line of `path` from decoded byte `offset` to EOF.
    ///
    /// An ok-pattern line clears everything in `findings`, carried or new, before
    /// the line itself is classified. Returns the number of decoded bytes read,
    /// including a trailing line with no terminator. Used for rotated logs, which
    /// will not grow any further.
    pub fn scan(&self, path: &Path, offset: u64, findings: &mut Findings) -> Result<u64> {
        self.scan_lines(path, offset, findings, false)
    }

    /// Like [`Scanner::scan`], but a trailing line with no `\n` is left unread and
    /// uncounted so the next run sees it whole once the writer finishes it.
    pub fn scan_complete(
        &self,
        path: &Path,
        offset: u64,
        findings: &mut Findings,
    ) -> Result<u64> {
        self.scan_lines(path, offset, findings, true)
    }

    fn scan_lines(
        &self,
        path: &Path,
        offset: u64,
        findings: &mut Findings,
        hold_partial: bool,
    ) -> Result<u64> {
        let mut reader = codec::open_at(path, offset)?;
        let mut consumed = 0u64;
        let mut lines = 0usize;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let n = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| MonitorError::missing_log(path, e))?;
            if n == 0 {
                break;
            }
            if hold_partial && !buf.ends_with(b"\n") {
                debug!(path = %path.display(), held = n, "partial last line left for next run");
                break;
            }
            consumed += n as u64;
            lines += 1;

            let line = String::from_utf8_lossy(strip_terminator(&buf));
            if self.patterns.is_ok(&line) {
                findings.clear();
            }
            for severity in self.patterns.classify(&line) {
                findings.push(Finding::now(&*line, severity));
            }
        }

        debug!(path = %path.display(), offset, consumed, lines, "scan pass complete");
        Ok(consumed)
    }
}
