use chrono::Utc;

/// Severity a line was classified with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// A matched log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Epoch seconds at which the line was seen
    pub timestamp: i64,
    pub content: String,
    pub severity: Severity,
}

impl Finding {
    /// Record a line seen now.
    pub fn now(content: impl Into<String>, severity: Severity) -> Self {
        Self {
            timestamp: Utc::now().timestamp(),
            content: content.into(),
            severity,
        }
    }
}

/// Findings accumulated over a run: carried-over ones first, then new ones in
/// scan order. Threaded explicitly through restore, scan passes and tally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Findings {
    critical: Vec<Finding>,
    warning: Vec<Finding>,
}

impl Findings {
    pub fn new(critical: Vec<Finding>, warning: Vec<Finding>) -> Self {
        Self { critical, warning }
    }

    pub fn push(&mut self, finding: Finding) {
        match finding.severity {
            Severity::Critical => self.critical.push(finding),
            Severity::Warning => self.warning.push(finding),
        }
    }

    /// Drop everything, carried and new.
    pub fn clear(&mut self) {
        self.critical.clear();
        self.warning.clear();
    }

    pub fn critical(&self) -> &[Finding] {
        &self.critical
    }

    pub fn warning(&self) -> &[Finding] {
        &self.warning
    }

    pub fn is_empty(&self) -> bool {
        self.critical.is_empty() && self.warning.is_empty()
    }
}
