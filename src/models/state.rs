//! On-disk record of where the last run stopped.

use serde::{Deserialize, Serialize};

use super::finding::{Finding, Findings, Severity};

/// A carried finding as stored in the state file. Severity is implied by the
/// list it sits in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingRecord {
    pub time: i64,
    pub content: String,
}

/// Persisted state for one monitored log.
///
/// `checksum` always covers decoded bytes `[0, offset)` of the log as
/// currently named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorState {
    pub offset: u64,
    pub checksum: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub critical_lst: Vec<FindingRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warning_lst: Vec<FindingRecord>,
}

impl MonitorState {
    pub fn new(offset: u64, checksum: String, findings: &Findings) -> Self {
        Self {
            offset,
            checksum,
            critical_lst: findings.critical().iter().map(FindingRecord::from).collect(),
            warning_lst: findings.warning().iter().map(FindingRecord::from).collect(),
        }
    }

    /// Carried findings restored from this state.
    pub fn findings(&self) -> Findings {
        let restore = |records: &[FindingRecord], severity| {
            records
                .iter()
                .map(|r| Finding {
                    timestamp: r.time,
                    content: r.content.clone(),
                    severity,
                })
                .collect()
        };
        Findings::new(
            restore(&self.critical_lst, Severity::Critical),
            restore(&self.warning_lst, Severity::Warning),
        )
    }
}

impl From<&Finding> for FindingRecord {
    fn from(finding: &Finding) -> Self {
        Self {
            time: finding.timestamp,
            content: finding.content.clone(),
        }
    }
}
