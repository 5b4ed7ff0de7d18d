pub mod finding;
pub mod state;

pub use finding::{Finding, Findings, Severity};
pub use state::{FindingRecord, MonitorState};
