//! Incremental, rotation-aware log severity checks.
//!
//! Each invocation resumes a log from where the previous one stopped, classifies
//! the newly appended lines and reports a single status for a monitoring
//! supervisor.

pub mod codec;
pub mod commands;
pub mod completions;
pub mod config;
pub mod error;
pub mod fs;
pub mod logging;
pub mod models;
pub mod monitor;
pub mod patterns;
pub mod rotation;
pub mod scanner;

pub use config::Config;
pub use error::{MonitorError, Result};
pub use monitor::{Monitor, Report, Status};
