//! `logmon state` - inspect or reset persisted scan state.

use anyhow::{Context, Result};
use chrono::DateTime;
use colored::Colorize;

use crate::config::Config;
use crate::models::FindingRecord;

fn print_records(label: &str, records: &[FindingRecord]) {
    if records.is_empty() {
        return;
    }
    println!("{} ({})", label.bold(), records.len());
    for record in records {
        let seen = DateTime::from_timestamp(record.time, 0)
            .map(|t| t.format("%Y-%m-%dT%H:%M:%SZ").to_string())
            .unwrap_or_else(|| record.time.to_string());
        println!("  {} {}", seen.dimmed(), record.content);
    }
}

/// Show the persisted state for the configured log.
pub fn show(config: Config) -> Result<()> {
    let store = config.state_store()?;
    let state = store
        .load()
        .with_context(|| format!("failed to read {}", store.state_path().display()))?;

    let Some(state) = state else {
        println!(
            "{} No state for {} (next check starts from the beginning)",
            "─".dimmed(),
            store.log_path().display()
        );
        return Ok(());
    };

    println!("{}: {}", "state".cyan(), store.state_path().display());
    println!("{}: {}", "offset".cyan(), state.offset);
    println!("{}: {}", "checksum".cyan(), state.checksum);
    print_records("critical", &state.critical_lst);
    print_records("warning", &state.warning_lst);
    Ok(())
}

/// Delete the persisted state so the next check is a cold start.
pub fn reset(config: Config) -> Result<()> {
    let store = config.state_store()?;
    if store.reset()? {
        println!("{} Removed {}", "✓".green(), store.state_path().display());
    } else {
        println!("{} No state to remove", "─".dimmed());
    }
    Ok(())
}
