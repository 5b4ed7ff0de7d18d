//! End-to-end checks of the incremental scan across consecutive runs
//!
//! Covers cold start, resume, rotation detection, carry-over of findings with
//! and without an ok pattern, and transparent reading of compressed logs.

use bzip2::write::BzEncoder;
use flate2::write::GzEncoder;
use logmon::models::{Finding, Findings};
use logmon::patterns::PatternSet;
use logmon::scanner::Scanner;
use logmon::{Monitor, MonitorError, Status};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn log_path(temp: &TempDir) -> PathBuf {
    temp.path().join("app.log")
}

fn monitor(temp: &TempDir, ok: Option<&str>) -> Monitor {
    let patterns = PatternSet::new(Some("^WARN"), Some("^FATAL"), ok).unwrap();
    Monitor::new(log_path(temp), temp.path(), patterns, None)
}

fn append(path: &Path, content: &str) {
    let mut file = OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
}

fn contents(findings: &[Finding]) -> Vec<&str> {
    findings.iter().map(|f| f.content.as_str()).collect()
}

#[test]
fn test_cold_start_reports_everything_and_persists_length() {
    let temp = TempDir::new().unwrap();
    let content = "WARN a\nINFO noise\nFATAL b\nWARN c\n";
    fs::write(log_path(&temp), content).unwrap();
    let monitor = monitor(&temp, None);

    let report = monitor.run().unwrap();

    assert_eq!(report.status, Status::Critical);
    assert_eq!(contents(report.findings.warning()), vec!["WARN a", "WARN c"]);
    assert_eq!(contents(report.findings.critical()), vec!["FATAL b"]);
    let state = monitor.store().load().unwrap().unwrap();
    assert_eq!(state.offset, content.len() as u64);
    assert_eq!(report.offset, state.offset);
}

#[test]
fn test_resume_scans_only_appended_bytes() {
    let temp = TempDir::new().unwrap();
    let first = "FATAL old\nINFO ok\n";
    fs::write(log_path(&temp), first).unwrap();
    let monitor = monitor(&temp, None);
    monitor.run().unwrap();

    let appended = "WARN new\n";
    append(&log_path(&temp), appended);
    let report = monitor.run().unwrap();

    assert_eq!(report.status, Status::Warning);
    assert!(report.findings.critical().is_empty());
    assert_eq!(contents(report.reported()), vec!["WARN new"]);
    assert_eq!(report.offset, (first.len() + appended.len()) as u64);
}

#[test]
fn test_replaced_content_restarts_from_zero() {
    let temp = TempDir::new().unwrap();
    fs::write(log_path(&temp), "INFO one\nINFO two\n").unwrap();
    let monitor = monitor(&temp, None);
    monitor.run().unwrap();

    let replaced = "FATAL new file\nINFO more content here\n";
    fs::write(log_path(&temp), replaced).unwrap();
    let restored = monitor.store().restore().unwrap();
    assert!(restored.rotated);

    let report = monitor.run().unwrap();
    assert_eq!(report.status, Status::Critical);
    assert_eq!(report.offset, replaced.len() as u64);
}

#[test]
fn test_truncated_log_counts_as_rotation() {
    let temp = TempDir::new().unwrap();
    fs::write(log_path(&temp), "INFO a long first generation line\n").unwrap();
    let monitor = monitor(&temp, None);
    monitor.run().unwrap();

    fs::write(log_path(&temp), "WARN x\n").unwrap();
    let report = monitor.run().unwrap();

    assert_eq!(report.status, Status::Warning);
    assert_eq!(report.offset, 7);
}

#[test]
fn test_line_caught_mid_write_is_reported_once_complete() {
    let temp = TempDir::new().unwrap();
    fs::write(log_path(&temp), "INFO up\nFAT").unwrap();
    let monitor = monitor(&temp, None);

    let report = monitor.run().unwrap();
    assert_eq!(report.status, Status::Ok);
    assert_eq!(report.offset, 8);

    append(&log_path(&temp), "AL disk full\n");
    let report = monitor.run().unwrap();
    assert_eq!(report.status, Status::Critical);
    assert_eq!(contents(report.reported()), vec!["FATAL disk full"]);
    assert_eq!(report.offset, 24);
}

#[test]
fn test_without_ok_pattern_prior_findings_are_forgotten() {
    let temp = TempDir::new().unwrap();
    fs::write(log_path(&temp), "FATAL boom\n").unwrap();
    let monitor = monitor(&temp, None);
    assert_eq!(monitor.run().unwrap().status, Status::Critical);

    append(&log_path(&temp), "INFO quiet\n");
    let report = monitor.run().unwrap();
    assert_eq!(report.status, Status::Ok);
    assert!(report.reported().is_empty());
}

#[test]
fn test_with_ok_pattern_findings_carry_until_cleared() {
    let temp = TempDir::new().unwrap();
    fs::write(log_path(&temp), "FATAL boom\n").unwrap();
    let monitor = monitor(&temp, Some("^SUCCESS"));
    assert_eq!(monitor.run().unwrap().status, Status::Critical);

    // Nothing new at all
    let report = monitor.run().unwrap();
    assert_eq!(report.status, Status::Critical);
    assert_eq!(contents(report.reported()), vec!["FATAL boom"]);

    append(&log_path(&temp), "INFO still broken\n");
    assert_eq!(monitor.run().unwrap().status, Status::Critical);

    append(&log_path(&temp), "SUCCESS recovered\n");
    let report = monitor.run().unwrap();
    assert_eq!(report.status, Status::Ok);

    let state = monitor.store().load().unwrap().unwrap();
    assert!(state.critical_lst.is_empty());
    assert!(state.warning_lst.is_empty());
}

#[test]
fn test_carried_timestamps_survive_runs() {
    let temp = TempDir::new().unwrap();
    fs::write(log_path(&temp), "WARN slow\n").unwrap();
    let monitor = monitor(&temp, Some("^SUCCESS"));
    let first = monitor.run().unwrap();
    let second = monitor.run().unwrap();

    assert_eq!(
        first.findings.warning()[0].timestamp,
        second.findings.warning()[0].timestamp
    );
}

#[test]
fn test_ok_line_resets_mid_scan() {
    let temp = TempDir::new().unwrap();
    fs::write(log_path(&temp), "WARN 1\nWARN 2\nSUCCESS\n").unwrap();
    let report = monitor(&temp, Some("^SUCCESS")).run().unwrap();
    assert_eq!(report.status, Status::Ok);

    let temp = TempDir::new().unwrap();
    fs::write(log_path(&temp), "WARN 1\nSUCCESS\nWARN 3\n").unwrap();
    let report = monitor(&temp, Some("^SUCCESS")).run().unwrap();
    assert_eq!(report.status, Status::Warning);
    assert_eq!(contents(report.reported()), vec!["WARN 3"]);
}

#[test]
fn test_ok_line_clears_everything_end_to_end() {
    let temp = TempDir::new().unwrap();
    let content = "WARN a\nFATAL b\nSUCCESS c\n";
    fs::write(log_path(&temp), content).unwrap();
    let monitor = monitor(&temp, Some("^SUCCESS"));

    let report = monitor.run().unwrap();

    assert_eq!(report.status, Status::Ok);
    assert_eq!(report.status.exit_code(), 0);
    assert_eq!(report.offset, content.len() as u64);
    assert_eq!(monitor.store().load().unwrap().unwrap().offset, 25);
}

#[test]
fn test_malformed_state_is_cold_start() {
    let temp = TempDir::new().unwrap();
    fs::write(log_path(&temp), "WARN a\n").unwrap();
    let monitor = monitor(&temp, None);
    fs::write(monitor.store().state_path(), "{\"offset\": \"seven\"}").unwrap();

    let report = monitor.run().unwrap();

    assert_eq!(report.status, Status::Warning);
    assert_eq!(monitor.store().load().unwrap().unwrap().offset, 7);
}

#[test]
fn test_missing_log_aborts_without_state() {
    let temp = TempDir::new().unwrap();
    let monitor = monitor(&temp, None);

    let err = monitor.run().unwrap_err();

    assert!(matches!(err, MonitorError::MissingLogFile { .. }));
    assert!(!monitor.store().state_path().exists());
}

#[test]
fn test_state_file_format() {
    let temp = TempDir::new().unwrap();
    fs::write(log_path(&temp), "FATAL x\n").unwrap();
    let monitor = monitor(&temp, Some("^SUCCESS"));
    monitor.run().unwrap();

    let raw = fs::read_to_string(monitor.store().state_path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["offset"], 8);
    assert_eq!(json["checksum"].as_str().unwrap().len(), 64);
    assert_eq!(json["critical_lst"][0]["content"], "FATAL x");
    assert!(json["critical_lst"][0]["time"].is_i64());
    assert!(json.get("warning_lst").is_none());
}

fn write_gzip(path: &Path, content: &str) {
    let mut enc = GzEncoder::new(File::create(path).unwrap(), flate2::Compression::default());
    enc.write_all(content.as_bytes()).unwrap();
    enc.finish().unwrap();
}

fn write_bzip2(path: &Path, content: &str) {
    let mut enc = BzEncoder::new(File::create(path).unwrap(), bzip2::Compression::default());
    enc.write_all(content.as_bytes()).unwrap();
    enc.finish().unwrap();
}

#[test]
fn test_codecs_classify_identically() {
    let temp = TempDir::new().unwrap();
    let content = "INFO start\nWARN a\nFATAL b\nWARN c\nSUCCESS d\nFATAL e\n";
    let plain = temp.path().join("plain.log");
    let gz = temp.path().join("gz.log");
    let bz = temp.path().join("bz.log");
    fs::write(&plain, content).unwrap();
    write_gzip(&gz, content);
    write_bzip2(&bz, content);

    let patterns = PatternSet::new(Some("^WARN"), Some("^FATAL"), Some("^SUCCESS")).unwrap();
    let scanner = Scanner::new(&patterns);
    let scan = |path: &Path| {
        let mut findings = Findings::default();
        let consumed = scanner.scan(path, 11, &mut findings).unwrap();
        (
            consumed,
            contents(findings.critical()).join("|"),
            contents(findings.warning()).join("|"),
        )
    };

    let expected = scan(&plain);
    assert_eq!(
        expected,
        (content.len() as u64 - 11, "FATAL e".to_string(), String::new())
    );
    assert_eq!(scan(&gz), expected);
    assert_eq!(scan(&bz), expected);
}

#[test]
fn test_compressed_log_resumes_by_decoded_offset() {
    let temp = TempDir::new().unwrap();
    let log = log_path(&temp);
    write_gzip(&log, "FATAL first\n");
    let monitor = monitor(&temp, None);
    assert_eq!(monitor.run().unwrap().offset, 12);

    write_gzip(&log, "FATAL first\nWARN second\n");
    let report = monitor.run().unwrap();

    assert_eq!(report.status, Status::Warning);
    assert_eq!(contents(report.reported()), vec!["WARN second"]);
    assert_eq!(report.offset, 24);
}
