//! Locating the file a rotated log was renamed to.

use glob::glob;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

use crate::error::{MonitorError, Result};

/// Validate a rotation glob without touching the filesystem.
pub fn validate(pattern: &str) -> Result<()> {
    glob::Pattern::new(pattern)
        .map(|_| ())
        .map_err(|source| MonitorError::InvalidGlob {
            pattern: pattern.to_string(),
            source,
        })
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Most recently modified file matching `pattern`, excluding `current`.
///
/// Ties on modification time go to the lexicographically smallest path.
/// Unreadable entries are skipped.
pub fn resolve(pattern: &str, current: &Path) -> Result<Option<PathBuf>> {
    let entries = glob(pattern).map_err(|source| MonitorError::InvalidGlob {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut candidates: Vec<(SystemTime, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file() && !same_file(path, current))
        .filter_map(|path| {
            let modified = fs::metadata(&path).and_then(|m| m.modified()).ok()?;
            Some((modified, path))
        })
        .collect();
    debug!(pattern, candidates = candidates.len(), "rotation candidates");

    candidates.sort_by(|(a_time, a_path), (b_time, b_path)| {
        b_time.cmp(a_time).then_with(|| a_path.cmp(b_path))
    });

    let predecessor = candidates.into_iter().next().map(|(_, path)| path);
    if let Some(path) = &predecessor {
        info!(predecessor = %path.display(), "resolved rotated log");
    }
    Ok(predecessor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;
    use tempfile::TempDir;

    fn touch(path: &Path, age_secs: u64) {
        fs::write(path, "x\n").unwrap();
        let mtime = SystemTime::now() - Duration::from_secs(age_secs);
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
    }

    fn pattern(dir: &Path, glob: &str) -> String {
        dir.join(glob).to_string_lossy().into_owned()
    }

    #[test]
    fn test_picks_newest_sibling_excluding_current() {
        let temp = TempDir::new().unwrap();
        let current = temp.path().join("app.log");
        touch(&current, 0);
        touch(&temp.path().join("app.log.1"), 60);
        touch(&temp.path().join("app.log.2"), 3600);

        let found = resolve(&pattern(temp.path(), "app.log*"), &current).unwrap();
        assert_eq!(found, Some(temp.path().join("app.log.1")));
    }

    #[test]
    fn test_tie_breaks_on_path() {
        let temp = TempDir::new().unwrap();
        let current = temp.path().join("app.log");
        touch(&current, 0);
        touch(&temp.path().join("app.log.b"), 100);
        touch(&temp.path().join("app.log.a"), 100);

        let found = resolve(&pattern(temp.path(), "app.log.*"), &current).unwrap();
        assert_eq!(found, Some(temp.path().join("app.log.a")));
    }

    #[test]
    fn test_no_sibling() {
        let temp = TempDir::new().unwrap();
        let current = temp.path().join("app.log");
        touch(&current, 0);

        assert_eq!(resolve(&pattern(temp.path(), "app.log*"), &current).unwrap(), None);
    }

    #[test]
    fn test_invalid_glob() {
        assert!(matches!(
            validate("logs/[unclosed"),
            Err(MonitorError::InvalidGlob { .. })
        ));
        assert!(validate("/var/log/app.log.*").is_ok());
    }
}
