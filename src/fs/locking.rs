//! Advisory-locked state file access
//!
//! Reads take a shared `fs2` lock and writes an exclusive one, so a reader never
//! sees a state file between truncation and rewrite. Locks cover a single read
//! or write, not a whole check run.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Read file contents under a shared lock.
pub fn locked_read(path: &Path) -> io::Result<String> {
    let file = File::open(path)?;
    file.lock_shared()?;
    let mut content = String::new();
    BufReader::new(&file).read_to_string(&mut content)?;
    Ok(content)
}

/// Replace file contents under an exclusive lock.
///
/// The sequence is: open → lock → truncate → write → flush.
pub fn locked_write(path: &Path, content: &str) -> io::Result<()> {
    // Truncate only once the lock is held
    #[allow(clippy::suspicious_open_options)]
    let file = OpenOptions::new().write(true).create(true).open(path)?;
    file.lock_exclusive()?;
    file.set_len(0)?;
    let mut writer = BufWriter::new(&file);
    writer.write_all(content.as_bytes())?;
    writer.flush()?;
    Ok(())
}
