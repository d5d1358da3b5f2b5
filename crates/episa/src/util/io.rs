//! I/O utility functions

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Sibling path the content is staged in before the rename
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("episa"), OsString::from);
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write content to a file atomically using write-then-rename pattern.
///
/// The content is first written to `<file name>.tmp` next to the target,
/// then renamed over it, so an interrupted write never leaves a truncated
/// report or snapshot behind.
///
/// # Example
/// ```ignore
/// atomic_write(Path::new("results.yaml"), &yaml)?;
/// ```
pub fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let temp_path = staging_path(path);
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)
}
