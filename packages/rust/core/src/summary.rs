//! Summary file I/O.

use std::path::Path;

use tracing::{debug, info};

use bookgen_shared::{BookgenError, Result};

/// Write `text` to `path` atomically (write to a temp sibling, then rename),
/// so an interrupted run never leaves a half-written summary behind.
pub fn write_summary(path: &Path, text: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| BookgenError::validation(format!("{} has no file name", path.display())))?;
    let temp = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

    std::fs::write(&temp, text).map_err(|e| BookgenError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| BookgenError::io(path, e))?;

    info!(path = %path.display(), bytes = text.len(), "summary written");
    Ok(())
}

/// Whether the file at `path` already holds exactly `text`.
/// A missing file counts as stale.
pub fn summary_is_current(path: &Path, text: &str) -> Result<bool> {
    match std::fs::read_to_string(path) {
        Ok(existing) => {
            let current = existing == text;
            debug!(path = %path.display(), current, "compared summary");
            Ok(current)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(BookgenError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bookgen-summary-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn writes_and_replaces() {
        let tmp = temp_dir();
        let path = tmp.join("SUMMARY.md");

        write_summary(&path, "first\n").unwrap();
        write_summary(&path, "second\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second\n");

        // No temp files should remain
        for entry in std::fs::read_dir(&tmp).unwrap() {
            let name = entry.unwrap().file_name().to_string_lossy().to_string();
            assert!(!name.starts_with('.'), "temp file left behind: {name}");
        }

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_parent_is_io_error() {
        let tmp = temp_dir();
        let err = write_summary(&tmp.join("nope/SUMMARY.md"), "x").unwrap_err();
        assert!(matches!(err, BookgenError::Io { .. }));
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn detects_stale_summary() {
        let tmp = temp_dir();
        let path = tmp.join("SUMMARY.md");

        assert!(!summary_is_current(&path, "text\n").unwrap());
        std::fs::write(&path, "text\n").unwrap();
        assert!(summary_is_current(&path, "text\n").unwrap());
        assert!(!summary_is_current(&path, "text").unwrap());

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
