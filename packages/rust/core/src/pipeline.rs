//! End-to-end `build` pipeline: scan → outline → SUMMARY.md → renderer.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use bookgen_shared::{AppConfig, BookgenError, OutlineConfig, RendererConfig, Result};

use crate::outline::{Outline, assemble_outline};
use crate::render::run_renderer;
use crate::source::FsSource;
use crate::summary::{summary_is_current, write_summary};

/// Configuration for a build, resolved once at startup.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory containing the book (the renderer runs here).
    pub book_dir: PathBuf,
    pub outline: OutlineConfig,
    pub renderer: RendererConfig,
}

impl BuildConfig {
    pub fn new(book_dir: impl Into<PathBuf>, config: &AppConfig) -> Self {
        Self {
            book_dir: book_dir.into(),
            outline: OutlineConfig::from(config),
            renderer: config.renderer.clone(),
        }
    }

    /// Absolute (or cwd-relative) path of the summary file.
    pub fn summary_path(&self) -> PathBuf {
        self.book_dir.join(self.outline.summary_path())
    }

    fn source(&self) -> FsSource {
        FsSource::new(&self.book_dir).with_document_suffix(self.outline.suffix())
    }
}

/// Result of [`build_book`].
#[derive(Debug)]
pub struct BuildReport {
    pub summary_path: PathBuf,
    /// `(label, entry count)` per section, in summary order.
    pub sections: Vec<(String, usize)>,
    /// Whether the renderer was run.
    pub rendered: bool,
    pub elapsed: Duration,
}

impl BuildReport {
    pub fn entry_count(&self) -> usize {
        self.sections.iter().map(|(_, n)| n).sum()
    }
}

/// Scan the book and return the outline without writing anything.
pub fn outline_book(config: &BuildConfig) -> Result<Outline> {
    assemble_outline(&config.outline, &config.source())
}

/// Regenerate the summary file and, when `render` is set and the renderer is
/// enabled, build the book.
///
/// The summary is only written once every section scanned successfully.
#[instrument(skip_all, fields(book_dir = %config.book_dir.display(), render = render))]
pub fn build_book(config: &BuildConfig, render: bool) -> Result<BuildReport> {
    let start = Instant::now();

    let outline = outline_book(config)?;
    let text = outline.render(&config.outline.indent);
    let summary_path = config.summary_path();
    write_summary(&summary_path, &text)?;

    let rendered = if !render {
        false
    } else if !config.renderer.enabled {
        warn!("renderer disabled in config, skipping book build");
        false
    } else {
        run_renderer(&config.renderer, &config.book_dir)?;
        true
    };

    let report = BuildReport {
        summary_path,
        sections: outline
            .sections
            .iter()
            .map(|s| (s.section.label.clone(), s.lines.len()))
            .collect(),
        rendered,
        elapsed: start.elapsed(),
    };

    info!(
        entries = report.entry_count(),
        rendered,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "build complete"
    );

    Ok(report)
}

/// Fail with a validation error when the summary on disk differs from what
/// would be generated now.
#[instrument(skip_all, fields(book_dir = %config.book_dir.display()))]
pub fn check_summary(config: &BuildConfig) -> Result<()> {
    let text = outline_book(config)?.render(&config.outline.indent);
    let path = config.summary_path();

    if !summary_is_current(&path, &text)? {
        return Err(BookgenError::validation(format!(
            "{} is out of date; run `bookgen build`",
            path.display()
        )));
    }

    info!(path = %path.display(), "summary is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bookgen-pipeline-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn make_book(root: &Path) {
        write(root, "src/introduction.md", "# Introduction\n");
        write(root, "src/implemented/0100-foo.md", "# Foo Feature\n");
        write(root, "src/implemented/0099-bar.md", "plain text\n");
        write(root, "src/implemented/README.md", "# Readme\n");
        write(root, "src/active/0120-feature.md", "# Feature\n");
        write(root, "src/active/0120-feature/extra.md", "intro\n# Extra\n");
        std::fs::create_dir_all(root.join("src/deferred")).unwrap();
    }

    fn config(root: &Path) -> BuildConfig {
        BuildConfig::new(root, &AppConfig::default())
    }

    #[test]
    fn build_writes_summary_without_render() {
        let tmp = temp_dir();
        make_book(&tmp);

        let report = build_book(&config(&tmp), false).unwrap();
        assert!(!report.rendered);
        assert_eq!(report.entry_count(), 4);
        assert_eq!(
            report.sections,
            vec![
                ("Implemented RFCs".to_string(), 2),
                ("Active RFCs".to_string(), 2),
                ("Deferred RFCs".to_string(), 0),
            ]
        );

        let summary = std::fs::read_to_string(tmp.join("src/SUMMARY.md")).unwrap();
        let expected = "\
[Introduction](introduction.md)

# Implemented RFCs

- [0099-bar](implemented/0099-bar.md)
- [Foo Feature](implemented/0100-foo.md)

# Active RFCs

- [Feature](active/0120-feature.md)
    - [Extra](active/0120-feature/extra.md)

# Deferred RFCs

";
        assert_eq!(summary, expected);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn failed_scan_leaves_existing_summary_alone() {
        let tmp = temp_dir();
        make_book(&tmp);
        write(&tmp, "src/SUMMARY.md", "previous\n");
        std::fs::remove_dir_all(tmp.join("src/deferred")).unwrap();

        assert!(build_book(&config(&tmp), false).is_err());
        let summary = std::fs::read_to_string(tmp.join("src/SUMMARY.md")).unwrap();
        assert_eq!(summary, "previous\n");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_asset_in_companion_dir_is_ignored() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp = temp_dir();
        make_book(&tmp);
        let asset_dir = tmp.join("src/active/0120-feature");
        std::fs::write(asset_dir.join(OsStr::from_bytes(b"diagr\xE9m.svg")), "<svg/>").unwrap();

        let report = build_book(&config(&tmp), false).unwrap();
        assert_eq!(report.entry_count(), 4);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn check_tracks_changes() {
        let tmp = temp_dir();
        make_book(&tmp);
        let config = config(&tmp);

        assert!(check_summary(&config).is_err());
        build_book(&config, false).unwrap();
        check_summary(&config).unwrap();

        write(&tmp, "src/deferred/0300-later.md", "# Later\n");
        let err = check_summary(&config).unwrap_err();
        assert!(err.to_string().contains("out of date"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn disabled_renderer_is_skipped() {
        let tmp = temp_dir();
        make_book(&tmp);
        let mut app = AppConfig::default();
        app.renderer.enabled = false;
        app.renderer.command = "bookgen-no-such-renderer".into();

        let report = build_book(&BuildConfig::new(&tmp, &app), true).unwrap();
        assert!(!report.rendered);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[cfg(unix)]
    #[test]
    fn renderer_failure_propagates_after_summary_written() {
        let tmp = temp_dir();
        make_book(&tmp);
        let mut app = AppConfig::default();
        app.renderer.command = "false".into();
        app.renderer.args = vec![];

        let err = build_book(&BuildConfig::new(&tmp, &app), true).unwrap_err();
        assert!(matches!(err, BookgenError::Render(_)));
        assert!(tmp.join("src/SUMMARY.md").exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
