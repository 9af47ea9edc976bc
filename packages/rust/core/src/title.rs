//! Document title extraction.
//!
//! The title of a document is the first line starting with `#`, minus its
//! first two characters (marker and separator). Nothing is trimmed, so
//! `#  Spaced ` yields `" Spaced "`. Deeper headings get the same treatment:
//! `## Sub` yields `" Sub"`. The line terminator is never part of the title.

use std::path::Path;

use tracing::trace;

use bookgen_shared::Result;

use crate::source::ContentSource;

/// Character a title line starts with.
pub const HEADING_MARKER: char = '#';

/// Marker plus one separator character.
const PREFIX_CHARS: usize = 2;

/// Read the title of the document at `path`.
///
/// Returns `Ok(None)` when the document has no heading line, or when the
/// first heading line is empty after the prefix. Open and read failures
/// are returned as errors.
pub fn extract_title<S>(source: &S, path: &Path) -> Result<Option<String>>
where
    S: ContentSource + ?Sized,
{
    let title = title_from_lines(source.lines(path)?)?;
    trace!(path = %path.display(), ?title, "extracted title");
    Ok(title)
}

/// First heading text in `lines`. Stops reading at the first heading line.
pub fn title_from_lines<I>(lines: I) -> Result<Option<String>>
where
    I: IntoIterator<Item = Result<String>>,
{
    for line in lines {
        let line = line?;
        if line.starts_with(HEADING_MARKER) {
            return Ok(heading_text(&line));
        }
    }
    Ok(None)
}

fn heading_text(line: &str) -> Option<String> {
    let rest = match line.char_indices().nth(PREFIX_CHARS) {
        Some((idx, _)) => &line[idx..],
        None => "",
    };
    (!rest.is_empty()).then(|| rest.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    fn title_of(content: &str) -> Option<String> {
        let lines = content.lines().map(|l| Ok::<_, bookgen_shared::BookgenError>(l.to_string()));
        title_from_lines(lines).unwrap()
    }

    #[test]
    fn first_heading_line_wins() {
        assert_eq!(title_of("# Foo Feature\n# Later\n"), Some("Foo Feature".into()));
    }

    #[test]
    fn skips_leading_non_heading_lines() {
        let doc = "- Feature Name: foo\n- Start Date: 2020-01-01\n\n# Summary\n";
        assert_eq!(title_of(doc), Some("Summary".into()));
    }

    #[test]
    fn indented_marker_does_not_count() {
        assert_eq!(title_of("  # Not a title\nbody\n"), None);
    }

    #[test]
    fn no_heading_yields_none() {
        assert_eq!(title_of("just text\nmore text\n"), None);
        assert_eq!(title_of(""), None);
    }

    #[test]
    fn remainder_is_not_trimmed() {
        assert_eq!(title_of("#  Spaced \t\n"), Some(" Spaced \t".into()));
        assert_eq!(title_of("## Sub\n"), Some(" Sub".into()));
        assert_eq!(title_of("#Tight\n"), Some("ight".into()));
    }

    #[test]
    fn bare_marker_yields_none() {
        assert_eq!(title_of("#\n# Second\n"), None);
        assert_eq!(title_of("# \n"), None);
    }

    #[test]
    fn prefix_is_counted_in_characters() {
        assert_eq!(title_of("#éÉtude\n"), Some("Étude".into()));
    }

    #[test]
    fn read_errors_propagate() {
        let source = MemorySource::new().unreadable("src/active/locked.md");
        assert!(extract_title(&source, Path::new("src/active/locked.md")).is_err());
    }

    #[test]
    fn extracts_through_source() {
        let source = MemorySource::new().file("src/implemented/0100-foo.md", "# Foo Feature\n");
        let title = extract_title(&source, Path::new("src/implemented/0100-foo.md")).unwrap();
        assert_eq!(title.as_deref(), Some("Foo Feature"));
    }
}
