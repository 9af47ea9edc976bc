//! Core domain types for a generated book outline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

/// A labeled top-level group of the outline, backed by one directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Heading text written above the group (e.g., `Implemented RFCs`).
    pub label: String,
    /// Directory holding the group's documents, relative to the content root.
    pub dir: PathBuf,
}

impl Section {
    pub fn new(label: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            dir: dir.into(),
        }
    }

    /// The heading line that opens this section in the summary.
    pub fn heading(&self) -> String {
        format!("# {}", self.label)
    }
}

// ---------------------------------------------------------------------------
// Introduction
// ---------------------------------------------------------------------------

/// Fixed link written as the first line of the summary. Not derived from a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Introduction {
    pub title: String,
    /// Link target relative to the content root.
    pub link: String,
}

impl Introduction {
    pub fn render(&self) -> String {
        format!("[{}]({})", self.title, self.link)
    }
}

impl Default for Introduction {
    fn default() -> Self {
        Self {
            title: "Introduction".into(),
            link: "introduction.md".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// A document found while scanning a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// File name without the document extension.
    pub display_name: String,
    /// Path of the document as seen by the content source.
    pub path: PathBuf,
    /// Title extracted from the first heading line, if any.
    pub title: Option<String>,
    /// Nesting level, 0 for documents directly inside a section directory.
    pub depth: usize,
}

impl Entry {
    /// The extracted title, or the display name when the document has none.
    pub fn title_or_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.display_name)
    }
}

// ---------------------------------------------------------------------------
// OutlineLine
// ---------------------------------------------------------------------------

/// One line of the generated summary: an indented link to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineLine {
    pub depth: usize,
    pub title: String,
    /// `/`-separated path relative to the content root.
    pub link: String,
}

impl OutlineLine {
    /// Render as `{indent × depth}- [title](link)`, without a trailing newline.
    pub fn render(&self, indent_unit: &str) -> String {
        format!(
            "{}- [{}]({})",
            indent_unit.repeat(self.depth),
            self.title,
            self.link
        )
    }
}
