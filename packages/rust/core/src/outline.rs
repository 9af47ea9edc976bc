//! Outline builder.
//!
//! Walks each section directory depth-first and turns every document into an
//! [`OutlineLine`]. A document `X.md` with a sibling directory `X/` is
//! followed immediately by the outline of `X/`, one level deeper.

use std::path::{Component, Path};

use tracing::{debug, instrument};

use bookgen_shared::{
    BookgenError, Entry, Introduction, OutlineConfig, OutlineLine, Result, Section,
};

use crate::source::{ContentSource, EntryKind};
use crate::title::extract_title;

/// The lines generated for one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionOutline {
    pub section: Section,
    pub lines: Vec<OutlineLine>,
}

/// A complete outline, ready to be rendered into a summary file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline {
    pub introduction: Introduction,
    pub sections: Vec<SectionOutline>,
}

impl Outline {
    /// Total number of document lines across all sections.
    pub fn entry_count(&self) -> usize {
        self.sections.iter().map(|s| s.lines.len()).sum()
    }

    /// Render the summary text.
    ///
    /// ```text
    /// [Introduction](introduction.md)
    ///
    /// # Implemented RFCs
    ///
    /// - [Foo](implemented/0001-foo.md)
    ///
    /// # Active RFCs
    ///
    /// ```
    pub fn render(&self, indent_unit: &str) -> String {
        let mut out = self.introduction.render();
        out.push_str("\n\n");

        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&section.section.heading());
            out.push_str("\n\n");
            for line in &section.lines {
                out.push_str(&line.render(indent_unit));
                out.push('\n');
            }
        }

        out
    }
}

/// Build the full summary text for the configured sections.
pub fn build_outline<S>(config: &OutlineConfig, source: &S) -> Result<String>
where
    S: ContentSource + ?Sized,
{
    Ok(assemble_outline(config, source)?.render(&config.indent))
}

/// Scan every configured section, in declared order.
///
/// Any missing section directory or unreadable document aborts the whole
/// outline.
#[instrument(skip_all, fields(sections = config.sections.len()))]
pub fn assemble_outline<S>(config: &OutlineConfig, source: &S) -> Result<Outline>
where
    S: ContentSource + ?Sized,
{
    config.validate()?;

    let mut sections = Vec::with_capacity(config.sections.len());
    for section in &config.sections {
        let dir = config.section_dir(section);
        let lines = collect(config, source, &dir, 0)?;
        debug!(label = %section.label, entries = lines.len(), "section scanned");
        sections.push(SectionOutline {
            section: section.clone(),
            lines,
        });
    }

    Ok(Outline {
        introduction: config.introduction.clone(),
        sections,
    })
}

/// Outline lines for the documents in `dir` and their companion directories,
/// in depth-first pre-order, starting at `depth`.
pub fn collect<S>(
    config: &OutlineConfig,
    source: &S,
    dir: &Path,
    depth: usize,
) -> Result<Vec<OutlineLine>>
where
    S: ContentSource + ?Sized,
{
    let mut lines = Vec::new();
    collect_into(config, source, dir, depth, &mut lines)?;
    Ok(lines)
}

fn collect_into<S>(
    config: &OutlineConfig,
    source: &S,
    dir: &Path,
    depth: usize,
    out: &mut Vec<OutlineLine>,
) -> Result<()>
where
    S: ContentSource + ?Sized,
{
    let names = document_names(config, source, dir)?;
    debug!(dir = %dir.display(), depth, documents = names.len(), "scanning directory");

    let suffix = config.suffix();
    for name in names {
        let display_name = name[..name.len() - suffix.len()].to_string();
        let path = dir.join(&name);
        let title = extract_title(source, &path)?;
        let entry = Entry {
            display_name,
            path,
            title,
            depth,
        };

        out.push(OutlineLine {
            depth,
            title: entry.title_or_name().to_string(),
            link: link_target(&config.content_root, &entry.path)?,
        });

        // `.md` alone has no name to match a directory against.
        if entry.display_name.is_empty() {
            continue;
        }
        let companion = dir.join(&entry.display_name);
        if source.is_dir(&companion) {
            collect_into(config, source, &companion, depth + 1, out)?;
        }
    }

    Ok(())
}

/// Sorted names of the documents directly inside `dir`, exclusions removed.
fn document_names<S>(config: &OutlineConfig, source: &S, dir: &Path) -> Result<Vec<String>>
where
    S: ContentSource + ?Sized,
{
    let suffix = config.suffix();
    let mut names: Vec<String> = source
        .list_dir(dir)?
        .into_iter()
        .filter(|entry| entry.kind == EntryKind::File && entry.name.ends_with(&suffix))
        .map(|entry| entry.name)
        .filter(|name| !config.is_excluded(name))
        .collect();

    // Byte-wise ordering; names within one directory are unique.
    names.sort_unstable();
    Ok(names)
}

/// `/`-separated path of `path` relative to `content_root`.
fn link_target(content_root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(content_root).map_err(|_| {
        BookgenError::validation(format!(
            "{} is outside the content root {}",
            path.display(),
            content_root.display()
        ))
    })?;

    let segments: Vec<_> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(segment) => Some(segment.to_string_lossy()),
            _ => None,
        })
        .collect();

    Ok(segments.join("/"))
}
