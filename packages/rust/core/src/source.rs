//! Read access to the book sources.
//!
//! Traversal goes through [`ContentSource`] so the outline can be built from
//! the real filesystem ([`FsSource`]) or from an in-memory tree
//! ([`MemorySource`]) in tests.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use bookgen_shared::{BookgenError, Result};

/// Lazily produced lines of a document, without line terminators.
pub type Lines<'a> = Box<dyn Iterator<Item = Result<String>> + 'a>;

/// What a directory entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Other,
}

/// An immediate child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// Read-only view of a directory tree. Paths are relative to the book directory.
pub trait ContentSource {
    /// List the immediate children of `dir`, in no particular order.
    /// A missing or unreadable directory is an error.
    fn list_dir(&self, dir: &Path) -> Result<Vec<DirEntry>>;

    /// Whether `path` exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Open a document for line-oriented reading. The handle is released
    /// when the returned iterator is dropped.
    fn lines(&self, path: &Path) -> Result<Lines<'_>>;
}

// ---------------------------------------------------------------------------
// Filesystem
// ---------------------------------------------------------------------------

/// [`ContentSource`] backed by the filesystem under a book directory.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
    document_suffix: Option<String>,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            document_suffix: None,
        }
    }

    /// Names ending with `suffix` that are not valid UTF-8 make listing fail.
    /// Every other non UTF-8 name is skipped.
    pub fn with_document_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.document_suffix = Some(suffix.into());
        self
    }

    fn is_document_name(&self, raw: &std::ffi::OsStr) -> bool {
        self.document_suffix
            .as_deref()
            .is_some_and(|suffix| raw.as_encoded_bytes().ends_with(suffix.as_bytes()))
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl ContentSource for FsSource {
    fn list_dir(&self, dir: &Path) -> Result<Vec<DirEntry>> {
        let full = self.resolve(dir);
        let read_dir = std::fs::read_dir(&full).map_err(|e| BookgenError::io(&full, e))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| BookgenError::io(&full, e))?;
            let path = entry.path();
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) if self.is_document_name(&raw) => {
                    return Err(BookgenError::validation(format!(
                        "non UTF-8 file name {raw:?} in {}",
                        full.display()
                    )));
                }
                Err(raw) => {
                    debug!(dir = %full.display(), name = ?raw, "skipping non UTF-8 file name");
                    continue;
                }
            };

            // Follows symlinks.
            let kind = if path.is_file() {
                EntryKind::File
            } else if path.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::Other
            };
            entries.push(DirEntry { name, kind });
        }

        Ok(entries)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.resolve(path).is_dir()
    }

    fn lines(&self, path: &Path) -> Result<Lines<'_>> {
        let full = self.resolve(path);
        let file = File::open(&full).map_err(|e| BookgenError::io(&full, e))?;
        let lines = BufReader::new(file)
            .lines()
            .map(move |line| line.map_err(|e| BookgenError::io(&full, e)));
        Ok(Box::new(lines))
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Node {
    Dir,
    File(String),
    Unreadable,
}

/// In-memory [`ContentSource`], built up with [`MemorySource::file`] and
/// [`MemorySource::dir`]. Parent directories are created implicitly.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    nodes: BTreeMap<PathBuf, Node>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document with the given content.
    pub fn file(mut self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        self.insert(path.as_ref(), Node::File(content.into()));
        self
    }

    /// Add an empty directory.
    pub fn dir(mut self, path: impl AsRef<Path>) -> Self {
        self.insert(path.as_ref(), Node::Dir);
        self
    }

    /// Add a file that shows up in listings but fails to open.
    pub fn unreadable(mut self, path: impl AsRef<Path>) -> Self {
        self.insert(path.as_ref(), Node::Unreadable);
        self
    }

    fn insert(&mut self, path: &Path, node: Node) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.nodes.insert(ancestor.to_path_buf(), Node::Dir);
        }
        self.nodes.insert(path.to_path_buf(), node);
    }

    fn not_found(path: &Path) -> BookgenError {
        BookgenError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory"),
        )
    }
}

impl ContentSource for MemorySource {
    fn list_dir(&self, dir: &Path) -> Result<Vec<DirEntry>> {
        if !self.is_dir(dir) {
            return Err(Self::not_found(dir));
        }

        let entries = self
            .nodes
            .iter()
            .filter(|(path, _)| path.parent() == Some(dir))
            .filter_map(|(path, node)| {
                let name = path.file_name()?.to_str()?.to_string();
                let kind = match node {
                    Node::Dir => EntryKind::Dir,
                    Node::File(_) | Node::Unreadable => EntryKind::File,
                };
                Some(DirEntry { name, kind })
            })
            .collect();

        Ok(entries)
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.nodes.get(path), Some(Node::Dir))
    }

    fn lines(&self, path: &Path) -> Result<Lines<'_>> {
        match self.nodes.get(path) {
            Some(Node::File(content)) => Ok(Box::new(
                content.lines().map(|l| Ok::<_, BookgenError>(l.to_string())),
            )),
            Some(Node::Unreadable) => Err(BookgenError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
            )),
            _ => Err(Self::not_found(path)),
        }
    }
}
