//! Configuration for bookgen.
//!
//! The config file lives next to the book as `<book_dir>/bookgen.toml`.
//! A missing file means "use the defaults", which describe the classic RFC
//! book layout (`src/{implemented,active,deferred}`).

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BookgenError, Result};
use crate::types::{Introduction, Section};

/// Default configuration file name, looked up in the book directory.
pub const CONFIG_FILE_NAME: &str = "bookgen.toml";

// ---------------------------------------------------------------------------
// Config structs (matching bookgen.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Layout of the book sources.
    #[serde(default)]
    pub book: BookConfig,

    /// Leading link written before any section.
    #[serde(default)]
    pub introduction: Introduction,

    /// Sections, in the order they appear in the summary.
    #[serde(default = "default_sections")]
    pub sections: Vec<Section>,

    /// Renderer invoked after the summary is written.
    #[serde(default)]
    pub renderer: RendererConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            book: BookConfig::default(),
            introduction: Introduction::default(),
            sections: default_sections(),
            renderer: RendererConfig::default(),
        }
    }
}

fn default_sections() -> Vec<Section> {
    vec![
        Section::new("Implemented RFCs", "implemented"),
        Section::new("Active RFCs", "active"),
        Section::new("Deferred RFCs", "deferred"),
    ]
}

/// `[book]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookConfig {
    /// Directory holding the book sources, relative to the book directory.
    /// Link targets in the summary are relative to it.
    #[serde(default = "default_content_root")]
    pub content_root: PathBuf,

    /// Summary file name, relative to the content root.
    #[serde(default = "default_summary_file")]
    pub summary_file: PathBuf,

    /// Document extension, without the leading dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// File names that never appear in the outline.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Indentation unit, repeated once per nesting level.
    #[serde(default = "default_indent")]
    pub indent: String,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            content_root: default_content_root(),
            summary_file: default_summary_file(),
            extension: default_extension(),
            exclude: default_exclude(),
            indent: default_indent(),
        }
    }
}

fn default_content_root() -> PathBuf {
    "src".into()
}
fn default_summary_file() -> PathBuf {
    "SUMMARY.md".into()
}
fn default_extension() -> String {
    "md".into()
}
fn default_exclude() -> Vec<String> {
    vec!["README.md".into()]
}
fn default_indent() -> String {
    "    ".into()
}

/// `[renderer]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Whether `build` runs the renderer after writing the summary.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Program to run, looked up on `PATH`.
    #[serde(default = "default_renderer_command")]
    pub command: String,

    /// Arguments passed to the program.
    #[serde(default = "default_renderer_args")]
    pub args: Vec<String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: default_renderer_command(),
            args: default_renderer_args(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_renderer_command() -> String {
    "mdbook".into()
}
fn default_renderer_args() -> Vec<String> {
    vec!["build".into()]
}

// ---------------------------------------------------------------------------
// Outline config (runtime, derived from the config file)
// ---------------------------------------------------------------------------

/// Runtime outline configuration, threaded through every traversal call.
///
/// All paths are relative to the book directory; the content source decides
/// what they are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineConfig {
    pub content_root: PathBuf,
    /// Relative to `content_root`.
    pub summary_file: PathBuf,
    pub extension: String,
    pub exclude: Vec<String>,
    pub indent: String,
    pub introduction: Introduction,
    pub sections: Vec<Section>,
}

impl From<&AppConfig> for OutlineConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            content_root: config.book.content_root.clone(),
            summary_file: config.book.summary_file.clone(),
            extension: config.book.extension.clone(),
            exclude: config.book.exclude.clone(),
            indent: config.book.indent.clone(),
            introduction: config.introduction.clone(),
            sections: config.sections.clone(),
        }
    }
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl OutlineConfig {
    /// Path of the generated summary, relative to the book directory.
    pub fn summary_path(&self) -> PathBuf {
        self.content_root.join(&self.summary_file)
    }

    /// Directory scanned for `section`, relative to the book directory.
    pub fn section_dir(&self, section: &Section) -> PathBuf {
        self.content_root.join(&section.dir)
    }

    /// `.md`-style suffix a document name must end with.
    pub fn suffix(&self) -> String {
        format!(".{}", self.extension)
    }

    /// Whether `file_name` is in the exclusion set (exact match).
    pub fn is_excluded(&self, file_name: &str) -> bool {
        self.exclude.iter().any(|name| name == file_name)
    }

    /// Reject settings that would make link targets escape the content root.
    pub fn validate(&self) -> Result<()> {
        if self.extension.is_empty() {
            return Err(BookgenError::config("book.extension must not be empty"));
        }
        if self.extension.starts_with('.') || self.extension.contains('/') {
            return Err(BookgenError::config(format!(
                "book.extension must be a bare extension like \"md\", got {:?}",
                self.extension
            )));
        }

        check_relative("book.content_root", &self.content_root)?;
        check_relative("book.summary_file", &self.summary_file)?;
        if self.summary_file.as_os_str().is_empty() {
            return Err(BookgenError::config("book.summary_file must not be empty"));
        }

        for section in &self.sections {
            check_relative(&format!("section {:?} dir", section.label), &section.dir)?;
            if section.dir.as_os_str().is_empty() {
                return Err(BookgenError::config(format!(
                    "section {:?} must name a subdirectory of the content root",
                    section.label
                )));
            }
        }

        Ok(())
    }
}

fn check_relative(what: &str, path: &Path) -> Result<()> {
    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(BookgenError::config(format!(
            "{what} must be a relative path without '..', got {}",
            path.display()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Path of the config file for the book in `book_dir`.
pub fn config_file_path(book_dir: &Path) -> PathBuf {
    book_dir.join(CONFIG_FILE_NAME)
}

/// Load the config for the book in `book_dir`. Returns defaults if the file does not exist.
pub fn load_config(book_dir: &Path) -> Result<AppConfig> {
    let path = config_file_path(book_dir);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BookgenError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| BookgenError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a default config file into `book_dir`.
/// Returns the path to the created file. An existing file is left untouched.
pub fn init_config(book_dir: &Path) -> Result<PathBuf> {
    let path = config_file_path(book_dir);
    if path.exists() {
        return Err(BookgenError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| BookgenError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| BookgenError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
