//! Error types for bookgen.
//!
//! Library crates use [`BookgenError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all bookgen operations.
#[derive(Debug, thiserror::Error)]
pub enum BookgenError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Content that cannot be turned into an outline (bad names, stale summary, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// The downstream book renderer could not be run or reported failure.
    #[error("render error: {0}")]
    Render(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BookgenError>;

impl BookgenError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = BookgenError::config("extension must not be empty");
        assert_eq!(err.to_string(), "config error: extension must not be empty");

        let err = BookgenError::validation("src/SUMMARY.md is out of date");
        assert!(err.to_string().contains("out of date"));

        let err = BookgenError::Render("mdbook exited with status 1".into());
        assert_eq!(err.to_string(), "render error: mdbook exited with status 1");
    }

    #[test]
    fn io_error_keeps_path() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = BookgenError::io("src/active", source);
        let msg = err.to_string();
        assert!(msg.contains("src/active"));
        assert!(msg.contains("gone"));
    }
}
