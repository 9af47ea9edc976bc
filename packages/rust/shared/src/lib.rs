//! Shared types, error model, and configuration for bookgen.
//!
//! This crate is the foundation depended on by the other bookgen crates.
//! It provides:
//! - [`BookgenError`], the unified error type
//! - Domain types ([`Section`], [`Entry`], [`OutlineLine`], [`Introduction`])
//! - Configuration ([`AppConfig`], [`OutlineConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BookConfig, CONFIG_FILE_NAME, OutlineConfig, RendererConfig, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{BookgenError, Result};
pub use types::{Entry, Introduction, OutlineLine, Section};
