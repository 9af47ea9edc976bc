//! Outline generation and build orchestration for bookgen.
//!
//! This crate scans a book's section directories, extracts document titles,
//! and turns them into an mdBook `SUMMARY.md`, then hands off to the renderer.

pub mod outline;
pub mod pipeline;
pub mod render;
pub mod source;
pub mod summary;
pub mod title;
