//! Shared types, error model, and configuration for snippetlib.
//!
//! This crate is the foundation depended on by all other snippetlib crates.
//! It provides:
//! - [`SnippetLibError`]: the unified error type
//! - Domain records ([`Component`], [`Section`], [`PageLabels`], [`TransformContext`])
//! - Configuration ([`AppConfig`], [`LibraryConfig`], [`ExtractionMode`], config loading)
//! - Path segment sanitizing ([`sanitize`])

pub mod config;
pub mod error;
pub mod paths;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ExtractionMode, LibraryConfig, LibrarySection, SiteSection, config_dir,
    config_file_path, init_config, load_config, load_config_from, session_cookie,
};
pub use error::{Result, SnippetLibError};
pub use paths::{sanitize, sanitize_segment};
pub use types::{Component, PageLabels, Section, TransformContext};
