//! Error types for snippetlib.
//!
//! Library crates use [`SnippetLibError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all snippetlib operations.
#[derive(Debug, thiserror::Error)]
pub enum SnippetLibError {
    /// Configuration loading or validation error. Always raised before any fetch.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while fetching a page.
    #[error("network error: {0}")]
    Network(String),

    /// A page is missing its category, subcategory or section labels.
    #[error("navigation error on {url}: {message}")]
    Navigation { url: String, message: String },

    /// A single component could not be recovered from its page.
    #[error("extraction error for component {title:?}: {message}")]
    Extraction { title: String, message: String },

    /// A transformer failed while rewriting a component.
    #[error("transformer '{name}' failed: {message}")]
    Transform { name: String, message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error.
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SnippetLibError>;

impl SnippetLibError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a navigation error for the page at `url`.
    pub fn navigation(url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Navigation {
            url: url.into(),
            message: msg.into(),
        }
    }

    /// Create an extraction error for the component titled `title`.
    pub fn extraction(title: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Extraction {
            title: title.into(),
            message: msg.into(),
        }
    }

    /// Create a transformer error.
    pub fn transform(name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transform {
            name: name.into(),
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
