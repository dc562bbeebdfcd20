//! Application configuration for snippetlib.
//!
//! User config lives at `~/.snippetlib/snippetlib.toml`.
//! CLI flags override config file values, which override defaults.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SnippetLibError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "snippetlib.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".snippetlib";

// ---------------------------------------------------------------------------
// Config structs (matching snippetlib.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Source site settings.
    #[serde(default)]
    pub site: SiteSection,

    /// Library output settings.
    #[serde(default)]
    pub library: LibrarySection,
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSection {
    /// Root URL that page paths are resolved against.
    #[serde(default = "default_root_url")]
    pub root_url: String,

    /// Path of the listing page that links to every component page.
    #[serde(default = "default_listing_path")]
    pub listing_path: String,

    /// CSS selector matching the component page links on the listing page.
    #[serde(default = "default_listing_selector")]
    pub listing_selector: String,

    /// Name of the env var holding a session cookie (never store the cookie itself).
    #[serde(default = "default_session_cookie_env")]
    pub session_cookie_env: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            root_url: default_root_url(),
            listing_path: default_listing_path(),
            listing_selector: default_listing_selector(),
            session_cookie_env: default_session_cookie_env(),
        }
    }
}

fn default_root_url() -> String {
    "https://tailwindui.com".into()
}
fn default_listing_path() -> String {
    "/components".into()
}
fn default_listing_selector() -> String {
    ".grid a".into()
}
fn default_session_cookie_env() -> String {
    "SNIPPETLIB_SESSION_COOKIE".into()
}

/// `[library]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibrarySection {
    /// Output root directory.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Extraction mode: "embedded-framework" or "source-comment".
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Ordered transformer names.
    #[serde(default)]
    pub transformers: Vec<String>,

    /// Maximum number of listing links to process (all when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<usize>,

    /// Whether to render index pages after the run.
    #[serde(default)]
    pub build_index: bool,
}

impl Default for LibrarySection {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            mode: default_mode(),
            transformers: Vec::new(),
            max_pages: None,
            build_index: false,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}
fn default_mode() -> String {
    ExtractionMode::EmbeddedFramework.to_string()
}

// ---------------------------------------------------------------------------
// Extraction mode
// ---------------------------------------------------------------------------

/// How raw component markup is recovered from a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// Take the markup from the sibling preview iframe's `srcdoc`.
    EmbeddedFramework,
    /// Take the literal text of the code placeholder.
    SourceComment,
}

impl FromStr for ExtractionMode {
    type Err = SnippetLibError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "embedded-framework" | "alpine" => Ok(Self::EmbeddedFramework),
            "source-comment" | "comments" => Ok(Self::SourceComment),
            other => Err(SnippetLibError::config(format!(
                "unknown extraction mode '{other}': expected 'embedded-framework' or 'source-comment'"
            ))),
        }
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmbeddedFramework => f.write_str("embedded-framework"),
            Self::SourceComment => f.write_str("source-comment"),
        }
    }
}

// ---------------------------------------------------------------------------
// Library config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Validated runtime configuration, built once and passed by reference.
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    /// Root URL of the source site.
    pub root_url: Url,
    /// Listing page path.
    pub listing_path: String,
    /// Selector for component page links on the listing page.
    pub listing_selector: String,
    /// Output root directory.
    pub output_root: PathBuf,
    /// Active extraction mode.
    pub mode: ExtractionMode,
    /// Ordered transformer names.
    pub transformers: Vec<String>,
    /// Maximum number of listing links to process.
    pub max_pages: Option<usize>,
    /// Whether to render index pages.
    pub build_index: bool,
}

impl TryFrom<&AppConfig> for LibraryConfig {
    type Error = SnippetLibError;

    fn try_from(config: &AppConfig) -> Result<Self> {
        let root_url = Url::parse(&config.site.root_url).map_err(|e| {
            SnippetLibError::config(format!("invalid root_url '{}': {e}", config.site.root_url))
        })?;

        if !config.site.listing_path.starts_with('/') {
            return Err(SnippetLibError::config(format!(
                "listing_path must start with '/': got '{}'",
                config.site.listing_path
            )));
        }

        if config.library.output_dir.trim().is_empty() {
            return Err(SnippetLibError::config("output_dir must not be empty"));
        }

        Ok(Self {
            root_url,
            listing_path: config.site.listing_path.clone(),
            listing_selector: config.site.listing_selector.clone(),
            output_root: PathBuf::from(&config.library.output_dir),
            mode: config.library.mode.parse()?,
            transformers: config
                .library
                .transformers
                .iter()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
            max_pages: config.library.max_pages,
            build_index: config.library.build_index,
        })
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.snippetlib/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SnippetLibError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.snippetlib/snippetlib.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SnippetLibError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| SnippetLibError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| SnippetLibError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SnippetLibError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| SnippetLibError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read the session cookie from the env var named in the config, if set and non-empty.
pub fn session_cookie(config: &AppConfig) -> Option<String> {
    std::env::var(&config.site.session_cookie_env)
        .ok()
        .filter(|val| !val.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("output_dir"));
        assert!(toml_str.contains("embedded-framework"));
        assert!(toml_str.contains("SNIPPETLIB_SESSION_COOKIE"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.site.listing_path, "/components");
        assert!(!parsed.library.build_index);
        assert!(parsed.library.max_pages.is_none());
    }

    #[test]
    fn config_with_library_section() {
        let toml_str = r#"
[site]
root_url = "https://ui.example.com"

[library]
output_dir = "/tmp/library"
mode = "source-comment"
transformers = ["absolute-urls", " ", "strip-comments"]
max_pages = 3
build_index = true
"#;
        let app: AppConfig = toml::from_str(toml_str).expect("parse");
        let config = LibraryConfig::try_from(&app).expect("valid config");
        assert_eq!(config.root_url.as_str(), "https://ui.example.com/");
        assert_eq!(config.mode, ExtractionMode::SourceComment);
        assert_eq!(config.transformers, vec!["absolute-urls", "strip-comments"]);
        assert_eq!(config.max_pages, Some(3));
        assert!(config.build_index);
        assert_eq!(config.listing_selector, ".grid a");
    }

    #[test]
    fn extraction_mode_parsing() {
        assert_eq!(
            "embedded-framework".parse::<ExtractionMode>().unwrap(),
            ExtractionMode::EmbeddedFramework
        );
        assert_eq!("alpine".parse::<ExtractionMode>().unwrap(), ExtractionMode::EmbeddedFramework);
        assert_eq!("comments".parse::<ExtractionMode>().unwrap(), ExtractionMode::SourceComment);

        let err = "react".parse::<ExtractionMode>().unwrap_err();
        assert!(err.to_string().contains("unknown extraction mode 'react'"));
    }

    #[test]
    fn unknown_mode_rejected_at_config_build() {
        let mut app = AppConfig::default();
        app.library.mode = "vue".into();
        let err = LibraryConfig::try_from(&app).unwrap_err();
        assert!(matches!(err, SnippetLibError::Config { .. }));
    }

    #[test]
    fn invalid_root_url_rejected() {
        let mut app = AppConfig::default();
        app.site.root_url = "not a url".into();
        assert!(LibraryConfig::try_from(&app).is_err());
    }

    #[test]
    fn session_cookie_missing() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.site.session_cookie_env = "SNIPPETLIB_TEST_NONEXISTENT_COOKIE_12345".into();
        assert!(session_cookie(&config).is_none());
    }
}
