//! Core domain records for the component library.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

// ---------------------------------------------------------------------------
// Component / Section
// ---------------------------------------------------------------------------

/// One extracted component as recorded in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Hex digest of the component's logical path.
    pub hash: String,
    /// Title as shown on the source page.
    pub title: String,
    /// Site-relative URL of the written file (e.g. `/components/buttons/default.html`).
    pub url: String,
}

/// One `<h2>`-delimited group of components on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Site-relative URL of the section's index page.
    pub url: String,
    /// Components in extraction order.
    pub components: Vec<Component>,
}

// ---------------------------------------------------------------------------
// PageLabels
// ---------------------------------------------------------------------------

/// The catalog keys resolved from a page's navigation and headings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLabels {
    pub category: String,
    pub subcategory: String,
    pub section: String,
}

// ---------------------------------------------------------------------------
// TransformContext
// ---------------------------------------------------------------------------

/// Read-only context handed to every transformer invocation.
#[derive(Debug, Clone)]
pub struct TransformContext {
    /// Root URL of the site the component came from.
    pub root_url: Url,
    /// Root directory the library is written to.
    pub output_root: PathBuf,
    /// Component title.
    pub title: String,
    /// `pageUrl/sanitizedTitle`, e.g. `/components/buttons/with_icon`.
    pub logical_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_serialization() {
        let section = Section {
            url: "/components/buttons/index.html".into(),
            components: vec![Component {
                hash: "abc".into(),
                title: "Default".into(),
                url: "/components/buttons/default.html".into(),
            }],
        };

        let json = serde_json::to_value(&section).expect("serialize");
        assert_eq!(json["url"], "/components/buttons/index.html");
        assert_eq!(json["components"][0]["title"], "Default");

        let parsed: Section = serde_json::from_value(json).expect("deserialize");
        assert_eq!(parsed, section);
    }
}
