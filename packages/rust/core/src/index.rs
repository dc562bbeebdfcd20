//! Index page rendering for a finished catalog.
//!
//! Writes `index.html` at the output root (every category, subcategory and
//! section) plus one page per section at the section's own URL.

use std::path::{Path, PathBuf};

use maud::{DOCTYPE, Markup, html};
use tracing::{debug, info, instrument, warn};

use snippetlib_shared::{Result, SnippetLibError};

use crate::catalog::{Catalog, CatalogEntry};

/// Summary of an index build.
#[derive(Debug, Clone, Default)]
pub struct IndexResult {
    /// Number of HTML index pages written (root included).
    pub pages_written: usize,
}

/// Render index pages for `catalog` under `output_root`.
///
/// Reads the catalog only. A section page is not written when a component
/// file already occupies its path.
#[instrument(skip_all, fields(output_root = %output_root.display()))]
pub fn build_index(catalog: &Catalog, output_root: &Path) -> Result<IndexResult> {
    let entries = catalog.sections();
    let mut pages_written = 0;

    for entry in &entries {
        let path = site_path(output_root, &entry.section.url);
        let shadows_component = entry
            .section
            .components
            .iter()
            .any(|c| c.url == entry.section.url);
        if shadows_component {
            warn!(url = %entry.section.url, "a component occupies the section index path, skipping");
            continue;
        }

        write_page(&path, &render_section(entry).into_string())?;
        pages_written += 1;
    }

    let root = output_root.join("index.html");
    write_page(&root, &render_root(&entries).into_string())?;
    pages_written += 1;

    info!(pages_written, sections = entries.len(), "index pages built");
    Ok(IndexResult { pages_written })
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

type SectionGroup<'e, 'a> = (&'a str, Vec<&'e CatalogEntry<'a>>);
type CategoryGroup<'e, 'a> = (&'a str, Vec<SectionGroup<'e, 'a>>);

/// Group key-ordered entries by category, then subcategory.
fn group_entries<'e, 'a>(entries: &'e [CatalogEntry<'a>]) -> Vec<CategoryGroup<'e, 'a>> {
    let mut groups: Vec<CategoryGroup<'e, 'a>> = Vec::new();

    for entry in entries {
        if groups.last().is_none_or(|(category, _)| *category != entry.category) {
            groups.push((entry.category, Vec::new()));
        }
        let Some((_, subcategories)) = groups.last_mut() else {
            continue;
        };
        if subcategories
            .last()
            .is_none_or(|(subcategory, _)| *subcategory != entry.subcategory)
        {
            subcategories.push((entry.subcategory, Vec::new()));
        }
        if let Some((_, sections)) = subcategories.last_mut() {
            sections.push(entry);
        }
    }

    groups
}

fn render_root(entries: &[CatalogEntry<'_>]) -> Markup {
    let groups = group_entries(entries);

    layout(
        "Component library",
        html! {
            h1 { "Component library" }
            @for (category, subcategories) in &groups {
                h2 { (category) }
                @for (subcategory, sections) in subcategories {
                    h3 { (subcategory) }
                    ul {
                        @for entry in sections {
                            li {
                                a href=(entry.section.url.trim_start_matches('/')) { (entry.section_name) }
                                " (" (entry.section.components.len()) ")"
                            }
                        }
                    }
                }
            }
        },
    )
}

fn render_section(entry: &CatalogEntry<'_>) -> Markup {
    layout(
        entry.section_name,
        html! {
            p { (entry.category) " / " (entry.subcategory) }
            h1 { (entry.section_name) }
            ul {
                @for component in &entry.section.components {
                    li {
                        a href=(relative_href(&entry.section.url, &component.url)) { (component.title) }
                        " "
                        code { (component.hash.get(..8).unwrap_or(&component.hash)) }
                    }
                }
            }
        },
    )
}

fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (title) }
            }
            body { (body) }
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Link from the page at site URL `from` to site URL `to`, relative to
/// `from`'s directory.
fn relative_href(from: &str, to: &str) -> String {
    let from_dirs: Vec<&str> = from
        .trim_start_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    let from_dirs = &from_dirs[..from_dirs.len().saturating_sub(1)];
    let target: Vec<&str> = to
        .trim_start_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    let common = from_dirs
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count()
        .min(target.len().saturating_sub(1));

    let mut parts: Vec<&str> = vec![".."; from_dirs.len() - common];
    parts.extend(&target[common..]);
    parts.join("/")
}

/// Map a site-relative URL onto the output root.
fn site_path(output_root: &Path, url: &str) -> PathBuf {
    output_root.join(url.trim_start_matches('/'))
}

fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SnippetLibError::io(parent, e))?;
    }
    std::fs::write(path, html).map_err(|e| SnippetLibError::io(path, e))?;
    debug!(path = %path.display(), "wrote index page");
    Ok(())
}
