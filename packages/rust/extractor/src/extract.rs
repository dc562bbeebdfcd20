//! Component extraction from a single component page.
//!
//! A page is expected to look roughly like this:
//!
//! ```text
//! nav > a (category), a (subcategory)
//! h2 (section)
//! div                         <- parent of the container, holds the preview iframe
//!   div                       <- container (three levels above the placeholder)
//!     h3 (component title)
//!     div > div > textarea    <- code placeholder
//!   iframe[srcdoc]
//! ```

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};

use snippetlib_shared::{ExtractionMode, PageLabels, Result, SnippetLibError, sanitize_segment};

/// Script include prepended to every component in embedded-framework mode.
pub const FRAMEWORK_SCRIPT: &str =
    r#"<script src="https://cdn.jsdelivr.net/gh/alpinejs/alpine@v2.0.1/dist/alpine.js" defer></script>"#;

static NAV_LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("nav a").expect("valid selector"));
static H2_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2").expect("valid selector"));
static H3_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h3").expect("valid selector"));
static PLACEHOLDER_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("textarea").expect("valid selector"));
static PREVIEW_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("iframe").expect("valid selector"));
static BODY_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("valid selector"));

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// A component as found on the page, before any transformation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawComponent {
    pub title: String,
    /// `pageUrl/sanitizedTitle`.
    pub logical_path: String,
    pub raw_code: String,
}

/// A component that could not be extracted; the rest of the page still is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedComponent {
    /// Position of the placeholder on the page.
    pub index: usize,
    pub title: String,
    pub reason: String,
}

/// Everything extracted from one page.
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    pub labels: PageLabels,
    /// Components in page order.
    pub components: Vec<RawComponent>,
    pub skipped: Vec<SkippedComponent>,
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Extract labels and component snippets from the page at `page_url`.
///
/// Missing navigation labels or section heading fail the whole page with a
/// navigation error. Per-component problems are collected in
/// [`ExtractedPage::skipped`].
#[instrument(skip_all, fields(page_url = %page_url, mode = %mode))]
pub fn extract_page(doc: &Html, page_url: &str, mode: ExtractionMode) -> Result<ExtractedPage> {
    let labels = extract_labels(doc, page_url)?;

    let placeholders: Vec<ElementRef> = doc.select(&PLACEHOLDER_SEL).collect();
    info!(
        count = placeholders.len(),
        "found {} component{}",
        placeholders.len(),
        if placeholders.len() == 1 { "" } else { "s" }
    );

    let mut components = Vec::with_capacity(placeholders.len());
    let mut skipped = Vec::new();

    for (index, placeholder) in placeholders.into_iter().enumerate() {
        match extract_component(placeholder, page_url, mode) {
            Ok(component) => {
                debug!(title = %component.title, path = %component.logical_path, "component extracted");
                components.push(component);
            }
            Err(e) => {
                let title = match &e {
                    SnippetLibError::Extraction { title, .. } => title.clone(),
                    _ => String::new(),
                };
                warn!(index, title = %title, error = %e, "skipping component");
                skipped.push(SkippedComponent {
                    index,
                    title,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(ExtractedPage {
        labels,
        components,
        skipped,
    })
}

/// Resolve category and subcategory from the first two nav links and the
/// section from the first `<h2>`.
fn extract_labels(doc: &Html, page_url: &str) -> Result<PageLabels> {
    let mut nav_links = doc.select(&NAV_LINK_SEL).map(|a| element_text(&a));

    let category = nav_links
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SnippetLibError::navigation(page_url, "missing category nav link"))?;
    let subcategory = nav_links
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SnippetLibError::navigation(page_url, "missing subcategory nav link"))?;

    let section = doc
        .select(&H2_SEL)
        .next()
        .map(|h2| element_text(&h2))
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SnippetLibError::navigation(page_url, "missing section heading (h2)"))?;

    Ok(PageLabels {
        category,
        subcategory,
        section,
    })
}

fn extract_component(
    placeholder: ElementRef,
    page_url: &str,
    mode: ExtractionMode,
) -> Result<RawComponent> {
    let container = (*placeholder)
        .ancestors()
        .nth(2)
        .and_then(ElementRef::wrap)
        .ok_or_else(|| SnippetLibError::extraction("", "placeholder has no container element"))?;

    let title = container
        .select(&H3_SEL)
        .next()
        .map(|h3| element_text(&h3))
        .unwrap_or_default();

    let segment = sanitize_segment(&title)?;
    let logical_path = format!("{page_url}/{segment}");

    let raw_code = match mode {
        ExtractionMode::EmbeddedFramework => preview_code(container, &title)?,
        ExtractionMode::SourceComment => placeholder.text().collect::<String>().trim().to_string(),
    };

    Ok(RawComponent {
        title,
        logical_path,
        raw_code,
    })
}

/// Recover the component markup from the preview iframe next to `container`.
fn preview_code(container: ElementRef, title: &str) -> Result<String> {
    let scope = (*container)
        .parent()
        .and_then(ElementRef::wrap)
        .unwrap_or(container);

    let srcdoc = scope
        .select(&PREVIEW_SEL)
        .find_map(|iframe| iframe.value().attr("srcdoc"))
        .ok_or_else(|| SnippetLibError::extraction(title, "no preview iframe with srcdoc"))?;

    let preview = Html::parse_document(srcdoc);
    let body = preview
        .select(&BODY_SEL)
        .next()
        .ok_or_else(|| SnippetLibError::extraction(title, "preview has no body"))?;

    let first = (*body)
        .children()
        .find_map(ElementRef::wrap)
        .ok_or_else(|| SnippetLibError::extraction(title, "preview body is empty"))?;

    let has_classes = first
        .value()
        .attr("class")
        .is_some_and(|c| !c.trim().is_empty());

    let code = if has_classes {
        body.inner_html()
    } else {
        first.inner_html()
    };

    Ok(format!("{FRAMEWORK_SCRIPT}\n\n{code}"))
}

fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}
