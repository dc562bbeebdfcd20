//! Per-page library assembler.
//!
//! Extracts a page's components, runs each through the transformer pipeline,
//! writes it under the output root and returns the page's catalog fragment.

use std::path::{Path, PathBuf};

use scraper::Html;
use tracing::{debug, info, instrument};

use snippetlib_extractor::{SkippedComponent, extract_page};
use snippetlib_shared::{
    Component, LibraryConfig, PageLabels, Result, Section, SnippetLibError, TransformContext,
};
use snippetlib_transform::TransformerPipeline;

use crate::catalog::Catalog;
use crate::identity::component_hash;

/// Output of assembling one page.
#[derive(Debug, Clone)]
pub struct PageResult {
    /// Site-relative page path.
    pub page_url: String,
    pub labels: PageLabels,
    /// Components written, in page order.
    pub components: Vec<Component>,
    /// Components that could not be extracted.
    pub skipped: Vec<SkippedComponent>,
    /// Fragment to merge into the running catalog.
    pub fragment: Catalog,
}

/// Assemble the page at `page_url` from its fetched markup.
///
/// Any transformer or write failure aborts the page: the error is returned
/// and no fragment is produced. Files written before the failure stay on disk.
#[instrument(skip_all, fields(page_url = %page_url))]
pub fn assemble_page(
    html: &str,
    page_url: &str,
    config: &LibraryConfig,
    pipeline: &TransformerPipeline,
) -> Result<PageResult> {
    let extracted = {
        let doc = Html::parse_document(html);
        extract_page(&doc, page_url, config.mode)?
    };

    let mut components = Vec::with_capacity(extracted.components.len());

    for raw in extracted.components {
        let ctx = TransformContext {
            root_url: config.root_url.clone(),
            output_root: config.output_root.clone(),
            title: raw.title.clone(),
            logical_path: raw.logical_path.clone(),
        };

        let code = pipeline.apply(raw.raw_code, &ctx)?;
        let hash = component_hash(&raw.logical_path);

        let file_path = component_file_path(&config.output_root, &raw.logical_path)?;
        write_component(&file_path, &code)?;

        components.push(Component {
            hash,
            title: raw.title,
            url: format!("{}.html", raw.logical_path),
        });
    }

    let section = Section {
        url: format!("{page_url}/index.html"),
        components: components.clone(),
    };
    let fragment = Catalog::fragment(&extracted.labels, &section);

    info!(
        category = %extracted.labels.category,
        subcategory = %extracted.labels.subcategory,
        section = %extracted.labels.section,
        written = components.len(),
        skipped = extracted.skipped.len(),
        "page assembled"
    );

    Ok(PageResult {
        page_url: page_url.to_string(),
        labels: extracted.labels,
        components,
        skipped: extracted.skipped,
        fragment,
    })
}

/// `output_root + dirname(logical_path) + "/" + basename(logical_path) + ".html"`.
pub fn component_file_path(output_root: &Path, logical_path: &str) -> Result<PathBuf> {
    let relative = Path::new(logical_path.trim_start_matches('/'));

    let basename = relative
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            SnippetLibError::validation(format!("logical path '{logical_path}' has no file name"))
        })?;

    let dir = match relative.parent() {
        Some(parent) => output_root.join(parent),
        None => output_root.to_path_buf(),
    };

    Ok(dir.join(format!("{basename}.html")))
}

/// Write one component file, creating parent directories as needed.
/// Existing content at the same path is overwritten.
fn write_component(file_path: &Path, code: &str) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SnippetLibError::io(parent, e))?;
    }

    std::fs::write(file_path, code).map_err(|e| SnippetLibError::io(file_path, e))?;

    debug!(path = %file_path.display(), "wrote component");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
