//! End-to-end `build` pipeline: listing → pages → assemble → merge → index.

use std::time::{Duration, Instant};

use scraper::Html;
use tracing::{info, instrument, warn};

use snippetlib_extractor::{ListingScanner, PageFetcher};
use snippetlib_shared::{LibraryConfig, Result, SnippetLibError};
use snippetlib_transform::TransformerRegistry;

use crate::assembler::assemble_page;
use crate::catalog::Catalog;
use crate::index::build_index;

/// Result of a library build.
#[derive(Debug)]
pub struct BuildResult {
    /// The merged catalog of every successfully assembled page.
    pub catalog: Catalog,
    /// Pages assembled and merged.
    pub pages_processed: usize,
    /// Component files written.
    pub components_written: usize,
    /// Components skipped during extraction.
    pub components_skipped: usize,
    /// Pages that failed (URL, error message).
    pub errors: Vec<(String, String)>,
    /// Index pages written (0 when index building is off).
    pub index_pages: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting build status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before a page is fetched.
    fn page_started(&self, url: &str, current: usize, total: usize);
    /// Called for each component file written.
    fn component_written(&self, url: &str);
    /// Called when the build completes.
    fn done(&self, result: &BuildResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn page_started(&self, _url: &str, _current: usize, _total: usize) {}
    fn component_written(&self, _url: &str) {}
    fn done(&self, _result: &BuildResult) {}
}

/// Run the full build.
///
/// 1. Resolve transformers and the listing selector (config errors stop here,
///    before any fetch)
/// 2. Fetch the listing page and collect component page paths
/// 3. For each page, in order: fetch, assemble, merge into the catalog
/// 4. Render index pages if enabled
///
/// A page that fails to fetch, lacks navigation labels, or cannot be written
/// is recorded in [`BuildResult::errors`] and the run moves on.
#[instrument(skip_all, fields(root_url = %config.root_url, mode = %config.mode))]
pub async fn build_library<F: PageFetcher>(
    config: &LibraryConfig,
    fetcher: &F,
    registry: &TransformerRegistry,
    progress: &dyn ProgressReporter,
) -> Result<BuildResult> {
    let start = Instant::now();

    // --- Phase 1: Validate ---
    let pipeline = registry.resolve(&config.transformers)?;
    let listing_url = config.root_url.join(&config.listing_path).map_err(|e| {
        SnippetLibError::config(format!("invalid listing path '{}': {e}", config.listing_path))
    })?;
    let scanner = ListingScanner::new(&config.listing_selector, listing_url)?;

    std::fs::create_dir_all(&config.output_root)
        .map_err(|e| SnippetLibError::io(&config.output_root, e))?;

    info!(
        output = %config.output_root.display(),
        transformers = ?pipeline.names(),
        "starting build"
    );

    // --- Phase 2: Listing ---
    progress.phase("Discovering component pages");
    let listing_html = fetcher.fetch(&config.listing_path).await?;
    let page_paths = {
        let doc = Html::parse_document(&listing_html);
        scanner.scan(&doc, config.max_pages)
    };
    info!(pages = page_paths.len(), "component pages discovered");

    // --- Phase 3: Pages ---
    progress.phase("Processing component pages");
    let mut catalog = Catalog::new();
    let mut pages_processed = 0;
    let mut components_written = 0;
    let mut components_skipped = 0;
    let mut errors: Vec<(String, String)> = Vec::new();
    let total = page_paths.len();

    for (i, page_url) in page_paths.iter().enumerate() {
        progress.page_started(page_url, i + 1, total);
        info!(url = %page_url, "processing page");

        let html = match fetcher.fetch(page_url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(url = %page_url, error = %e, "fetch failed, skipping page");
                errors.push((page_url.clone(), e.to_string()));
                continue;
            }
        };

        match assemble_page(&html, page_url, config, &pipeline) {
            Ok(page) => {
                for component in &page.components {
                    progress.component_written(&component.url);
                }
                components_written += page.components.len();
                components_skipped += page.skipped.len();
                pages_processed += 1;
                catalog.merge(page.fragment);
            }
            Err(e) => {
                warn!(url = %page_url, error = %e, "page failed, skipping");
                errors.push((page_url.clone(), e.to_string()));
            }
        }
    }

    // --- Phase 4: Index ---
    let index_pages = if config.build_index {
        progress.phase("Building index pages");
        build_index(&catalog, &config.output_root)?.pages_written
    } else {
        0
    };

    let result = BuildResult {
        catalog,
        pages_processed,
        components_written,
        components_skipped,
        errors,
        index_pages,
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        pages_processed = result.pages_processed,
        components_written = result.components_written,
        components_skipped = result.components_skipped,
        errors = result.errors.len(),
        elapsed_ms = result.elapsed.as_millis(),
        "build complete"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use snippetlib_shared::{ExtractionMode, TransformContext};
    use snippetlib_transform::Document;
    use url::Url;

    /// Serves fixture pages from memory and records every requested path.
    struct FixtureSite {
        pages: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl FixtureSite {
        fn new() -> Self {
            let mut pages = HashMap::new();
            for (path, file) in [
                ("/components", "listing.html"),
                ("/components/buttons", "buttons.html"),
                ("/components/inputs", "inputs.html"),
                ("/components/broken", "broken_nav.html"),
            ] {
                pages.insert(path.to_string(), fixture(file));
            }
            Self {
                pages,
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl PageFetcher for FixtureSite {
        async fn fetch(&self, path: &str) -> Result<String> {
            self.requested.lock().unwrap().push(path.to_string());
            self.pages
                .get(path)
                .cloned()
                .ok_or_else(|| SnippetLibError::Network(format!("{path}: HTTP 404 Not Found")))
        }
    }

    fn fixture(name: &str) -> String {
        let path = format!("../../../fixtures/html/{name}");
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing fixture: {path}"))
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("snippetlib-build-test-{}", uuid::Uuid::now_v7()))
    }

    fn make_config(output_root: &Path) -> LibraryConfig {
        LibraryConfig {
            root_url: Url::parse("https://ui.example.com").unwrap(),
            listing_path: "/components".into(),
            listing_selector: ".grid a".into(),
            output_root: output_root.into(),
            mode: ExtractionMode::SourceComment,
            transformers: vec![],
            max_pages: None,
            build_index: false,
        }
    }

    #[tokio::test]
    async fn builds_catalog_from_listing() {
        let tmp = temp_dir();
        let config = make_config(&tmp);
        let site = FixtureSite::new();

        let result = build_library(
            &config,
            &site,
            &TransformerRegistry::with_builtins(),
            &SilentProgress,
        )
        .await
        .unwrap();

        assert_eq!(
            site.requested(),
            vec![
                "/components",
                "/components/buttons",
                "/components/inputs",
                "/components/broken",
                "/components/buttons",
            ]
        );
        assert_eq!(result.pages_processed, 3);
        assert_eq!(result.components_written, 5);
        assert_eq!(result.index_pages, 0);

        // Broken page is reported with its URL and leaves no catalog entry.
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].0, "/components/broken");

        let sections = result.catalog.sections();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].category, "Forms");
        assert_eq!(sections[0].subcategory, "Buttons");
        assert_eq!(sections[0].section_name, "Primary buttons");
        assert_eq!(sections[1].section_name, "Input groups");

        // The second /components/buttons link revisits the page.
        let titles: Vec<&str> = sections[0]
            .section
            .components
            .iter()
            .map(|c| c.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Default", "With icon", "Default", "With icon"]);
        assert!(!tmp.join("index.html").exists());

        let default = std::fs::read_to_string(tmp.join("components/buttons/default.html")).unwrap();
        assert_eq!(default, r#"<button type="button" class="btn">Button text</button>"#);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn unknown_transformer_fails_before_fetching() {
        let tmp = temp_dir();
        let mut config = make_config(&tmp);
        config.transformers = vec!["strip-comments".into(), "minify".into()];
        let site = FixtureSite::new();

        let err = build_library(
            &config,
            &site,
            &TransformerRegistry::with_builtins(),
            &SilentProgress,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, SnippetLibError::Config { .. }));
        assert!(site.requested().is_empty());
        assert!(!tmp.exists());
    }

    #[tokio::test]
    async fn invalid_listing_selector_fails_before_fetching() {
        let tmp = temp_dir();
        let mut config = make_config(&tmp);
        config.listing_selector = "..grid".into();
        let site = FixtureSite::new();

        let err = build_library(&config, &site, &TransformerRegistry::default(), &SilentProgress)
            .await
            .unwrap_err();

        assert!(matches!(err, SnippetLibError::Config { .. }));
        assert!(site.requested().is_empty());
    }

    #[tokio::test]
    async fn max_pages_limits_listing() {
        let tmp = temp_dir();
        let mut config = make_config(&tmp);
        config.max_pages = Some(1);
        let site = FixtureSite::new();

        let result = build_library(&config, &site, &TransformerRegistry::default(), &SilentProgress)
            .await
            .unwrap();

        assert_eq!(site.requested(), vec!["/components", "/components/buttons"]);
        assert_eq!(result.pages_processed, 1);
        assert!(result.errors.is_empty());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn transformers_run_in_declared_order_and_index_is_built() {
        let tmp = temp_dir();
        let mut config = make_config(&tmp);
        config.transformers = vec!["marker-a".into(), "marker-b".into(), "absolute-urls".into()];
        config.build_index = true;
        config.max_pages = Some(2);

        let mut registry = TransformerRegistry::with_builtins();
        registry.register(
            "marker-a",
            |doc: Document, _ctx: &TransformContext| -> Result<Document> {
                let next = format!("{}<!--A-->", doc.markup());
                Ok(doc.with_markup(next))
            },
        );
        registry.register(
            "marker-b",
            |doc: Document, _ctx: &TransformContext| -> Result<Document> {
                let next = format!("{}<!--B-->", doc.markup());
                Ok(doc.with_markup(next))
            },
        );

        let site = FixtureSite::new();
        let result = build_library(&config, &site, &registry, &SilentProgress)
            .await
            .unwrap();

        let input = std::fs::read_to_string(tmp.join("components/inputs/input_with_label.html"))
            .unwrap();
        assert!(input.ends_with("<!--A--><!--B-->"));
        assert!(input.contains(r#"src="https://ui.example.com/img/at.svg""#));

        assert_eq!(result.index_pages, 3);
        assert!(tmp.join("index.html").exists());
        assert!(tmp.join("components/buttons/index.html").exists());
        assert!(tmp.join("components/inputs/index.html").exists());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn rerun_duplicates_components_in_merged_catalog() {
        let tmp = temp_dir();
        let config = make_config(&tmp);
        let site = FixtureSite::new();
        let registry = TransformerRegistry::default();

        let first = build_library(&config, &site, &registry, &SilentProgress)
            .await
            .unwrap();
        let second = build_library(&config, &site, &registry, &SilentProgress)
            .await
            .unwrap();

        let mut combined = first.catalog.clone();
        combined.merge(second.catalog);

        let buttons = &combined.sections()[0];
        assert_eq!(buttons.section_name, "Primary buttons");
        assert_eq!(buttons.section.components.len(), 8);
        assert_eq!(
            buttons.section.components[0].hash,
            buttons.section.components[4].hash
        );

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn fetches_over_http() {
        use snippetlib_extractor::HttpFetcher;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        for (route, file) in [
            ("/components", "listing.html"),
            ("/components/buttons", "buttons.html"),
            ("/components/inputs", "inputs.html"),
        ] {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(200).set_body_string(fixture(file)))
                .mount(&server)
                .await;
        }

        let tmp = temp_dir();
        let mut config = make_config(&tmp);
        config.root_url = Url::parse(&server.uri()).unwrap();
        config.mode = ExtractionMode::EmbeddedFramework;

        let fetcher = HttpFetcher::new(config.root_url.clone(), None).unwrap();
        let result = build_library(&config, &fetcher, &TransformerRegistry::default(), &SilentProgress)
            .await
            .unwrap();

        assert_eq!(result.pages_processed, 3);
        // /components/broken is not mounted: 404 recorded, run continues.
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].1.contains("404"));

        let default = std::fs::read_to_string(tmp.join("components/buttons/default.html")).unwrap();
        assert!(default.starts_with("<script src="));
        assert!(default.ends_with(r#"<button type="button" class="btn">Button text</button>"#));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
