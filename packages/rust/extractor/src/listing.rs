//! Component page discovery from the listing page.

use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use snippetlib_shared::{Result, SnippetLibError};

/// Finds component page paths on the listing page.
///
/// Built before any fetch so a malformed selector is a config error.
#[derive(Debug)]
pub struct ListingScanner {
    selector: Selector,
    base_url: Url,
}

impl ListingScanner {
    /// `listing_url` is the absolute URL of the listing page; hrefs are
    /// resolved against it.
    pub fn new(selector: &str, listing_url: Url) -> Result<Self> {
        let selector = Selector::parse(selector).map_err(|e| {
            SnippetLibError::config(format!("invalid listing selector '{selector}': {e}"))
        })?;
        Ok(Self {
            selector,
            base_url: listing_url,
        })
    }

    /// Site-relative page paths in document order, without trailing `/`,
    /// truncated to `max_pages`. A page linked twice is listed (and visited)
    /// twice.
    pub fn scan(&self, doc: &Html, max_pages: Option<usize>) -> Vec<String> {
        let mut paths = Vec::new();

        for el in doc.select(&self.selector) {
            let Some(href) = el.value().attr("href") else {
                continue;
            };
            let Some(path) = self.page_path(href) else {
                debug!(href, "skipping listing link");
                continue;
            };
            paths.push(path);
        }

        if let Some(max) = max_pages {
            paths.truncate(max);
        }

        debug!(count = paths.len(), "listing links collected");
        paths
    }

    fn page_path(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty()
            || href.starts_with('#')
            || href.starts_with("javascript:")
            || href.starts_with("mailto:")
        {
            return None;
        }

        let resolved = self.base_url.join(href).ok()?;
        if resolved.host_str() != self.base_url.host_str() {
            return None;
        }

        let path = resolved.path().trim_end_matches('/');
        if path.is_empty() {
            return None;
        }
        Some(path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> ListingScanner {
        ListingScanner::new(
            ".grid a",
            Url::parse("https://ui.example.com/components").unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn collects_grid_links_in_order() {
        let doc = Html::parse_document(
            r##"<html><body>
                <nav><a href="/pricing">Pricing</a></nav>
                <div class="grid">
                  <a href="/components/forms/buttons">Buttons</a>
                  <a href="/components/forms/inputs/">Inputs</a>
                  <a href="https://ui.example.com/components/nav/tabs#x">Tabs</a>
                  <a href="/components/forms/buttons">Buttons again</a>
                  <a href="https://elsewhere.example.com/x">External</a>
                  <a href="#top">Top</a>
                  <a>No href</a>
                </div>
            </body></html>"##,
        );

        let paths = scanner().scan(&doc, None);
        assert_eq!(
            paths,
            vec![
                "/components/forms/buttons",
                "/components/forms/inputs",
                "/components/nav/tabs",
                "/components/forms/buttons",
            ]
        );
    }

    #[test]
    fn max_pages_counts_repeated_links() {
        let doc = Html::parse_document(
            r#"<div class="grid"><a href="/a">A</a><a href="/a/">A again</a><a href="/b">B</a></div>"#,
        );
        assert_eq!(scanner().scan(&doc, Some(2)), vec!["/a", "/a"]);
    }

    #[test]
    fn respects_max_pages() {
        let doc = Html::parse_document(
            r#"<div class="grid"><a href="/a">A</a><a href="/b">B</a><a href="/c">C</a></div>"#,
        );
        assert_eq!(scanner().scan(&doc, Some(2)), vec!["/a", "/b"]);
        assert_eq!(scanner().scan(&doc, Some(0)), Vec::<String>::new());
    }

    #[test]
    fn invalid_selector_is_config_error() {
        let err = ListingScanner::new(
            "a[",
            Url::parse("https://ui.example.com/components").unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, SnippetLibError::Config { .. }));
    }
}
