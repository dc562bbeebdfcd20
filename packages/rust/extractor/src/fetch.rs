//! Page fetching.
//!
//! The session behind the fetch (logging in, cookies) belongs to the caller;
//! this module only turns a site-relative path into page markup.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use tracing::{debug, instrument};
use url::Url;

use snippetlib_shared::{Result, SnippetLibError};

/// User-Agent string for page requests.
const USER_AGENT: &str = concat!("snippetlib/", env!("CARGO_PKG_VERSION"));

/// Source of page markup for site-relative paths.
///
/// Fetches are the only suspension points of a run.
pub trait PageFetcher {
    /// Fetch the page at `path` (e.g. `/components/buttons`) and return its markup.
    fn fetch(&self, path: &str) -> impl Future<Output = Result<String>> + Send;
}

/// HTTP fetcher rooted at the site URL.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    root_url: Url,
}

impl HttpFetcher {
    /// Create a fetcher; `session_cookie` is sent as the `Cookie` header.
    pub fn new(root_url: Url, session_cookie: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = session_cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| SnippetLibError::config(format!("invalid session cookie: {e}")))?;
            headers.insert(COOKIE, value);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SnippetLibError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, root_url })
    }

    /// Absolute URL for a site-relative path.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        self.root_url
            .join(path)
            .map_err(|e| SnippetLibError::Network(format!("cannot resolve '{path}': {e}")))
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, path: &str) -> Result<String> {
        let url = self.url_for(path)?;
        debug!(%url, "fetching page");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| SnippetLibError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SnippetLibError::Network(format!("{url}: HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SnippetLibError::Network(format!("{url}: body read failed: {e}")))?;

        debug!(%url, len = body.len(), "page fetched");
        Ok(body)
    }
}
