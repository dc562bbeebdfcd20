//! Built-in transformers.
//!
//! Each one is a small string rewrite over the snapshot markup, in the same
//! spirit as a cleanup pass: `markup -> markup`, no I/O.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use snippetlib_shared::{Result, TransformContext};

use crate::document::Document;
use crate::pipeline::Transformer;

// ---------------------------------------------------------------------------
// absolute-urls
// ---------------------------------------------------------------------------

/// Rewrites root-relative `href`/`src` values against the site root URL.
///
/// `/img/logo.svg` becomes `https://site/img/logo.svg`; protocol-relative
/// (`//cdn...`), absolute, and fragment-only values are left alone. Only
/// whitespace-led attributes match, so `data-src` and friends are untouched.
pub struct AbsoluteUrls;

impl AbsoluteUrls {
    pub const NAME: &'static str = "absolute-urls";
}

impl Transformer for AbsoluteUrls {
    fn transform(&self, doc: Document, ctx: &TransformContext) -> Result<Document> {
        static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r#"(^|\s)(href|src)=(?:"([^"]*)"|'([^']*)')"#).expect("valid regex")
        });

        let rewritten = ATTR_RE.replace_all(doc.markup(), |caps: &Captures| {
            let lead = &caps[1];
            let attr = &caps[2];
            let (value, quote) = match (caps.get(3), caps.get(4)) {
                (Some(v), _) => (v.as_str(), '"'),
                (None, Some(v)) => (v.as_str(), '\''),
                (None, None) => return caps[0].to_string(),
            };

            if !value.starts_with('/') || value.starts_with("//") {
                return caps[0].to_string();
            }

            match ctx.root_url.join(value) {
                Ok(abs) => format!("{lead}{attr}={quote}{abs}{quote}"),
                Err(_) => caps[0].to_string(),
            }
        });

        let next = rewritten.into_owned();
        Ok(doc.with_markup(next))
    }
}

// ---------------------------------------------------------------------------
// strip-comments
// ---------------------------------------------------------------------------

/// Removes HTML comments.
pub struct StripComments;

impl StripComments {
    pub const NAME: &'static str = "strip-comments";
}

impl Transformer for StripComments {
    fn transform(&self, doc: Document, _ctx: &TransformContext) -> Result<Document> {
        static COMMENT_RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

        let next = COMMENT_RE.replace_all(doc.markup(), "").into_owned();
        Ok(doc.with_markup(next))
    }
}

// ---------------------------------------------------------------------------
// trim
// ---------------------------------------------------------------------------

/// Trims surrounding whitespace and ends the markup with a single newline.
pub struct Trim;

impl Trim {
    pub const NAME: &'static str = "trim";
}

impl Transformer for Trim {
    fn transform(&self, doc: Document, _ctx: &TransformContext) -> Result<Document> {
        let trimmed = doc.markup().trim();
        if trimmed.is_empty() {
            return Ok(doc.with_markup(String::new()));
        }
        let next = format!("{trimmed}\n");
        Ok(doc.with_markup(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use url::Url;

    fn ctx() -> TransformContext {
        TransformContext {
            root_url: Url::parse("https://ui.example.com").unwrap(),
            output_root: PathBuf::from("/tmp/out"),
            title: "Logo cloud".into(),
            logical_path: "/components/marketing/logo_cloud".into(),
        }
    }

    fn run(t: &dyn Transformer, markup: &str) -> String {
        t.transform(Document::from_markup(markup), &ctx())
            .unwrap()
            .into_markup()
    }

    #[test]
    fn absolute_urls_rewrites_root_relative() {
        let out = run(
            &AbsoluteUrls,
            r#"<img src="/img/logo.svg"><a href='/pricing'>Pricing</a>"#,
        );
        assert_eq!(
            out,
            r#"<img src="https://ui.example.com/img/logo.svg"><a href='https://ui.example.com/pricing'>Pricing</a>"#
        );
    }

    #[test]
    fn absolute_urls_leaves_other_values() {
        let markup = "<a href=\"#top\">Top</a><script src=\"//cdn.example.com/a.js\"></script>\
                      <a href=\"https://other.example.com/x\">x</a><a href=\"relative\">r</a>";
        assert_eq!(run(&AbsoluteUrls, markup), markup);
    }

    #[test]
    fn absolute_urls_ignores_prefixed_attributes() {
        let markup = r#"<img data-src="/img/lazy.png" src="/img/a.png"><div x-href="/x"></div>"#;
        assert_eq!(
            run(&AbsoluteUrls, markup),
            r#"<img data-src="/img/lazy.png" src="https://ui.example.com/img/a.png"><div x-href="/x"></div>"#
        );
    }

    #[test]
    fn strip_comments_removes_multiline_comments() {
        let out = run(
            &StripComments,
            "<div>\n<!-- This example requires\n  a plugin -->\n<p>Hi</p><!-- x --></div>",
        );
        assert_eq!(out, "<div>\n\n<p>Hi</p></div>");
    }

    #[test]
    fn trim_normalizes_ends() {
        assert_eq!(run(&Trim, "\n\n  <p>Hi</p>  \n\n"), "<p>Hi</p>\n");
        assert_eq!(run(&Trim, "   "), "");
    }
}
