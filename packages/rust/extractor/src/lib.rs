//! Page fetching, listing discovery, and component extraction.
//!
//! This crate provides:
//! - [`extract`]: recovers category labels and component snippets from a page
//! - [`listing`]: finds component page links on the listing page
//! - [`fetch`]: the [`PageFetcher`] seam and its HTTP implementation

pub mod extract;
pub mod fetch;
pub mod listing;

pub use extract::{
    ExtractedPage, FRAMEWORK_SCRIPT, RawComponent, SkippedComponent, extract_page,
};
pub use fetch::{HttpFetcher, PageFetcher};
pub use listing::ListingScanner;
