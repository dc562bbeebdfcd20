//! Component transformer contract, registry, and ordered pipeline.
//!
//! Every extracted snippet passes through a [`TransformerPipeline`] before it is
//! written. Transformers are looked up by name in a [`TransformerRegistry`] at
//! startup, so an unknown name fails before any page is fetched.

mod builtin;
mod document;
mod pipeline;

pub use builtin::{AbsoluteUrls, StripComments, Trim};
pub use document::Document;
pub use pipeline::{Transformer, TransformerPipeline, TransformerRegistry};
