//! Library assembly for snippetlib.
//!
//! Ties extraction, transformation and hashing into per-page assembly, folds
//! page results into the [`catalog::Catalog`] and renders optional index pages.

pub mod assembler;
pub mod catalog;
pub mod identity;
pub mod index;
pub mod pipeline;
pub mod tree;
