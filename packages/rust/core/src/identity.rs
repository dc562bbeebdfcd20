//! Stable component identifiers.

use sha2::{Digest, Sha256};

/// SHA-256 hex digest of a component's logical path.
///
/// Depends only on the path, so the same title on the same page keeps its id
/// across runs regardless of what the transformers produce.
pub fn component_hash(logical_path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(logical_path.as_bytes());
    format!("{:x}", hasher.finalize())
}
