use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, instrument};

use snippetlib_shared::{Result, SnippetLibError, TransformContext};

use crate::builtin::{AbsoluteUrls, StripComments, Trim};
use crate::document::Document;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A pluggable rewrite step applied to every component.
///
/// Implementations must depend only on the snapshot and the context they are
/// given; the same input must always produce the same output.
pub trait Transformer: Send + Sync {
    /// Produce the next snapshot.
    fn transform(&self, doc: Document, ctx: &TransformContext) -> Result<Document>;
}

impl<F> Transformer for F
where
    F: Fn(Document, &TransformContext) -> Result<Document> + Send + Sync,
{
    fn transform(&self, doc: Document, ctx: &TransformContext) -> Result<Document> {
        self(doc, ctx)
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Maps transformer names to implementations.
pub struct TransformerRegistry {
    transformers: HashMap<String, Arc<dyn Transformer>>,
}

impl TransformerRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            transformers: HashMap::new(),
        }
    }

    /// A registry holding every built-in transformer.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(AbsoluteUrls::NAME, AbsoluteUrls);
        registry.register(StripComments::NAME, StripComments);
        registry.register(Trim::NAME, Trim);
        registry
    }

    /// Register `transformer` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, transformer: impl Transformer + 'static) {
        self.transformers.insert(name.into(), Arc::new(transformer));
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.transformers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve `names` in order into a pipeline.
    ///
    /// Fails with a config error on the first name that is not registered.
    pub fn resolve(&self, names: &[String]) -> Result<TransformerPipeline> {
        let mut steps = Vec::with_capacity(names.len());

        for name in names {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let transformer = self.transformers.get(name).ok_or_else(|| {
                SnippetLibError::config(format!(
                    "unknown transformer '{name}': registered transformers are [{}]",
                    self.names().join(", ")
                ))
            })?;
            steps.push((name.to_string(), Arc::clone(transformer)));
        }

        debug!(count = steps.len(), "transformers resolved");
        Ok(TransformerPipeline { steps })
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// An ordered, resolved list of transformers.
#[derive(Clone, Default)]
pub struct TransformerPipeline {
    steps: Vec<(String, Arc<dyn Transformer>)>,
}

impl TransformerPipeline {
    /// Names of the steps in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.steps.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step once, in order, and return the final markup.
    #[instrument(skip_all, fields(path = %ctx.logical_path, steps = self.steps.len()))]
    pub fn apply(&self, markup: impl Into<String>, ctx: &TransformContext) -> Result<String> {
        let mut doc = Document::from_markup(markup);

        for (name, transformer) in &self.steps {
            doc = transformer.transform(doc, ctx).map_err(|e| match e {
                SnippetLibError::Transform { .. } => e,
                other => SnippetLibError::transform(name, other.to_string()),
            })?;
            debug!(transformer = %name, len = doc.markup().len(), "transformer applied");
        }

        Ok(doc.into_markup())
    }
}
