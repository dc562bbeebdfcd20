/// An immutable snapshot of a component's markup.
///
/// Transformers take a snapshot by value and return the next one, so each step
/// can be tested in isolation and no step observes a half-written document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    markup: String,
}

impl Document {
    /// Wrap raw markup.
    pub fn from_markup(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }

    /// The serialized markup.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Consume the snapshot, returning its markup.
    pub fn into_markup(self) -> String {
        self.markup
    }

    /// Build the next snapshot from new markup.
    pub fn with_markup(self, markup: impl Into<String>) -> Self {
        Self::from_markup(markup)
    }
}

impl From<String> for Document {
    fn from(markup: String) -> Self {
        Self::from_markup(markup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_keeps_markup() {
        let doc = Document::from(String::from(r#"<button class="btn">Save</button>"#));
        assert_eq!(doc.markup(), r#"<button class="btn">Save</button>"#);
    }

    #[test]
    fn with_markup_replaces_content() {
        let doc = Document::from_markup("<p>a</p>").with_markup("<p>b</p>");
        assert_eq!(doc.into_markup(), "<p>b</p>");
    }
}
