//! The three-level component catalog: Category -> Subcategory -> Section.
//!
//! Stored as a [`Node`] tree so page fragments fold in with [`tree::merge`];
//! typed [`Section`]s are read back out for index rendering.

use serde::Serialize;

use snippetlib_shared::{Component, PageLabels, Result, Section, SnippetLibError};

use crate::tree::{self, Node};

/// One section of the catalog with its keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry<'a> {
    pub category: &'a str,
    pub subcategory: &'a str,
    pub section_name: &'a str,
    pub section: Section,
}

/// Accumulated catalog. Starts empty; one fragment is merged per page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    root: Node,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The single-page fragment `{category: {subcategory: {section: {url, components}}}}`.
    pub fn fragment(labels: &PageLabels, section: &Section) -> Self {
        let root = Node::from_entries([(
            labels.category.as_str(),
            Node::from_entries([(
                labels.subcategory.as_str(),
                Node::from_entries([(labels.section.as_str(), section_node(section))]),
            )]),
        )]);
        Self { root }
    }

    /// Fold `fragment` into this catalog.
    ///
    /// Merging the same section twice concatenates its component lists.
    pub fn merge(&mut self, fragment: Catalog) {
        tree::merge_into(&mut self.root, fragment.root);
    }

    pub fn as_node(&self) -> &Node {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.as_map().is_none_or(|map| map.is_empty())
    }

    /// Every well-formed section in key order.
    pub fn sections(&self) -> Vec<CatalogEntry<'_>> {
        let mut entries = Vec::new();

        for (category, subcategories) in children(&self.root) {
            for (subcategory, sections) in children(subcategories) {
                for (section_name, node) in children(sections) {
                    if let Some(section) = section_from_node(node) {
                        entries.push(CatalogEntry {
                            category,
                            subcategory,
                            section_name,
                            section,
                        });
                    }
                }
            }
        }

        entries
    }

    /// Total number of component records across all sections.
    pub fn component_count(&self) -> usize {
        self.sections()
            .iter()
            .map(|entry| entry.section.components.len())
            .sum()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            SnippetLibError::validation(format!("catalog serialization failed: {e}"))
        })
    }
}

fn children(node: &Node) -> impl Iterator<Item = (&str, &Node)> {
    node.as_map()
        .into_iter()
        .flat_map(|map| map.iter().map(|(k, v)| (k.as_str(), v)))
}

fn component_node(component: &Component) -> Node {
    Node::from_entries([
        ("hash", Node::scalar(&component.hash)),
        ("title", Node::scalar(&component.title)),
        ("url", Node::scalar(&component.url)),
    ])
}

fn section_node(section: &Section) -> Node {
    Node::from_entries([
        ("url", Node::scalar(&section.url)),
        (
            "components",
            Node::Seq(section.components.iter().map(component_node).collect()),
        ),
    ])
}

fn component_from_node(node: &Node) -> Option<Component> {
    Some(Component {
        hash: node.get("hash")?.as_str()?.to_string(),
        title: node.get("title")?.as_str()?.to_string(),
        url: node.get("url")?.as_str()?.to_string(),
    })
}

fn section_from_node(node: &Node) -> Option<Section> {
    let url = node.get("url")?.as_str()?.to_string();
    let components = node
        .get("components")?
        .as_seq()?
        .iter()
        .filter_map(component_from_node)
        .collect();
    Some(Section { url, components })
}
