//! Document module - Typed XML document tree
//!
//! Builds an immutable element tree from an XML source string and exposes
//! the accessors the analysis stages need:
//! - tag/attribute access with literal attribute names (prefixes kept)
//! - concatenated descendant text content
//! - id-based element lookup (exact match)
//!
//! Malformed input never panics: parsing yields a Document in an error
//! state with an empty tree.

pub mod parse;

use std::collections::HashMap;

use crate::core::model::ByteRange;

/// Index of a node in the document arena
pub type NodeId = usize;

/// A single attribute with its literal name (namespace prefix included)
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// A child slot of an element: nested element or a run of text
#[derive(Debug, Clone)]
pub(crate) enum Child {
    Element(NodeId),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) name: String,
    pub(crate) attributes: Vec<Attribute>,
    pub(crate) children: Vec<Child>,
    pub(crate) range: ByteRange,
}

/// Parsed XML document
///
/// Nodes are stored in the order their start tags appear, so iterating the
/// arena is iterating in document order.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub(crate) nodes: Vec<NodeData>,
    pub(crate) roots: Vec<NodeId>,
    pub(crate) ids: HashMap<String, NodeId>,
    pub(crate) error: Option<String>,
}

impl Document {
    /// Parse a document from text.
    ///
    /// Never fails: malformed input produces a Document with an empty tree
    /// and `parse_error()` set, so downstream stages see zero elements.
    pub fn parse(text: &str) -> Document {
        parse::parse_document(text)
    }

    pub(crate) fn failed(message: String) -> Document {
        Document {
            error: Some(message),
            ..Default::default()
        }
    }

    /// Parse error message, if the source was malformed
    pub fn parse_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The first top-level element of the document
    pub fn root_element(&self) -> Option<Element<'_>> {
        self.roots.first().map(|&id| Element { doc: self, id })
    }

    /// The unique element carrying the given `id` attribute value.
    ///
    /// Exact string match; with duplicate ids the first occurrence in
    /// document order wins.
    pub fn element_by_id(&self, id: &str) -> Option<Element<'_>> {
        self.ids.get(id).map(|&id| Element { doc: self, id })
    }

    /// All elements with the given tag name, in document order
    pub fn elements_by_tag_name<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = Element<'a>> + 'a {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, node)| node.name == name)
            .map(move |(id, _)| Element { doc: self, id })
    }
}

/// A borrowed view of one element in a Document
#[derive(Debug, Clone, Copy)]
pub struct Element<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> Element<'a> {
    fn node(&self) -> &'a NodeData {
        &self.doc.nodes[self.id]
    }

    /// Tag name as written in the source
    pub fn tag_name(&self) -> &'a str {
        &self.node().name
    }

    /// Attribute value by literal name, `l:href` included
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.node()
            .attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Whether an attribute with the literal name exists
    pub fn has_attribute(&self, name: &str) -> bool {
        self.node().attributes.iter().any(|a| a.name == name)
    }

    /// All attributes in source order
    #[allow(dead_code)]
    pub fn attributes(&self) -> &'a [Attribute] {
        &self.node().attributes
    }

    /// Concatenation of all descendant text, in document order.
    ///
    /// Whitespace is preserved exactly as parsed; entity references and
    /// CDATA sections have already been resolved into the text runs.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self.doc, self.id, &mut out);
        out
    }

    /// Byte range of the element in the source (start tag to end tag)
    pub fn range(&self) -> ByteRange {
        self.node().range
    }
}

fn collect_text(doc: &Document, id: NodeId, out: &mut String) {
    for child in &doc.nodes[id].children {
        match child {
            Child::Text(text) => out.push_str(text),
            Child::Element(child_id) => collect_text(doc, *child_id, out),
        }
    }
}
