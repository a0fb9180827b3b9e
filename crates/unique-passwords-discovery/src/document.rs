//! Arena-backed element tree.
//!
//! Built programmatically (`Document::new` + `append_child`) or loaded from
//! a nested JSON [`ElementSpec`]. Styles are the *computed* styles of each
//! element, so `visibility: hidden` is expected on every affected node.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::DocumentError;
use crate::tree::ElementTree;

/// Index of an element inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Computed style subset relevant to rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Style {
    /// CSS `display`, e.g. `"none"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    /// CSS `visibility`, e.g. `"hidden"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
}

impl Style {
    /// `display: none`.
    #[must_use]
    pub fn display_none() -> Self {
        Self {
            display: Some("none".into()),
            visibility: None,
        }
    }

    /// `visibility: hidden`.
    #[must_use]
    pub fn visibility_hidden() -> Self {
        Self {
            display: None,
            visibility: Some("hidden".into()),
        }
    }

    /// `false` for `display: none` or `visibility: hidden`.
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        let hidden_display = self
            .display
            .as_deref()
            .is_some_and(|d| d.eq_ignore_ascii_case("none"));
        let hidden_visibility = self
            .visibility
            .as_deref()
            .is_some_and(|v| v.eq_ignore_ascii_case("hidden"));
        !(hidden_display || hidden_visibility)
    }
}

/// Serialized form of an element and its subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSpec {
    /// Tag name (`"form"`, `"input"`, ...).
    pub tag: String,
    /// Attributes by name.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Computed style.
    #[serde(default)]
    pub style: Style,
    /// Current input value.
    #[serde(default)]
    pub value: String,
    /// Child elements in document order.
    #[serde(default)]
    pub children: Vec<ElementSpec>,
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    style: Style,
    value: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Position among the parent's children.
    index: usize,
}

/// An element tree with a single root.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Create a document holding only a root element.
    #[must_use]
    pub fn new(root_tag: &str) -> Self {
        Self {
            nodes: vec![Node {
                tag: root_tag.to_string(),
                attributes: BTreeMap::new(),
                style: Style::default(),
                value: String::new(),
                parent: None,
                children: Vec::new(),
                index: 0,
            }],
        }
    }

    /// Build a document from a nested [`ElementSpec`].
    #[must_use]
    pub fn from_spec(spec: &ElementSpec) -> Self {
        let mut doc = Self::new(&spec.tag);
        let root = doc.root();
        doc.fill_from_spec(root, spec);
        doc
    }

    /// Parse a nested JSON [`ElementSpec`].
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Parse`] if the JSON does not describe an
    /// element tree.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let spec: ElementSpec = serde_json::from_str(json)?;
        Ok(Self::from_spec(&spec))
    }

    /// Serialize the tree back to a nested [`ElementSpec`].
    #[must_use]
    pub fn to_spec(&self) -> ElementSpec {
        self.spec_of(self.root())
    }

    /// The root element.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a document has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a new element as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        let index = self.node(parent).children.len();
        self.nodes.push(Node {
            tag: tag.to_string(),
            attributes: BTreeMap::new(),
            style: Style::default(),
            value: String::new(),
            parent: Some(parent),
            children: Vec::new(),
            index,
        });
        self.node_mut(parent).children.push(id);
        id
    }

    /// Set (or replace) an attribute.
    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) {
        self.node_mut(element)
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    /// Replace the computed style.
    pub fn set_style(&mut self, element: NodeId, style: Style) {
        self.node_mut(element).style = style;
    }

    /// Current input value.
    #[must_use]
    pub fn value(&self, element: NodeId) -> &str {
        &self.node(element).value
    }

    /// Replace the input value. The old value is wiped first since
    /// password fields pass through here.
    pub fn set_value(&mut self, element: NodeId, value: &str) {
        let slot = &mut self.node_mut(element).value;
        slot.zeroize();
        slot.push_str(value);
    }

    /// First element, in document order, whose `id` attribute equals `id`.
    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let mut stack = vec![self.root()];
        while let Some(element) = stack.pop() {
            if self.attribute(element, "id") == Some(id) {
                return Some(element);
            }
            stack.extend(self.node(element).children.iter().rev().copied());
        }
        None
    }

    /// Like [`Self::element_by_id`], but a missing element is an error.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::ElementNotFound`] if no element has that id.
    pub fn require_element(&self, id: &str) -> Result<NodeId, DocumentError> {
        self.element_by_id(id)
            .ok_or_else(|| DocumentError::ElementNotFound(id.to_string()))
    }

    fn fill_from_spec(&mut self, element: NodeId, spec: &ElementSpec) {
        {
            let node = self.node_mut(element);
            node.attributes.clone_from(&spec.attributes);
            node.style = spec.style.clone();
            node.value.clone_from(&spec.value);
        }
        for child_spec in &spec.children {
            let child = self.append_child(element, &child_spec.tag);
            self.fill_from_spec(child, child_spec);
        }
    }

    fn spec_of(&self, element: NodeId) -> ElementSpec {
        let node = self.node(element);
        ElementSpec {
            tag: node.tag.clone(),
            attributes: node.attributes.clone(),
            style: node.style.clone(),
            value: node.value.clone(),
            children: node.children.iter().map(|&c| self.spec_of(c)).collect(),
        }
    }

    // NodeIds are only minted by this document, so indexing cannot miss.
    #[allow(clippy::indexing_slicing)]
    fn node(&self, element: NodeId) -> &Node {
        &self.nodes[element.0]
    }

    #[allow(clippy::indexing_slicing)]
    fn node_mut(&mut self, element: NodeId) -> &mut Node {
        &mut self.nodes[element.0]
    }

    fn sibling_at(&self, element: NodeId, index: Option<usize>) -> Option<NodeId> {
        let parent = self.node(element).parent?;
        self.node(parent).children.get(index?).copied()
    }
}

impl Drop for Document {
    fn drop(&mut self) {
        for node in &mut self.nodes {
            node.value.zeroize();
        }
    }
}

impl ElementTree for Document {
    type Element = NodeId;

    fn parent(&self, element: NodeId) -> Option<NodeId> {
        self.node(element).parent
    }

    fn first_child(&self, element: NodeId) -> Option<NodeId> {
        self.node(element).children.first().copied()
    }

    fn previous_sibling(&self, element: NodeId) -> Option<NodeId> {
        let index = self.node(element).index.checked_sub(1);
        self.sibling_at(element, index)
    }

    fn next_sibling(&self, element: NodeId) -> Option<NodeId> {
        let index = self.node(element).index.checked_add(1);
        self.sibling_at(element, index)
    }

    fn is_rendered(&self, element: NodeId) -> bool {
        self.node(element).style.is_rendered()
    }

    fn tag_name(&self, element: NodeId) -> &str {
        &self.node(element).tag
    }

    fn attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        self.node(element).attributes.get(name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new("form");
        let root = doc.root();
        let a = doc.append_child(root, "input");
        let b = doc.append_child(root, "input");
        let c = doc.append_child(root, "button");
        doc.set_attribute(a, "id", "user");
        doc.set_attribute(b, "id", "pw");
        (doc, a, b, c)
    }

    #[test]
    fn sibling_navigation() {
        let (doc, a, b, c) = form();
        assert_eq!(doc.previous_sibling(a), None);
        assert_eq!(doc.next_sibling(a), Some(b));
        assert_eq!(doc.previous_sibling(c), Some(b));
        assert_eq!(doc.next_sibling(c), None);
        assert_eq!(doc.previous_sibling(doc.root()), None);
        assert_eq!(doc.next_sibling(doc.root()), None);
    }

    #[test]
    fn parent_and_first_child() {
        let (doc, a, b, _) = form();
        assert_eq!(doc.parent(b), Some(doc.root()));
        assert_eq!(doc.parent(doc.root()), None);
        assert_eq!(doc.first_child(doc.root()), Some(a));
        assert_eq!(doc.first_child(a), None);
    }

    #[test]
    fn element_by_id_finds_nested_elements() {
        let (mut doc, a, _, _) = form();
        let nested = doc.append_child(a, "span");
        doc.set_attribute(nested, "id", "deep");
        assert_eq!(doc.element_by_id("deep"), Some(nested));
        assert_eq!(doc.element_by_id("pw").map(|e| doc.attribute(e, "id")), Some(Some("pw")));
        assert!(doc.element_by_id("missing").is_none());
        assert!(matches!(
            doc.require_element("missing"),
            Err(DocumentError::ElementNotFound(_))
        ));
    }

    #[test]
    fn style_visibility() {
        assert!(Style::default().is_rendered());
        assert!(!Style::display_none().is_rendered());
        assert!(!Style::visibility_hidden().is_rendered());
        let visible = Style {
            display: Some("block".into()),
            visibility: Some("visible".into()),
        };
        assert!(visible.is_rendered());
    }

    #[test]
    fn json_roundtrip_preserves_structure() {
        let json = r#"{
            "tag": "form",
            "children": [
                {"tag": "input", "attributes": {"id": "login", "type": "text"}, "value": "bob"},
                {"tag": "div", "style": {"display": "none"}, "children": [
                    {"tag": "input", "attributes": {"type": "email"}}
                ]},
                {"tag": "input", "attributes": {"id": "pw", "type": "password"}}
            ]
        }"#;
        let doc = Document::from_json(json).unwrap();
        assert_eq!(doc.len(), 5);
        let login = doc.element_by_id("login").unwrap();
        assert_eq!(doc.value(login), "bob");
        let hidden = doc.next_sibling(login).unwrap();
        assert!(!doc.is_rendered(hidden));

        let reparsed = Document::from_spec(&doc.to_spec());
        assert_eq!(reparsed.to_spec(), doc.to_spec());
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let err = Document::from_json("{\"children\": 3}").unwrap_err();
        assert!(matches!(err, DocumentError::Parse(_)));
    }

    #[test]
    fn set_value_replaces_value() {
        let (mut doc, a, _, _) = form();
        doc.set_value(a, "alice");
        assert_eq!(doc.value(a), "alice");
    }

    #[test]
    fn set_value_with_shorter_value_leaves_no_tail() {
        let (mut doc, a, _, _) = form();
        doc.set_value(a, "correct horse battery");
        doc.set_value(a, "x");
        assert_eq!(doc.value(a), "x");
        doc.set_value(a, "");
        assert!(doc.value(a).is_empty());
    }
}
