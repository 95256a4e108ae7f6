use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A child of an element: either a nested element or a run of text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DomNode {
    Element(ElementNode),
    Text { text: String },
}

impl DomNode {
    /// Create a text node
    pub fn text(text: impl Into<String>) -> Self {
        DomNode::Text { text: text.into() }
    }

    /// Borrow the element, if this is one
    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            DomNode::Element(el) => Some(el),
            DomNode::Text { .. } => None,
        }
    }

    /// Borrow the text, if this is a text node
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DomNode::Text { text } => Some(text),
            DomNode::Element(_) => None,
        }
    }

    /// True for text nodes containing only whitespace
    pub fn is_blank_text(&self) -> bool {
        self.as_text().is_some_and(|t| t.trim().is_empty())
    }
}

/// An owned, detached DOM element.
///
/// Attributes keep their source order so serialization is deterministic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementNode {
    /// Lowercase HTML tag name (e.g., "div", "a", "img")
    pub tag_name: String,

    /// Element attributes in document order
    #[serde(default)]
    pub attributes: IndexMap<String, String>,

    /// Child nodes in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DomNode>,
}

/// Bounding box of an element in CSS pixels, relative to the viewport
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ElementNode {
    /// Create a new ElementNode
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into().to_ascii_lowercase(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Builder method: set an attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_attribute(key, value);
        self
    }

    /// Builder method: append a text child
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(DomNode::text(text));
        self
    }

    /// Builder method: append an element child
    pub fn with_child(mut self, child: ElementNode) -> Self {
        self.children.push(DomNode::Element(child));
        self
    }

    /// Add a single attribute
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Add a child element
    pub fn add_child(&mut self, child: ElementNode) {
        self.children.push(DomNode::Element(child));
    }

    /// Get attribute value by key
    pub fn get_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Remove an attribute, preserving the order of the rest
    pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
        self.attributes.shift_remove(key)
    }

    /// Check if element has a specific class
    pub fn has_class(&self, class_name: &str) -> bool {
        self.get_attribute("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class_name))
    }

    /// Check if element is a specific tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                DomNode::Text { text } => out.push_str(text),
                DomNode::Element(el) => el.collect_text(out),
            }
        }
    }

    /// Iterate over direct element children
    pub fn element_children(&self) -> impl Iterator<Item = &ElementNode> {
        self.children.iter().filter_map(DomNode::as_element)
    }

    /// First child node that is not whitespace-only text
    pub fn first_significant_child(&self) -> Option<&DomNode> {
        self.children.iter().find(|c| !c.is_blank_text())
    }

    /// Depth-first search for the first descendant matching `pred`
    pub fn find_descendant(&self, pred: &dyn Fn(&ElementNode) -> bool) -> Option<&ElementNode> {
        for child in self.element_children() {
            if pred(child) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(pred) {
                return Some(found);
            }
        }
        None
    }

    /// Remove every descendant element for which `pred` is true.
    ///
    /// Removed elements take their subtree with them; returns how many were removed.
    pub fn remove_descendants(&mut self, pred: &dyn Fn(&ElementNode) -> bool) -> usize {
        let before = self.children.len();
        self.children
            .retain(|child| !matches!(child, DomNode::Element(el) if pred(el)));
        let mut removed = before - self.children.len();

        for child in &mut self.children {
            if let DomNode::Element(el) = child {
                removed += el.remove_descendants(pred);
            }
        }
        removed
    }

    /// Visit this element and every descendant element mutably, parents first
    pub fn for_each_element_mut(&mut self, f: &mut dyn FnMut(&mut ElementNode)) {
        f(self);
        for child in &mut self.children {
            if let DomNode::Element(el) = child {
                el.for_each_element_mut(f);
            }
        }
    }

    /// Remove script, style, and noscript elements
    pub fn simplify(&mut self) -> usize {
        self.remove_descendants(&|el| matches!(el.tag_name.as_str(), "script" | "style" | "noscript"))
    }

    /// Count this element and all descendant elements
    pub fn count_elements(&self) -> usize {
        1 + self.element_children().map(ElementNode::count_elements).sum::<usize>()
    }
}

impl BoundingBox {
    /// Create a new BoundingBox
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Check if the bounding box is visible (has non-zero dimensions)
    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}
