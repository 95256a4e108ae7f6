//! Owned tree → HTML markup.

use crate::dom::element::{DomNode, ElementNode};

/// Void (self-closing) HTML elements
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text children are emitted without escaping.
///
/// `textarea` and `title` are escapable raw text: entities in them are
/// decoded on parse, so their text is escaped again here.
const RAW_TEXT_ELEMENTS: &[&str] =
    &["iframe", "noembed", "noframes", "noscript", "plaintext", "script", "style", "xmp"];

/// Serialize an element including its own tag
pub fn outer_html(node: &ElementNode) -> String {
    let mut out = String::new();
    write_element(node, &mut out);
    out
}

/// Serialize only the children of an element
pub fn inner_html(node: &ElementNode) -> String {
    let mut out = String::new();
    write_children(node, &mut out);
    out
}

fn write_element(node: &ElementNode, out: &mut String) {
    out.push('<');
    out.push_str(&node.tag_name);
    for (key, value) in &node.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(value));
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&node.tag_name.as_str()) {
        return;
    }

    write_children(node, out);
    out.push_str("</");
    out.push_str(&node.tag_name);
    out.push('>');
}

fn write_children(node: &ElementNode, out: &mut String) {
    let raw = RAW_TEXT_ELEMENTS.contains(&node.tag_name.as_str());
    for child in &node.children {
        match child {
            DomNode::Text { text } if raw => out.push_str(text),
            DomNode::Text { text } => out.push_str(&html_escape::encode_text(text)),
            DomNode::Element(el) => write_element(el, out),
        }
    }
}
