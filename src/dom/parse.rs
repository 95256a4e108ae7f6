//! HTML string → owned [`ElementNode`] tree.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::dom::element::{DomNode, ElementNode};

/// Parse an HTML fragment into an owned tree.
///
/// The returned node is the parser's synthetic `html` container; the fragment's
/// nodes are its children. Comments, doctypes and processing instructions are dropped.
/// Markup that starts with a table part (`tr`, `td`, `tbody`, ...) is parsed
/// inside the ancestors it needs, which are then lifted off again.
pub fn parse_fragment(html: &str) -> ElementNode {
    let context = table_context(html);
    if context.is_empty() {
        return convert(Html::parse_fragment(html).root_element());
    }

    let open: String = context.iter().map(|tag| format!("<{}>", tag)).collect();
    let close: String = context.iter().rev().map(|tag| format!("</{}>", tag)).collect();
    let document = Html::parse_fragment(&format!("{}{}{}", open, html, close));

    let mut root = convert(document.root_element());
    match unwrap_context(std::mem::take(&mut root.children), context) {
        Some(children) => {
            root.children = children;
            root
        }
        None => {
            log::debug!("Table context did not survive parsing; parsing <{}> as is", context.join(" "));
            convert(Html::parse_fragment(html).root_element())
        }
    }
}

/// Ancestors a fragment starting with a table part needs, outermost first
fn table_context(html: &str) -> &'static [&'static str] {
    match leading_tag(html).as_deref() {
        Some("caption" | "colgroup" | "thead" | "tbody" | "tfoot") => &["table"],
        Some("col") => &["table", "colgroup"],
        Some("tr") => &["table", "tbody"],
        Some("td" | "th") => &["table", "tbody", "tr"],
        _ => &[],
    }
}

fn leading_tag(html: &str) -> Option<String> {
    let rest = html.trim_start().strip_prefix('<')?;
    let name: String = rest.chars().take_while(char::is_ascii_alphanumeric).collect();
    (!name.is_empty()).then(|| name.to_ascii_lowercase())
}

/// Descend through the wrapper elements named by `context`
fn unwrap_context(mut children: Vec<DomNode>, context: &[&str]) -> Option<Vec<DomNode>> {
    for tag in context {
        let wrapper = children.into_iter().find_map(|child| match child {
            DomNode::Element(el) if el.is_tag(tag) => Some(el),
            _ => None,
        })?;
        children = wrapper.children;
    }
    Some(children)
}

/// Parse markup that is expected to hold a single element (e.g. an `outerHTML` snapshot).
///
/// Falls back to the fragment container when the markup holds zero or several
/// top-level elements, or loose text next to an element.
pub fn parse_element(html: &str) -> ElementNode {
    let mut root = parse_fragment(html);
    let significant: Vec<usize> = root
        .children
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_blank_text())
        .map(|(i, _)| i)
        .collect();

    if let [only] = significant.as_slice()
        && matches!(root.children[*only], DomNode::Element(_))
        && let DomNode::Element(el) = root.children.swap_remove(*only)
    {
        return el;
    }
    root
}

fn convert(element: ElementRef) -> ElementNode {
    let mut node = ElementNode::new(element.value().name());
    for (key, value) in element.value().attrs() {
        node.add_attribute(key, value);
    }

    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => {
                // Adjacent text runs are merged so rules see one text node
                if let Some(DomNode::Text { text: last }) = node.children.last_mut() {
                    last.push_str(&text.text);
                } else {
                    node.children.push(DomNode::text(text.text.to_string()));
                }
            }
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    node.add_child(convert(child_element));
                }
            }
            _ => {}
        }
    }

    node
}
