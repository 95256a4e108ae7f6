//! Owned DOM trees
//!
//! Everything downstream of the picker works on detached copies of page markup:
//! - ElementNode / DomNode: owned element tree with mixed text content
//! - parse: HTML string into an owned tree (scraper / html5ever)
//! - serialize: owned tree back into markup

pub mod element;
pub mod parse;
pub mod serialize;

pub use element::{BoundingBox, DomNode, ElementNode};
pub use parse::{parse_element, parse_fragment};
pub use serialize::{inner_html, outer_html};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_then_serialize() {
        let el = parse_element("<ul><li>One</li><li>Two &amp; more</li></ul>");
        assert_eq!(outer_html(&el), "<ul><li>One</li><li>Two &amp; more</li></ul>");
    }

    #[test]
    fn test_element_node_export() {
        let element = ElementNode::new("div");
        assert_eq!(element.tag_name, "div");
    }
}
