//! HTML normalization
//!
//! Turns a snapshot of the selected element into clean markup for the Markdown
//! converter. The input is always an owned clone; the live page is never touched.
//!
//! Steps, in order:
//! 1. clone the element
//! 2. resolve relative `href` / `src` / `srcset` against the page URL
//! 3. remove site boilerplate (edit links, citation markers, nav boxes, scripts)
//! 4. strip `style` and `class` attributes
//! 5. serialize

pub mod boilerplate;
pub mod urls;

use url::Url;

use crate::dom::{self, ElementNode};

pub use boilerplate::strip_boilerplate;
pub use urls::{resolve_relative_urls, resolve_srcset, resolve_url};

/// Attribute that carries a code block's language once classes are stripped
pub const LANGUAGE_ATTRIBUTE: &str = "data-language";

/// Cleaned, detached copy of a DOM subtree plus its markup
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFragment {
    pub root: ElementNode,
    pub html: String,
}

/// Cleans element snapshots taken from one page
#[derive(Debug, Clone)]
pub struct Normalizer {
    base_url: Url,
}

impl Normalizer {
    /// Create a normalizer resolving against `base_url`
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Normalize an element. The element is cloned first.
    pub fn normalize(&self, node: &ElementNode) -> NormalizedFragment {
        let mut root = node.clone();
        self.clean(&mut root);
        let html = if is_fragment_container(&root) {
            dom::inner_html(&root)
        } else {
            dom::outer_html(&root)
        };
        NormalizedFragment { root, html }
    }

    /// Parse an `outerHTML` snapshot and normalize it
    pub fn normalize_html(&self, html: &str) -> NormalizedFragment {
        self.normalize(&dom::parse_element(html))
    }

    fn clean(&self, root: &mut ElementNode) {
        let resolved = resolve_relative_urls(root, &self.base_url);
        let removed = strip_boilerplate(root);
        let stripped = strip_presentation(root);
        log::debug!(
            "Normalized <{}> ({} elements): {} URLs resolved, {} boilerplate elements removed, {} presentation attributes stripped",
            root.tag_name,
            root.count_elements(),
            resolved,
            removed,
            stripped
        );
    }
}

/// Remove `style` and `class` from every element.
///
/// A `language-xxx` class on `code` is kept as `data-language="xxx"` first.
/// Returns the number of attributes removed.
pub fn strip_presentation(root: &mut ElementNode) -> usize {
    let mut stripped = 0;
    root.for_each_element_mut(&mut |el| {
        if el.is_tag("code")
            && let Some(language) = el.get_attribute("class").and_then(code_language)
        {
            el.add_attribute(LANGUAGE_ATTRIBUTE, language);
        }
        for attr in ["style", "class"] {
            if el.remove_attribute(attr).is_some() {
                stripped += 1;
            }
        }
    });
    stripped
}

/// Language named by a `language-xxx` class token
pub fn code_language(class: &str) -> Option<String> {
    class
        .split_whitespace()
        .find_map(|c| c.strip_prefix("language-"))
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
}

/// The parser's synthetic container around multi-root fragments
fn is_fragment_container(node: &ElementNode) -> bool {
    node.is_tag("html")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::new(Url::parse("https://site/wiki/Page").unwrap())
    }

    #[test]
    fn test_normalize_full_pipeline() {
        let fragment = normalizer().normalize_html(concat!(
            "<div class=\"content\" style=\"color: red\">",
            "<p style=\"margin: 0\">See <a href=\"/wiki/Other\" class=\"link\">Other</a>",
            "<sup class=\"reference\"><a href=\"#cite\">[2]</a></sup></p>",
            "</div>"
        ));

        assert_eq!(
            fragment.html,
            "<div><p>See <a href=\"https://site/wiki/Other\">Other</a></p></div>"
        );
    }

    #[test]
    fn test_live_node_is_not_mutated() {
        let live = dom::parse_element("<p class=\"x\"><a href=\"rel\">r</a></p>");
        let before = live.clone();
        let _ = normalizer().normalize(&live);
        assert_eq!(live, before);
    }

    #[test]
    fn test_code_language_survives_class_stripping() {
        let fragment =
            normalizer().normalize_html("<pre><code class=\"hljs language-python\">print(1)</code></pre>");
        assert_eq!(
            fragment.html,
            "<pre><code data-language=\"python\">print(1)</code></pre>"
        );
    }

    #[test]
    fn test_multi_root_fragment_serializes_children() {
        let fragment = normalizer().normalize_html("<p>a</p><p class=\"b\">b</p>");
        assert_eq!(fragment.html, "<p>a</p><p>b</p>");
    }

    #[test]
    fn test_malformed_url_is_left_alone() {
        let fragment = normalizer().normalize_html("<a href=\"http://[::1\">x</a>");
        assert_eq!(fragment.html, "<a href=\"http://[::1\">x</a>");
    }

    #[test]
    fn test_code_language() {
        assert_eq!(code_language("language-rust"), Some("rust".to_string()));
        assert_eq!(code_language("hljs"), None);
        assert_eq!(code_language("language-"), None);
    }
}
