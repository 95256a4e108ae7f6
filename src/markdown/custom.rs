//! Rules that take precedence over the baseline set: fenced code, links, empty images.

use url::Url;

use super::commonmark::fenced_block;
use super::rule::{Filter, NodeContext, Rule};
use super::utilities::clean_attribute;
use crate::dom::DomNode;
use crate::normalize::{LANGUAGE_ATTRIBUTE, code_language};

/// Base used only to split relative hrefs into path and host
const LABEL_BASE: &str = "https://example.com/";

/// Create the custom rules, in evaluation order
pub fn custom_rules() -> Vec<Rule> {
    vec![fenced_code_block_rule(), link_rule(), empty_image_rule()]
}

/// `pre` whose first significant child is `code`
fn fenced_code_block_rule() -> Rule {
    Rule::new(
        "fencedCodeBlock",
        Filter::predicate(|ctx, _| {
            ctx.tag_name() == "pre"
                && ctx
                    .node
                    .first_significant_child()
                    .and_then(DomNode::as_element)
                    .is_some_and(|c| c.is_tag("code"))
        }),
        |ctx, _, options| {
            let Some(code) = ctx.node.first_significant_child().and_then(DomNode::as_element) else {
                return String::new();
            };
            let language = code
                .get_attribute("class")
                .and_then(code_language)
                .or_else(|| code.get_attribute(LANGUAGE_ATTRIBUTE).map(str::to_string))
                .unwrap_or_default();

            fenced_block(&code.text_content(), &language, options)
        },
    )
}

/// Anchors with a non-empty `href`
fn link_rule() -> Rule {
    Rule::new(
        "link",
        Filter::predicate(|ctx, _| {
            ctx.tag_name() == "a" && ctx.attr("href").is_some_and(|h| !h.trim().is_empty())
        }),
        |ctx, content, _| {
            let href = ctx.attr("href").unwrap_or_default().trim();
            let content = content.trim();

            if !content.is_empty() && content != "![]" {
                if is_image_placeholder(content) {
                    return content.to_string();
                }
                return format!("[{}]({})", content, href);
            }

            empty_link(ctx, href)
        },
    )
}

fn empty_link(ctx: &NodeContext, href: &str) -> String {
    if let Some(img) = ctx.node.find_descendant(&|e| e.is_tag("img")) {
        let alt = clean_attribute(img.get_attribute("alt"));
        let src = img.get_attribute("src").map(str::trim).filter(|s| !s.is_empty()).unwrap_or(href);
        return format!("![{}]({})", alt, src);
    }

    let title = clean_attribute(ctx.attr("title"));
    if !title.is_empty() {
        return format!("[{}]({})", title, href);
    }

    if is_pseudo_link(href) {
        return String::new();
    }

    format!("[{}]({})", link_label(href), href)
}

/// `![`..`)` on one line, as produced by the image rules
fn is_image_placeholder(content: &str) -> bool {
    content.starts_with("![") && content.ends_with(')') && !content.contains('\n')
}

/// `javascript:` and pure-fragment hrefs have nothing to point a reader at
fn is_pseudo_link(href: &str) -> bool {
    href.starts_with('#') || href.get(..11).is_some_and(|s| s.eq_ignore_ascii_case("javascript:"))
}

/// Display text for a link that has none of its own.
///
/// 1. the last non-empty path segment, percent-decoded (`/docs/guide/` gives `guide`)
/// 2. the host, when the href names one
/// 3. the href itself (query-only links, `mailto:` and the like)
///
/// Hrefs that cannot be parsed at all get `link`.
pub fn link_label(href: &str) -> String {
    let Ok(base) = Url::parse(LABEL_BASE) else {
        return "link".to_string();
    };
    let Ok(url) = base.join(href) else {
        return "link".to_string();
    };

    if let Some(segment) = url.path_segments().and_then(|mut segments| segments.rfind(|s| !s.is_empty())) {
        let decoded = urlencoding::decode(segment).map(|s| s.into_owned()).unwrap_or_else(|_| segment.to_string());
        if !decoded.trim().is_empty() {
            return decoded;
        }
    }

    let names_host = Url::parse(href).is_ok() || href.starts_with("//");
    if names_host
        && let Some(host) = url.host_str()
        && !host.is_empty()
    {
        return host.to_string();
    }

    href.to_string()
}

/// `img` without `src` renders to nothing
fn empty_image_rule() -> Rule {
    Rule::new(
        "emptyImages",
        Filter::predicate(|ctx, _| ctx.tag_name() == "img" && ctx.attr("src").is_none_or(|s| s.trim().is_empty())),
        |_, _, _| String::new(),
    )
}
