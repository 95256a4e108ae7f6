//! Site chrome that carries no content: edit links, citation markers, navigation boxes.

use crate::dom::ElementNode;

/// A single entry of the removal denylist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// `.class`
    Class(&'static str),
    /// `tag.class`
    TagClass(&'static str, &'static str),
    /// `[name="value"]`
    Attribute(&'static str, &'static str),
}

impl Matcher {
    pub fn matches(&self, el: &ElementNode) -> bool {
        match *self {
            Matcher::Class(class) => el.has_class(class),
            Matcher::TagClass(tag, class) => el.is_tag(tag) && el.has_class(class),
            Matcher::Attribute(name, value) => el.get_attribute(name) == Some(value),
        }
    }
}

/// Elements removed wholesale, with their subtree
pub const DENYLIST: &[Matcher] = &[
    Matcher::Class("mw-editsection"),
    Matcher::Class("mw-cite-backlink"),
    Matcher::Class("reference"),
    Matcher::Class("noprint"),
    Matcher::Class("mw-empty-elt"),
    Matcher::Class("navbox"),
    Matcher::Class("sistersitebox"),
    Matcher::Class("mbox-small"),
    Matcher::Attribute("role", "navigation"),
    Matcher::Class("authority-control"),
    Matcher::Class("catlinks"),
    Matcher::TagClass("sup", "reference"),
    Matcher::TagClass("sup", "noprint"),
    Matcher::Class("Template-Fact"),
];

/// Phrases that mark a `span`/`i` as an inline maintenance tag
const BOILERPLATE_PHRASES: &[&str] = &["citation needed", "broken anchor"];

/// Collapsible-section toggle labels
const TOGGLE_LABELS: &[&str] = &["hide", "show"];

/// Marker that identifies an edit action in a link target
const EDIT_ACTION: &str = "action=edit";

pub fn is_denylisted(el: &ElementNode) -> bool {
    DENYLIST.iter().any(|m| m.matches(el))
}

/// Anchors reading "edit" / "[edit]", or pointing at an edit action
pub fn is_edit_link(el: &ElementNode) -> bool {
    if !el.is_tag("a") {
        return false;
    }
    let text = el.text_content().trim().to_lowercase();
    text == "edit" || text == "[edit]" || el.get_attribute("href").is_some_and(|h| h.contains(EDIT_ACTION))
}

/// `span`/`i` elements holding a maintenance phrase or a show/hide toggle
pub fn is_boilerplate_label(el: &ElementNode) -> bool {
    if !(el.is_tag("span") || el.is_tag("i")) {
        return false;
    }
    let text = el.text_content().trim().to_lowercase();
    BOILERPLATE_PHRASES.iter().any(|p| text.contains(p)) || TOGGLE_LABELS.contains(&text.as_str())
}

/// Remove all boilerplate below `root`, in three independent passes.
///
/// Returns the number of elements removed.
pub fn strip_boilerplate(root: &mut ElementNode) -> usize {
    let mut removed = root.remove_descendants(&is_denylisted);
    removed += root.remove_descendants(&is_edit_link);
    removed += root.remove_descendants(&is_boilerplate_label);
    removed += root.simplify();
    removed
}
