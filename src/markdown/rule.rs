//! Rule and Filter types for HTML conversion.

use crate::dom::ElementNode;
use crate::markdown::ConvertOptions;

/// The element a rule is looking at, with just enough surrounding context
#[derive(Debug, Clone, Copy)]
pub struct NodeContext<'a> {
    pub node: &'a ElementNode,
    pub parent: Option<&'a ElementNode>,
    /// Position among the parent's element children
    pub index: usize,
}

impl NodeContext<'_> {
    pub fn tag_name(&self) -> &str {
        &self.node.tag_name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.node.get_attribute(name)
    }

    pub fn parent_tag(&self) -> Option<&str> {
        self.parent.map(|p| p.tag_name.as_str())
    }
}

/// Type alias for replacement functions
pub type ReplacementFn = Box<dyn Fn(&NodeContext, &str, &ConvertOptions) -> String + Send + Sync>;

/// Type alias for filter predicates
pub type PredicateFn = Box<dyn Fn(&NodeContext, &ConvertOptions) -> bool + Send + Sync>;

/// A filter determines which elements a rule applies to
pub enum Filter {
    /// Match a single tag name
    TagName(String),
    /// Match any of multiple tag names
    TagNames(Vec<String>),
    /// Match using a predicate function
    Predicate(PredicateFn),
}

impl Filter {
    /// Create a filter for a single tag
    pub fn tag(name: &str) -> Self {
        Filter::TagName(name.to_lowercase())
    }

    /// Create a filter for multiple tags
    pub fn tags(names: &[&str]) -> Self {
        Filter::TagNames(names.iter().map(|s| s.to_lowercase()).collect())
    }

    /// Create a filter with a predicate
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&NodeContext, &ConvertOptions) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Box::new(f))
    }

    /// Check if this filter matches an element
    pub fn matches(&self, ctx: &NodeContext, options: &ConvertOptions) -> bool {
        match self {
            Filter::TagName(t) => ctx.tag_name() == t,
            Filter::TagNames(tags) => tags.iter().any(|t| t == ctx.tag_name()),
            Filter::Predicate(f) => f(ctx, options),
        }
    }
}

/// A named filter + replacement pair
pub struct Rule {
    pub name: &'static str,
    /// Filter to determine which elements this rule applies to
    pub filter: Filter,
    /// Replacement function that generates Markdown
    pub replacement: ReplacementFn,
}

impl Rule {
    /// Create a new rule
    pub fn new<F>(name: &'static str, filter: Filter, replacement: F) -> Self
    where
        F: Fn(&NodeContext, &str, &ConvertOptions) -> String + Send + Sync + 'static,
    {
        Self {
            name,
            filter,
            replacement: Box::new(replacement),
        }
    }

    /// Create a rule that matches a single tag
    pub fn for_tag<F>(name: &'static str, tag: &str, replacement: F) -> Self
    where
        F: Fn(&NodeContext, &str, &ConvertOptions) -> String + Send + Sync + 'static,
    {
        Self::new(name, Filter::tag(tag), replacement)
    }

    /// Create a rule that matches multiple tags
    pub fn for_tags<F>(name: &'static str, tags: &[&str], replacement: F) -> Self
    where
        F: Fn(&NodeContext, &str, &ConvertOptions) -> String + Send + Sync + 'static,
    {
        Self::new(name, Filter::tags(tags), replacement)
    }

    /// Apply this rule's replacement
    pub fn replace(&self, ctx: &NodeContext, content: &str, options: &ConvertOptions) -> String {
        (self.replacement)(ctx, content, options)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish_non_exhaustive()
    }
}
