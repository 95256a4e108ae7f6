//! Rule-driven tree walk from parsed markup to Markdown.

use super::ConvertOptions;
use super::commonmark::commonmark_rules;
use super::custom::custom_rules;
use super::rule::{NodeContext, Rule};
use super::utilities::{BlockLine, collapse_whitespace, escape_markdown, is_block, join};
use crate::dom::{self, DomNode, ElementNode};
use crate::error::{ClipError, Result};

/// Converts HTML fragments to Markdown
#[derive(Debug)]
pub struct MarkdownConverter {
    options: ConvertOptions,
    rules: Vec<Rule>,
}

impl MarkdownConverter {
    /// Create a converter with default options
    pub fn new() -> Self {
        Self::with_options(ConvertOptions::default())
    }

    /// Create a converter with custom options
    pub fn with_options(options: ConvertOptions) -> Self {
        let mut rules = custom_rules();
        rules.extend(commonmark_rules());
        Self { options, rules }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Convert an HTML fragment to Markdown
    pub fn convert(&self, html: &str) -> Result<String> {
        if html.len() > self.options.max_input_len {
            return Err(ClipError::Conversion(format!(
                "Input is {} bytes, limit is {}",
                html.len(),
                self.options.max_input_len
            )));
        }

        let root = dom::parse_fragment(html);
        let markdown = self.convert_node(&root);
        log::debug!("Converted {} bytes of HTML to {} bytes of Markdown", html.len(), markdown.len());
        Ok(markdown)
    }

    /// Convert the children of an already-parsed node
    pub fn convert_node(&self, root: &ElementNode) -> String {
        post_process(&self.process_children(root))
    }

    fn process_children(&self, parent: &ElementNode) -> String {
        let mut output = String::new();
        let mut index = 0;

        for child in &parent.children {
            match child {
                DomNode::Text { text } => {
                    let mut text = collapse_whitespace(text);
                    if output.is_empty() || output.ends_with('\n') {
                        text = text.trim_start().to_string();
                    }
                    if !text.is_empty() {
                        output.push_str(&escape_markdown(&text));
                    }
                }
                DomNode::Element(node) => {
                    let ctx = NodeContext { node, parent: Some(parent), index };
                    join(&mut output, &self.process_element(&ctx));
                    index += 1;
                }
            }
        }

        output
    }

    fn process_element(&self, ctx: &NodeContext) -> String {
        let content = self.process_children(ctx.node);

        match self.rules.iter().find(|rule| rule.filter.matches(ctx, &self.options)) {
            Some(rule) => rule.replace(ctx, &content, &self.options),
            None if is_block(ctx.tag_name()) => format!("\n\n{}\n\n", content),
            None => content,
        }
    }
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Tidy whitespace outside fenced code.
///
/// Whitespace-only lines become empty, trailing spaces go except a two-space
/// hard break, runs of blank lines collapse to one, and the result is trimmed.
/// A fence opens only at a block boundary and closes on a bare run of the same
/// character at least as long as the opener.
fn post_process(markdown: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut fence: Option<(char, usize)> = None;
    let mut blank_run = 0;

    for line in markdown.split('\n') {
        let block = BlockLine::new(line);

        if let Some(open) = fence {
            if block.closes_fence(open) {
                fence = None;
            }
            lines.push(line.to_string());
            continue;
        }

        let at_boundary = block.item_start || lines.last().is_none_or(|last| BlockLine::new(last).is_blank());
        if at_boundary && let Some(open) = block.fence_opener() {
            fence = Some(open);
            blank_run = 0;
            lines.push(line.trim_end().to_string());
            continue;
        }

        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            blank_run += 1;
            if blank_run == 1 {
                lines.push(String::new());
            }
            continue;
        }
        blank_run = 0;

        if line.ends_with("  ") {
            lines.push(format!("{}  ", trimmed));
        } else {
            lines.push(trimmed.to_string());
        }
    }

    lines.join("\n").trim().to_string()
}
