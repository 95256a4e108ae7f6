//! Baseline CommonMark (plus GFM tables and strikethrough) rules.

use super::rule::{Filter, NodeContext, Rule};
use super::utilities::{clean_attribute, longest_run, wrap_inline};
use super::{ConvertOptions, HeadingStyle};
use crate::dom::ElementNode;

/// Create all baseline rules, in evaluation order
pub fn commonmark_rules() -> Vec<Rule> {
    vec![
        paragraph_rule(),
        line_break_rule(),
        heading_rule(),
        blockquote_rule(),
        list_rule(),
        list_item_rule(),
        preformatted_rule(),
        horizontal_rule(),
        emphasis_rule(),
        strong_rule(),
        strikethrough_rule(),
        code_rule(),
        image_rule(),
        detached_table_rule(),
        table_section_rule(),
        table_cell_rule(),
        table_row_rule(),
        table_rule(),
    ]
}

fn paragraph_rule() -> Rule {
    Rule::for_tag("paragraph", "p", |_, content, _| format!("\n\n{}\n\n", content.trim()))
}

fn line_break_rule() -> Rule {
    Rule::for_tag("lineBreak", "br", |_, _, _| "  \n".to_string())
}

fn heading_rule() -> Rule {
    Rule::for_tags("heading", &["h1", "h2", "h3", "h4", "h5", "h6"], |ctx, content, options| {
        let level: usize = ctx.tag_name()[1..].parse().unwrap_or(1);

        let content = content.trim().replace('\n', " ");
        if content.is_empty() {
            return String::new();
        }

        match options.heading_style {
            HeadingStyle::Setext if level <= 2 => {
                let underline = if level == 1 { "=" } else { "-" };
                format!("\n\n{}\n{}\n\n", content, underline.repeat(content.chars().count()))
            }
            _ => format!("\n\n{} {}\n\n", "#".repeat(level), content),
        }
    })
}

fn blockquote_rule() -> Rule {
    Rule::for_tag("blockquote", "blockquote", |_, content, _| {
        let content = content.trim_matches('\n');
        if content.trim().is_empty() {
            return String::new();
        }
        let quoted: Vec<String> = content
            .lines()
            .map(|line| if line.trim().is_empty() { ">".to_string() } else { format!("> {}", line) })
            .collect();
        format!("\n\n{}\n\n", quoted.join("\n"))
    })
}

fn list_rule() -> Rule {
    Rule::for_tags("list", &["ul", "ol"], |ctx, content, _| {
        if ctx.parent_tag() == Some("li") {
            // Nested lists hang off their parent item
            format!("\n{}", content.trim_end())
        } else {
            format!("\n\n{}\n\n", content.trim_matches('\n'))
        }
    })
}

fn list_item_rule() -> Rule {
    Rule::for_tag("listItem", "li", |ctx, content, options| {
        let content = content.trim_matches('\n').trim_start().replace('\n', "\n    ");

        let prefix = match ctx.parent {
            Some(parent) if parent.is_tag("ol") => {
                let start: usize = parent.get_attribute("start").and_then(|s| s.trim().parse().ok()).unwrap_or(1);
                format!("{}.  ", start + ctx.index)
            }
            _ => format!("{}   ", options.bullet_list_marker),
        };

        format!("{}{}\n", prefix, content)
    })
}

/// `pre` without a leading `code` element; the fenced rule handles the other case
fn preformatted_rule() -> Rule {
    Rule::for_tag("preformatted", "pre", |ctx, _, options| {
        let text = ctx.node.text_content();
        if text.trim().is_empty() {
            return String::new();
        }
        fenced_block(&text, "", options)
    })
}

fn horizontal_rule() -> Rule {
    Rule::for_tag("horizontalRule", "hr", |_, _, options| format!("\n\n{}\n\n", options.hr))
}

fn emphasis_rule() -> Rule {
    Rule::for_tags("emphasis", &["em", "i"], |_, content, options| {
        wrap_inline(content, &options.em_delimiter.to_string())
    })
}

fn strong_rule() -> Rule {
    Rule::for_tags("strong", &["strong", "b"], |_, content, options| {
        wrap_inline(content, &options.strong_delimiter)
    })
}

fn strikethrough_rule() -> Rule {
    Rule::for_tags("strikethrough", &["del", "s", "strike"], |_, content, _| wrap_inline(content, "~~"))
}

fn code_rule() -> Rule {
    Rule::new(
        "code",
        Filter::predicate(|ctx, _| ctx.tag_name() == "code" && ctx.parent_tag() != Some("pre")),
        |ctx, _, _| {
            let content = ctx.node.text_content().replace('\n', " ");
            if content.is_empty() {
                return String::new();
            }

            let backticks = longest_run(&content, '`');
            let delimiter = "`".repeat(backticks + 1);

            let needs_space = backticks > 0 && (content.starts_with('`') || content.ends_with('`'));
            if needs_space {
                format!("{} {} {}", delimiter, content, delimiter)
            } else {
                format!("{}{}{}", delimiter, content, delimiter)
            }
        },
    )
}

fn image_rule() -> Rule {
    Rule::for_tag("image", "img", |ctx, _, _| {
        let alt = clean_attribute(ctx.attr("alt"));
        let src = clean_attribute(ctx.attr("src"));
        let title = clean_attribute(ctx.attr("title"));

        if src.is_empty() {
            return String::new();
        }

        let title_part = if title.is_empty() { String::new() } else { format!(" \"{}\"", title) };
        format!("![{}]({}{})", alt, src, title_part)
    })
}

/// `thead` / `tbody` / `tfoot` contribute their rows only
fn table_section_rule() -> Rule {
    Rule::for_tags("tableSection", &["thead", "tbody", "tfoot"], |_, content, _| content.to_string())
}

fn table_cell_rule() -> Rule {
    Rule::for_tags("tableCell", &["th", "td"], |_, content, _| {
        let cell = content.trim().replace('\n', " ").replace('|', "\\|");
        format!("| {} ", cell)
    })
}

fn table_row_rule() -> Rule {
    Rule::for_tag("tableRow", "tr", |ctx, content, _| {
        let cells = content.trim();
        if cells.is_empty() {
            return String::new();
        }
        let mut row = format!("\n{} |", cells);
        if is_heading_row(ctx) {
            row.push('\n');
            row.push_str(&separator_row(count_cells(ctx.node)));
        }
        row.push('\n');
        row
    })
}

fn table_rule() -> Rule {
    Rule::for_tag("table", "table", |ctx, content, _| assemble_table(ctx.node, content))
}

/// A row, section or cell picked on its own, without its `table`
fn detached_table_rule() -> Rule {
    Rule::new(
        "detachedTablePart",
        Filter::predicate(|ctx, _| {
            let parent = ctx.parent_tag().unwrap_or_default();
            match ctx.tag_name() {
                "thead" | "tbody" | "tfoot" => parent != "table",
                "tr" => !matches!(parent, "table" | "thead" | "tbody" | "tfoot"),
                "td" | "th" => parent != "tr",
                _ => false,
            }
        }),
        |ctx, content, _| match ctx.tag_name() {
            "td" | "th" => format!("\n\n{}\n\n", content.trim()),
            "tr" => {
                let cells = content.trim();
                if cells.is_empty() {
                    return String::new();
                }
                let mut rows = format!("{} |", cells);
                if ctx.node.element_children().all(|c| c.is_tag("th")) {
                    rows.push('\n');
                    rows.push_str(&separator_row(count_cells(ctx.node)));
                }
                assemble_table(ctx.node, &rows)
            }
            _ => assemble_table(ctx.node, content),
        },
    )
}

/// GFM table from rendered rows, with an empty header row when none was marked
fn assemble_table(node: &ElementNode, content: &str) -> String {
    let (rows, caption): (Vec<&str>, Vec<&str>) = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .partition(|l| l.starts_with('|'));

    if rows.is_empty() {
        return format!("\n\n{}\n\n", caption.join(" "));
    }

    let mut table = String::new();
    if !caption.is_empty() {
        table.push_str(&caption.join(" "));
        table.push_str("\n\n");
    }
    if !rows.iter().any(|r| is_separator_row(r)) {
        // GFM needs a header row; give header-less tables an empty one
        let first_row = if node.is_tag("tr") { Some(node) } else { node.find_descendant(&|e| e.is_tag("tr")) };
        let columns = first_row.map(count_cells).unwrap_or(1).max(1);
        table.push_str(&format!("|{}\n", "  |".repeat(columns)));
        table.push_str(&separator_row(columns));
        table.push('\n');
    }
    table.push_str(&rows.join("\n"));

    format!("\n\n{}\n\n", table)
}

fn is_heading_row(ctx: &NodeContext) -> bool {
    if ctx.parent_tag() == Some("thead") {
        return true;
    }
    let mut cells = ctx.node.element_children().filter(|c| c.is_tag("th") || c.is_tag("td")).peekable();
    ctx.index == 0
        && matches!(ctx.parent_tag(), Some("table") | Some("tbody"))
        && cells.peek().is_some()
        && cells.all(|c| c.is_tag("th"))
}

fn count_cells(row: &ElementNode) -> usize {
    row.element_children().filter(|c| c.is_tag("th") || c.is_tag("td")).count()
}

fn separator_row(columns: usize) -> String {
    format!("|{}", " --- |".repeat(columns.max(1)))
}

fn is_separator_row(row: &str) -> bool {
    row.starts_with("| ---") && row.chars().all(|c| matches!(c, '|' | '-' | ' ' | ':'))
}

/// Fenced code block whose fence outgrows any backtick run in `code`
pub fn fenced_block(code: &str, language: &str, options: &ConvertOptions) -> String {
    let fence_len = (longest_run(code, options.fence_char) + 1).max(3);
    let fence = options.fence_char.to_string().repeat(fence_len);
    let code = code.strip_suffix('\n').unwrap_or(code);
    format!("\n\n{fence}{language}\n{code}\n{fence}\n\n")
}
