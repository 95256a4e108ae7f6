//! Utility functions and constants for HTML processing.

/// Block-level HTML elements
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "audio", "blockquote", "body", "canvas", "center", "dd", "details",
    "dialog", "dir", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form",
    "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "html", "li", "main",
    "menu", "nav", "noframes", "noscript", "ol", "output", "p", "pre", "section", "summary", "table",
    "tbody", "td", "tfoot", "th", "thead", "tr", "ul", "video",
];

/// Check if a tag is a block-level element
pub fn is_block(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag.to_lowercase().as_str())
}

/// Escape text so it is not read as Markdown syntax.
///
/// Inline markers are escaped everywhere; block markers only at the start.
pub fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\\' | '*' | '_' | '`' | '[' | ']' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }

    escape_line_start(&result)
}

fn escape_line_start(text: &str) -> String {
    let digits = text.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 && text[digits..].starts_with(". ") {
        return format!("{}\\{}", &text[..digits], &text[digits..]);
    }

    let hashes = text.chars().take_while(|&c| c == '#').count();
    let needs_escape = text.starts_with('-')
        || text.starts_with("+ ")
        || text.starts_with('=')
        || text.starts_with('>')
        || text.starts_with("~~~")
        || ((1..=6).contains(&hashes) && text[hashes..].starts_with(' '));

    if needs_escape {
        format!("\\{}", text)
    } else {
        text.to_string()
    }
}

/// Collapse runs of whitespace into single spaces
pub fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_whitespace = false;

    for c in s.chars() {
        if c.is_whitespace() {
            if !prev_was_whitespace {
                result.push(' ');
                prev_was_whitespace = true;
            }
        } else {
            result.push(c);
            prev_was_whitespace = false;
        }
    }

    result
}

/// Clean an attribute value (trim, drop line breaks, handle missing)
pub fn clean_attribute(value: Option<&str>) -> String {
    value
        .map(|v| collapse_whitespace(v.trim()))
        .unwrap_or_default()
}

/// Wrap inline content in a delimiter, keeping outer whitespace outside of it
pub fn wrap_inline(content: &str, delimiter: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let leading = if content.starts_with(char::is_whitespace) { " " } else { "" };
    let trailing = if content.ends_with(char::is_whitespace) { " " } else { "" };
    format!("{leading}{delimiter}{trimmed}{delimiter}{trailing}")
}

/// Longest run of `ch` in `text`
pub fn longest_run(text: &str, ch: char) -> usize {
    text.chars()
        .fold((0, 0), |(max, current), c| {
            if c == ch {
                (max.max(current + 1), current + 1)
            } else {
                (max, 0)
            }
        })
        .0
}

/// Append `piece` to `output`, merging the newlines where the two meet.
///
/// The separator is the longer of the two newline runs, capped at one blank
/// line. Newlines inside `piece` are left alone.
pub fn join(output: &mut String, piece: &str) {
    let kept = output.trim_end_matches('\n').len();
    let trailing = output.len() - kept;
    let body = piece.trim_start_matches('\n');
    let leading = piece.len() - body.len();

    output.truncate(kept);
    output.push_str(&"\n".repeat(trailing.max(leading).min(2)));
    output.push_str(body);
}

/// A line of Markdown with its container markers (`>`, list bullets and
/// numbers, indentation) split off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLine<'a> {
    pub body: &'a str,
    /// The line starts a list item
    pub item_start: bool,
}

impl<'a> BlockLine<'a> {
    pub fn new(line: &'a str) -> Self {
        let mut rest = line;
        let mut item_start = false;
        loop {
            let trimmed = rest.trim_start_matches(' ');
            if let Some(after) = trimmed.strip_prefix('>') {
                rest = after;
            } else if let Some(after) = list_marker(trimmed) {
                rest = after;
                item_start = true;
            } else {
                return Self { body: trimmed, item_start };
            }
        }
    }

    pub fn is_blank(&self) -> bool {
        self.body.trim().is_empty()
    }

    /// Fence character and run length if this line opens a code fence.
    ///
    /// Three or more backticks or tildes, then an info string; a backtick
    /// fence's info string holds no backticks, which rules out inline code.
    pub fn fence_opener(&self) -> Option<(char, usize)> {
        let fence_char = self.body.chars().next().filter(|c| matches!(c, '`' | '~'))?;
        let run = self.body.chars().take_while(|&c| c == fence_char).count();
        let info = &self.body[run..];
        (run >= 3 && !(fence_char == '`' && info.contains('`'))).then_some((fence_char, run))
    }

    /// Whether this line closes a fence opened with `run` × `fence_char`
    pub fn closes_fence(&self, (fence_char, run): (char, usize)) -> bool {
        let body = self.body.trim_end();
        body.len() >= run && body.chars().all(|c| c == fence_char)
    }
}

/// Text after a bullet (`*`, `-`, `+`) or ordinal (`1.`, `1)`) marker
fn list_marker(line: &str) -> Option<&str> {
    if let Some(after) = line.strip_prefix(['*', '-', '+'])
        && after.starts_with(' ')
    {
        return Some(after);
    }
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0
        && let Some(after) = line[digits..].strip_prefix(['.', ')'])
        && after.starts_with(' ')
    {
        return Some(after);
    }
    None
}
