//! HTML to Markdown conversion
//!
//! An ordered, first-match-wins rule set. Rules for fenced code, links and
//! source-less images come first; the CommonMark/GFM baseline handles the rest.
//! Conversion is a pure function of the markup and the options.

pub mod commonmark;
pub mod converter;
pub mod custom;
pub mod rule;
pub mod utilities;

pub use converter::MarkdownConverter;
pub use custom::link_label;
pub use rule::{Filter, NodeContext, Rule};

use serde::{Deserialize, Serialize};

/// How `h1`/`h2` are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingStyle {
    /// Underlined with `===` / `---`; deeper levels fall back to `#`
    #[default]
    Setext,
    /// `#` prefixes at every level
    Atx,
}

/// Converter output options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    pub heading_style: HeadingStyle,
    /// Thematic break
    pub hr: String,
    pub bullet_list_marker: char,
    pub em_delimiter: char,
    pub strong_delimiter: String,
    pub fence_char: char,
    /// Inputs longer than this (in bytes) are rejected
    pub max_input_len: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Setext,
            hr: "* * *".to_string(),
            bullet_list_marker: '*',
            em_delimiter: '_',
            strong_delimiter: "**".to_string(),
            fence_char: '`',
            max_input_len: 16 * 1024 * 1024,
        }
    }
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heading_style(mut self, style: HeadingStyle) -> Self {
        self.heading_style = style;
        self
    }

    pub fn bullet_list_marker(mut self, marker: char) -> Self {
        self.bullet_list_marker = marker;
        self
    }

    pub fn max_input_len(mut self, len: usize) -> Self {
        self.max_input_len = len;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_builder() {
        let options = ConvertOptions::new().heading_style(HeadingStyle::Atx).bullet_list_marker('-');
        assert_eq!(options.heading_style, HeadingStyle::Atx);
        assert_eq!(options.bullet_list_marker, '-');
        assert_eq!(options.hr, "* * *");
    }

    #[test]
    fn test_options_deserialize_partial() {
        let options: ConvertOptions = serde_json::from_str(r#"{"heading_style": "atx"}"#).unwrap();
        assert_eq!(options.heading_style, HeadingStyle::Atx);
        assert_eq!(options.em_delimiter, '_');
    }
}
