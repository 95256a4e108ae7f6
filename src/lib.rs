//! # clipmd
//!
//! Pick an element in a browser tab and copy it to the clipboard, either as
//! Markdown or as a screenshot cropped to the element.
//!
//! ## Features
//!
//! - **Element Picker**: hover highlighting, click to confirm, Escape to cancel, with every
//!   page mutation undone on exit
//! - **HTML Normalization**: relative URLs resolved, wiki boilerplate and presentation
//!   attributes stripped
//! - **Markdown Conversion**: ordered first-match rules with fenced code blocks, GFM tables and
//!   labels for empty links
//! - **Screenshot Cropping**: full-viewport capture cropped to the element in device pixels
//! - **Clipboard**: text and PNG output, falling back to a new tab when images are refused
//!
//! ## Command Line
//!
//! ```bash
//! # Open a page, pick an element, copy it as Markdown
//! cargo run -- pick https://en.wikipedia.org/wiki/Rust_(programming_language)
//!
//! # Same, but as a cropped screenshot, in an already running Chrome
//! cargo run -- pick example.com --mode screenshot --ws-endpoint ws://127.0.0.1:9222/devtools/browser/...
//!
//! # Convert saved HTML without a browser
//! cargo run -- convert page.html --base-url https://example.com/
//! ```
//!
//! ## Library Usage
//!
//! ### Interactive picking
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use clipmd::{BrowserSession, CaptureMode, ClipboardWriter, LaunchOptions, LogNotifier, Orchestrator, SystemClipboard};
//!
//! # fn main() -> clipmd::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! let page = Arc::new(session.open_page("https://example.com")?);
//!
//! let writer = ClipboardWriter::new(SystemClipboard::new(), &session);
//! let mut orchestrator = Orchestrator::new(page, writer, LogNotifier);
//! let outcome = orchestrator.run(CaptureMode::Markdown)?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```
//!
//! ### Converting markup
//!
//! ```rust
//! use clipmd::{MarkdownConverter, Normalizer};
//! use url::Url;
//!
//! # fn main() -> clipmd::Result<()> {
//! let base = Url::parse("https://example.com/docs/").unwrap();
//! let fragment = Normalizer::new(base).normalize_html(r#"<p class="lead">See <a href="guide">the guide</a></p>"#);
//!
//! let markdown = MarkdownConverter::new().convert(&fragment.html)?;
//! assert_eq!(markdown, "See [the guide](https://example.com/docs/guide)");
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`picker`]: selection state machine and the [`HostPage`] seam it drives
//! - [`normalize`]: HTML cleanup ahead of conversion
//! - [`markdown`]: HTML to Markdown rules and converter
//! - [`capture`]: capture rectangle and PNG cropping
//! - [`clipboard`]: clipboard output with viewer fallback
//! - [`orchestrator`]: wires the picker to the pipelines
//! - [`browser`]: Chrome session and the CDP implementation of [`HostPage`]
//! - [`dom`]: owned element tree, parsing and serialization
//! - [`error`]: Error types and result aliases

pub mod browser;
pub mod capture;
pub mod clipboard;
pub mod config;
pub mod dom;
pub mod error;
pub mod markdown;
pub mod messages;
pub mod normalize;
pub mod notify;
pub mod orchestrator;
pub mod picker;

pub use browser::{BrowserSession, CdpPage, ConnectionOptions, LaunchOptions};
pub use capture::{CaptureRect, crop};
pub use clipboard::{ClipboardArtifact, ClipboardBackend, ClipboardWriter, ImageViewer, SystemClipboard, WriteOutcome};
pub use config::{HighlightStyle, PickerConfig};
pub use dom::{BoundingBox, DomNode, ElementNode};
pub use error::{ClipError, Result};
pub use markdown::{ConvertOptions, HeadingStyle, MarkdownConverter};
pub use messages::{PipelineRequest, PipelineResponse};
pub use normalize::{NormalizedFragment, Normalizer};
pub use notify::{LogNotifier, Notifier};
pub use orchestrator::{Orchestrator, PipelineOutcome};
pub use picker::{CaptureMode, ElementHandle, HostPage, PageEvent, SelectionSession, SessionManager, SessionOutcome};
