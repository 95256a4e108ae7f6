//! The seam between the selection state machine and a live page.

use serde::{Deserialize, Serialize};

use crate::dom::BoundingBox;
use crate::error::Result;

/// Opaque reference to an element in the host page.
///
/// The page keeps the mapping weakly; a handle never keeps its element alive,
/// and operations on a handle whose element is gone fail with `ClipError::Page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementHandle(pub u64);

/// Event forwarded from the page's capturing-phase listeners
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PageEvent {
    PointerMove { target: ElementHandle },
    Click { target: ElementHandle },
    KeyDown { key: String },
}

impl PageEvent {
    pub fn is_pointer_move(&self) -> bool {
        matches!(self, PageEvent::PointerMove { .. })
    }
}

/// Whether the page should go on to process an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDisposition {
    /// Default action and propagation are cancelled
    Consume,
    PassThrough,
}

/// Visible viewport in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    #[serde(rename = "dpr", default = "default_dpr")]
    pub device_pixel_ratio: f64,
}

fn default_dpr() -> f64 {
    1.0
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self { width, height, device_pixel_ratio }
    }
}

/// An inline style declaration; an empty value means "not set"
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StyleValue {
    pub value: String,
    #[serde(default)]
    pub important: bool,
}

impl StyleValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into(), important: false }
    }

    pub fn important(value: impl Into<String>) -> Self {
        Self { value: value.into(), important: true }
    }

    pub fn unset() -> Self {
        Self::default()
    }

    pub fn is_unset(&self) -> bool {
        self.value.is_empty()
    }
}

/// Everything the picker and the pipelines need from a page.
///
/// Implemented over CDP by `browser::CdpPage`, and by in-memory fakes in tests.
pub trait HostPage {
    /// Install the pointer-move, click and keydown listeners (capturing phase)
    fn attach_listeners(&self) -> Result<()>;

    fn detach_listeners(&self) -> Result<()>;

    /// Listeners currently installed by the picker
    fn listener_count(&self) -> Result<usize>;

    /// Drain the queued events, oldest first
    fn poll_events(&self) -> Result<Vec<PageEvent>>;

    fn get_style(&self, element: ElementHandle, property: &str) -> Result<StyleValue>;

    fn set_style(&self, element: ElementHandle, property: &str, value: &StyleValue) -> Result<()>;

    /// Show the non-interactive status overlay, one entry per line
    fn show_overlay(&self, lines: &[String]) -> Result<()>;

    fn hide_overlay(&self) -> Result<()>;

    /// Inline cursor of the document body
    fn cursor(&self) -> Result<StyleValue>;

    fn set_cursor(&self, value: &StyleValue) -> Result<()>;

    fn outer_html(&self, element: ElementHandle) -> Result<String>;

    /// URL relative links in the page resolve against
    fn base_url(&self) -> Result<String>;

    fn scroll_into_view(&self, element: ElementHandle) -> Result<()>;

    /// Bounding box relative to the viewport, in CSS pixels
    fn bounding_box(&self, element: ElementHandle) -> Result<BoundingBox>;

    fn viewport(&self) -> Result<Viewport>;

    /// PNG of the visible viewport at device resolution
    fn capture_viewport(&self) -> Result<Vec<u8>>;
}

/// Drop pointer moves that are immediately superseded by another pointer move
pub fn coalesce(events: Vec<PageEvent>) -> Vec<PageEvent> {
    let mut out: Vec<PageEvent> = Vec::with_capacity(events.len());
    for event in events {
        if event.is_pointer_move() && out.last().is_some_and(PageEvent::is_pointer_move) {
            out.pop();
        }
        out.push(event);
    }
    out
}
