use std::time::Duration;

/// Inline styles applied to the element under the pointer.
///
/// Longhands only: reading a shorthand back from inline style is lossy when
/// the page set just some of its longhands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightStyle {
    pub outline_width: String,
    pub outline_style: String,
    pub outline_color: String,
    pub outline_offset: String,
    pub background_color: String,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            outline_width: "3px".to_string(),
            outline_style: "solid".to_string(),
            outline_color: "rgba(111, 168, 220, 0.9)".to_string(),
            outline_offset: "-1px".to_string(),
            background_color: "rgba(111, 168, 220, 0.25)".to_string(),
        }
    }
}

impl HighlightStyle {
    /// CSS property names touched by highlighting, in application order
    pub const PROPERTIES: [&'static str; 5] =
        ["outline-width", "outline-style", "outline-color", "outline-offset", "background-color"];

    /// `(property, value)` pairs to apply
    pub fn declarations(&self) -> [(&'static str, &str); 5] {
        [
            ("outline-width", &self.outline_width),
            ("outline-style", &self.outline_style),
            ("outline-color", &self.outline_color),
            ("outline-offset", &self.outline_offset),
            ("background-color", &self.background_color),
        ]
    }
}

/// Picker timing and appearance
#[derive(Debug, Clone, PartialEq)]
pub struct PickerConfig {
    /// Wait after scrolling the selection into view, before capturing
    pub settle_delay: Duration,

    /// How often the page event queue is drained
    pub poll_interval: Duration,

    /// Give up on a session nobody interacts with; `None` waits forever
    pub idle_timeout: Option<Duration>,

    pub highlight: HighlightStyle,

    /// Cursor shown while picking
    pub cursor: String,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(100),
            poll_interval: Duration::from_millis(25),
            idle_timeout: None,
            highlight: HighlightStyle::default(),
            cursor: "crosshair".to_string(),
        }
    }
}

impl PickerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }
}
