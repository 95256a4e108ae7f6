//! Element picker
//!
//! A small state machine driven by page events: the element under the pointer is
//! highlighted, a click confirms it, Escape cancels. The page itself is reached
//! only through [`HostPage`], so the same logic runs against a live tab or a fake.

pub mod guard;
pub mod page;
pub mod session;
pub mod style;

#[cfg(test)]
pub(crate) mod fake;

pub use guard::{SessionGuard, SessionManager, StartOutcome};
pub use page::{ElementHandle, EventDisposition, HostPage, PageEvent, StyleValue, Viewport, coalesce};
pub use session::{CaptureMode, SelectionSession, SessionOutcome, SessionState, overlay_lines};
pub use style::StyleSnapshot;
