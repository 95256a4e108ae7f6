//! Element screenshots
//!
//! The element is scrolled into view, the page gets a moment to settle, and the
//! visible part of its box is cut out of a full-viewport capture.

pub mod crop;
pub mod rect;

use std::time::Duration;

pub use crop::{PNG_MIME_TYPE, crop};
pub use rect::CaptureRect;

use crate::error::Result;
use crate::picker::{ElementHandle, HostPage};

/// Bring `element` on screen and measure its visible region
pub fn locate_element<P: HostPage + ?Sized>(page: &P, element: ElementHandle, settle_delay: Duration) -> Result<CaptureRect> {
    page.scroll_into_view(element)?;
    std::thread::sleep(settle_delay);

    let bbox = page.bounding_box(element)?;
    if !bbox.is_visible() {
        log::debug!("Element {} has no layout box", element.0);
    }
    let viewport = page.viewport()?;
    let rect = CaptureRect::from_viewport(bbox, viewport, viewport.device_pixel_ratio);
    if rect.is_clipped() {
        log::info!(
            "Element is larger than the viewport; capturing the visible {}x{} of {}x{}",
            rect.width,
            rect.height,
            rect.full_width,
            rect.full_height
        );
    }
    Ok(rect)
}
