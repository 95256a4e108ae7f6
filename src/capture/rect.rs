use serde::{Deserialize, Serialize};

use crate::dom::BoundingBox;
use crate::picker::Viewport;

/// Region of a viewport capture, in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
    /// Unclamped element size, for reporting partially visible elements
    pub full_width: f64,
    pub full_height: f64,
}

impl CaptureRect {
    /// Clamp an element's viewport-relative box to what is visible, then scale to device pixels
    pub fn from_viewport(element: BoundingBox, viewport: Viewport, device_pixel_ratio: f64) -> Self {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 { device_pixel_ratio } else { 1.0 };

        let (x, width) = visible_span(element.x, element.width, viewport.width);
        let (y, height) = visible_span(element.y, element.height, viewport.height);

        Self {
            x: x * dpr,
            y: y * dpr,
            width: width * dpr,
            height: height * dpr,
            device_pixel_ratio: dpr,
            full_width: element.width.max(0.0) * dpr,
            full_height: element.height.max(0.0) * dpr,
        }
    }

    /// True when part of the element was cut off by the viewport
    pub fn is_clipped(&self) -> bool {
        self.width < self.full_width || self.height < self.full_height
    }

    /// Integer pixel bounds `(x, y, width, height)` inside an image of `image_width × image_height`
    pub fn pixel_bounds(&self, image_width: u32, image_height: u32) -> (u32, u32, u32, u32) {
        let x = (self.x.round().max(0.0) as u32).min(image_width);
        let y = (self.y.round().max(0.0) as u32).min(image_height);
        let width = (self.width.round().max(0.0) as u32).min(image_width - x);
        let height = (self.height.round().max(0.0) as u32).min(image_height - y);
        (x, y, width, height)
    }
}

/// Start and length of `[start, start + len)` inside `[0, extent]`
fn visible_span(start: f64, len: f64, extent: f64) -> (f64, f64) {
    let begin = start.max(0.0).min(extent.max(0.0));
    let end = (start + len.max(0.0)).min(extent).max(begin);
    (begin, end - begin)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0, 1.0)
    }

    #[test]
    fn test_clamps_negative_origin_to_visible_remainder() {
        let rect = CaptureRect::from_viewport(BoundingBox::new(-50.0, 10.0, 200.0, 100.0), viewport(), 1.0);
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.width, 150.0);
        assert_eq!(rect.full_width, 200.0);
        assert!(rect.is_clipped());
    }

    #[test]
    fn test_clamps_to_far_edge() {
        let rect = CaptureRect::from_viewport(BoundingBox::new(700.0, 550.0, 300.0, 300.0), viewport(), 1.0);
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (700.0, 550.0, 100.0, 50.0));
    }

    #[test]
    fn test_scales_by_device_pixel_ratio() {
        let rect = CaptureRect::from_viewport(BoundingBox::new(10.0, 20.0, 30.0, 40.0), viewport(), 2.0);
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (20.0, 40.0, 60.0, 80.0));
        assert_eq!(rect.device_pixel_ratio, 2.0);
        assert!(!rect.is_clipped());
    }

    #[test]
    fn test_offscreen_element_has_no_area() {
        let rect = CaptureRect::from_viewport(BoundingBox::new(900.0, -400.0, 100.0, 100.0), viewport(), 1.0);
        assert_eq!(rect.width, 0.0);
        assert_eq!(rect.height, 0.0);
        assert!(rect.x >= 0.0 && rect.y >= 0.0);
    }

    #[test]
    fn test_invalid_dpr_falls_back_to_one() {
        let rect = CaptureRect::from_viewport(BoundingBox::new(0.0, 0.0, 10.0, 10.0), viewport(), 0.0);
        assert_eq!(rect.device_pixel_ratio, 1.0);
    }

    #[test]
    fn test_pixel_bounds_stay_inside_image() {
        let rect = CaptureRect::from_viewport(BoundingBox::new(700.0, 0.0, 100.0, 50.0), viewport(), 1.0);
        assert_eq!(rect.pixel_bounds(750, 600), (700, 0, 50, 50));
    }
}
