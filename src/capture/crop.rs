use std::io::Cursor;

use image::{DynamicImage, ImageOutputFormat};

use super::rect::CaptureRect;
use crate::clipboard::ClipboardArtifact;
use crate::error::{ClipError, Result};

pub const PNG_MIME_TYPE: &str = "image/png";

/// Cut `rect` out of a full-viewport capture and encode it as PNG.
///
/// The destination is exactly the region's size; pixels are copied, not resampled.
pub fn crop(source: &[u8], rect: &CaptureRect) -> Result<ClipboardArtifact> {
    let image = image::load_from_memory(source).map_err(|e| ClipError::ImageDecode(e.to_string()))?;

    let (x, y, width, height) = rect.pixel_bounds(image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(ClipError::EmptyCaptureRegion { width, height });
    }

    let region = image.crop_imm(x, y, width, height);

    log::debug!(
        "Cropped {}x{} capture to {}x{} at ({}, {})",
        image.width(),
        image.height(),
        width,
        height,
        x,
        y
    );

    Ok(ClipboardArtifact::Image { bytes: encode_png(&region)?, mime_type: PNG_MIME_TYPE.to_string() })
}

fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .map_err(|e| ClipError::ImageEncode(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::BoundingBox;
    use crate::picker::Viewport;
    use image::{GenericImageView, Rgba, RgbaImage};

    /// 8x6 image: left half red, right half blue
    fn fixture() -> Vec<u8> {
        let image = RgbaImage::from_fn(8, 6, |x, _| if x < 4 { Rgba([255, 0, 0, 255]) } else { Rgba([0, 0, 255, 255]) });
        encode_png(&DynamicImage::ImageRgba8(image)).unwrap()
    }

    fn rect(x: f64, y: f64, width: f64, height: f64) -> CaptureRect {
        CaptureRect::from_viewport(BoundingBox::new(x, y, width, height), Viewport::new(8.0, 6.0, 1.0), 1.0)
    }

    fn decode(artifact: ClipboardArtifact) -> DynamicImage {
        match artifact {
            ClipboardArtifact::Image { bytes, mime_type } => {
                assert_eq!(mime_type, PNG_MIME_TYPE);
                image::load_from_memory(&bytes).unwrap()
            }
            other => panic!("expected image, got {:?}", other),
        }
    }

    #[test]
    fn test_crop_copies_region_without_scaling() {
        let cropped = decode(crop(&fixture(), &rect(3.0, 1.0, 2.0, 4.0)).unwrap());
        assert_eq!(cropped.dimensions(), (2, 4));
        assert_eq!(cropped.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(cropped.get_pixel(1, 3), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_crop_at_device_scale() {
        let rect = CaptureRect::from_viewport(BoundingBox::new(2.0, 0.0, 2.0, 3.0), Viewport::new(4.0, 3.0, 2.0), 2.0);
        let cropped = decode(crop(&fixture(), &rect).unwrap());
        assert_eq!(cropped.dimensions(), (4, 6));
        assert_eq!(cropped.get_pixel(0, 0), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_crop_keeps_source_color_type() {
        let rgb = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(8, 6, image::Rgb([0, 128, 0])));
        let cropped = decode(crop(&encode_png(&rgb).unwrap(), &rect(1.0, 1.0, 3.0, 2.0)).unwrap());
        assert_eq!(cropped.dimensions(), (3, 2));
        assert_eq!(cropped.color(), image::ColorType::Rgb8);
        assert_eq!(cropped.get_pixel(2, 1), Rgba([0, 128, 0, 255]));
    }

    #[test]
    fn test_undecodable_source() {
        let result = crop(b"not a png", &rect(0.0, 0.0, 2.0, 2.0));
        assert!(matches!(result, Err(ClipError::ImageDecode(_))));
    }

    #[test]
    fn test_empty_region() {
        let result = crop(&fixture(), &rect(10.0, 0.0, 2.0, 2.0));
        assert!(matches!(result, Err(ClipError::EmptyCaptureRegion { width: 0, .. })));
    }
}
