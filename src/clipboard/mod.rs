//! Clipboard output
//!
//! Text goes straight to the clipboard. Images try the clipboard first and fall
//! back to an [`ImageViewer`] so the user can still save the capture by hand.

pub mod system;

use serde::{Deserialize, Serialize};

pub use system::SystemClipboard;

use crate::error::{ClipError, Result};

/// Payload bound for the clipboard, consumed by exactly one write
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ClipboardArtifact {
    Text {
        content: String,
    },
    Image {
        #[serde(with = "base64_bytes")]
        bytes: Vec<u8>,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
}

impl std::fmt::Debug for ClipboardArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardArtifact::Text { content } => f.debug_struct("Text").field("len", &content.len()).finish(),
            ClipboardArtifact::Image { bytes, mime_type } => f
                .debug_struct("Image")
                .field("bytes", &bytes.len())
                .field("mime_type", mime_type)
                .finish(),
        }
    }
}

/// Something that can hold text and images for the user
pub trait ClipboardBackend {
    fn set_text(&mut self, text: &str) -> Result<()>;

    /// `png` is an encoded PNG
    fn set_image(&mut self, png: &[u8]) -> Result<()>;
}

/// Last resort for images the clipboard refused
pub trait ImageViewer {
    fn open_image(&self, bytes: &[u8], mime_type: &str) -> Result<()>;
}

impl<V: ImageViewer + ?Sized> ImageViewer for &V {
    fn open_image(&self, bytes: &[u8], mime_type: &str) -> Result<()> {
        (**self).open_image(bytes, mime_type)
    }
}

/// Where an artifact ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Copied,
    /// The clipboard refused the image; it was opened for manual saving instead
    OpenedInViewer,
}

/// Writes artifacts with the fallback chain applied
pub struct ClipboardWriter<B, V> {
    backend: B,
    viewer: V,
}

impl<B: ClipboardBackend, V: ImageViewer> ClipboardWriter<B, V> {
    pub fn new(backend: B, viewer: V) -> Self {
        Self { backend, viewer }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    /// Write any artifact
    pub fn write(&mut self, artifact: ClipboardArtifact) -> Result<WriteOutcome> {
        match artifact {
            ClipboardArtifact::Text { content } => self.write_text(&content),
            ClipboardArtifact::Image { bytes, mime_type } => self.write_image(&bytes, &mime_type),
        }
    }

    pub fn write_text(&mut self, content: &str) -> Result<WriteOutcome> {
        self.backend.set_text(content)?;
        log::info!("Copied {} bytes of text to the clipboard", content.len());
        Ok(WriteOutcome::Copied)
    }

    pub fn write_image(&mut self, bytes: &[u8], mime_type: &str) -> Result<WriteOutcome> {
        let direct = if mime_type == crate::capture::PNG_MIME_TYPE {
            self.backend.set_image(bytes)
        } else {
            Err(ClipError::ClipboardWrite(format!("Unsupported image type {}", mime_type)))
        };

        match direct {
            Ok(()) => {
                log::info!("Copied {} byte image to the clipboard", bytes.len());
                Ok(WriteOutcome::Copied)
            }
            Err(e) => {
                log::warn!("Clipboard image write failed, opening viewer instead: {}", e);
                self.viewer.open_image(bytes, mime_type)?;
                Ok(WriteOutcome::OpenedInViewer)
            }
        }
    }
}

mod base64_bytes {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MemoryClipboard {
        text: Option<String>,
        image: Option<Vec<u8>>,
        refuse_images: bool,
        refuse_text: bool,
    }

    impl ClipboardBackend for MemoryClipboard {
        fn set_text(&mut self, text: &str) -> Result<()> {
            if self.refuse_text {
                return Err(ClipError::ClipboardWrite("locked".to_string()));
            }
            self.text = Some(text.to_string());
            Ok(())
        }

        fn set_image(&mut self, png: &[u8]) -> Result<()> {
            if self.refuse_images {
                return Err(ClipError::ClipboardWrite("denied".to_string()));
            }
            self.image = Some(png.to_vec());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingViewer {
        opened: RefCell<Vec<String>>,
        broken: bool,
    }

    impl ImageViewer for RecordingViewer {
        fn open_image(&self, _bytes: &[u8], mime_type: &str) -> Result<()> {
            if self.broken {
                return Err(ClipError::TabOperationFailed("no tab".to_string()));
            }
            self.opened.borrow_mut().push(mime_type.to_string());
            Ok(())
        }
    }

    fn image() -> ClipboardArtifact {
        ClipboardArtifact::Image { bytes: vec![1, 2, 3], mime_type: "image/png".to_string() }
    }

    #[test]
    fn test_text_is_copied() {
        let mut writer = ClipboardWriter::new(MemoryClipboard::default(), RecordingViewer::default());
        let outcome = writer.write(ClipboardArtifact::Text { content: "# hi".to_string() }).unwrap();
        assert_eq!(outcome, WriteOutcome::Copied);
        assert_eq!(writer.backend().text.as_deref(), Some("# hi"));
    }

    #[test]
    fn test_text_failure_is_an_error() {
        let backend = MemoryClipboard { refuse_text: true, ..Default::default() };
        let mut writer = ClipboardWriter::new(backend, RecordingViewer::default());
        assert!(matches!(writer.write_text("x"), Err(ClipError::ClipboardWrite(_))));
        assert!(writer.viewer().opened.borrow().is_empty());
    }

    #[test]
    fn test_image_is_copied() {
        let mut writer = ClipboardWriter::new(MemoryClipboard::default(), RecordingViewer::default());
        assert_eq!(writer.write(image()).unwrap(), WriteOutcome::Copied);
        assert_eq!(writer.backend().image.as_deref(), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn test_refused_image_opens_viewer() {
        let backend = MemoryClipboard { refuse_images: true, ..Default::default() };
        let mut writer = ClipboardWriter::new(backend, RecordingViewer::default());
        assert_eq!(writer.write(image()).unwrap(), WriteOutcome::OpenedInViewer);
        assert_eq!(*writer.viewer().opened.borrow(), vec!["image/png".to_string()]);
    }

    #[test]
    fn test_viewer_failure_propagates() {
        let backend = MemoryClipboard { refuse_images: true, ..Default::default() };
        let viewer = RecordingViewer { broken: true, ..Default::default() };
        let mut writer = ClipboardWriter::new(backend, viewer);
        assert!(writer.write(image()).is_err());
    }

    #[test]
    fn test_artifact_wire_format() {
        let json = serde_json::to_value(image()).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "image", "bytes": "AQID", "mimeType": "image/png"}));
        let back: ClipboardArtifact = serde_json::from_value(json).unwrap();
        assert_eq!(back, image());
    }
}
