use std::borrow::Cow;
use std::time::Duration;

use arboard::{Clipboard, ImageData, Set};

use super::ClipboardBackend;
use crate::error::{ClipError, Result};

/// What was last written, kept for [`SystemClipboard::hand_off`]
#[derive(Debug, Clone)]
enum Written {
    Text(String),
    Image(ImageData<'static>),
}

/// The desktop clipboard.
///
/// Opened lazily so constructing one never fails; a clipboard that cannot be
/// opened surfaces as a write error.
///
/// On X11 and Wayland the copied content is served by this process and goes
/// away with it. A short-lived process calls [`hand_off`](Self::hand_off)
/// before exiting.
#[derive(Default)]
pub struct SystemClipboard {
    clipboard: Option<Clipboard>,
    written: Option<Written>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn clipboard(&mut self) -> Result<&mut Clipboard> {
        if self.clipboard.is_none() {
            let clipboard = Clipboard::new().map_err(|e| ClipError::ClipboardWrite(format!("Cannot open clipboard: {}", e)))?;
            self.clipboard = Some(clipboard);
        }
        self.clipboard
            .as_mut()
            .ok_or_else(|| ClipError::ClipboardWrite("Clipboard unavailable".to_string()))
    }

    /// Whether anything was written that [`hand_off`](Self::hand_off) would keep alive
    pub fn has_written(&self) -> bool {
        self.written.is_some()
    }

    /// Keep serving the last written content until another program copies
    /// something, or `hold` passes.
    ///
    /// Returns immediately where the clipboard outlives its writer, and when
    /// nothing was written.
    pub fn hand_off(&mut self, hold: Duration) -> Result<()> {
        let Some(written) = self.written.clone() else {
            return Ok(());
        };
        if !SERVED_BY_WRITER || hold.is_zero() {
            return Ok(());
        }

        log::info!("Keeping the clipboard for up to {:?}, or until something else is copied", hold);
        let set = keep_ownership(self.clipboard()?.set(), hold);
        match written {
            Written::Text(text) => set.text(text),
            Written::Image(image) => set.image(image),
        }
        .map_err(|e| ClipError::ClipboardWrite(e.to_string()))
    }
}

/// X11 and Wayland selections are owned by the copying process
const SERVED_BY_WRITER: bool =
    cfg!(all(unix, not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))));

#[cfg(all(unix, not(any(target_os = "macos", target_os = "android", target_os = "emscripten"))))]
fn keep_ownership(set: Set<'_>, hold: Duration) -> Set<'_> {
    use arboard::SetExtLinux;

    set.wait_until(std::time::Instant::now() + hold)
}

#[cfg(not(all(unix, not(any(target_os = "macos", target_os = "android", target_os = "emscripten")))))]
fn keep_ownership(set: Set<'_>, _hold: Duration) -> Set<'_> {
    set
}

impl ClipboardBackend for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.clipboard()?
            .set_text(text)
            .map_err(|e| ClipError::ClipboardWrite(e.to_string()))?;
        self.written = Some(Written::Text(text.to_string()));
        Ok(())
    }

    fn set_image(&mut self, png: &[u8]) -> Result<()> {
        let rgba = image::load_from_memory(png)
            .map_err(|e| ClipError::ImageDecode(e.to_string()))?
            .to_rgba8();
        let (width, height) = rgba.dimensions();

        let data = ImageData {
            width: width as usize,
            height: height as usize,
            bytes: Cow::Owned(rgba.into_raw()),
        };
        self.clipboard()?
            .set_image(data.clone())
            .map_err(|e| ClipError::ClipboardWrite(e.to_string()))?;
        self.written = Some(Written::Image(data));
        Ok(())
    }
}

impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard")
            .field("open", &self.clipboard.is_some())
            .field("written", &self.written.is_some())
            .finish()
    }
}
