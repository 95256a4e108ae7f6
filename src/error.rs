use thiserror::Error;

/// Errors produced anywhere along the selection-to-clipboard pipeline
#[derive(Debug, Error)]
pub enum ClipError {
    /// Failed to launch the browser
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Failed to attach to a running browser
    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    /// Tab lookup, creation or activation failed
    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    /// Navigation failed or timed out
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// A script evaluated in the page failed or returned garbage
    #[error("JavaScript evaluation failed: {0}")]
    EvaluationFailed(String),

    /// The browser refused to capture the visible tab
    #[error("Screenshot capture failed: {0}")]
    ScreenshotFailed(String),

    /// A page operation could not be carried out (element gone, bridge missing, ...)
    #[error("Page operation failed: {0}")]
    Page(String),

    /// The picker cannot attach to this page
    #[error("{0}")]
    InjectionDenied(String),

    /// The Markdown converter refused its input
    #[error("Markdown conversion failed: {0}")]
    Conversion(String),

    /// The full-viewport capture could not be decoded
    #[error("Failed to decode screenshot: {0}")]
    ImageDecode(String),

    /// The cropped image could not be encoded
    #[error("Failed to encode screenshot: {0}")]
    ImageEncode(String),

    /// The element has no visible area inside the viewport
    #[error("Selected element has no visible area ({width}x{height})")]
    EmptyCaptureRegion { width: u32, height: u32 },

    /// Writing to the system clipboard failed
    #[error("Clipboard write failed: {0}")]
    ClipboardWrite(String),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, ClipError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injection_denied_message_is_bare_reason() {
        let err = ClipError::InjectionDenied("Cannot run on browser internal pages".to_string());
        assert_eq!(err.to_string(), "Cannot run on browser internal pages");
    }

    #[test]
    fn test_empty_region_message() {
        let err = ClipError::EmptyCaptureRegion { width: 0, height: 12 };
        assert!(err.to_string().contains("0x12"));
    }
}
