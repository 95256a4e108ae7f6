//! User-facing notifications.

/// Messages shown at the end of a pipeline
pub mod messages {
    pub const MARKDOWN_COPIED: &str = "Markdown copied!";
    pub const SCREENSHOT_COPIED: &str = "Screenshot copied!";
    pub const SCREENSHOT_OPENED: &str = "Screenshot opened in new tab (clipboard blocked)";
    pub const COPY_FAILED: &str = "Copy failed - try again";
    pub const SCREENSHOT_FAILED: &str = "Screenshot failed";
}

/// Fire-and-forget notification sink
pub trait Notifier {
    fn notify(&self, message: &str, success: bool);
}

/// Notifications written to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str, success: bool) {
        if success {
            log::info!("{}", message);
        } else {
            log::warn!("{}", message);
        }
    }
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, message: &str, success: bool) {
        (**self).notify(message, success)
    }
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, message: &str, success: bool) {
        (**self).notify(message, success)
    }
}

/// Deliver to several sinks in turn
impl<A: Notifier, B: Notifier> Notifier for (A, B) {
    fn notify(&self, message: &str, success: bool) {
        self.0.notify(message, success);
        self.1.notify(message, success);
    }
}
