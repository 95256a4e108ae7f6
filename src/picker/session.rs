use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::guard::SessionGuard;
use super::page::{ElementHandle, EventDisposition, HostPage, PageEvent, StyleValue};
use super::style::StyleSnapshot;
use crate::config::{HighlightStyle, PickerConfig};
use crate::error::Result;

/// Key that cancels a session
pub const CANCEL_KEY: &str = "Escape";

/// What happens to the selected element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    #[default]
    Markdown,
    Screenshot,
}

impl CaptureMode {
    /// Overlay wording for the action a click performs
    pub fn action(&self) -> &'static str {
        match self {
            CaptureMode::Markdown => "copy as Markdown",
            CaptureMode::Screenshot => "capture screenshot",
        }
    }
}

impl std::fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureMode::Markdown => write!(f, "markdown"),
            CaptureMode::Screenshot => write!(f, "screenshot"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Armed,
    Highlighting,
    Confirmed,
    Cancelled,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Confirmed | SessionState::Cancelled)
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Selected { element: ElementHandle, mode: CaptureMode },
    /// Escape, or the session was abandoned; produces nothing
    Cancelled,
}

/// One pick: highlight under the pointer, confirm on click, cancel on Escape.
///
/// Every page mutation the session makes is undone by [`teardown`](Self::teardown),
/// which also runs on drop.
pub struct SelectionSession<P: HostPage + ?Sized> {
    page: Arc<P>,
    mode: CaptureMode,
    state: SessionState,
    highlight: HighlightStyle,
    cursor: String,
    highlighted: Option<ElementHandle>,
    snapshot: StyleSnapshot,
    prior_cursor: Option<StyleValue>,
    listening: bool,
    overlay_shown: bool,
    outcome: Option<SessionOutcome>,
    guard: Option<SessionGuard>,
}

impl<P: HostPage + ?Sized> SelectionSession<P> {
    /// Arm a session on `page`. The guard is held until teardown.
    pub fn start(page: Arc<P>, mode: CaptureMode, guard: SessionGuard, config: &PickerConfig) -> Result<Self> {
        let mut session = Self {
            page,
            mode,
            state: SessionState::Idle,
            highlight: config.highlight.clone(),
            cursor: config.cursor.clone(),
            highlighted: None,
            snapshot: StyleSnapshot::default(),
            prior_cursor: None,
            listening: false,
            overlay_shown: false,
            outcome: None,
            guard: Some(guard),
        };

        // A failure here drops `session`, which undoes whatever was already applied
        session.arm()?;
        Ok(session)
    }

    fn arm(&mut self) -> Result<()> {
        self.page.attach_listeners()?;
        self.listening = true;

        self.prior_cursor = Some(self.page.cursor()?);
        self.page.set_cursor(&StyleValue::new(self.cursor.as_str()))?;

        self.page.show_overlay(&overlay_lines(self.mode))?;
        self.overlay_shown = true;

        self.state = SessionState::Armed;
        log::info!("Picker started in {} mode", self.mode);
        Ok(())
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn highlighted(&self) -> Option<ElementHandle> {
        self.highlighted
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// The outcome, handed out once
    pub fn take_outcome(&mut self) -> Option<SessionOutcome> {
        self.outcome.take()
    }

    /// Feed one page event through the state machine
    pub fn handle_event(&mut self, event: &PageEvent) -> Result<EventDisposition> {
        if self.state.is_terminal() {
            return Ok(EventDisposition::PassThrough);
        }

        match event {
            PageEvent::PointerMove { target } => {
                self.hover(*target);
                Ok(EventDisposition::Consume)
            }
            PageEvent::Click { target } => {
                let element = self.highlighted.unwrap_or(*target);
                log::debug!("Element {} selected", element.0);
                self.finish(SessionState::Confirmed, SessionOutcome::Selected { element, mode: self.mode });
                Ok(EventDisposition::Consume)
            }
            PageEvent::KeyDown { key } if key == CANCEL_KEY => {
                log::info!("Picker cancelled");
                self.finish(SessionState::Cancelled, SessionOutcome::Cancelled);
                Ok(EventDisposition::Consume)
            }
            PageEvent::KeyDown { .. } => Ok(EventDisposition::PassThrough),
        }
    }

    /// End the session without a selection
    pub fn abort(&mut self) {
        if !self.state.is_terminal() {
            self.finish(SessionState::Cancelled, SessionOutcome::Cancelled);
        }
    }

    fn finish(&mut self, state: SessionState, outcome: SessionOutcome) {
        self.teardown();
        self.state = state;
        self.outcome = Some(outcome);
    }

    fn hover(&mut self, target: ElementHandle) {
        if self.highlighted == Some(target) {
            return;
        }
        self.unhighlight();

        match self.highlight_element(target) {
            Ok(()) => {
                self.highlighted = Some(target);
                self.state = SessionState::Highlighting;
            }
            Err(e) => {
                // Typically the element went away between the event and now
                log::debug!("Could not highlight element {}: {}", target.0, e);
                if let Err(e) = self.snapshot.restore(self.page.as_ref(), target) {
                    log::debug!("Could not roll back highlight on element {}: {}", target.0, e);
                }
                self.snapshot = StyleSnapshot::default();
            }
        }
    }

    fn highlight_element(&mut self, target: ElementHandle) -> Result<()> {
        self.snapshot = StyleSnapshot::capture(self.page.as_ref(), target, &HighlightStyle::PROPERTIES)?;
        for (property, value) in self.highlight.declarations() {
            self.page.set_style(target, property, &StyleValue::new(value))?;
        }
        Ok(())
    }

    fn unhighlight(&mut self) {
        if let Some(previous) = self.highlighted.take() {
            if let Err(e) = self.snapshot.restore(self.page.as_ref(), previous) {
                log::warn!("Failed to restore styles on element {}: {}", previous.0, e);
            }
            self.snapshot = StyleSnapshot::default();
        }
    }

    /// Undo every page mutation and release the guard. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        self.unhighlight();

        if self.listening {
            if let Err(e) = self.page.detach_listeners() {
                log::warn!("Failed to remove picker listeners: {}", e);
            }
            self.listening = false;
        }

        if self.overlay_shown {
            if let Err(e) = self.page.hide_overlay() {
                log::warn!("Failed to remove picker overlay: {}", e);
            }
            self.overlay_shown = false;
        }

        if let Some(prior) = self.prior_cursor.take()
            && let Err(e) = self.page.set_cursor(&prior)
        {
            log::warn!("Failed to restore cursor: {}", e);
        }

        if self.guard.take().is_some() {
            log::debug!("Picker cleaned up");
        }
    }
}

impl<P: HostPage + ?Sized> Drop for SelectionSession<P> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<P: HostPage + ?Sized> std::fmt::Debug for SelectionSession<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionSession")
            .field("mode", &self.mode)
            .field("state", &self.state)
            .field("highlighted", &self.highlighted)
            .finish_non_exhaustive()
    }
}

/// Status overlay text for `mode`
pub fn overlay_lines(mode: CaptureMode) -> Vec<String> {
    vec![
        "ClipMD Active".to_string(),
        format!("Click an element to {}", mode.action()),
        "Press ESC to cancel".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::fake::FakePage;
    use crate::picker::guard::SessionManager;

    fn start(page: &Arc<FakePage>, manager: &SessionManager, mode: CaptureMode) -> SelectionSession<FakePage> {
        let guard = manager.try_acquire().unwrap();
        SelectionSession::start(Arc::clone(page), mode, guard, &PickerConfig::default()).unwrap()
    }

    fn moved(id: u64) -> PageEvent {
        PageEvent::PointerMove { target: ElementHandle(id) }
    }

    fn assert_clean(page: &FakePage, manager: &SessionManager) {
        assert_eq!(page.listener_count().unwrap(), 0);
        assert!(page.overlay().is_none());
        assert!(page.cursor().unwrap().is_unset());
        assert!(!manager.is_active());
    }

    #[test]
    fn test_start_arms_page() {
        let page = Arc::new(FakePage::new());
        let manager = SessionManager::new();
        let session = start(&page, &manager, CaptureMode::Screenshot);

        assert_eq!(session.state(), SessionState::Armed);
        assert_eq!(page.listener_count().unwrap(), 3);
        assert_eq!(page.cursor().unwrap().value, "crosshair");
        assert_eq!(
            page.overlay().unwrap()[1],
            "Click an element to capture screenshot"
        );
        assert!(manager.is_active());
    }

    #[test]
    fn test_hover_restores_exact_prior_styles() {
        let page = Arc::new(FakePage::new());
        page.set_inline(1, "outline-style", StyleValue::important("dashed"));
        page.set_inline(1, "background-color", StyleValue::new("white"));
        let before = page.inline_styles(1);

        let manager = SessionManager::new();
        let mut session = start(&page, &manager, CaptureMode::Markdown);

        session.handle_event(&moved(1)).unwrap();
        assert_eq!(session.state(), SessionState::Highlighting);
        assert_eq!(page.style(1, "outline-offset").value, "-1px");

        session.handle_event(&moved(2)).unwrap();
        assert_eq!(page.inline_styles(1), before);
        assert_eq!(session.highlighted(), Some(ElementHandle(2)));

        session.handle_event(&PageEvent::KeyDown { key: "Escape".to_string() }).unwrap();
        assert!(page.inline_styles(2).is_empty());
    }

    #[test]
    fn test_single_longhand_survives_highlight() {
        let page = Arc::new(FakePage::new());
        page.set_inline(1, "outline-color", StyleValue::new("red"));

        let manager = SessionManager::new();
        let mut session = start(&page, &manager, CaptureMode::Markdown);

        session.handle_event(&moved(1)).unwrap();
        assert_eq!(page.style(1, "outline-color").value, "rgba(111, 168, 220, 0.9)");
        assert_eq!(page.style(1, "outline-width").value, "3px");

        session.abort();
        let restored = page.inline_styles(1);
        assert_eq!(restored.len(), 1);
        assert_eq!(restored["outline-color"], StyleValue::new("red"));
    }

    #[test]
    fn test_repeated_move_is_noop() {
        let page = Arc::new(FakePage::new());
        let manager = SessionManager::new();
        let mut session = start(&page, &manager, CaptureMode::Markdown);

        session.handle_event(&moved(4)).unwrap();
        let writes = page.style_writes();
        session.handle_event(&moved(4)).unwrap();
        assert_eq!(page.style_writes(), writes);
    }

    #[test]
    fn test_click_selects_highlighted_element() {
        let page = Arc::new(FakePage::new());
        let manager = SessionManager::new();
        let mut session = start(&page, &manager, CaptureMode::Markdown);

        session.handle_event(&moved(5)).unwrap();
        let disposition = session.handle_event(&PageEvent::Click { target: ElementHandle(9) }).unwrap();

        assert_eq!(disposition, EventDisposition::Consume);
        assert_eq!(session.state(), SessionState::Confirmed);
        assert_eq!(
            session.take_outcome(),
            Some(SessionOutcome::Selected { element: ElementHandle(5), mode: CaptureMode::Markdown })
        );
        assert_eq!(session.take_outcome(), None);
        assert!(page.inline_styles(5).is_empty());
        assert_clean(&page, &manager);
    }

    #[test]
    fn test_click_without_hover_uses_target() {
        let page = Arc::new(FakePage::new());
        let manager = SessionManager::new();
        let mut session = start(&page, &manager, CaptureMode::Screenshot);

        session.handle_event(&PageEvent::Click { target: ElementHandle(3) }).unwrap();
        assert_eq!(
            session.take_outcome(),
            Some(SessionOutcome::Selected { element: ElementHandle(3), mode: CaptureMode::Screenshot })
        );
    }

    #[test]
    fn test_escape_cancels_and_cleans_up() {
        let page = Arc::new(FakePage::new());
        let manager = SessionManager::new();
        let mut session = start(&page, &manager, CaptureMode::Markdown);

        session.handle_event(&moved(1)).unwrap();
        session.handle_event(&PageEvent::KeyDown { key: "Escape".to_string() }).unwrap();

        assert_eq!(session.state(), SessionState::Cancelled);
        assert_eq!(session.take_outcome(), Some(SessionOutcome::Cancelled));
        assert_clean(&page, &manager);
    }

    #[test]
    fn test_other_keys_pass_through() {
        let page = Arc::new(FakePage::new());
        let manager = SessionManager::new();
        let mut session = start(&page, &manager, CaptureMode::Markdown);

        let disposition = session.handle_event(&PageEvent::KeyDown { key: "a".to_string() }).unwrap();
        assert_eq!(disposition, EventDisposition::PassThrough);
        assert!(!session.is_finished());
    }

    #[test]
    fn test_drop_tears_down() {
        let page = Arc::new(FakePage::new());
        let manager = SessionManager::new();
        {
            let mut session = start(&page, &manager, CaptureMode::Markdown);
            session.handle_event(&moved(2)).unwrap();
        }
        assert!(page.inline_styles(2).is_empty());
        assert_clean(&page, &manager);
    }

    #[test]
    fn test_failed_start_leaves_nothing_behind() {
        let page = Arc::new(FakePage::new());
        page.fail_overlay();
        let manager = SessionManager::new();
        let guard = manager.try_acquire().unwrap();

        let result = SelectionSession::start(Arc::clone(&page), CaptureMode::Markdown, guard, &PickerConfig::default());
        assert!(result.is_err());
        assert_clean(&page, &manager);
    }

    #[test]
    fn test_teardown_continues_after_errors() {
        let page = Arc::new(FakePage::new());
        let manager = SessionManager::new();
        let mut session = start(&page, &manager, CaptureMode::Markdown);
        session.handle_event(&moved(1)).unwrap();

        page.remove_element(1);
        session.abort();

        assert_eq!(session.state(), SessionState::Cancelled);
        assert_clean(&page, &manager);
    }

    #[test]
    fn test_vanished_hover_target_is_ignored() {
        let page = Arc::new(FakePage::new());
        page.remove_element(8);
        let manager = SessionManager::new();
        let mut session = start(&page, &manager, CaptureMode::Markdown);

        session.handle_event(&moved(8)).unwrap();
        assert_eq!(session.highlighted(), None);
        assert_eq!(session.state(), SessionState::Armed);
    }

    #[test]
    fn test_events_after_finish_are_ignored() {
        let page = Arc::new(FakePage::new());
        let manager = SessionManager::new();
        let mut session = start(&page, &manager, CaptureMode::Markdown);
        session.abort();

        let disposition = session.handle_event(&moved(1)).unwrap();
        assert_eq!(disposition, EventDisposition::PassThrough);
        assert!(page.inline_styles(1).is_empty());
    }

    #[test]
    fn test_capture_mode_serde() {
        assert_eq!(serde_json::to_string(&CaptureMode::Screenshot).unwrap(), "\"screenshot\"");
        assert_eq!(CaptureMode::Markdown.to_string(), "markdown");
    }
}
