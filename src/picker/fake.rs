//! In-memory page for unit tests.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::Mutex;

use super::page::{ElementHandle, HostPage, PageEvent, StyleValue, Viewport};
use crate::dom::BoundingBox;
use crate::error::{ClipError, Result};

#[derive(Default)]
struct State {
    listeners: usize,
    events: VecDeque<PageEvent>,
    styles: BTreeMap<(u64, String), StyleValue>,
    style_writes: usize,
    overlay: Option<Vec<String>>,
    fail_overlay: bool,
    cursor: StyleValue,
    removed: HashSet<u64>,
    html: BTreeMap<u64, String>,
    boxes: BTreeMap<u64, BoundingBox>,
    scrolled: Vec<u64>,
    capture: Vec<u8>,
}

pub(crate) struct FakePage {
    state: Mutex<State>,
    viewport: Viewport,
    base_url: String,
}

impl FakePage {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            viewport: Viewport::new(800.0, 600.0, 1.0),
            base_url: "https://site/page".to_string(),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn check(&self, element: ElementHandle) -> Result<()> {
        if self.state().removed.contains(&element.0) {
            return Err(ClipError::Page(format!("element {} is gone", element.0)));
        }
        Ok(())
    }

    pub fn set_inline(&self, id: u64, property: &str, value: StyleValue) {
        self.state().styles.insert((id, property.to_string()), value);
    }

    pub fn style(&self, id: u64, property: &str) -> StyleValue {
        self.state().styles.get(&(id, property.to_string())).cloned().unwrap_or_default()
    }

    pub fn inline_styles(&self, id: u64) -> BTreeMap<String, StyleValue> {
        self.state()
            .styles
            .iter()
            .filter(|((el, _), _)| *el == id)
            .map(|((_, p), v)| (p.clone(), v.clone()))
            .collect()
    }

    pub fn style_writes(&self) -> usize {
        self.state().style_writes
    }

    pub fn overlay(&self) -> Option<Vec<String>> {
        self.state().overlay.clone()
    }

    pub fn fail_overlay(&self) {
        self.state().fail_overlay = true;
    }

    pub fn remove_element(&self, id: u64) {
        self.state().removed.insert(id);
    }

    pub fn push_events(&self, events: impl IntoIterator<Item = PageEvent>) {
        self.state().events.extend(events);
    }

    pub fn set_html(&self, id: u64, html: &str) {
        self.state().html.insert(id, html.to_string());
    }

    pub fn set_box(&self, id: u64, bbox: BoundingBox) {
        self.state().boxes.insert(id, bbox);
    }

    pub fn set_capture(&self, png: Vec<u8>) {
        self.state().capture = png;
    }

    pub fn scrolled(&self) -> Vec<u64> {
        self.state().scrolled.clone()
    }
}

impl HostPage for FakePage {
    fn attach_listeners(&self) -> Result<()> {
        self.state().listeners = 3;
        Ok(())
    }

    fn detach_listeners(&self) -> Result<()> {
        self.state().listeners = 0;
        Ok(())
    }

    fn listener_count(&self) -> Result<usize> {
        Ok(self.state().listeners)
    }

    fn poll_events(&self) -> Result<Vec<PageEvent>> {
        Ok(self.state().events.drain(..).collect())
    }

    fn get_style(&self, element: ElementHandle, property: &str) -> Result<StyleValue> {
        self.check(element)?;
        Ok(self.style(element.0, property))
    }

    fn set_style(&self, element: ElementHandle, property: &str, value: &StyleValue) -> Result<()> {
        self.check(element)?;
        let mut state = self.state();
        state.style_writes += 1;
        let key = (element.0, property.to_string());
        if value.is_unset() {
            state.styles.remove(&key);
        } else {
            state.styles.insert(key, value.clone());
        }
        Ok(())
    }

    fn show_overlay(&self, lines: &[String]) -> Result<()> {
        let mut state = self.state();
        if state.fail_overlay {
            return Err(ClipError::Page("overlay blocked".to_string()));
        }
        state.overlay = Some(lines.to_vec());
        Ok(())
    }

    fn hide_overlay(&self) -> Result<()> {
        self.state().overlay = None;
        Ok(())
    }

    fn cursor(&self) -> Result<StyleValue> {
        Ok(self.state().cursor.clone())
    }

    fn set_cursor(&self, value: &StyleValue) -> Result<()> {
        self.state().cursor = value.clone();
        Ok(())
    }

    fn outer_html(&self, element: ElementHandle) -> Result<String> {
        self.check(element)?;
        self.state()
            .html
            .get(&element.0)
            .cloned()
            .ok_or_else(|| ClipError::Page(format!("no markup for element {}", element.0)))
    }

    fn base_url(&self) -> Result<String> {
        Ok(self.base_url.clone())
    }

    fn scroll_into_view(&self, element: ElementHandle) -> Result<()> {
        self.check(element)?;
        self.state().scrolled.push(element.0);
        Ok(())
    }

    fn bounding_box(&self, element: ElementHandle) -> Result<BoundingBox> {
        self.check(element)?;
        Ok(self.state().boxes.get(&element.0).copied().unwrap_or(BoundingBox::new(0.0, 0.0, 0.0, 0.0)))
    }

    fn viewport(&self) -> Result<Viewport> {
        Ok(self.viewport)
    }

    fn capture_viewport(&self) -> Result<Vec<u8>> {
        Ok(self.state().capture.clone())
    }
}
