//! [`HostPage`] over a live tab, through a small script installed in the page.

use std::sync::Arc;

use headless_chrome::Tab;
use headless_chrome::protocol::cdp::Page;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::dom::BoundingBox;
use crate::error::{ClipError, Result};
use crate::notify::Notifier;
use crate::picker::{ElementHandle, HostPage, PageEvent, StyleValue, Viewport};

use super::restriction::{injection_failure_reason, restriction_reason};

const BRIDGE: &str = "window.__clipmdBridge";

/// A tab the picker has been injected into
pub struct CdpPage {
    tab: Arc<Tab>,
}

impl CdpPage {
    /// Install the picker bridge into `tab`.
    ///
    /// Pages the picker cannot run on fail with [`ClipError::InjectionDenied`].
    pub fn attach(tab: Arc<Tab>) -> Result<Self> {
        let url = tab.get_url();
        if let Some(reason) = restriction_reason(&url) {
            return Err(ClipError::InjectionDenied(reason.to_string()));
        }

        let js_code = include_str!("picker_bridge.js");
        tab.evaluate(js_code, false).map_err(|e| {
            log::error!("Failed to inject picker into {}: {}", url, e);
            ClipError::InjectionDenied(injection_failure_reason(&url).to_string())
        })?;

        log::debug!("Picker bridge installed in {}", url);
        Ok(Self { tab })
    }

    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Raw `style` attribute of `element`; `None` when the attribute is absent
    pub fn style_attribute(&self, element: ElementHandle) -> Result<Option<String>> {
        match self.call("styleAttribute", &[handle(element)])? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            other => Err(ClipError::Page(format!("styleAttribute returned {}", other))),
        }
    }

    /// Call a bridge method; `args` are already JS literals
    fn call(&self, method: &str, args: &[String]) -> Result<Value> {
        let expression = format!("{}.{}({})", BRIDGE, method, args.join(", "));
        let result = self
            .tab
            .evaluate(&expression, false)
            .map_err(|e| ClipError::EvaluationFailed(format!("{}: {}", method, e)))?;
        Ok(result.value.unwrap_or(Value::Null))
    }

    /// Call a bridge method that returns a string
    fn call_string(&self, method: &str, args: &[String]) -> Result<String> {
        match self.call(method, args)? {
            Value::String(s) => Ok(s),
            other => Err(ClipError::Page(format!("{} returned {} instead of a string", method, other))),
        }
    }

    /// Call a bridge method that returns a JSON-encoded string
    fn call_json<T: DeserializeOwned>(&self, method: &str, args: &[String]) -> Result<T> {
        let json_str = self.call_string(method, args)?;
        serde_json::from_str(&json_str)
            .map_err(|e| ClipError::EvaluationFailed(format!("Failed to parse {} result: {}", method, e)))
    }
}

/// Encode a value as a JS literal
fn literal<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

fn handle(element: ElementHandle) -> String {
    element.0.to_string()
}

impl HostPage for CdpPage {
    fn attach_listeners(&self) -> Result<()> {
        self.call("listen", &[]).map(|_| ())
    }

    fn detach_listeners(&self) -> Result<()> {
        self.call("unlisten", &[]).map(|_| ())
    }

    fn listener_count(&self) -> Result<usize> {
        let count = self.call("listenerCount", &[])?;
        count
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| ClipError::Page(format!("listenerCount returned {}", count)))
    }

    fn poll_events(&self) -> Result<Vec<PageEvent>> {
        self.call_json("drain", &[])
    }

    fn get_style(&self, element: ElementHandle, property: &str) -> Result<StyleValue> {
        self.call_json("getStyle", &[handle(element), literal(property)])
    }

    fn set_style(&self, element: ElementHandle, property: &str, value: &StyleValue) -> Result<()> {
        let args = [handle(element), literal(property), literal(&value.value), literal(&value.important)];
        self.call("setStyle", &args).map(|_| ())
    }

    fn show_overlay(&self, lines: &[String]) -> Result<()> {
        self.call("showOverlay", &[literal(lines)]).map(|_| ())
    }

    fn hide_overlay(&self) -> Result<()> {
        self.call("hideOverlay", &[]).map(|_| ())
    }

    fn cursor(&self) -> Result<StyleValue> {
        self.call_json("getCursor", &[])
    }

    fn set_cursor(&self, value: &StyleValue) -> Result<()> {
        self.call("setCursor", &[literal(&value.value), literal(&value.important)]).map(|_| ())
    }

    fn outer_html(&self, element: ElementHandle) -> Result<String> {
        self.call_string("outerHtml", &[handle(element)])
    }

    fn base_url(&self) -> Result<String> {
        self.call_string("baseUrl", &[])
    }

    fn scroll_into_view(&self, element: ElementHandle) -> Result<()> {
        self.call("scrollIntoView", &[handle(element)]).map(|_| ())
    }

    fn bounding_box(&self, element: ElementHandle) -> Result<BoundingBox> {
        self.call_json("rect", &[handle(element)])
    }

    fn viewport(&self) -> Result<Viewport> {
        self.call_json("viewport", &[])
    }

    fn capture_viewport(&self) -> Result<Vec<u8>> {
        self.tab
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| ClipError::ScreenshotFailed(e.to_string()))
    }
}

/// Toast in the page itself
impl Notifier for CdpPage {
    fn notify(&self, message: &str, success: bool) {
        if let Err(e) = self.call("toast", &[literal(message), literal(&success)]) {
            log::debug!("Failed to show toast: {}", e);
        }
    }
}

impl std::fmt::Debug for CdpPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CdpPage").field("url", &self.tab.get_url()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals_are_valid_js() {
        assert_eq!(literal("outline"), "\"outline\"");
        assert_eq!(literal("a \"quoted\" </script>"), "\"a \\\"quoted\\\" </script>\"");
        assert_eq!(literal(&true), "true");
        assert_eq!(literal(&["a".to_string(), "b".to_string()][..]), "[\"a\",\"b\"]");
    }

    #[test]
    fn test_bridge_script_defines_every_method() {
        let js_code = include_str!("picker_bridge.js");
        for method in [
            "listen", "unlisten", "listenerCount", "drain", "getStyle", "setStyle", "getCursor", "setCursor",
            "showOverlay", "hideOverlay", "toast", "styleAttribute", "outerHtml", "scrollIntoView", "rect", "viewport", "baseUrl",
        ] {
            assert!(js_code.contains(&format!("    {}(", method)), "missing {}", method);
        }
    }
}
