//! Pages the picker may not run on, and URL cleanup for the command line

const INTERNAL_SCHEMES: &[&str] =
    &["chrome://", "chrome-extension://", "chrome-untrusted://", "devtools://", "edge://", "view-source:", "about:"];

const STORE_PREFIXES: &[&str] = &["https://chrome.google.com/webstore", "https://chromewebstore.google.com"];

/// Why the picker cannot be installed into `url`, if it cannot.
///
/// Checked before injection, so the user gets a clear reason instead of a
/// CDP error.
pub fn restriction_reason(url: &str) -> Option<&'static str> {
    let url = url.trim();
    if url.is_empty() || url == "about:blank" {
        return Some("No page loaded");
    }
    let lower = url.to_ascii_lowercase();
    if STORE_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return Some("Cannot run on the extension store");
    }
    if INTERNAL_SCHEMES.iter().any(|s| lower.starts_with(s)) {
        return Some("Cannot run on browser internal pages");
    }
    None
}

/// Reason to report when the script itself was rejected by the page
pub fn injection_failure_reason(url: &str) -> &'static str {
    if url.trim_start().to_ascii_lowercase().starts_with("file:") {
        "Cannot run on local files (allow file access for the browser)"
    } else {
        "This page restricts extensions"
    }
}

/// Normalize an incomplete URL by adding missing protocol and handling common patterns
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();

    if trimmed.contains("://") || trimmed.starts_with("data:") || trimmed.starts_with("about:") {
        return trimmed.to_string();
    }

    // Local paths open as files
    if trimmed.starts_with('/') {
        return format!("file://{}", trimmed);
    }

    if trimmed.starts_with("localhost") || trimmed.starts_with("127.0.0.1") {
        return format!("http://{}", trimmed);
    }

    format!("https://{}", trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_pages_are_refused() {
        for url in ["chrome://settings", "chrome-extension://abc/popup.html", "devtools://devtools/x", "edge://flags"] {
            assert_eq!(restriction_reason(url), Some("Cannot run on browser internal pages"), "{}", url);
        }
        assert_eq!(restriction_reason("view-source:https://a.com"), Some("Cannot run on browser internal pages"));
    }

    #[test]
    fn test_blank_pages_are_refused() {
        assert_eq!(restriction_reason(""), Some("No page loaded"));
        assert_eq!(restriction_reason("about:blank"), Some("No page loaded"));
    }

    #[test]
    fn test_store_is_refused() {
        assert!(restriction_reason("https://chromewebstore.google.com/detail/x").unwrap().contains("store"));
        assert!(restriction_reason("https://chrome.google.com/webstore/category").unwrap().contains("store"));
    }

    #[test]
    fn test_ordinary_pages_are_allowed() {
        assert_eq!(restriction_reason("https://en.wikipedia.org/wiki/Rust"), None);
        assert_eq!(restriction_reason("http://localhost:8080/"), None);
        assert_eq!(restriction_reason("file:///tmp/page.html"), None);
        assert_eq!(restriction_reason("https://chrome.google.com/search"), None);
    }

    #[test]
    fn test_injection_failure_reason() {
        assert!(injection_failure_reason("file:///tmp/a.html").contains("local files"));
        assert_eq!(injection_failure_reason("https://bank.example/"), "This page restricts extensions");
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("  https://a.com/x "), "https://a.com/x");
        assert_eq!(normalize_url("localhost:3000"), "http://localhost:3000");
        assert_eq!(normalize_url("/tmp/page.html"), "file:///tmp/page.html");
        assert_eq!(normalize_url("file:///tmp/page.html"), "file:///tmp/page.html");
        assert_eq!(normalize_url("about:blank"), "about:blank");
    }
}
