use url::Url;

use crate::dom::ElementNode;

/// Attributes holding a single URL
const URL_ATTRIBUTES: &[&str] = &["href", "src"];

/// Resolve `value` against `base` unless it is empty or already absolute.
///
/// Anything that parses on its own carries a scheme (`https:`, `data:`,
/// `javascript:`, `mailto:` ...) and is left alone. Returns `None` when the
/// value should stay as it is, including when joining fails.
pub fn resolve_url(value: &str, base: &Url) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || Url::parse(trimmed).is_ok() {
        return None;
    }
    match base.join(trimmed) {
        Ok(absolute) => Some(absolute.to_string()),
        Err(e) => {
            log::debug!("Leaving unresolvable URL '{}' as-is: {}", trimmed, e);
            None
        }
    }
}

/// Resolve every candidate URL of a `srcset`, keeping descriptors.
///
/// Candidates are re-joined with `", "`. URLs run up to the next whitespace,
/// so commas inside `data:` URIs do not split a candidate.
pub fn resolve_srcset(srcset: &str, base: &Url) -> String {
    split_srcset(srcset)
        .into_iter()
        .map(|(url, descriptor)| {
            let url = resolve_url(url, base).unwrap_or_else(|| url.to_string());
            if descriptor.is_empty() {
                url
            } else {
                format!("{} {}", url, descriptor)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Split a srcset into `(url, descriptor)` pairs
fn split_srcset(srcset: &str) -> Vec<(&str, &str)> {
    let mut candidates = Vec::new();
    let mut rest = srcset;

    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        if rest.is_empty() {
            break;
        }

        let url_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let raw_url = &rest[..url_end];
        rest = &rest[url_end..];

        // A URL ending in a comma has no descriptor
        let url = raw_url.trim_end_matches(',');
        if url.len() != raw_url.len() {
            if !url.is_empty() {
                candidates.push((url, ""));
            }
            continue;
        }

        let descriptor_end = rest.find(',').unwrap_or(rest.len());
        let descriptor = rest[..descriptor_end].trim();
        rest = &rest[descriptor_end..];
        candidates.push((url, descriptor));
    }

    candidates
}

/// Rewrite `href`, `src` and `srcset` on `root` and every descendant.
///
/// Returns the number of attributes rewritten.
pub fn resolve_relative_urls(root: &mut ElementNode, base: &Url) -> usize {
    let mut rewritten = 0;
    root.for_each_element_mut(&mut |el| {
        for attr in URL_ATTRIBUTES {
            if let Some(resolved) = el.get_attribute(attr).and_then(|v| resolve_url(v, base)) {
                el.add_attribute(*attr, resolved);
                rewritten += 1;
            }
        }
        if let Some(srcset) = el.get_attribute("srcset") {
            let resolved = resolve_srcset(srcset, base);
            if resolved != srcset {
                el.add_attribute("srcset", resolved);
                rewritten += 1;
            }
        }
    });
    rewritten
}
