use indexmap::IndexMap;

use super::page::{ElementHandle, HostPage, StyleValue};
use crate::error::Result;

/// Prior inline values of the properties the highlight overwrites
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSnapshot {
    values: IndexMap<String, StyleValue>,
}

impl StyleSnapshot {
    /// Record `properties` of `element` as they are now
    pub fn capture<P: HostPage + ?Sized>(page: &P, element: ElementHandle, properties: &[&str]) -> Result<Self> {
        let mut values = IndexMap::with_capacity(properties.len());
        for property in properties {
            values.insert(property.to_string(), page.get_style(element, property)?);
        }
        Ok(Self { values })
    }

    /// Write every recorded value back.
    ///
    /// All properties are attempted; the first failure is returned.
    pub fn restore<P: HostPage + ?Sized>(&self, page: &P, element: ElementHandle) -> Result<()> {
        let mut first_error = None;
        for (property, value) in &self.values {
            if let Err(e) = page.set_style(element, property, value) {
                log::debug!("Failed to restore {} on element {}: {}", property, element.0, e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    pub fn get(&self, property: &str) -> Option<&StyleValue> {
        self.values.get(property)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::fake::FakePage;

    #[test]
    fn test_capture_and_restore_round_trip() {
        let page = FakePage::new();
        page.set_inline(1, "outline-style", StyleValue::important("none"));
        let before = page.inline_styles(1);

        let snapshot =
            StyleSnapshot::capture(&page, ElementHandle(1), &["outline-style", "background-color"]).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.get("background-color").unwrap().is_unset());

        page.set_style(ElementHandle(1), "outline-style", &StyleValue::new("solid")).unwrap();
        page.set_style(ElementHandle(1), "background-color", &StyleValue::new("pink")).unwrap();
        snapshot.restore(&page, ElementHandle(1)).unwrap();

        assert_eq!(page.inline_styles(1), before);
    }

    #[test]
    fn test_restore_reports_missing_element() {
        let page = FakePage::new();
        let snapshot = StyleSnapshot::capture(&page, ElementHandle(2), &["outline-color"]).unwrap();
        page.remove_element(2);
        assert!(snapshot.restore(&page, ElementHandle(2)).is_err());
    }
}
