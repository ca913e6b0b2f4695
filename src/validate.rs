//! Normalization boundary between raw host query params and panel state.
//!
//! Only string values under registered panel names survive; every other
//! key is dropped, so unrelated query params never enter the panel contract.

use serde::Serialize;
use serde_json::Value;

#[cfg(test)]
#[path = "validate_test.rs"]
mod validate_test;

/// Raw host query object as delivered by the host router.
pub type RawQuery = serde_json::Map<String, Value>;

/// Host query state: exactly one entry per registered panel, in registry order.
///
/// `None` means the panel is closed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PanelQuery {
    entries: Vec<(String, Option<String>)>,
}

impl PanelQuery {
    /// Every name closed.
    pub fn closed<S: AsRef<str>>(names: &[S]) -> Self {
        Self { entries: names.iter().map(|n| (n.as_ref().to_owned(), None)).collect() }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.iter().find(|(n, _)| n == name).and_then(|(_, v)| v.as_deref())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Set a registered panel's value. Unregistered names are ignored and
    /// reported as `false`.
    pub fn set(&mut self, name: &str, value: Option<String>) -> bool {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => {
                slot.1 = value;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_open(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Panel mode: at least one panel is open.
    #[must_use]
    pub fn any_open(&self) -> bool {
        self.entries.iter().any(|(_, v)| v.is_some())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_deref()))
    }

    /// Same names, every panel closed.
    #[must_use]
    pub fn cleared(&self) -> Self {
        Self { entries: self.entries.iter().map(|(n, _)| (n.clone(), None)).collect() }
    }
}

/// Normalize a raw query object into one optional string per panel name.
pub fn validate_search<S: AsRef<str>>(names: &[S], raw: &RawQuery) -> PanelQuery {
    let entries = names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let value = match raw.get(name) {
                Some(Value::String(value)) => Some(value.clone()),
                _ => None,
            };
            (name.to_owned(), value)
        })
        .collect();
    PanelQuery { entries }
}
