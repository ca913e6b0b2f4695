//! Contract with the host page's location, plus an in-memory host.
//!
//! SYSTEM CONTEXT
//! ==============
//! The host query string is the single source of truth for which panels are
//! open and where. The coordinator reads it through [`HostLocation::raw_query`]
//! and writes it only through [`HostLocation::navigate`], so every user
//! action produces exactly one host history entry.

use std::sync::{Mutex, PoisonError};

use serde_json::Value;
use tracing::debug;

use crate::codec;
use crate::validate::{PanelQuery, RawQuery};

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

/// Host location capability consumed by the coordinator.
pub trait HostLocation: Send + Sync {
    fn pathname(&self) -> String;

    /// Snapshot of the current host query object.
    fn raw_query(&self) -> RawQuery;

    /// Href for navigating to `to` with exactly the panel params in `query`.
    fn build_href(&self, to: &str, query: &PanelQuery) -> String {
        codec::build_href(to, query.iter())
    }

    /// Navigate the host to `to`, replacing its query with `query`.
    fn navigate(&self, to: &str, query: &PanelQuery);
}

#[derive(Clone, Debug, PartialEq)]
struct HostEntry {
    pathname: String,
    query: RawQuery,
}

impl HostEntry {
    fn from_href(href: &str) -> Self {
        let (pathname, search) = codec::parse_href(href);
        let query = search.iter().map(|(k, v)| (k.to_owned(), Value::String(v.to_owned()))).collect();
        Self { pathname, query }
    }
}

#[derive(Debug)]
struct HostHistory {
    entries: Vec<HostEntry>,
    index: usize,
    navigations: usize,
}

/// Host location backed by an in-memory session history.
///
/// `open`, `back` and `forward` change the query without going through the
/// coordinator, which is how tests exercise external-to-internal sync.
#[derive(Debug)]
pub struct MemoryHost {
    state: Mutex<HostHistory>,
}

impl MemoryHost {
    /// Start at `href`, e.g. `/` or `/?left=%2Fcategories`.
    #[must_use]
    pub fn new(href: &str) -> Self {
        let history = HostHistory { entries: vec![HostEntry::from_href(href)], index: 0, navigations: 0 };
        Self { state: Mutex::new(history) }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut HostHistory) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    fn push(&self, entry: HostEntry) {
        self.with_state(|s| {
            s.entries.truncate(s.index + 1);
            s.entries.push(entry);
            s.index = s.entries.len() - 1;
        });
    }

    /// Load an href as if the user pasted a shared link.
    pub fn open(&self, href: &str) {
        self.push(HostEntry::from_href(href));
    }

    /// Overwrite one raw query key in place, as a sibling component writing
    /// query params directly would.
    pub fn set_param(&self, key: &str, value: Option<&str>) {
        let mut entry = self.with_state(|s| s.entries[s.index].clone());
        match value {
            Some(value) => entry.query.insert(key.to_owned(), Value::String(value.to_owned())),
            None => entry.query.remove(key),
        };
        self.push(entry);
    }

    pub fn back(&self) -> bool {
        self.with_state(|s| {
            if s.index == 0 {
                return false;
            }
            s.index -= 1;
            true
        })
    }

    pub fn forward(&self) -> bool {
        self.with_state(|s| {
            if s.index + 1 >= s.entries.len() {
                return false;
            }
            s.index += 1;
            true
        })
    }

    /// Current href with every query key, in stored order.
    #[must_use]
    pub fn href(&self) -> String {
        self.with_state(|s| {
            let entry = &s.entries[s.index];
            let pairs = entry.query.iter().map(|(k, v)| (k.as_str(), v.as_str()));
            codec::build_href(&entry.pathname, pairs)
        })
    }

    /// Number of history entries.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.with_state(|s| s.entries.len())
    }

    /// Number of navigations issued through [`HostLocation::navigate`].
    #[must_use]
    pub fn navigation_count(&self) -> usize {
        self.with_state(|s| s.navigations)
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new("/")
    }
}

impl HostLocation for MemoryHost {
    fn pathname(&self) -> String {
        self.with_state(|s| s.entries[s.index].pathname.clone())
    }

    fn raw_query(&self) -> RawQuery {
        self.with_state(|s| s.entries[s.index].query.clone())
    }

    fn navigate(&self, to: &str, query: &PanelQuery) {
        let entry = HostEntry {
            pathname: to.to_owned(),
            query: query
                .iter()
                .filter_map(|(k, v)| v.map(|v| (k.to_owned(), Value::String(v.to_owned()))))
                .collect(),
        };
        debug!(to, "memory host navigate");
        self.with_state(|s| s.navigations += 1);
        self.push(entry);
    }
}
