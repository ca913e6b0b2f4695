//! Bounded in-memory navigation log.
//!
//! `PanelSystemBuilder::navigation_log` installs one sized by
//! `PanelSystemConfig::log_capacity`; `observer` wires a hand-built log into
//! any other hook. Either way it keeps a human-readable trail of panel
//! navigations for a debug panel.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::config::PanelSystemConfig;
use crate::coordinator::{NavAction, NavigateHook, NavigationEvent};

#[cfg(test)]
#[path = "log_test.rs"]
mod log_test;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// Milliseconds since the Unix epoch.
    pub ts: i64,
    pub kind: String,
    pub message: String,
}

/// Ring buffer of log entries; the oldest entry is evicted at capacity.
#[derive(Debug)]
pub struct NavigationLog {
    capacity: usize,
    entries: Mutex<VecDeque<LogEntry>>,
}

impl NavigationLog {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { capacity: capacity.max(1), entries: Mutex::new(VecDeque::new()) }
    }

    #[must_use]
    pub fn from_config(config: &PanelSystemConfig) -> Self {
        Self::new(config.log_capacity)
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push(&self, kind: impl Into<String>, message: impl Into<String>) {
        let entry = LogEntry { ts: now_ms(), kind: kind.into(), message: message.into() };
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn record(&self, event: &NavigationEvent) {
        self.push("nav", describe(event));
    }

    /// Oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Navigation hook that records into this log.
    #[must_use]
    pub fn observer(self: &Arc<Self>) -> NavigateHook {
        let log = Arc::clone(self);
        Arc::new(move |event: &NavigationEvent| log.record(event))
    }
}

/// One-line description, e.g. `[nav:left] → /categories`.
#[must_use]
pub fn describe(event: &NavigationEvent) -> String {
    match (event.action, event.path.as_deref()) {
        (NavAction::Close, _) | (NavAction::Navigate, None) => format!("[nav:{}] closed", event.panel),
        (NavAction::Navigate, Some(path)) => format!("[nav:{}] → {path}", event.panel),
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}
