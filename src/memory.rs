//! Reference in-memory navigation engine.
//!
//! SYSTEM CONTEXT
//! ==============
//! Panels never touch the document location: each one runs on a private,
//! in-memory history. Applications with their own engine implement
//! [`RouteTree`]/[`PanelRouter`] directly; this module covers everything
//! else (tests, the CLI, and hosts that only need `$param` matching).

use std::sync::{Arc, Mutex, PoisonError};

use tracing::trace;

use crate::codec::{Params, SearchParams};
use crate::factory::{PendingGate, PendingOptions, PendingState};
use crate::router::{PanelLocation, PanelRouter, RouteMatch, RouteTree, RouterHandle};

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

// =============================================================================
// ROUTE TABLE
// =============================================================================

/// Flat list of route patterns such as `/categories/$category`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteTable {
    patterns: Vec<String>,
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn route(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Match `pathname`, preferring the pattern with the most static segments.
    #[must_use]
    pub fn match_path(&self, pathname: &str) -> Option<RouteMatch> {
        let path_segments = segments(pathname).collect::<Vec<_>>();
        let mut best: Option<(usize, RouteMatch)> = None;
        for pattern in &self.patterns {
            let Some((score, params)) = match_segments(pattern, &path_segments) else {
                continue;
            };
            if best.as_ref().is_none_or(|(best_score, _)| score > *best_score) {
                best = Some((score, RouteMatch { pattern: pattern.clone(), params }));
            }
        }
        best.map(|(_, matched)| matched)
    }
}

impl<S: Into<String>> FromIterator<S> for RouteTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { patterns: iter.into_iter().map(Into::into).collect() }
    }
}

impl RouteTree for RouteTable {
    fn create_router(&self, initial_entries: Vec<String>, pending: Option<&PendingOptions>) -> RouterHandle {
        Arc::new(MemoryRouter::new(self.clone(), initial_entries, pending.copied()))
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn match_segments(pattern: &str, path: &[&str]) -> Option<(usize, Params)> {
    let pattern_segments = segments(pattern).collect::<Vec<_>>();
    if pattern_segments.len() != path.len() {
        return None;
    }
    let mut score = 0;
    let mut params = Params::new();
    for (expected, actual) in pattern_segments.iter().zip(path) {
        if let Some(name) = expected.strip_prefix('$').filter(|n| !n.is_empty()) {
            let value = urlencoding::decode(actual).map_or_else(|_| (*actual).to_owned(), |v| v.into_owned());
            params.insert(name.to_owned(), value);
        } else if expected == actual {
            score += 1;
        } else {
            return None;
        }
    }
    Some((score, params))
}

// =============================================================================
// MEMORY HISTORY
// =============================================================================

/// Linear history stack with a cursor, like a browser tab's session history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryHistory {
    entries: Vec<PanelLocation>,
    index: usize,
}

impl MemoryHistory {
    /// Seed with `entries`; the cursor starts on the last one. Empty seeds
    /// start at `/`.
    #[must_use]
    pub fn new(entries: Vec<String>) -> Self {
        let mut entries = entries.iter().map(|e| PanelLocation::from_value(e)).collect::<Vec<_>>();
        if entries.is_empty() {
            entries.push(PanelLocation::from_value("/"));
        }
        let index = entries.len() - 1;
        Self { entries, index }
    }

    #[must_use]
    pub fn location(&self) -> &PanelLocation {
        &self.entries[self.index]
    }

    /// Push a new entry, dropping any forward entries.
    pub fn push(&mut self, location: PanelLocation) {
        self.entries.truncate(self.index + 1);
        self.entries.push(location);
        self.index = self.entries.len() - 1;
    }

    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

// =============================================================================
// MEMORY ROUTER
// =============================================================================

struct RouterState {
    history: MemoryHistory,
    gate: PendingGate,
}

/// Panel router backed by a [`MemoryHistory`] and a [`RouteTable`].
///
/// With pending options, every location change (the seed included) opens a
/// transition that lasts until [`PanelRouter::settle`].
pub struct MemoryRouter {
    routes: RouteTable,
    pending: Option<PendingOptions>,
    state: Mutex<RouterState>,
}

impl MemoryRouter {
    #[must_use]
    pub fn new(routes: RouteTable, initial_entries: Vec<String>, pending: Option<PendingOptions>) -> Self {
        let mut gate = PendingGate::default();
        if let Some(options) = &pending {
            gate.begin(options.now_ms());
        }
        let state = RouterState { history: MemoryHistory::new(initial_entries), gate };
        Self { routes, pending, state: Mutex::new(state) }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut RouterState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    fn moved(&self, state: &mut RouterState) {
        if let Some(options) = &self.pending {
            state.gate.begin(options.now_ms());
        }
    }

    pub fn back(&self) -> bool {
        self.with_state(|s| {
            let moved = s.history.back();
            if moved {
                self.moved(s);
            }
            moved
        })
    }

    pub fn forward(&self) -> bool {
        self.with_state(|s| {
            let moved = s.history.forward();
            if moved {
                self.moved(s);
            }
            moved
        })
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.with_state(|s| s.history.len())
    }

    #[must_use]
    pub fn history(&self) -> MemoryHistory {
        self.with_state(|s| s.history.clone())
    }

    /// Placeholder state at `now_ms`. Always idle without pending options.
    #[must_use]
    pub fn pending_at(&self, now_ms: u64) -> PendingState {
        let Some(options) = self.pending else {
            return PendingState::Idle;
        };
        self.with_state(|s| s.gate.state_at(&options, now_ms))
    }

    #[must_use]
    pub fn pending_visible(&self, now_ms: u64) -> bool {
        self.pending_at(now_ms) == PendingState::Visible
    }
}

impl PanelRouter for MemoryRouter {
    fn navigate(&self, to: &str, search: Option<&SearchParams>) {
        let next = PanelLocation::new(to, search.cloned().unwrap_or_default());
        self.with_state(|s| {
            if *s.history.location() == next {
                trace!(location = %next, "panel router already at location");
                return;
            }
            trace!(location = %next, "panel router push");
            s.history.push(next);
            self.moved(s);
        });
    }

    fn location(&self) -> PanelLocation {
        self.with_state(|s| s.history.location().clone())
    }

    fn matched(&self) -> Option<RouteMatch> {
        let pathname = self.with_state(|s| s.history.location().pathname.clone());
        self.routes.match_path(&pathname)
    }

    fn pending(&self) -> PendingState {
        self.pending.map_or(PendingState::Idle, |options| self.pending_at(options.now_ms()))
    }

    fn settle(&self) {
        self.with_state(|s| s.gate.finish());
    }
}
