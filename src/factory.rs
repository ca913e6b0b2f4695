//! One-shot, memoized router construction per panel.
//!
//! DESIGN
//! ======
//! Each panel gets exactly one router for the lifetime of its coordinator.
//! The first `get` seeds the router's history; every later call returns the
//! same handle and ignores its argument. There is no re-seed and no dispose:
//! a single slot is what keeps two histories from ever existing for one name.

use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::router::{RouteTree, RouterHandle};

#[cfg(test)]
#[path = "factory_test.rs"]
mod factory_test;

pub const DEFAULT_PENDING_MS: u64 = 200;

/// Millisecond clock used to time pending transitions.
pub type Clock = fn() -> u64;

/// Milliseconds since the Unix epoch from the system clock.
///
/// `wasm32-unknown-unknown` has no system clock; browser hosts install their
/// own with [`PendingOptions::with_clock`].
#[must_use]
pub fn system_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Debounce threshold for a panel's pending placeholder.
#[derive(Clone, Copy)]
pub struct PendingOptions {
    pub min_pending: Duration,
    pub clock: Clock,
}

impl Default for PendingOptions {
    fn default() -> Self {
        Self::from_millis(DEFAULT_PENDING_MS)
    }
}

impl PartialEq for PendingOptions {
    fn eq(&self, other: &Self) -> bool {
        self.min_pending == other.min_pending
    }
}

impl Eq for PendingOptions {}

impl fmt::Debug for PendingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingOptions").field("min_pending", &self.min_pending).finish_non_exhaustive()
    }
}

impl PendingOptions {
    #[must_use]
    pub fn from_millis(ms: u64) -> Self {
        Self { min_pending: Duration::from_millis(ms), clock: system_clock }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn now_ms(&self) -> u64 {
        (self.clock)()
    }

    /// Whether a transition that has run for `elapsed` should show the placeholder.
    #[must_use]
    pub fn show_pending(&self, elapsed: Duration) -> bool {
        elapsed >= self.min_pending
    }
}

/// Placeholder state of a panel's transition to its current location.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PendingState {
    /// Nothing in flight, or the panel has no placeholder.
    #[default]
    Idle,
    /// In flight; the placeholder appears once `remaining` has passed.
    Waiting(Duration),
    Visible,
}

/// Tracks one in-flight transition so fast loads never flash a placeholder.
#[derive(Clone, Copy, Debug, Default)]
pub struct PendingGate {
    started_ms: Option<u64>,
}

impl PendingGate {
    /// Start timing at `now_ms`. A transition already in flight keeps its start.
    pub fn begin(&mut self, now_ms: u64) {
        self.started_ms.get_or_insert(now_ms);
    }

    pub fn finish(&mut self) {
        self.started_ms = None;
    }

    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.started_ms.is_some()
    }

    #[must_use]
    pub fn state_at(&self, options: &PendingOptions, now_ms: u64) -> PendingState {
        let Some(started) = self.started_ms else {
            return PendingState::Idle;
        };
        let elapsed = Duration::from_millis(now_ms.saturating_sub(started));
        if options.show_pending(elapsed) {
            PendingState::Visible
        } else {
            PendingState::Waiting(options.min_pending - elapsed)
        }
    }

    #[must_use]
    pub fn is_visible_at(&self, options: &PendingOptions, now_ms: u64) -> bool {
        self.state_at(options, now_ms) == PendingState::Visible
    }
}

/// Lazily builds and caches the single router of one panel.
pub struct RouterFactory {
    tree: Arc<dyn RouteTree>,
    initial_path: String,
    pending: Option<PendingOptions>,
    slot: OnceLock<RouterHandle>,
}

impl RouterFactory {
    #[must_use]
    pub fn new(tree: Arc<dyn RouteTree>, initial_path: impl Into<String>, pending: Option<PendingOptions>) -> Self {
        Self { tree, initial_path: initial_path.into(), pending, slot: OnceLock::new() }
    }

    /// Return the panel router, building it on first call.
    ///
    /// The history is seeded with `path`, or the factory's initial path when
    /// `path` is `None`. Once built, `path` is ignored.
    pub fn get(&self, path: Option<&str>) -> RouterHandle {
        self.slot
            .get_or_init(|| {
                let seed = path.unwrap_or(&self.initial_path).to_owned();
                debug!(seed = %seed, "panel router created");
                self.tree.create_router(vec![seed], self.pending.as_ref())
            })
            .clone()
    }

    /// The router if it has already been built.
    #[must_use]
    pub fn existing(&self) -> Option<RouterHandle> {
        self.slot.get().cloned()
    }
}

impl fmt::Debug for RouterFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterFactory")
            .field("initial_path", &self.initial_path)
            .field("pending", &self.pending)
            .field("created", &self.slot.get().is_some())
            .finish_non_exhaustive()
    }
}
