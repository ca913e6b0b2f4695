//! Coordination provider: the hub between host query state and panel routers.
//!
//! DESIGN
//! ======
//! The host query is the single source of truth. Outbound, every panel
//! operation turns into exactly one host navigation that rewrites the panel
//! keys it touches and carries the others over unchanged; routers that
//! already exist are navigated first so the panel never waits on the host
//! round-trip. Inbound, `sync` compares each panel's query value against the
//! last value it saw and pushes any change into that panel's router, which is
//! what makes back/forward and freshly opened shared links land correctly.
//!
//! The last-seen values live in interior cells, not in the snapshot handed to
//! renders, so recording them never invalidates the snapshot that triggered
//! the sync.
//!
//! Each panel owns one arena slot holding its memoized router factory. Slots
//! are created with the coordinator and never replaced.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use crate::codec::{self, SearchParams};
use crate::config::{PanelSystemConfig, ReopenPolicy};
use crate::controls::{PanelControl, PanelControls, PanelIdentity};
use crate::error::PanelError;
use crate::factory::{PendingState, RouterFactory};
use crate::host::HostLocation;
use crate::panel::Panel;
use crate::router::{self, PanelLocation, RouteMatch, RouterHandle};
use crate::validate::{self, PanelQuery};

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod coordinator_test;

/// Panel label used in navigation events emitted by `navigate_main`.
pub const MAIN_PANEL: &str = "main";

/// Kind of panel navigation reported to observers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavAction {
    Navigate,
    Close,
}

/// One outbound navigation, reported before the host is updated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationEvent {
    pub panel: String,
    pub action: NavAction,
    pub path: Option<String>,
}

/// Observer invoked for every outbound panel navigation.
pub type NavigateHook = Arc<dyn Fn(&NavigationEvent) + Send + Sync>;

/// Requested change to one panel's query value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelUpdate {
    /// Open (or move) the panel to this panel value.
    Open(String),
    Close,
}

struct PanelSlot {
    panel: Panel,
    factory: RouterFactory,
    last_seen: Mutex<Option<String>>,
}

struct Inner {
    names: Vec<String>,
    slots: Vec<PanelSlot>,
    host: Arc<dyn HostLocation>,
    config: PanelSystemConfig,
    on_navigate: Option<NavigateHook>,
}

/// Owns every panel router and keeps them in step with the host query.
///
/// Cheap to clone; clones share the same routers.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<Inner>,
}

impl Coordinator {
    pub(crate) fn new(
        panels: &[Panel],
        host: Arc<dyn HostLocation>,
        config: PanelSystemConfig,
        on_navigate: Option<NavigateHook>,
    ) -> Self {
        let names = panels.iter().map(|p| p.name().to_owned()).collect();
        let slots = panels
            .iter()
            .map(|panel| PanelSlot { panel: panel.clone(), factory: panel.router_factory(), last_seen: Mutex::new(None) })
            .collect();
        Self { inner: Arc::new(Inner { names, slots, host, config, on_navigate }) }
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.inner.names
    }

    #[must_use]
    pub fn host(&self) -> &Arc<dyn HostLocation> {
        &self.inner.host
    }

    #[must_use]
    pub fn config(&self) -> &PanelSystemConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn panel(&self, name: &str) -> Option<&Panel> {
        self.slot(name).ok().map(|slot| &slot.panel)
    }

    fn slot(&self, name: &str) -> Result<&PanelSlot, PanelError> {
        self.inner
            .slots
            .iter()
            .find(|slot| slot.panel.name() == name)
            .ok_or_else(|| PanelError::UnknownPanel(name.to_owned()))
    }

    /// Current host query state, normalized to the registered panels.
    #[must_use]
    pub fn query(&self) -> PanelQuery {
        validate::validate_search(&self.inner.names, &self.inner.host.raw_query())
    }

    /// Render-time projection of the current host query state.
    #[must_use]
    pub fn snapshot(&self) -> PanelContext {
        PanelContext { coordinator: self.clone(), query: self.query() }
    }

    #[must_use]
    pub fn is_panel_open(&self, name: &str) -> bool {
        self.query().is_open(name)
    }

    /// Whether at least one panel is open.
    #[must_use]
    pub fn is_panel_mode(&self) -> bool {
        self.query().any_open()
    }

    /// The panel's router, built on first access. `None` for unregistered names.
    #[must_use]
    pub fn get_router(&self, name: &str) -> Option<RouterHandle> {
        let query = self.query();
        self.router_for(name, query.get(name))
    }

    fn router_for(&self, name: &str, value: Option<&str>) -> Option<RouterHandle> {
        let slot = self.slot(name).ok()?;
        let seed = value.filter(|v| !v.is_empty()).unwrap_or(slot.panel.default_path());
        Some(slot.factory.get(Some(seed)))
    }

    /// The panel's router only if it has already been built.
    #[must_use]
    pub fn existing_router(&self, name: &str) -> Option<RouterHandle> {
        self.slot(name).ok()?.factory.existing()
    }

    /// Scoped identity for code rendered inside the panel's outlet.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::UnknownPanel`] for unregistered names.
    pub fn identity(&self, name: &str) -> Result<PanelIdentity, PanelError> {
        self.slot(name)?;
        Ok(PanelIdentity::new(name.to_owned(), self.clone()))
    }

    // =========================================================================
    // OUTBOUND: panel -> host
    // =========================================================================

    /// Navigate one panel to `to` (plus optional query).
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::UnknownPanel`] for unregistered names.
    pub fn navigate_panel(&self, name: &str, to: &str, search: Option<&SearchParams>) -> Result<(), PanelError> {
        let value = codec::encode_panel_value(to, search);
        self.apply([(name, PanelUpdate::Open(value))])
    }

    /// Close one panel. Its router keeps its history for the next reopen.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::UnknownPanel`] for unregistered names.
    pub fn close_panel(&self, name: &str) -> Result<(), PanelError> {
        self.apply([(name, PanelUpdate::Close)])
    }

    /// Reopen a panel without an explicit path, following the reopen policy.
    /// A panel that is already open is left alone.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::UnknownPanel`] for unregistered names.
    pub fn open_panel(&self, name: &str) -> Result<(), PanelError> {
        let slot = self.slot(name)?;
        if self.is_panel_open(name) {
            return Ok(());
        }
        let target = match (self.inner.config.reopen, slot.factory.existing()) {
            (ReopenPolicy::RestoreLast, Some(router)) => router.location().to_value(),
            _ => slot.panel.default_path().to_owned(),
        };
        self.apply([(name, PanelUpdate::Open(target))])
    }

    /// Apply several panel updates as one host navigation.
    ///
    /// Every name is checked before anything happens, so an unknown name
    /// leaves both routers and host untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::UnknownPanel`] for the first unregistered name.
    pub fn apply<S, I>(&self, updates: I) -> Result<(), PanelError>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (S, PanelUpdate)>,
    {
        let updates = updates.into_iter().collect::<Vec<_>>();
        for (name, _) in &updates {
            self.slot(name.as_ref())?;
        }

        let mut next = self.query();
        for (name, update) in &updates {
            let name = name.as_ref();
            match update {
                PanelUpdate::Open(value) => {
                    self.emit(name, NavAction::Navigate, Some(value.as_str()));
                    if let Some(router) = self.existing_router(name) {
                        router::navigate_to_value(router.as_ref(), value);
                    }
                    next.set(name, Some(value.clone()));
                }
                PanelUpdate::Close => {
                    self.emit(name, NavAction::Close, None);
                    next.set(name, None);
                }
            }
        }

        let base = &self.inner.config.base_path;
        info!(to = %base, updates = updates.len(), "panel host navigation");
        self.inner.host.navigate(base, &next);
        Ok(())
    }

    /// Leave panel mode: navigate the host to `to` and close every panel.
    pub fn navigate_main(&self, to: &str) {
        self.emit(MAIN_PANEL, NavAction::Navigate, Some(to));
        let cleared = PanelQuery::closed(&self.inner.names);
        info!(to, "main host navigation");
        self.inner.host.navigate(to, &cleared);
    }

    fn emit(&self, panel: &str, action: NavAction, path: Option<&str>) {
        if let Some(hook) = &self.inner.on_navigate {
            hook(&NavigationEvent { panel: panel.to_owned(), action, path: path.map(str::to_owned) });
        }
    }

    // =========================================================================
    // INBOUND: host -> panel
    // =========================================================================

    /// Push every changed panel value from the host query into its router.
    pub fn sync(&self) {
        let query = self.query();
        for slot in &self.inner.slots {
            self.sync_slot(slot, query.get(slot.panel.name()));
        }
    }

    /// Sync a single panel.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::UnknownPanel`] for unregistered names.
    pub fn sync_panel(&self, name: &str) -> Result<(), PanelError> {
        let slot = self.slot(name)?;
        let query = self.query();
        self.sync_slot(slot, query.get(name));
        Ok(())
    }

    fn sync_slot(&self, slot: &PanelSlot, current: Option<&str>) {
        let changed = {
            let mut last = slot.last_seen.lock().unwrap_or_else(PoisonError::into_inner);
            let changed = current.is_some_and(|v| !v.is_empty()) && last.as_deref() != current;
            *last = current.map(str::to_owned);
            changed
        };
        let Some(value) = current.filter(|_| changed) else {
            return;
        };
        let name = slot.panel.name();
        debug!(panel = name, value, "syncing panel from host query");
        if let Some(router) = self.router_for(name, Some(value)) {
            router::navigate_to_value(router.as_ref(), value);
        }
    }

    /// Sync the panel, then read its router's location. Renders go through
    /// this so they never observe a location that lags the host query.
    #[must_use]
    pub fn panel_location(&self, name: &str) -> Option<PanelLocation> {
        self.sync_panel(name).ok()?;
        self.get_router(name).map(|router| router.location())
    }

    /// Route matched by the panel's synced location.
    #[must_use]
    pub fn panel_match(&self, name: &str) -> Option<RouteMatch> {
        self.sync_panel(name).ok()?;
        self.get_router(name)?.matched()
    }

    /// Placeholder state of the panel's current transition. Idle for closed
    /// or unregistered panels.
    #[must_use]
    pub fn panel_pending(&self, name: &str) -> PendingState {
        if !self.is_panel_open(name) || self.sync_panel(name).is_err() {
            return PendingState::Idle;
        }
        self.get_router(name).map_or(PendingState::Idle, |router| router.pending())
    }

    /// Mark the panel's current location as loaded.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::UnknownPanel`] for unregistered names.
    pub fn settle_panel(&self, name: &str) -> Result<(), PanelError> {
        self.slot(name)?;
        if let Some(router) = self.existing_router(name) {
            router.settle();
        }
        Ok(())
    }
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("names", &self.inner.names)
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// CONTEXT SNAPSHOT
// =============================================================================

/// Per-render view of the coordinator: the host query as it was when the
/// snapshot was taken, plus the operations that write back through the host.
#[derive(Clone, Debug)]
pub struct PanelContext {
    coordinator: Coordinator,
    query: PanelQuery,
}

impl PanelContext {
    #[must_use]
    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    #[must_use]
    pub fn query(&self) -> &PanelQuery {
        &self.query
    }

    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.coordinator.config().base_path
    }

    #[must_use]
    pub fn is_panel_open(&self, name: &str) -> bool {
        self.query.is_open(name)
    }

    #[must_use]
    pub fn is_panel_mode(&self) -> bool {
        self.query.any_open()
    }

    /// Router for `name`, seeded from this snapshot's value when first built.
    #[must_use]
    pub fn get_router(&self, name: &str) -> Option<RouterHandle> {
        self.coordinator.router_for(name, self.query.get(name))
    }

    /// Href for `to` with this snapshot's panel params, after applying
    /// `updates`. Unregistered names in `updates` are ignored.
    pub fn href_with<S, I>(&self, to: &str, updates: I) -> String
    where
        S: AsRef<str>,
        I: IntoIterator<Item = (S, Option<String>)>,
    {
        let mut next = self.query.clone();
        for (name, value) in updates {
            next.set(name.as_ref(), value);
        }
        self.coordinator.host().build_href(to, &next)
    }

    /// Per-panel controls for this snapshot.
    #[must_use]
    pub fn controls(&self) -> PanelControls {
        let panels = self
            .coordinator
            .names()
            .iter()
            .map(|name| PanelControl::new(name.clone(), self.coordinator.clone(), self.query.is_open(name)))
            .collect();
        PanelControls::new(panels, self.query.any_open(), self.coordinator.clone())
    }

    /// # Errors
    ///
    /// Returns [`PanelError::UnknownPanel`] for unregistered names.
    pub fn navigate_panel(&self, name: &str, to: &str, search: Option<&SearchParams>) -> Result<(), PanelError> {
        self.coordinator.navigate_panel(name, to, search)
    }

    /// # Errors
    ///
    /// Returns [`PanelError::UnknownPanel`] for unregistered names.
    pub fn close_panel(&self, name: &str) -> Result<(), PanelError> {
        self.coordinator.close_panel(name)
    }

    pub fn navigate_main(&self, to: &str) {
        self.coordinator.navigate_main(to);
    }
}
