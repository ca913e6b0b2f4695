//! Scoped panel controls handed to application code.
//!
//! These are the explicit-argument forms of the provider hooks: callers pass
//! the context they were given (or `None`) and get a fail-fast error when the
//! context is missing.

use tracing::warn;

use crate::codec::{Params, SearchParams};
use crate::coordinator::{Coordinator, PanelContext};
use crate::error::PanelError;
use crate::factory::PendingState;
use crate::router::{PanelLocation, RouteMatch};

/// Navigation controls for one registered panel.
#[derive(Clone, Debug)]
pub struct PanelControl {
    name: String,
    coordinator: Coordinator,
    is_open: bool,
}

impl PanelControl {
    pub(crate) fn new(name: String, coordinator: Coordinator, is_open: bool) -> Self {
        Self { name, coordinator, is_open }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Open state as of the snapshot the control was built from.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn navigate(&self, to: &str, search: Option<&SearchParams>) {
        if let Err(err) = self.coordinator.navigate_panel(&self.name, to, search) {
            warn!(panel = %self.name, error = %err, "panel navigate failed");
        }
    }

    pub fn close(&self) {
        if let Err(err) = self.coordinator.close_panel(&self.name) {
            warn!(panel = %self.name, error = %err, "panel close failed");
        }
    }

    /// Reopen without an explicit path (see `ReopenPolicy`).
    pub fn open(&self) {
        if let Err(err) = self.coordinator.open_panel(&self.name) {
            warn!(panel = %self.name, error = %err, "panel open failed");
        }
    }
}

/// Controls for every registered panel plus main-site navigation.
#[derive(Clone, Debug)]
pub struct PanelControls {
    panels: Vec<PanelControl>,
    is_panel_mode: bool,
    coordinator: Coordinator,
}

impl PanelControls {
    pub(crate) fn new(panels: Vec<PanelControl>, is_panel_mode: bool, coordinator: Coordinator) -> Self {
        Self { panels, is_panel_mode, coordinator }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PanelControl> {
        self.panels.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PanelControl> {
        self.panels.iter()
    }

    #[must_use]
    pub fn is_panel_mode(&self) -> bool {
        self.is_panel_mode
    }

    pub fn navigate_main(&self, to: &str) {
        self.coordinator.navigate_main(to);
    }
}

/// Identity of the panel whose outlet is currently rendering.
#[derive(Clone, Debug)]
pub struct PanelIdentity {
    name: String,
    coordinator: Coordinator,
}

impl PanelIdentity {
    pub(crate) fn new(name: String, coordinator: Coordinator) -> Self {
        Self { name, coordinator }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn navigate(&self, to: &str, search: Option<&SearchParams>) {
        if let Err(err) = self.coordinator.navigate_panel(&self.name, to, search) {
            warn!(panel = %self.name, error = %err, "panel navigate failed");
        }
    }

    pub fn close(&self) {
        if let Err(err) = self.coordinator.close_panel(&self.name) {
            warn!(panel = %self.name, error = %err, "panel close failed");
        }
    }

    /// This panel's router location, synced with the host query first.
    #[must_use]
    pub fn location(&self) -> Option<PanelLocation> {
        self.coordinator.panel_location(&self.name)
    }

    #[must_use]
    pub fn matched(&self) -> Option<RouteMatch> {
        self.coordinator.panel_match(&self.name)
    }

    /// Decoded `$param` values of the matched route. Empty when nothing matches.
    #[must_use]
    pub fn params(&self) -> Params {
        self.matched().map(|m| m.params).unwrap_or_default()
    }

    #[must_use]
    pub fn pending(&self) -> PendingState {
        self.coordinator.panel_pending(&self.name)
    }

    /// Signal that this panel finished loading its current location.
    pub fn settle(&self) {
        if let Err(err) = self.coordinator.settle_panel(&self.name) {
            warn!(panel = %self.name, error = %err, "panel settle failed");
        }
    }
}

/// Controls for every panel.
///
/// # Errors
///
/// Returns [`PanelError::NotRegistered`] when no provider context is given.
pub fn use_panel(ctx: Option<&PanelContext>) -> Result<PanelControls, PanelError> {
    let ctx = ctx.ok_or(PanelError::NotRegistered { hook: "use_panel", within: "a panel provider" })?;
    Ok(ctx.controls())
}

/// Identity of the enclosing panel.
///
/// # Errors
///
/// Returns [`PanelError::NotRegistered`] outside a panel outlet.
pub fn use_current_panel(identity: Option<&PanelIdentity>) -> Result<PanelIdentity, PanelError> {
    identity.cloned().ok_or(PanelError::NotRegistered { hook: "use_current_panel", within: "a panel outlet" })
}
