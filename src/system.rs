//! Panel system facade: the registry plus everything built from it.
//!
//! DESIGN
//! ======
//! A `PanelSystem` is immutable once built. It hands out coordinators bound
//! to a host location, link builders, and the hook entry points. Several
//! coordinators may be built from one system (one per host); each owns its
//! own routers.

use std::sync::Arc;

use tracing::info;

use crate::config::{PanelSystemConfig, SystemManifest};
use crate::controls::{self, PanelControls, PanelIdentity};
use crate::coordinator::{Coordinator, NavigateHook, NavigationEvent, PanelContext};
use crate::error::PanelError;
use crate::host::HostLocation;
use crate::links::{MainLink, SystemLink};
use crate::log::NavigationLog;
use crate::memory::RouteTable;
use crate::panel::Panel;
use crate::validate::{self, PanelQuery, RawQuery};

#[cfg(test)]
#[path = "system_test.rs"]
mod system_test;

/// Registered panels, configuration and navigation observer.
#[derive(Clone)]
pub struct PanelSystem {
    panels: Arc<[Panel]>,
    names: Arc<[String]>,
    config: PanelSystemConfig,
    on_navigate: Option<NavigateHook>,
    log: Option<Arc<NavigationLog>>,
}

impl PanelSystem {
    #[must_use]
    pub fn builder() -> PanelSystemBuilder {
        PanelSystemBuilder::default()
    }

    /// Build a system whose panels run on the in-memory engine.
    ///
    /// # Errors
    ///
    /// Same as [`PanelSystemBuilder::build`].
    pub fn from_manifest(manifest: &SystemManifest) -> Result<Self, PanelError> {
        let pending = manifest.config.pending();
        let mut builder = Self::builder().config(manifest.config.clone());
        for entry in &manifest.panels {
            let routes = entry.routes.iter().cloned().collect::<RouteTable>();
            let mut panel = Panel::new(entry.name.clone(), Arc::new(routes), entry.default_path.clone());
            if entry.pending {
                panel = panel.with_pending(pending);
            }
            builder = builder.panel(panel);
        }
        builder.build()
    }

    /// Panel names in registration order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    #[must_use]
    pub fn panel(&self, name: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.name() == name)
    }

    #[must_use]
    pub fn config(&self) -> &PanelSystemConfig {
        &self.config
    }

    /// Log installed by [`PanelSystemBuilder::navigation_log`]. Shared by every
    /// coordinator built from this system.
    #[must_use]
    pub fn navigation_log(&self) -> Option<&Arc<NavigationLog>> {
        self.log.as_ref()
    }

    /// Normalize a raw host query against this system's panel names.
    #[must_use]
    pub fn validate_search(&self, raw: &RawQuery) -> PanelQuery {
        validate::validate_search(&self.names[..], raw)
    }

    /// Coordinator bound to `host`. Routers are created lazily.
    #[must_use]
    pub fn provider(&self, host: Arc<dyn HostLocation>) -> Coordinator {
        info!(panels = ?self.names, base_path = %self.config.base_path, "panel provider created");
        Coordinator::new(&self.panels, host, self.config.clone(), self.on_navigate.clone())
    }

    /// Multi-panel link builder.
    #[must_use]
    pub fn link(&self) -> SystemLink {
        SystemLink::new()
    }

    /// Link to a top-level path that closes every panel.
    #[must_use]
    pub fn main_link(&self, to: impl Into<String>) -> MainLink {
        MainLink::new(to)
    }

    /// # Errors
    ///
    /// Returns [`PanelError::NotRegistered`] without a provider context.
    pub fn use_panel(&self, ctx: Option<&PanelContext>) -> Result<PanelControls, PanelError> {
        controls::use_panel(ctx)
    }

    /// # Errors
    ///
    /// Returns [`PanelError::NotRegistered`] outside a panel outlet.
    pub fn use_current_panel(&self, identity: Option<&PanelIdentity>) -> Result<PanelIdentity, PanelError> {
        controls::use_current_panel(identity)
    }
}

impl std::fmt::Debug for PanelSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelSystem")
            .field("panels", &self.panels)
            .field("config", &self.config)
            .field("on_navigate", &self.on_navigate.is_some())
            .field("log", &self.log.as_ref().map(|log| log.len()))
            .finish()
    }
}

// =============================================================================
// BUILDER
// =============================================================================

#[derive(Default)]
pub struct PanelSystemBuilder {
    panels: Vec<Panel>,
    config: PanelSystemConfig,
    on_navigate: Option<NavigateHook>,
    record_navigation: bool,
}

impl PanelSystemBuilder {
    #[must_use]
    pub fn panel(mut self, panel: Panel) -> Self {
        self.panels.push(panel);
        self
    }

    #[must_use]
    pub fn config(mut self, config: PanelSystemConfig) -> Self {
        self.config = config;
        self
    }

    /// Observe every outbound navigation.
    #[must_use]
    pub fn on_navigate(mut self, hook: impl Fn(&NavigationEvent) + Send + Sync + 'static) -> Self {
        self.on_navigate = Some(Arc::new(hook));
        self
    }

    /// Record navigations into a [`NavigationLog`] holding the configured
    /// `log_capacity` entries. Runs before any `on_navigate` hook.
    #[must_use]
    pub fn navigation_log(mut self) -> Self {
        self.record_navigation = true;
        self
    }

    /// # Errors
    ///
    /// - [`PanelError::Config`] for no panels, an empty name or invalid config.
    /// - [`PanelError::DuplicatePanel`] when two panels share a name.
    pub fn build(self) -> Result<PanelSystem, PanelError> {
        self.config.validate()?;
        if self.panels.is_empty() {
            return Err(PanelError::Config("at least one panel is required".to_owned()));
        }
        let mut names: Vec<String> = Vec::with_capacity(self.panels.len());
        for panel in &self.panels {
            let name = panel.name();
            if name.is_empty() {
                return Err(PanelError::Config("panel name must not be empty".to_owned()));
            }
            if names.iter().any(|n| n == name) {
                return Err(PanelError::DuplicatePanel(name.to_owned()));
            }
            names.push(name.to_owned());
        }
        let log = self.record_navigation.then(|| Arc::new(NavigationLog::from_config(&self.config)));
        let on_navigate = match (self.on_navigate, &log) {
            (hook, None) => hook,
            (None, Some(log)) => Some(log.observer()),
            (Some(hook), Some(log)) => {
                let record = log.observer();
                let chained: NavigateHook = Arc::new(move |event: &NavigationEvent| {
                    record(event);
                    hook(event);
                });
                Some(chained)
            }
        };
        Ok(PanelSystem { panels: self.panels.into(), names: names.into(), config: self.config, on_navigate, log })
    }
}
