//! Contract with the delegated navigation engine.
//!
//! SYSTEM CONTEXT
//! ==============
//! The coordinator never resolves routes itself. It only needs to build one
//! isolated router per panel from an opaque route tree, push a location into
//! it, and read its current location back. Route matching and the pending
//! placeholder are optional extras with inert defaults. [`crate::memory`]
//! ships a reference engine that supports both.

use std::fmt;
use std::sync::Arc;

use crate::codec::{self, Params, SearchParams};
use crate::factory::{PendingOptions, PendingState};

/// Current location of one panel router.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PanelLocation {
    pub pathname: String,
    pub search: SearchParams,
}

impl PanelLocation {
    #[must_use]
    pub fn new(pathname: impl Into<String>, search: SearchParams) -> Self {
        Self { pathname: pathname.into(), search }
    }

    /// Parse a panel value into a location.
    #[must_use]
    pub fn from_value(value: &str) -> Self {
        let decoded = codec::decode_panel_value(value);
        Self { pathname: decoded.pathname.to_owned(), search: decoded.search_params().unwrap_or_default() }
    }

    /// Serialize back into a panel value.
    #[must_use]
    pub fn to_value(&self) -> String {
        codec::encode_panel_value(&self.pathname, Some(&self.search))
    }
}

impl fmt::Display for PanelLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_value())
    }
}

/// Route matched by a pathname, with its decoded `$param` values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteMatch {
    pub pattern: String,
    pub params: Params,
}

/// Live navigation stack of one panel.
pub trait PanelRouter: Send + Sync {
    /// Navigate to `to`, replacing the location's query with `search`.
    fn navigate(&self, to: &str, search: Option<&SearchParams>);

    fn location(&self) -> PanelLocation;

    /// Route matched by the current location.
    fn matched(&self) -> Option<RouteMatch> {
        None
    }

    /// Placeholder state of the transition into the current location.
    fn pending(&self) -> PendingState {
        PendingState::Idle
    }

    /// Mark the current location as loaded, ending its transition.
    fn settle(&self) {}
}

/// Opaque route tree able to build isolated, in-memory routers.
pub trait RouteTree: Send + Sync {
    /// Build a router whose history is seeded with `initial_entries`.
    fn create_router(&self, initial_entries: Vec<String>, pending: Option<&PendingOptions>) -> RouterHandle;
}

/// Shared handle to a panel router.
pub type RouterHandle = Arc<dyn PanelRouter>;

/// Push a serialized panel value into `router`.
pub fn navigate_to_value(router: &dyn PanelRouter, value: &str) {
    let decoded = codec::decode_panel_value(value);
    let search = decoded.search_params();
    router.navigate(decoded.pathname, search.as_ref());
}
