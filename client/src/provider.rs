//! Panel provider component and the reactive scope it publishes.
//!
//! DESIGN
//! ======
//! The coordinator lives in a `StoredValue` so every descendant shares one set
//! of routers. A memo over the router's query map projects it to the panel
//! query; anything that reads panel state tracks that memo, so closures re-run
//! exactly when a panel key changes. An effect on the same memo syncs panels
//! that have no outlet mounted; mounted outlets sync in their own render.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate, use_query_map};
use panels::validate::{self, PanelQuery};
use panels::{Coordinator, PanelContext, PanelSystem};

use crate::host::{LeptosHost, raw_query_from};

/// Reactive handle to the nearest panel provider.
#[derive(Clone, Copy, Debug)]
pub struct PanelScope {
    coordinator: StoredValue<Coordinator>,
    query: Memo<PanelQuery>,
}

impl PanelScope {
    pub fn new(coordinator: Coordinator, query: Memo<PanelQuery>) -> Self {
        Self { coordinator: StoredValue::new(coordinator), query }
    }

    /// Tracked read of the panel query.
    pub fn query(&self) -> PanelQuery {
        self.query.get()
    }

    pub fn coordinator(&self) -> Coordinator {
        self.coordinator.get_value()
    }

    /// Snapshot for the core link and control APIs. Tracks the query memo.
    pub fn context(&self) -> PanelContext {
        self.query.track();
        self.coordinator.with_value(Coordinator::snapshot)
    }

    pub fn is_panel_open(&self, name: &str) -> bool {
        self.query.with(|query| query.is_open(name))
    }

    pub fn is_panel_mode(&self) -> bool {
        self.query.with(PanelQuery::any_open)
    }
}

/// Publish a coordinator for `system` bound to the page's router.
#[component]
pub fn PanelProvider(system: PanelSystem, children: Children) -> impl IntoView {
    let query_map = use_query_map();
    let location = use_location();
    let host = LeptosHost::new(system.names(), query_map, location.pathname, use_navigate());
    let coordinator = system.provider(Arc::new(host));

    let names: Arc<[String]> = system.names().into();
    let query = Memo::new(move |_| {
        query_map.with(|map| validate::validate_search(&names[..], &raw_query_from(&names[..], |name| map.get(name))))
    });

    let scope = PanelScope::new(coordinator, query);
    provide_context(scope);

    Effect::new(move || {
        scope.query.track();
        scope.coordinator.with_value(Coordinator::sync);
    });

    children()
}
