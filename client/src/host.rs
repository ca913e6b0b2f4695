//! Host location backed by the Leptos router.
//!
//! SYSTEM CONTEXT
//! ==============
//! The page's own router owns the address bar. This adapter reads its query
//! map and pathname without tracking (reactive tracking goes through the
//! provider's query memo) and writes by navigating to a freshly built href.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::params::ParamsMap;
use panels::HostLocation;
use panels::validate::{PanelQuery, RawQuery};

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

type NavigateFn = Box<dyn Fn(&str, NavigateOptions)>;

pub struct LeptosHost {
    names: Arc<[String]>,
    query: Memo<ParamsMap>,
    pathname: Memo<String>,
    navigate: StoredValue<NavigateFn, LocalStorage>,
}

impl LeptosHost {
    pub fn new(
        names: &[String],
        query: Memo<ParamsMap>,
        pathname: Memo<String>,
        navigate: impl Fn(&str, NavigateOptions) + 'static,
    ) -> Self {
        let navigate: NavigateFn = Box::new(navigate);
        Self { names: names.into(), query, pathname, navigate: StoredValue::new_local(navigate) }
    }
}

impl HostLocation for LeptosHost {
    fn pathname(&self) -> String {
        self.pathname.get_untracked()
    }

    fn raw_query(&self) -> RawQuery {
        self.query.with_untracked(|map| raw_query_from(&self.names[..], |name| map.get(name)))
    }

    fn navigate(&self, to: &str, query: &PanelQuery) {
        let href = self.build_href(to, query);
        // Panel moves never scroll the page.
        let options = NavigateOptions { scroll: false, ..NavigateOptions::default() };
        self.navigate.with_value(|navigate| navigate(&href, options));
    }
}

/// Raw query object holding the panel keys `lookup` knows about.
pub fn raw_query_from<S: AsRef<str>>(names: &[S], lookup: impl Fn(&str) -> Option<String>) -> RawQuery {
    names
        .iter()
        .filter_map(|name| {
            let name = name.as_ref();
            lookup(name).map(|value| (name.to_owned(), serde_json::Value::String(value)))
        })
        .collect()
}
