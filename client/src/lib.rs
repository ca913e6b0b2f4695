//! Leptos bindings for URL-synchronized panels.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wrap the page in `PanelProvider`, render each panel through a
//! `PanelOutlet`, and link with `PanelLink`, `SystemLink` or `MainLink`.
//! Panel state lives in the page's query string, read and written through the
//! Leptos router, so it must sit inside a `<Router>`.

pub mod hooks;
pub mod host;
pub mod links;
pub mod outlet;
pub mod provider;

pub use hooks::{
    use_current_panel, use_panel, use_panel_context, use_panel_match, use_panel_nav, use_panel_params, use_panel_settle,
};
pub use host::LeptosHost;
pub use links::{MainLink, PanelLink, SystemLink};
pub use outlet::{PanelOutlet, browser_pending};
pub use provider::{PanelProvider, PanelScope};
