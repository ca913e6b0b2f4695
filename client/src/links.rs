//! Anchor components for panel, multi-panel and main-site navigation.
//!
//! Each renders a real `href` for copy-link and open-in-new-tab, and turns
//! plain left clicks into in-page coordinator calls.

use leptos::prelude::*;
use panels::links::{self, ClickModifiers, ClickOutcome};
use panels::{Params, PanelContext, PanelError, SearchParams};

use crate::provider::PanelScope;

#[cfg(test)]
#[path = "links_test.rs"]
mod links_test;

fn modifiers(ev: &leptos::ev::MouseEvent) -> ClickModifiers {
    ClickModifiers {
        button: ev.button(),
        meta: ev.meta_key(),
        ctrl: ev.ctrl_key(),
        shift: ev.shift_key(),
        alt: ev.alt_key(),
    }
}

/// Untracked snapshot for event handlers.
fn snapshot(scope: Option<PanelScope>) -> Option<PanelContext> {
    scope.map(|s| s.coordinator().snapshot())
}

/// Link that moves one panel and keeps the others.
#[component]
pub fn PanelLink(
    #[prop(into)] panel: String,
    #[prop(into)] to: String,
    #[prop(optional)] params: Option<Params>,
    #[prop(optional)] search: Option<SearchParams>,
    #[prop(optional, into)] class: String,
    children: Children,
) -> Result<impl IntoView, PanelError> {
    let mut link = links::PanelLink::new(panel.clone(), to);
    if let Some(params) = params {
        link = link.params(params);
    }
    if let Some(search) = search {
        link = link.search(search);
    }
    let value = link.value()?;
    let scope = use_context::<PanelScope>();

    let href = {
        let (panel, value) = (panel.clone(), value.clone());
        move || links::panel_href(scope.map(|s| s.context()).as_ref(), &panel, &value)
    };
    let on_click = move |ev: leptos::ev::MouseEvent| {
        let outcome = links::panel_click(snapshot(scope).as_ref(), &panel, &value, modifiers(&ev));
        if outcome == ClickOutcome::Handled {
            ev.prevent_default();
        }
    };

    Ok(view! {
        <a href=href class=class on:click=on_click>
            {children()}
        </a>
    })
}

/// Link that moves several panels in one navigation.
#[component]
pub fn SystemLink(
    targets: links::SystemLink,
    #[prop(optional, into)] class: String,
    children: Children,
) -> Result<impl IntoView, PanelError> {
    let scope = use_context::<PanelScope>();
    // Unresolvable templates fail here rather than on click.
    targets.href(snapshot(scope).as_ref())?;

    let href = {
        let targets = targets.clone();
        move || targets.href(scope.map(|s| s.context()).as_ref()).unwrap_or_else(|_| "/".to_owned())
    };
    let on_click = move |ev: leptos::ev::MouseEvent| match targets.click(snapshot(scope).as_ref(), modifiers(&ev)) {
        Ok(ClickOutcome::Handled) => ev.prevent_default(),
        Ok(ClickOutcome::Default) => {}
        Err(e) => leptos::logging::warn!("system link click failed: {e}"),
    };

    Ok(view! {
        <a href=href class=class on:click=on_click>
            {children()}
        </a>
    })
}

/// Link to a main-site path that closes every panel.
#[component]
pub fn MainLink(
    #[prop(into)] to: String,
    #[prop(optional)] params: Option<Params>,
    #[prop(optional, into)] class: String,
    children: Children,
) -> Result<impl IntoView, PanelError> {
    let mut link = links::MainLink::new(to);
    if let Some(params) = params {
        link = link.params(params);
    }
    let path = link.path()?;
    let scope = use_context::<PanelScope>();

    let href = {
        let link = link.clone();
        move || link.href(scope.map(|s| s.context()).as_ref()).unwrap_or_else(|_| path.clone())
    };
    let on_click = move |ev: leptos::ev::MouseEvent| match link.click(snapshot(scope).as_ref(), modifiers(&ev)) {
        Ok(ClickOutcome::Handled) => ev.prevent_default(),
        Ok(ClickOutcome::Default) => {}
        Err(e) => leptos::logging::warn!("main link click failed: {e}"),
    };

    Ok(view! {
        <a href=href class=class on:click=on_click>
            {children()}
        </a>
    })
}
