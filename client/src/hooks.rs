//! Context hooks for components rendered under a panel provider or outlet.

use leptos::prelude::*;
use panels::{Panel, PanelContext, PanelControl, PanelControls, PanelError, PanelIdentity, Params, RouteMatch};

use crate::outlet::OutletTick;
use crate::provider::PanelScope;

#[cfg(test)]
#[path = "hooks_test.rs"]
mod hooks_test;

/// Panel context of the nearest provider. Tracks the panel query when read
/// inside a reactive closure.
pub fn use_panel_context() -> Option<PanelContext> {
    use_context::<PanelScope>().map(|scope| scope.context())
}

/// Controls for every panel plus `navigate_main`.
///
/// # Errors
///
/// Returns [`PanelError::NotRegistered`] outside a `PanelProvider`.
pub fn use_panel() -> Result<PanelControls, PanelError> {
    panels::use_panel(use_panel_context().as_ref())
}

/// The panel whose outlet encloses the caller.
///
/// # Errors
///
/// Returns [`PanelError::NotRegistered`] outside a `PanelOutlet`.
pub fn use_current_panel() -> Result<PanelIdentity, PanelError> {
    panels::use_current_panel(use_context::<PanelIdentity>().as_ref())
}

/// Controls scoped to `panel`.
///
/// # Errors
///
/// Returns [`PanelError::NotRegistered`] outside a provider and
/// [`PanelError::UnknownPanel`] when the provider does not know `panel`.
pub fn use_panel_nav(panel: &Panel) -> Result<PanelControl, PanelError> {
    panel.nav(use_panel_context().as_ref())
}

/// Route matched by the enclosing panel's location.
///
/// # Errors
///
/// Returns [`PanelError::NotRegistered`] outside a `PanelOutlet`.
pub fn use_panel_match() -> Result<Option<RouteMatch>, PanelError> {
    Ok(use_current_panel()?.matched())
}

/// Decoded `$param` values of the enclosing panel's route.
///
/// # Errors
///
/// Returns [`PanelError::NotRegistered`] outside a `PanelOutlet`.
pub fn use_panel_params() -> Result<Params, PanelError> {
    Ok(use_current_panel()?.params())
}

/// Callback that marks the enclosing panel as loaded and takes down its
/// pending placeholder.
///
/// # Errors
///
/// Returns [`PanelError::NotRegistered`] outside a `PanelOutlet`.
pub fn use_panel_settle() -> Result<impl Fn() + Clone + Send + Sync + 'static, PanelError> {
    let identity = use_current_panel()?;
    let tick = use_context::<OutletTick>();
    Ok(move || {
        identity.settle();
        if let Some(tick) = tick {
            tick.bump();
        }
    })
}
