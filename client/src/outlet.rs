//! Panel outlet: renders one panel's current location.
//!
//! DESIGN
//! ======
//! The render closure tracks the provider's query memo plus a local tick.
//! While a transition is waiting out its debounce, a timer bumps the tick
//! once the threshold passes so the placeholder can appear; settling the
//! panel through `use_panel_settle` bumps it again to take it down.

use leptos::prelude::*;
use panels::{PanelError, PanelIdentity, PanelLocation, PendingOptions, PendingState};

use crate::provider::PanelScope;

#[cfg(test)]
#[path = "outlet_test.rs"]
mod outlet_test;

/// Re-render trigger for the enclosing outlet.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OutletTick(pub(crate) RwSignal<u32>);

impl OutletTick {
    pub(crate) fn bump(self) {
        self.0.update(|tick| *tick = tick.wrapping_add(1));
    }
}

/// What one render pass of an outlet shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum OutletState {
    Closed,
    Open { location: PanelLocation, pending: PendingState },
}

/// Sync the panel and read what it should show. Tracks the query memo.
pub(crate) fn outlet_state(scope: &PanelScope, identity: &PanelIdentity) -> OutletState {
    if !scope.is_panel_open(identity.name()) {
        return OutletState::Closed;
    }
    let location = identity.location().unwrap_or_default();
    OutletState::Open { location, pending: identity.pending() }
}

/// Pending options timed by the browser clock. Use these for panels rendered
/// in wasm, where the system clock is unavailable.
#[must_use]
pub fn browser_pending(min_pending_ms: u64) -> PendingOptions {
    PendingOptions::from_millis(min_pending_ms).with_clock(now_ms)
}

#[cfg(feature = "hydrate")]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn now_ms() -> u64 {
    js_sys::Date::now().max(0.0) as u64
}

#[cfg(not(feature = "hydrate"))]
fn now_ms() -> u64 {
    panels::factory::system_clock()
}

#[cfg(feature = "hydrate")]
fn recheck_after(state: PendingState, tick: OutletTick) {
    if let PendingState::Waiting(remaining) = state {
        let ms = u32::try_from(remaining.as_millis()).unwrap_or(u32::MAX);
        gloo_timers::callback::Timeout::new(ms, move || tick.bump()).forget();
    }
}

#[cfg(not(feature = "hydrate"))]
fn recheck_after(_state: PendingState, _tick: OutletTick) {}

/// Render the panel `name` with `render`, re-running whenever the host query
/// changes. The panel is synced from the query before its location is read.
///
/// Renders nothing while the panel is closed. For panels built with pending
/// options, `pending` is shown above the content once a transition outlasts
/// its threshold, until the panel settles. Descendants reach the panel
/// through `use_current_panel`.
#[component]
pub fn PanelOutlet<F, IV>(
    #[prop(into)] name: String,
    render: F,
    #[prop(optional, into)] pending: Option<ViewFn>,
) -> Result<impl IntoView, PanelError>
where
    F: Fn(PanelLocation) -> IV + Send + Sync + 'static,
    IV: IntoView + 'static,
{
    let scope = use_context::<PanelScope>()
        .ok_or(PanelError::NotRegistered { hook: "PanelOutlet", within: "a panel provider" })?;
    let identity = scope.coordinator().identity(&name)?;
    let tick = OutletTick(RwSignal::new(0));
    provide_context(identity.clone());
    provide_context(tick);

    Ok(move || {
        tick.0.track();
        match outlet_state(&scope, &identity) {
            OutletState::Closed => None,
            OutletState::Open { location, pending: state } => {
                recheck_after(state, tick);
                let placeholder = pending.as_ref().filter(|_| state == PendingState::Visible).map(ViewFn::run);
                Some(view! {
                    {placeholder}
                    {render(location)}
                })
            }
        }
    })
}
