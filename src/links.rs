//! Link builders: shareable hrefs plus in-page click interception.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every link renders a real href so middle-click, copy-link and
//! open-in-new-tab keep working. Plain left clicks are intercepted and turned
//! into one coordinator call instead of a full page load.

use tracing::{debug, warn};

use crate::codec::{self, Params, SearchParams};
use crate::coordinator::{PanelContext, PanelUpdate};
use crate::error::PanelError;

#[cfg(test)]
#[path = "links_test.rs"]
mod links_test;

/// Mouse button and modifier state of a click.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClickModifiers {
    /// `0` is the primary button.
    pub button: i16,
    pub meta: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl ClickModifiers {
    #[must_use]
    pub fn is_plain_left_click(&self) -> bool {
        self.button == 0 && !self.meta && !self.ctrl && !self.shift && !self.alt
    }
}

/// What the caller should do with the native click event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Let the browser follow the href.
    Default,
    /// The click was handled in-page; prevent the default action.
    Handled,
}

// =============================================================================
// SINGLE PANEL
// =============================================================================

/// Link that moves one panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelLink {
    panel: String,
    to: String,
    params: Option<Params>,
    search: Option<SearchParams>,
}

impl PanelLink {
    pub fn new(panel: impl Into<String>, to: impl Into<String>) -> Self {
        Self { panel: panel.into(), to: to.into(), params: None, search: None }
    }

    #[must_use]
    pub fn params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }

    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.get_or_insert_with(Params::new).insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn search(mut self, search: SearchParams) -> Self {
        self.search = Some(search);
        self
    }

    #[must_use]
    pub fn panel(&self) -> &str {
        &self.panel
    }

    /// Panel value this link navigates to.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::MissingParameter`] for unresolved `$param` tokens.
    pub fn value(&self) -> Result<String, PanelError> {
        let resolved = codec::resolve_template(&self.to, self.params.as_ref())?;
        Ok(codec::encode_panel_value(&resolved, self.search.as_ref()))
    }

    /// # Errors
    ///
    /// Same as [`PanelLink::value`].
    pub fn href(&self, ctx: Option<&PanelContext>) -> Result<String, PanelError> {
        Ok(panel_href(ctx, &self.panel, &self.value()?))
    }

    /// # Errors
    ///
    /// Same as [`PanelLink::value`].
    pub fn click(&self, ctx: Option<&PanelContext>, modifiers: ClickModifiers) -> Result<ClickOutcome, PanelError> {
        Ok(panel_click(ctx, &self.panel, &self.value()?, modifiers))
    }
}

/// Href that sets `panel` to `value` and keeps every other panel as it is.
/// Without a provider the href carries only this panel.
#[must_use]
pub fn panel_href(ctx: Option<&PanelContext>, panel: &str, value: &str) -> String {
    match ctx {
        Some(ctx) => ctx.href_with(ctx.base_path(), [(panel, Some(value.to_owned()))]),
        None => format!("/?{panel}={}", codec::encode_component(value)),
    }
}

/// Intercept a click on a single-panel link.
pub fn panel_click(ctx: Option<&PanelContext>, panel: &str, value: &str, modifiers: ClickModifiers) -> ClickOutcome {
    if !modifiers.is_plain_left_click() {
        return ClickOutcome::Default;
    }
    let Some(ctx) = ctx else {
        return ClickOutcome::Default;
    };
    match ctx.navigate_panel(panel, value, None) {
        Ok(()) => ClickOutcome::Handled,
        Err(err) => {
            warn!(panel, error = %err, "panel link click not handled");
            ClickOutcome::Default
        }
    }
}

// =============================================================================
// MULTI PANEL
// =============================================================================

/// Target of one panel in a [`SystemLink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkTarget {
    /// A literal panel value, used as-is.
    Path(String),
    /// A `$param` template with optional params and query.
    Route { to: String, params: Option<Params>, search: Option<SearchParams> },
    /// Close the panel.
    Close,
}

impl LinkTarget {
    pub fn route(to: impl Into<String>, params: Option<Params>, search: Option<SearchParams>) -> Self {
        Self::Route { to: to.into(), params, search }
    }

    /// Resolved panel value, `None` for [`LinkTarget::Close`] or an empty value.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::MissingParameter`] for unresolved route templates.
    pub fn resolve(&self) -> Result<Option<String>, PanelError> {
        let value = match self {
            Self::Path(path) => path.clone(),
            Self::Route { to, params, search } => {
                let resolved = codec::resolve_template(to, params.as_ref())?;
                codec::encode_panel_value(&resolved, search.as_ref())
            }
            Self::Close => return Ok(None),
        };
        Ok(Some(value).filter(|v| !v.is_empty()))
    }
}

impl From<&str> for LinkTarget {
    fn from(path: &str) -> Self {
        Self::Path(path.to_owned())
    }
}

/// Link that moves several panels in one navigation.
///
/// Panels without a target keep their current value. Targets naming panels
/// the provider does not know are skipped, so one link definition can be
/// shared between slightly different panel setups.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SystemLink {
    targets: Vec<(String, LinkTarget)>,
}

impl SystemLink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn panel(mut self, name: impl Into<String>, target: impl Into<LinkTarget>) -> Self {
        let name = name.into();
        let target = target.into();
        match self.targets.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = target,
            None => self.targets.push((name, target)),
        }
        self
    }

    #[must_use]
    pub fn close(self, name: impl Into<String>) -> Self {
        self.panel(name, LinkTarget::Close)
    }

    /// Resolved updates for registered panels, in registry order.
    fn updates(&self, ctx: &PanelContext) -> Result<Vec<(String, Option<String>)>, PanelError> {
        for (name, _) in &self.targets {
            if !ctx.query().contains(name) {
                debug!(panel = %name, "system link target ignored: panel not registered");
            }
        }
        let mut updates = Vec::new();
        for name in ctx.query().names() {
            if let Some((_, target)) = self.targets.iter().find(|(n, _)| n == name) {
                updates.push((name.to_owned(), target.resolve()?));
            }
        }
        Ok(updates)
    }

    /// # Errors
    ///
    /// Returns [`PanelError::MissingParameter`] for unresolved route templates.
    pub fn href(&self, ctx: Option<&PanelContext>) -> Result<String, PanelError> {
        let Some(ctx) = ctx else {
            return Ok("/".to_owned());
        };
        let updates = self.updates(ctx)?;
        Ok(ctx.href_with(ctx.base_path(), updates))
    }

    /// # Errors
    ///
    /// Returns [`PanelError::MissingParameter`] for unresolved route templates.
    pub fn click(&self, ctx: Option<&PanelContext>, modifiers: ClickModifiers) -> Result<ClickOutcome, PanelError> {
        if !modifiers.is_plain_left_click() {
            return Ok(ClickOutcome::Default);
        }
        let Some(ctx) = ctx else {
            return Ok(ClickOutcome::Default);
        };
        let updates = self.updates(ctx)?;
        if updates.is_empty() {
            return Ok(ClickOutcome::Handled);
        }
        let updates = updates.into_iter().map(|(name, value)| match value {
            Some(value) => (name, PanelUpdate::Open(value)),
            None => (name, PanelUpdate::Close),
        });
        ctx.coordinator().apply(updates)?;
        Ok(ClickOutcome::Handled)
    }
}

// =============================================================================
// MAIN SITE
// =============================================================================

/// Link that leaves panel mode: a top-level path with every panel closed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MainLink {
    to: String,
    params: Option<Params>,
}

impl MainLink {
    pub fn new(to: impl Into<String>) -> Self {
        Self { to: to.into(), params: None }
    }

    #[must_use]
    pub fn params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }

    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.get_or_insert_with(Params::new).insert(key.into(), value.into());
        self
    }

    /// # Errors
    ///
    /// Returns [`PanelError::MissingParameter`] for unresolved `$param` tokens.
    pub fn path(&self) -> Result<String, PanelError> {
        codec::resolve_template(&self.to, self.params.as_ref())
    }

    /// Href with no panel keys, whatever the current host query holds.
    ///
    /// # Errors
    ///
    /// Same as [`MainLink::path`].
    pub fn href(&self, ctx: Option<&PanelContext>) -> Result<String, PanelError> {
        let path = self.path()?;
        Ok(match ctx {
            Some(ctx) => ctx.coordinator().host().build_href(&path, &ctx.query().cleared()),
            None => path,
        })
    }

    /// # Errors
    ///
    /// Same as [`MainLink::path`].
    pub fn click(&self, ctx: Option<&PanelContext>, modifiers: ClickModifiers) -> Result<ClickOutcome, PanelError> {
        if !modifiers.is_plain_left_click() {
            return Ok(ClickOutcome::Default);
        }
        let Some(ctx) = ctx else {
            return Ok(ClickOutcome::Default);
        };
        ctx.navigate_main(&self.path()?);
        Ok(ClickOutcome::Handled)
    }
}
