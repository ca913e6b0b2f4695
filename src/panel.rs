//! Panel definition: name, route tree and default path bound together.

use std::fmt;
use std::sync::Arc;

use crate::controls::PanelControl;
use crate::coordinator::PanelContext;
use crate::error::PanelError;
use crate::factory::{PendingOptions, RouterFactory};
use crate::links::PanelLink;
use crate::router::RouteTree;

#[derive(Clone)]
struct PanelDef {
    name: String,
    tree: Arc<dyn RouteTree>,
    default_path: String,
    pending: Option<PendingOptions>,
}

/// Immutable panel registration. Cheap to clone.
#[derive(Clone)]
pub struct Panel {
    inner: Arc<PanelDef>,
}

impl Panel {
    pub fn new(name: impl Into<String>, tree: Arc<dyn RouteTree>, default_path: impl Into<String>) -> Self {
        let def = PanelDef { name: name.into(), tree, default_path: default_path.into(), pending: None };
        Self { inner: Arc::new(def) }
    }

    /// Show a pending placeholder only for transitions slower than `pending`.
    #[must_use]
    pub fn with_pending(self, pending: PendingOptions) -> Self {
        let mut def = Arc::unwrap_or_clone(self.inner);
        def.pending = Some(pending);
        Self { inner: Arc::new(def) }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    #[must_use]
    pub fn default_path(&self) -> &str {
        &self.inner.default_path
    }

    #[must_use]
    pub fn pending(&self) -> Option<PendingOptions> {
        self.inner.pending
    }

    /// A fresh memoized router factory seeded with the default path.
    ///
    /// The coordinator calls this once per panel; every router of this panel
    /// comes out of that one factory.
    #[must_use]
    pub fn router_factory(&self) -> RouterFactory {
        RouterFactory::new(self.inner.tree.clone(), self.inner.default_path.clone(), self.inner.pending)
    }

    /// Link scoped to this panel.
    #[must_use]
    pub fn link(&self, to: impl Into<String>) -> PanelLink {
        PanelLink::new(self.name(), to)
    }

    /// Navigation controls scoped to this panel.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::NotRegistered`] without a provider context and
    /// [`PanelError::UnknownPanel`] when the provider does not know this panel.
    pub fn nav(&self, ctx: Option<&PanelContext>) -> Result<PanelControl, PanelError> {
        let ctx = ctx.ok_or(PanelError::NotRegistered { hook: "Panel::nav", within: "a panel provider" })?;
        ctx.controls().get(self.name()).cloned().ok_or_else(|| PanelError::UnknownPanel(self.name().to_owned()))
    }
}

impl fmt::Debug for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panel")
            .field("name", &self.inner.name)
            .field("default_path", &self.inner.default_path)
            .field("pending", &self.inner.pending)
            .finish_non_exhaustive()
    }
}
