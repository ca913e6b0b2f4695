//! URL-synchronized multi-panel navigation.
//!
//! SYSTEM CONTEXT
//! ==============
//! A page shows several independent panels side by side, each with its own
//! in-memory router and back stack. The page address carries one query
//! parameter per open panel, holding that panel's path and query, so any
//! combination of panel states is one shareable link.
//!
//! DESIGN
//! ======
//! - `codec` owns the panel value and `$param` template formats.
//! - `router` is the contract with the navigation engine; `memory` is a
//!   reference engine.
//! - `coordinator` keeps host query and routers in step, in both directions.
//! - `links`, `controls` and `system` are the application-facing surface.
//!
//! UI bindings live in the `panels-client` crate.

pub mod codec;
pub mod config;
pub mod controls;
pub mod coordinator;
pub mod error;
pub mod factory;
pub mod host;
pub mod links;
pub mod log;
pub mod memory;
pub mod panel;
pub mod router;
pub mod system;
pub mod validate;

pub use codec::{Params, SearchParams};
pub use config::{PanelSystemConfig, ReopenPolicy, SystemManifest};
pub use controls::{PanelControl, PanelControls, PanelIdentity, use_current_panel, use_panel};
pub use coordinator::{Coordinator, NavAction, NavigationEvent, PanelContext, PanelUpdate};
pub use error::PanelError;
pub use factory::{PendingOptions, PendingState};
pub use host::{HostLocation, MemoryHost};
pub use links::{ClickModifiers, ClickOutcome, LinkTarget, MainLink, PanelLink, SystemLink};
pub use log::NavigationLog;
pub use memory::{MemoryRouter, RouteTable};
pub use panel::Panel;
pub use router::{PanelLocation, PanelRouter, RouteMatch, RouteTree, RouterHandle};
pub use system::{PanelSystem, PanelSystemBuilder};
pub use validate::PanelQuery;
