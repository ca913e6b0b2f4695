//! Error taxonomy for the panel coordination core.
//!
//! Everything the delegated navigation engine can fail on (unmatched sub-path,
//! failed loader) stays with the engine. These variants cover programmer
//! errors at the coordination boundary only.

/// Error returned by panel codec, coordinator and hook entry points.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PanelError {
    /// A `$name` token in a path template has no matching entry in the params.
    #[error("missing param \"{key}\" for path \"{template}\"; got params: {supplied}")]
    MissingParameter {
        key: String,
        template: String,
        /// JSON rendering of the params that were supplied (`{}` when none).
        supplied: String,
    },
    /// A hook was called outside the scope that provides its context.
    #[error("{hook} must be used within {within}")]
    NotRegistered { hook: &'static str, within: &'static str },
    /// A coordinator call named a panel that is not in the registry.
    #[error("unknown panel \"{0}\"")]
    UnknownPanel(String),
    /// Two registrations share one panel name.
    #[error("duplicate panel name \"{0}\"")]
    DuplicatePanel(String),
    /// Invalid system configuration or manifest.
    #[error("invalid panel configuration: {0}")]
    Config(String),
}
