//! Runtime configuration.
//!
//! Every configurable subsystem exchanges its settings through a small
//! key/value document rather than direct field access, so the command
//! handlers, the persisted configuration and the diff protocol all speak
//! the same shape. `get_config` exports the subsystem's current values
//! into a document; `set_config` imports from one, touching only the
//! keys present. Both report whether anything actually changed, which is
//! what decides whether the configuration gets rewritten to flash.

pub mod app;
pub mod debug;
pub mod doc;
pub mod net;

pub use app::AppSettings;
pub use debug::DebugSettings;
pub use doc::{Settings, Value, MASKED_SECRET};
pub use net::{LinkSettings, WifiSettings, WIFI_RETRY_LIMIT};

/// A subsystem with externally visible configuration
pub trait Configurable {
    /// Export current values into `doc`. Returns `true` when the export
    /// differs from what `doc` already held for those keys.
    fn get_config(&self, doc: &mut Settings) -> bool;

    /// Import values from `doc`; absent keys keep their current value.
    /// Returns `true` when any stored value changed.
    fn set_config(&mut self, doc: &Settings) -> bool;
}
