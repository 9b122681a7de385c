//! Plugin host traits

use std::sync::Arc;

use crate::error::ExtensionResult;
use crate::types::{Context, PluginInstance, PluginType};

/// Receives connect/disconnect events for one action
pub trait PluginListener: Send + Sync {
    /// A plugin matching the listener's action and type became available
    ///
    /// Returning an error tells the host the instance could not be used.
    fn on_plugin_connected(&self, plugin: PluginInstance, context: Context) -> ExtensionResult<()>;

    /// The previously connected plugin went away
    fn on_plugin_disconnected(&self, plugin: PluginInstance);
}

/// Source of plugins, keyed by action
///
/// Listeners are identified by their `Arc` allocation: pass the same handle
/// to `remove_plugin_listener` that was given to `add_plugin_listener`.
pub trait PluginHost: Send + Sync {
    /// Start delivering plugins for `action` whose concrete type is `plugin_type`
    fn add_plugin_listener(
        &self,
        action: &str,
        listener: Arc<dyn PluginListener>,
        plugin_type: PluginType,
    ) -> ExtensionResult<()>;

    /// Stop delivering events to `listener`
    fn remove_plugin_listener(&self, listener: &Arc<dyn PluginListener>) -> ExtensionResult<()>;
}
