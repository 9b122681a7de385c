//! In-process plugin host

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::traits::{PluginHost, PluginListener};
use crate::error::{ExtensionError, ExtensionResult};
use crate::logging::{NoOpLogger, SharedLogger};
use crate::log_warn;
use crate::types::{same_listener, Context, PluginInstance, PluginType};

struct ListenerEntry {
    action: String,
    plugin_type: PluginType,
    listener: Arc<dyn PluginListener>,
}

#[derive(Clone)]
struct ConnectedPlugin {
    instance: PluginInstance,
    context: Context,
}

/// A plugin host that keeps connected plugins in memory
///
/// At most one plugin is connected per action. Connecting a new plugin for
/// an action first disconnects the old one. A listener added while a
/// matching plugin is connected receives the connect event immediately.
/// Instances are only delivered to listeners whose [`PluginType`] matches.
///
/// No lock is held while listeners run, so a listener may add or remove
/// listeners from inside a callback.
///
/// # Example
///
/// ```
/// use extkit_core::{Context, LocalPluginHost};
///
/// let host = LocalPluginHost::new();
/// host.connect_plugin("com.example.action.CLOCK", String::from("analog"), Context::new("com.example.clock")).unwrap();
/// assert!(host.is_connected("com.example.action.CLOCK"));
/// ```
pub struct LocalPluginHost {
    listeners: RwLock<Vec<ListenerEntry>>,
    plugins: RwLock<HashMap<String, ConnectedPlugin>>,
    logger: SharedLogger,
}

impl Default for LocalPluginHost {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalPluginHost {
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
            plugins: RwLock::new(HashMap::new()),
            logger: Arc::new(NoOpLogger),
        }
    }

    /// Set the logger used for delivery failures
    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Connect `plugin` for `action`, wrapping it as a [`PluginInstance`]
    pub fn connect_plugin<P: Any + Send + Sync>(
        &self,
        action: &str,
        plugin: P,
        context: Context,
    ) -> ExtensionResult<()> {
        self.connect(action, Arc::new(plugin), context)
    }

    /// Connect `instance` for `action` and notify matching listeners
    ///
    /// Every matching listener is notified even if an earlier one fails;
    /// the first failure is returned.
    pub fn connect(&self, action: &str, instance: PluginInstance, context: Context) -> ExtensionResult<()> {
        self.disconnect(action);

        self.plugins.write().insert(
            action.to_string(),
            ConnectedPlugin {
                instance: instance.clone(),
                context: context.clone(),
            },
        );

        let targets = self.matching_listeners(action, &instance);
        let mut first_error = None;
        for listener in targets {
            if let Err(e) = listener.on_plugin_connected(instance.clone(), context.clone()) {
                log_warn!(self.logger, "[LocalPluginHost] Listener rejected plugin for {}: {}", action, e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Disconnect the plugin for `action`, if any
    ///
    /// Returns `true` if a plugin was connected.
    pub fn disconnect(&self, action: &str) -> bool {
        let removed = self.plugins.write().remove(action);
        let Some(plugin) = removed else {
            return false;
        };

        for listener in self.matching_listeners(action, &plugin.instance) {
            listener.on_plugin_disconnected(plugin.instance.clone());
        }
        true
    }

    /// Whether a plugin is connected for `action`
    pub fn is_connected(&self, action: &str) -> bool {
        self.plugins.read().contains_key(action)
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }

    fn matching_listeners(&self, action: &str, instance: &PluginInstance) -> Vec<Arc<dyn PluginListener>> {
        self.listeners
            .read()
            .iter()
            .filter(|entry| entry.action == action && entry.plugin_type.matches(instance))
            .map(|entry| entry.listener.clone())
            .collect()
    }
}

impl PluginHost for LocalPluginHost {
    fn add_plugin_listener(
        &self,
        action: &str,
        listener: Arc<dyn PluginListener>,
        plugin_type: PluginType,
    ) -> ExtensionResult<()> {
        self.listeners.write().push(ListenerEntry {
            action: action.to_string(),
            plugin_type,
            listener: listener.clone(),
        });

        let connected = self.plugins.read().get(action).cloned();
        match connected {
            Some(plugin) if plugin_type.matches(&plugin.instance) => {
                listener.on_plugin_connected(plugin.instance, plugin.context)
            }
            _ => Ok(()),
        }
    }

    fn remove_plugin_listener(&self, listener: &Arc<dyn PluginListener>) -> ExtensionResult<()> {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|entry| !same_listener(&entry.listener, listener));

        if listeners.len() == before {
            Err(ExtensionError::not_subscribed("plugin host"))
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for LocalPluginHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalPluginHost")
            .field("listeners", &self.listeners.read().len())
            .field("connected", &self.plugins.read().keys().cloned().collect::<Vec<_>>())
            .finish()
    }
}
