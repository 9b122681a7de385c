//! Producer backed by a connected plugin

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::resolver::ExtensionInner;
use crate::error::ExtensionResult;
use crate::logging::SharedLogger;
use crate::{log_debug, log_warn};
use crate::plugins::{PluginHost, PluginListener};
use crate::types::{Context, PluginInstance, PluginType};

/// Turns a delivered plugin instance into the extension's value
pub(crate) type PluginConverter<T> = Box<dyn Fn(PluginInstance) -> ExtensionResult<T> + Send + Sync>;

/// Offers a value only while a plugin is connected for `action`
pub(crate) struct PluginItem<T> {
    action: String,
    plugin_type: PluginType,
    converter: PluginConverter<T>,
    item: RwLock<Option<T>>,
    host: Weak<dyn PluginHost>,
    extension: Weak<ExtensionInner<T>>,
    destroyed: AtomicBool,
    logger: SharedLogger,
}

impl<T> PluginItem<T> {
    pub(crate) fn action(&self) -> &str {
        &self.action
    }
}

impl<T: Clone + Send + Sync + 'static> PluginItem<T> {
    pub(crate) fn new(
        action: &str,
        plugin_type: PluginType,
        converter: PluginConverter<T>,
        host: &Arc<dyn PluginHost>,
        extension: Weak<ExtensionInner<T>>,
        logger: SharedLogger,
    ) -> Self {
        Self {
            action: action.to_string(),
            plugin_type,
            converter,
            item: RwLock::new(None),
            host: Arc::downgrade(host),
            extension,
            destroyed: AtomicBool::new(false),
            logger,
        }
    }

    pub(crate) fn get(&self) -> Option<T> {
        self.item.read().clone()
    }

    pub(crate) fn attach(self: &Arc<Self>) {
        let Some(host) = self.host.upgrade() else {
            log_warn!(self.logger, "[PluginItem] Plugin host is gone, {} will never connect", self.action);
            return;
        };
        let listener: Arc<dyn PluginListener> = self.clone();
        if let Err(e) = host.add_plugin_listener(&self.action, listener, self.plugin_type) {
            log_warn!(self.logger, "[PluginItem] Failed to listen for {}: {}", self.action, e);
        }
    }

    pub(crate) fn destroy(self: &Arc<Self>) {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        let Some(host) = self.host.upgrade() else {
            return;
        };
        let listener: Arc<dyn PluginListener> = self.clone();
        if let Err(e) = host.remove_plugin_listener(&listener) {
            log_warn!(self.logger, "[PluginItem] Failed to stop listening for {}: {}", self.action, e);
        }
    }
}

impl<T: Clone + Send + Sync + 'static> PluginListener for PluginItem<T> {
    fn on_plugin_connected(&self, plugin: PluginInstance, context: Context) -> ExtensionResult<()> {
        if self.destroyed.load(Ordering::SeqCst) {
            return Ok(());
        }

        let item = (self.converter)(plugin)?;
        *self.item.write() = Some(item);
        log_debug!(
            self.logger,
            "[PluginItem] Connected {} from {}",
            self.action, context.package_name
        );

        if let Some(extension) = self.extension.upgrade() {
            extension.set_plugin_context(Some(context));
            extension.notify_changed();
        }
        Ok(())
    }

    fn on_plugin_disconnected(&self, _plugin: PluginInstance) {
        if self.destroyed.load(Ordering::SeqCst) {
            return;
        }

        *self.item.write() = None;
        log_debug!(self.logger, "[PluginItem] Disconnected {}", self.action);

        if let Some(extension) = self.extension.upgrade() {
            extension.set_plugin_context(None);
            extension.notify_changed();
        }
    }
}
