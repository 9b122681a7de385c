//! In-process configuration controller

use std::sync::Arc;

use parking_lot::RwLock;

use super::traits::{ConfigurationController, ConfigurationListener};
use crate::error::{ExtensionError, ExtensionResult};
use crate::types::{same_listener, Configuration, UiModeType};

/// Holds the current device configuration and broadcasts every change
///
/// Every call to `set_configuration` is broadcast, whether or not the
/// configuration actually differs; listeners filter what they care about.
#[derive(Default)]
pub struct LocalConfigurationController {
    configuration: RwLock<Configuration>,
    listeners: RwLock<Vec<Arc<dyn ConfigurationListener>>>,
}

impl LocalConfigurationController {
    pub fn new(initial: Configuration) -> Self {
        Self {
            configuration: RwLock::new(initial),
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn configuration(&self) -> Configuration {
        *self.configuration.read()
    }

    /// Store `configuration` and broadcast it
    pub fn set_configuration(&self, configuration: Configuration) {
        *self.configuration.write() = configuration;

        let listeners = self.listeners.read().clone();
        for listener in listeners {
            listener.on_config_changed(&configuration);
        }
    }

    /// Replace only the UI mode type bits and broadcast
    pub fn set_ui_mode_type(&self, mode: UiModeType) {
        let current = self.configuration();
        let ui_mode = (current.ui_mode & !crate::types::UI_MODE_TYPE_MASK) | mode.as_raw();
        self.set_configuration(Configuration::new(ui_mode));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.read().len()
    }
}

impl ConfigurationController for LocalConfigurationController {
    fn add_callback(&self, listener: Arc<dyn ConfigurationListener>) -> ExtensionResult<()> {
        self.listeners.write().push(listener);
        Ok(())
    }

    fn remove_callback(&self, listener: &Arc<dyn ConfigurationListener>) -> ExtensionResult<()> {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|l| !same_listener(l, listener));

        if listeners.len() == before {
            Err(ExtensionError::not_subscribed("configuration controller"))
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for LocalConfigurationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalConfigurationController")
            .field("configuration", &*self.configuration.read())
            .field("listeners", &self.listeners.read().len())
            .finish()
    }
}
