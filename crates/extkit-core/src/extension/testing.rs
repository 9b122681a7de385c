//! Shared fixtures for extension tests

use std::sync::Arc;

use parking_lot::Mutex;

use super::controller::{ExtensionController, ExtensionServices};
use crate::configuration::{ConfigurationController, ConfigurationListener, LocalConfigurationController};
use crate::error::{ExtensionError, ExtensionResult};
use crate::logging::MemoryLogger;
use crate::plugins::{LocalPluginHost, PluginHost, PluginListener};
use crate::tuner::{MemoryTunerService, Tunable, TunerService};
use crate::types::{Configuration, Context, PluginType, UiModeType};

pub(crate) const CLOCK_ACTION: &str = "com.example.action.PLUGIN_CLOCK";

/// Controller wired to in-process backends the test can drive
pub(crate) struct Harness {
    pub plugin_host: Arc<LocalPluginHost>,
    pub tuner: Arc<MemoryTunerService>,
    pub configuration: Arc<LocalConfigurationController>,
    pub logger: Arc<MemoryLogger>,
    pub controller: ExtensionController,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_mode(UiModeType::Normal)
    }

    /// Harness whose device (and default context) starts in `mode`
    pub fn with_mode(mode: UiModeType) -> Self {
        let configuration = Configuration::with_ui_mode_type(mode);
        let plugin_host = Arc::new(LocalPluginHost::new());
        let tuner = Arc::new(MemoryTunerService::new());
        let controller_backend = Arc::new(LocalConfigurationController::new(configuration));
        let logger = Arc::new(MemoryLogger::new());

        let services = ExtensionServices::new(plugin_host.clone(), tuner.clone(), controller_backend.clone());
        let controller = ExtensionController::new(
            Context::new("com.example.systemui").with_configuration(configuration),
            services,
        )
        .with_logger(logger.clone());

        Self {
            plugin_host,
            tuner,
            configuration: controller_backend,
            logger,
            controller,
        }
    }
}

/// Callback sink recording every value it is handed
pub(crate) struct Recorder<T> {
    values: Arc<Mutex<Vec<Option<T>>>>,
}

impl<T: Clone + Send + Sync + 'static> Recorder<T> {
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn callback(&self) -> impl Fn(Option<&T>) + Send + Sync + 'static {
        let values = self.values.clone();
        move |value: Option<&T>| values.lock().push(value.cloned())
    }

    pub fn values(&self) -> Vec<Option<T>> {
        self.values.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.values.lock().len()
    }

    pub fn last(&self) -> Option<Option<T>> {
        self.values.lock().last().cloned()
    }
}

/// Backend that accepts every subscription but keeps listeners forever and
/// lets the test fire events directly, ignoring action and type filters
#[derive(Default)]
pub(crate) struct ManualBackend {
    pub plugin_listeners: Mutex<Vec<Arc<dyn PluginListener>>>,
    pub tunables: Mutex<Vec<Arc<dyn Tunable>>>,
    pub config_listeners: Mutex<Vec<Arc<dyn ConfigurationListener>>>,
    /// Backend of each unsubscribe, in call order
    pub removals: Mutex<Vec<&'static str>>,
}

impl ManualBackend {
    pub fn services(self: &Arc<Self>) -> ExtensionServices {
        ExtensionServices::new(self.clone(), self.clone(), self.clone())
    }

    pub fn plugin_listener(&self) -> Arc<dyn PluginListener> {
        self.plugin_listeners.lock()[0].clone()
    }

    pub fn tunable(&self) -> Arc<dyn Tunable> {
        self.tunables.lock()[0].clone()
    }

    pub fn config_listener(&self) -> Arc<dyn ConfigurationListener> {
        self.config_listeners.lock()[0].clone()
    }
}

impl PluginHost for ManualBackend {
    fn add_plugin_listener(&self, _action: &str, listener: Arc<dyn PluginListener>, _plugin_type: PluginType) -> ExtensionResult<()> {
        self.plugin_listeners.lock().push(listener);
        Ok(())
    }

    fn remove_plugin_listener(&self, _listener: &Arc<dyn PluginListener>) -> ExtensionResult<()> {
        self.removals.lock().push("plugin");
        Ok(())
    }
}

impl TunerService for ManualBackend {
    fn add_tunable(&self, tunable: Arc<dyn Tunable>, _keys: &[String]) -> ExtensionResult<()> {
        self.tunables.lock().push(tunable);
        Ok(())
    }

    fn remove_tunable(&self, _tunable: &Arc<dyn Tunable>) -> ExtensionResult<()> {
        self.removals.lock().push("tuner");
        Ok(())
    }
}

impl ConfigurationController for ManualBackend {
    fn add_callback(&self, listener: Arc<dyn ConfigurationListener>) -> ExtensionResult<()> {
        self.config_listeners.lock().push(listener);
        Ok(())
    }

    fn remove_callback(&self, _listener: &Arc<dyn ConfigurationListener>) -> ExtensionResult<()> {
        self.removals.lock().push("configuration");
        Ok(())
    }
}

/// Backend that refuses every subscribe and unsubscribe
pub(crate) struct UnavailableBackend;

impl UnavailableBackend {
    pub fn services() -> ExtensionServices {
        let backend = Arc::new(UnavailableBackend);
        ExtensionServices::new(backend.clone(), backend.clone(), backend)
    }
}

impl PluginHost for UnavailableBackend {
    fn add_plugin_listener(&self, _action: &str, _listener: Arc<dyn PluginListener>, _plugin_type: PluginType) -> ExtensionResult<()> {
        Err(ExtensionError::Unavailable("plugin host".to_string()))
    }

    fn remove_plugin_listener(&self, _listener: &Arc<dyn PluginListener>) -> ExtensionResult<()> {
        Err(ExtensionError::Unavailable("plugin host".to_string()))
    }
}

impl TunerService for UnavailableBackend {
    fn add_tunable(&self, _tunable: Arc<dyn Tunable>, _keys: &[String]) -> ExtensionResult<()> {
        Err(ExtensionError::Unavailable("tuner".to_string()))
    }

    fn remove_tunable(&self, _tunable: &Arc<dyn Tunable>) -> ExtensionResult<()> {
        Err(ExtensionError::Unavailable("tuner".to_string()))
    }
}

impl ConfigurationController for UnavailableBackend {
    fn add_callback(&self, _listener: Arc<dyn ConfigurationListener>) -> ExtensionResult<()> {
        Err(ExtensionError::Unavailable("configuration".to_string()))
    }

    fn remove_callback(&self, _listener: &Arc<dyn ConfigurationListener>) -> ExtensionResult<()> {
        Err(ExtensionError::Unavailable("configuration".to_string()))
    }
}
