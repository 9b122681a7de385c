//! Extension controller: the entry point that creates extension builders

use std::sync::Arc;

use super::builder::ExtensionBuilder;
use crate::configuration::ConfigurationController;
use crate::logging::{NoOpLogger, SharedLogger};
use crate::plugins::PluginHost;
use crate::tuner::TunerService;
use crate::types::Context;

/// The backends extensions subscribe to
#[derive(Clone)]
pub struct ExtensionServices {
    pub plugin_host: Arc<dyn PluginHost>,
    pub tuner: Arc<dyn TunerService>,
    pub configuration: Arc<dyn ConfigurationController>,
}

impl ExtensionServices {
    pub fn new(
        plugin_host: Arc<dyn PluginHost>,
        tuner: Arc<dyn TunerService>,
        configuration: Arc<dyn ConfigurationController>,
    ) -> Self {
        Self {
            plugin_host,
            tuner,
            configuration,
        }
    }
}

impl std::fmt::Debug for ExtensionServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionServices").finish_non_exhaustive()
    }
}

/// Creates extensions wired to one set of backends
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use extkit_core::{
///     Context, ExtensionController, ExtensionServices, LocalConfigurationController,
///     LocalPluginHost, MemoryTunerService,
/// };
///
/// let tuner = Arc::new(MemoryTunerService::new());
/// let services = ExtensionServices::new(
///     Arc::new(LocalPluginHost::new()),
///     tuner.clone(),
///     Arc::new(LocalConfigurationController::default()),
/// );
/// let controller = ExtensionController::new(Context::new("com.example.ui"), services);
///
/// let layout = controller
///     .new_extension::<String>()
///     .with_tuner(["sysui_nav_bar"], |s| s.get("sysui_nav_bar").map(str::to_string))
///     .with_default(|| "back;home;recent".to_string())
///     .build();
/// assert_eq!(layout.get().as_deref(), Some("back;home;recent"));
///
/// tuner.set_value("sysui_nav_bar", "home;back");
/// assert_eq!(layout.get().as_deref(), Some("home;back"));
/// layout.destroy();
/// ```
pub struct ExtensionController {
    default_context: Context,
    services: ExtensionServices,
    logger: SharedLogger,
}

impl ExtensionController {
    pub fn new(default_context: Context, services: ExtensionServices) -> Self {
        Self {
            default_context,
            services,
            logger: Arc::new(NoOpLogger),
        }
    }

    /// Set the logger handed to every extension this controller creates
    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Context extensions report when no plugin is connected
    pub fn default_context(&self) -> &Context {
        &self.default_context
    }

    pub fn services(&self) -> &ExtensionServices {
        &self.services
    }

    /// Start building an extension for capability `T`
    pub fn new_extension<T>(&self) -> ExtensionBuilder<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        ExtensionBuilder::new(self.default_context.clone(), self.services.clone(), self.logger.clone())
    }
}

impl std::fmt::Debug for ExtensionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionController")
            .field("default_context", &self.default_context)
            .finish_non_exhaustive()
    }
}
