//! Configuration controller traits

use std::sync::Arc;

use crate::error::ExtensionResult;
use crate::types::Configuration;

/// Receives device configuration changes
pub trait ConfigurationListener: Send + Sync {
    fn on_config_changed(&self, new_config: &Configuration);
}

/// Broadcasts device configuration changes (UI mode and friends)
///
/// Listeners are identified by their `Arc` allocation.
pub trait ConfigurationController: Send + Sync {
    fn add_callback(&self, listener: Arc<dyn ConfigurationListener>) -> ExtensionResult<()>;

    fn remove_callback(&self, listener: &Arc<dyn ConfigurationListener>) -> ExtensionResult<()>;
}
