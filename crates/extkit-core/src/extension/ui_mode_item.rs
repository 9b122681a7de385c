//! Producer gated on the device UI mode

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use super::default_item::Supplier;
use super::resolver::ExtensionInner;
use crate::configuration::{ConfigurationController, ConfigurationListener};
use crate::logging::SharedLogger;
use crate::{log_debug, log_warn};
use crate::types::{Configuration, UiModeType};

/// Offers the supplier's value only while the device is in `desired` mode
pub(crate) struct UiModeItem<T> {
    desired: UiModeType,
    supplier: Supplier<T>,
    ui_mode: RwLock<UiModeType>,
    controller: Weak<dyn ConfigurationController>,
    extension: Weak<ExtensionInner<T>>,
    destroyed: AtomicBool,
    logger: SharedLogger,
}

impl<T> UiModeItem<T> {
    pub(crate) fn desired(&self) -> UiModeType {
        self.desired
    }
}

impl<T: Clone + Send + Sync + 'static> UiModeItem<T> {
    pub(crate) fn new(
        desired: UiModeType,
        supplier: Supplier<T>,
        current: UiModeType,
        controller: &Arc<dyn ConfigurationController>,
        extension: Weak<ExtensionInner<T>>,
        logger: SharedLogger,
    ) -> Self {
        Self {
            desired,
            supplier,
            ui_mode: RwLock::new(current),
            controller: Arc::downgrade(controller),
            extension,
            destroyed: AtomicBool::new(false),
            logger,
        }
    }

    pub(crate) fn get(&self) -> Option<T> {
        let matches = *self.ui_mode.read() == self.desired;
        matches.then(|| (self.supplier)())
    }

    pub(crate) fn attach(self: &Arc<Self>) {
        let Some(controller) = self.controller.upgrade() else {
            self.logger.warn("[UiModeItem] Configuration controller is gone, mode changes will not be seen");
            return;
        };
        let listener: Arc<dyn ConfigurationListener> = self.clone();
        if let Err(e) = controller.add_callback(listener) {
            log_warn!(self.logger, "[UiModeItem] Failed to listen for configuration changes: {}", e);
        }
    }

    pub(crate) fn destroy(self: &Arc<Self>) {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        let Some(controller) = self.controller.upgrade() else {
            return;
        };
        let listener: Arc<dyn ConfigurationListener> = self.clone();
        if let Err(e) = controller.remove_callback(&listener) {
            log_warn!(self.logger, "[UiModeItem] Failed to stop listening for configuration changes: {}", e);
        }
    }
}

impl<T: Clone + Send + Sync + 'static> ConfigurationListener for UiModeItem<T> {
    fn on_config_changed(&self, new_config: &Configuration) {
        if self.destroyed.load(Ordering::SeqCst) {
            return;
        }

        let new_mode = new_config.ui_mode_type();
        let (was_active, is_active) = {
            let mut ui_mode = self.ui_mode.write();
            let was_active = *ui_mode == self.desired;
            *ui_mode = new_mode;
            (was_active, new_mode == self.desired)
        };

        // Only a flip between active and inactive can change the resolved value
        if was_active != is_active {
            log_debug!(
                self.logger,
                "[UiModeItem] Mode {} is now {} for {}",
                new_mode,
                if is_active { "active" } else { "inactive" },
                self.desired
            );
            if let Some(extension) = self.extension.upgrade() {
                extension.notify_changed();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::extension::testing::{Harness, ManualBackend, Recorder};
    use crate::extension::ExtensionController;
    use crate::types::{Configuration, Context, UiModeType};
    use std::sync::Arc;

    #[test]
    fn test_value_offered_only_in_desired_mode() {
        let h = Harness::with_mode(UiModeType::Normal);
        let ext = h
            .controller
            .new_extension::<String>()
            .with_ui_mode(UiModeType::Car, || "car".to_string())
            .build();
        assert_eq!(ext.get(), None);

        h.configuration.set_ui_mode_type(UiModeType::Car);
        assert_eq!(ext.get().as_deref(), Some("car"));

        h.configuration.set_ui_mode_type(UiModeType::Normal);
        assert_eq!(ext.get(), None);
    }

    #[test]
    fn test_starting_mode_comes_from_default_context() {
        let h = Harness::with_mode(UiModeType::Car);
        let ext = h
            .controller
            .new_extension::<String>()
            .with_ui_mode(UiModeType::Car, || "car".to_string())
            .with_default(|| "stock".to_string())
            .build();
        assert_eq!(ext.get().as_deref(), Some("car"));
    }

    #[test]
    fn test_notifies_only_when_match_flips() {
        let h = Harness::with_mode(UiModeType::Normal);
        let recorder = Recorder::new();
        let _ext = h
            .controller
            .new_extension::<String>()
            .with_ui_mode(UiModeType::Car, || "car".to_string())
            .with_default(|| "stock".to_string())
            .with_callback(recorder.callback())
            .build();
        assert_eq!(recorder.count(), 1);

        h.configuration.set_ui_mode_type(UiModeType::Desk);
        assert_eq!(recorder.count(), 1);

        h.configuration.set_ui_mode_type(UiModeType::Car);
        h.configuration.set_ui_mode_type(UiModeType::Car);
        assert_eq!(recorder.count(), 2);

        h.configuration.set_ui_mode_type(UiModeType::Normal);
        assert_eq!(
            recorder.values(),
            vec![Some("stock".to_string()), Some("car".to_string()), Some("stock".to_string())]
        );
    }

    #[test]
    fn test_night_bits_are_ignored() {
        let backend = Arc::new(ManualBackend::default());
        let controller = ExtensionController::new(Context::new("com.example.systemui"), backend.services());
        let ext = controller
            .new_extension::<String>()
            .with_ui_mode(UiModeType::Car, || "car".to_string())
            .build();

        // Night mode "yes" in the upper bits, car in the type bits
        backend.config_listener().on_config_changed(&Configuration::new(0x23));
        assert_eq!(ext.get().as_deref(), Some("car"));
    }

    #[test]
    fn test_late_config_change_after_destroy_is_ignored() {
        let backend = Arc::new(ManualBackend::default());
        let controller = ExtensionController::new(Context::new("com.example.systemui"), backend.services());
        let recorder = Recorder::new();
        let ext = controller
            .new_extension::<String>()
            .with_ui_mode(UiModeType::Television, || "tv".to_string())
            .with_callback(recorder.callback())
            .build();
        let listener = backend.config_listener();

        ext.destroy();
        listener.on_config_changed(&Configuration::with_ui_mode_type(UiModeType::Television));

        assert_eq!(ext.get(), None);
        assert_eq!(recorder.count(), 1);
    }
}
