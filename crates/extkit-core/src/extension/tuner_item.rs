//! Producer built from tuner settings

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};

use super::resolver::ExtensionInner;
use crate::logging::SharedLogger;
use crate::log_warn;
use crate::tuner::{Tunable, TunerFactory, TunerService, TunerSettings};

/// Regenerates its value from every setting seen so far on each key update
pub(crate) struct TunerItem<T> {
    factory: Box<dyn TunerFactory<T>>,
    keys: Vec<String>,
    settings: Mutex<TunerSettings>,
    item: RwLock<Option<T>>,
    tuner: Weak<dyn TunerService>,
    extension: Weak<ExtensionInner<T>>,
    destroyed: AtomicBool,
    logger: SharedLogger,
}

impl<T> TunerItem<T> {
    pub(crate) fn keys(&self) -> &[String] {
        &self.keys
    }
}

impl<T: Clone + Send + Sync + 'static> TunerItem<T> {
    pub(crate) fn new(
        factory: Box<dyn TunerFactory<T>>,
        tuner: &Arc<dyn TunerService>,
        extension: Weak<ExtensionInner<T>>,
        logger: SharedLogger,
    ) -> Self {
        let keys = factory.keys();
        Self {
            factory,
            keys,
            settings: Mutex::new(TunerSettings::new()),
            item: RwLock::new(None),
            tuner: Arc::downgrade(tuner),
            extension,
            destroyed: AtomicBool::new(false),
            logger,
        }
    }

    pub(crate) fn get(&self) -> Option<T> {
        self.item.read().clone()
    }

    pub(crate) fn attach(self: &Arc<Self>) {
        let Some(tuner) = self.tuner.upgrade() else {
            self.logger.warn("[TunerItem] Tuner service is gone, settings will not be seen");
            return;
        };
        let tunable: Arc<dyn Tunable> = self.clone();
        if let Err(e) = tuner.add_tunable(tunable, &self.keys) {
            log_warn!(self.logger, "[TunerItem] Failed to listen for {:?}: {}", self.keys, e);
        }
    }

    pub(crate) fn destroy(self: &Arc<Self>) {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        let Some(tuner) = self.tuner.upgrade() else {
            return;
        };
        let tunable: Arc<dyn Tunable> = self.clone();
        if let Err(e) = tuner.remove_tunable(&tunable) {
            log_warn!(self.logger, "[TunerItem] Failed to stop listening for {:?}: {}", self.keys, e);
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Tunable for TunerItem<T> {
    fn on_tuning_changed(&self, key: &str, new_value: Option<&str>) {
        if self.destroyed.load(Ordering::SeqCst) {
            return;
        }

        let settings = {
            let mut settings = self.settings.lock();
            settings.insert(key, new_value.map(str::to_string));
            settings.clone()
        };
        let item = self.factory.create(&settings);
        *self.item.write() = item;

        if let Some(extension) = self.extension.upgrade() {
            extension.notify_changed();
        }
    }
}
