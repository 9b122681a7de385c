//! Builder that stages producers and callbacks for a new extension

use std::any::Any;
use std::sync::Arc;

use super::controller::ExtensionServices;
use super::default_item::DefaultItem;
use super::plugin_item::{PluginConverter, PluginItem};
use super::producer::Producer;
use super::resolver::{Extension, ExtensionInner};
use super::tuner_item::TunerItem;
use super::ui_mode_item::UiModeItem;
use crate::error::ExtensionError;
use crate::logging::SharedLogger;
use crate::log_debug;
use crate::tuner::{FnTunerFactory, TunerFactory, TunerSettings};
use crate::types::{Context, PluginInstance, PluginInterface, PluginType, UiModeType};

/// Stages producers and callbacks; consumed by [`build`](Self::build)
///
/// Producers may be added in any order; `build()` sorts them by
/// [`SortOrder`](super::SortOrder). Nothing subscribes to a backend until
/// `build()` runs.
pub struct ExtensionBuilder<T> {
    extension: Arc<ExtensionInner<T>>,
    producers: Vec<Producer<T>>,
    services: ExtensionServices,
    default_mode: UiModeType,
    logger: SharedLogger,
}

impl<T: Clone + Send + Sync + 'static> ExtensionBuilder<T> {
    pub(crate) fn new(default_context: Context, services: ExtensionServices, logger: SharedLogger) -> Self {
        let default_mode = default_context.configuration.ui_mode_type();
        Self {
            extension: Arc::new(ExtensionInner::new(default_context, logger.clone())),
            producers: Vec::new(),
            services,
            default_mode,
            logger,
        }
    }

    /// Fallback value, always present
    pub fn with_default<F>(mut self, supplier: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.producers.push(Producer::Default(DefaultItem::new(Box::new(supplier))));
        self
    }

    /// Value offered only while the device UI mode type is `ui_mode`
    ///
    /// The starting mode is taken from the default context's configuration.
    pub fn with_ui_mode<F>(mut self, ui_mode: UiModeType, supplier: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        let item = UiModeItem::new(
            ui_mode,
            Box::new(supplier),
            self.default_mode,
            &self.services.configuration,
            Arc::downgrade(&self.extension),
            self.logger.clone(),
        );
        self.producers.push(Producer::UiMode(Arc::new(item)));
        self
    }

    /// Value built by `factory` from the tuner settings for `keys`
    ///
    /// The factory sees every key it has been told about so far, not just
    /// the one that changed. Return `None` to defer to lower-priority sources.
    pub fn with_tuner<I, S, F>(self, keys: I, factory: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&TunerSettings) -> Option<T> + Send + Sync + 'static,
    {
        self.with_tuner_factory(FnTunerFactory::new(keys, factory))
    }

    /// Value built by a [`TunerFactory`]
    pub fn with_tuner_factory<F>(mut self, factory: F) -> Self
    where
        F: TunerFactory<T> + 'static,
    {
        let item = TunerItem::new(
            Box::new(factory),
            &self.services.tuner,
            Arc::downgrade(&self.extension),
            self.logger.clone(),
        );
        self.producers.push(Producer::Tuner(Arc::new(item)));
        self
    }

    /// Value from a connected plugin of type `P`, routed by `P::ACTION`
    pub fn with_plugin<P>(self) -> Self
    where
        P: PluginInterface + Clone + Into<T>,
    {
        self.with_plugin_action::<P>(P::ACTION)
    }

    /// Value from a connected plugin of type `P` for `action`
    pub fn with_plugin_action<P>(self, action: &str) -> Self
    where
        P: Any + Send + Sync + Clone + Into<T>,
    {
        self.with_plugin_converter::<P, _>(action, |plugin: Arc<P>| P::clone(&plugin).into())
    }

    /// Value computed by `converter` from a connected plugin of type `P` for `action`
    ///
    /// A plugin whose concrete type is not `P` is rejected back to the host
    /// with [`ExtensionError::PluginTypeMismatch`].
    pub fn with_plugin_converter<P, F>(mut self, action: &str, converter: F) -> Self
    where
        P: Any + Send + Sync,
        F: Fn(Arc<P>) -> T + Send + Sync + 'static,
    {
        let plugin_type = PluginType::of::<P>();
        let owned_action = action.to_string();
        let convert: PluginConverter<T> = Box::new(move |instance: PluginInstance| {
            instance
                .downcast::<P>()
                .map(&converter)
                .map_err(|_| ExtensionError::plugin_type_mismatch(owned_action.clone(), plugin_type.type_name()))
        });

        let item = PluginItem::new(
            action,
            plugin_type,
            convert,
            &self.services.plugin_host,
            Arc::downgrade(&self.extension),
            self.logger.clone(),
        );
        self.producers.push(Producer::Plugin(Arc::new(item)));
        self
    }

    /// Callback invoked with the resolved value after every recompute
    ///
    /// During `build()` the callback also sees one recompute per event a
    /// backend delivers while subscribing (an already connected plugin, the
    /// current value of each tuner key), followed by the final initial
    /// resolution.
    pub fn with_callback<F>(self, callback: F) -> Self
    where
        F: Fn(Option<&T>) + Send + Sync + 'static,
    {
        self.extension.add_callback(Arc::new(callback));
        self
    }

    /// Sort producers by priority, subscribe them, and resolve once
    pub fn build(self) -> Extension<T> {
        let ExtensionBuilder {
            extension,
            mut producers,
            logger,
            ..
        } = self;

        producers.sort_by_key(|p| p.sort_order());
        let count = producers.len();
        if !extension.install(producers) {
            logger.error("[ExtensionBuilder] Producers were already installed");
        }

        // Subscribe only once the full sorted list is in place, so an event
        // delivered during subscription already resolves against it
        for producer in extension.producers() {
            producer.attach();
        }
        extension.notify_changed();

        log_debug!(logger, "[ExtensionBuilder] Built extension with {} producers", count);
        Extension::from_inner(extension)
    }
}
