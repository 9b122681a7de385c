//! The extension: priority resolution and change broadcast

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;

use super::producer::{Producer, SortOrder};
use crate::logging::SharedLogger;
use crate::log_debug;
use crate::types::Context;

/// Callback invoked with the resolved value after every recompute
pub type ExtensionCallback<T> = Arc<dyn Fn(Option<&T>) + Send + Sync>;

/// Shared state behind an [`Extension`]; producers hold a weak reference to it
pub(crate) struct ExtensionInner<T> {
    /// Set exactly once by `build()`, already in priority order
    producers: OnceCell<Vec<Producer<T>>>,
    callbacks: RwLock<Vec<ExtensionCallback<T>>>,
    current: RwLock<Option<T>>,
    plugin_context: RwLock<Option<Context>>,
    default_context: Context,
    destroyed: AtomicBool,
    logger: SharedLogger,
}

impl<T: Clone + Send + Sync + 'static> ExtensionInner<T> {
    pub(crate) fn new(default_context: Context, logger: SharedLogger) -> Self {
        Self {
            producers: OnceCell::new(),
            callbacks: RwLock::new(Vec::new()),
            current: RwLock::new(None),
            plugin_context: RwLock::new(None),
            default_context,
            destroyed: AtomicBool::new(false),
            logger,
        }
    }

    /// Install the sorted producer list. Returns `false` if one was already installed.
    pub(crate) fn install(&self, producers: Vec<Producer<T>>) -> bool {
        self.producers.set(producers).is_ok()
    }

    pub(crate) fn producers(&self) -> &[Producer<T>] {
        self.producers.get().map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn add_callback(&self, callback: ExtensionCallback<T>) {
        self.callbacks.write().push(callback);
    }

    pub(crate) fn set_plugin_context(&self, context: Option<Context>) {
        *self.plugin_context.write() = context;
    }

    pub(crate) fn logger(&self) -> &SharedLogger {
        &self.logger
    }

    /// Recompute the effective value and hand it to every callback
    ///
    /// Always notifies, even when the value is unchanged. No lock is held
    /// while producers' suppliers or callbacks run.
    pub(crate) fn notify_changed(&self) {
        let item = self.producers().iter().find_map(|producer| producer.get());
        *self.current.write() = item.clone();

        let callbacks = self.callbacks.read().clone();
        for callback in &callbacks {
            callback(item.as_ref());
        }
    }
}

/// The current value of capability `T`, resolved across competing producers
///
/// Producers are consulted in [`SortOrder`]; the first one that has a value
/// wins. Every change reported by any producer recomputes the value and
/// invokes every callback, in registration order.
///
/// Handles are cheap to clone and all refer to the same extension.
///
/// Backends keep their subscriptions until [`destroy`](Self::destroy) is
/// called. Dropping every handle without it stops notifications but leaves
/// the producers registered with their backends.
pub struct Extension<T> {
    inner: Arc<ExtensionInner<T>>,
}

impl<T: Clone + Send + Sync + 'static> Extension<T> {
    pub(crate) fn from_inner(inner: Arc<ExtensionInner<T>>) -> Self {
        Self { inner }
    }

    /// The last resolved value. Does not recompute.
    pub fn get(&self) -> Option<T> {
        self.inner.current.read().clone()
    }

    /// Context of the connected plugin, or the default context
    pub fn context(&self) -> Context {
        self.inner
            .plugin_context
            .read()
            .clone()
            .unwrap_or_else(|| self.inner.default_context.clone())
    }

    /// Register another callback
    ///
    /// It is first invoked on the next recompute, not with the current value.
    pub fn add_callback<F>(&self, callback: F)
    where
        F: Fn(Option<&T>) + Send + Sync + 'static,
    {
        self.inner.add_callback(Arc::new(callback));
    }

    /// Unsubscribe every producer from its backend, in priority order
    ///
    /// The last value stays readable through `get()`. Calling this more than
    /// once does nothing.
    pub fn destroy(&self) {
        if self.inner.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }

        let producers = self.inner.producers();
        for producer in producers {
            producer.destroy();
        }
        log_debug!(self.inner.logger(), "[Extension] Destroyed {} producers", producers.len());
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.load(Ordering::SeqCst)
    }

    /// Producer kinds in the order they are consulted
    pub fn sort_orders(&self) -> Vec<SortOrder> {
        self.inner.producers().iter().map(|p| p.sort_order()).collect()
    }
}

impl<T> Clone for Extension<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Extension<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extension")
            .field("producers", &self.inner.producers.get())
            .field("callbacks", &self.inner.callbacks.read().len())
            .field("destroyed", &self.inner.destroyed.load(Ordering::SeqCst))
            .finish()
    }
}
