//! Core types shared by the extension framework and its backends

mod context;
mod plugin;

use std::sync::Arc;

pub use context::{Configuration, Context, UiModeType, UI_MODE_TYPE_MASK};
pub use plugin::{PluginInstance, PluginInterface, PluginType};

/// Whether two listener handles point at the same listener
///
/// Backends identify subscribers by allocation, so comparing only the data
/// pointer keeps this correct across trait-object vtables.
pub fn same_listener<L: ?Sized>(a: &Arc<L>, b: &Arc<L>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}
