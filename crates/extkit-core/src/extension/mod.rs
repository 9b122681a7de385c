//! Extension resolution
//!
//! An `ExtensionController` hands out `ExtensionBuilder`s. Each builder
//! stages producers (plugin, tuner, UI mode, default) and callbacks, then
//! `build()` yields an `Extension` that keeps the highest-priority value
//! current as backends change.

mod controller;
mod builder;
mod resolver;
mod producer;
mod default_item;
mod ui_mode_item;
mod tuner_item;
mod plugin_item;

#[cfg(test)]
mod testing;

pub use controller::{ExtensionController, ExtensionServices};
pub use builder::ExtensionBuilder;
pub use resolver::{Extension, ExtensionCallback};
pub use producer::SortOrder;
