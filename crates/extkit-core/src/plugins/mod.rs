//! Plugin backends
//!
//! - `PluginHost` / `PluginListener` traits for plugging in a real plugin manager
//! - `LocalPluginHost`: in-process host for embedding and tests

mod traits;
mod local;

pub use traits::{PluginHost, PluginListener};
pub use local::LocalPluginHost;
