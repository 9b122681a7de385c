//! Device configuration backends
//!
//! - `ConfigurationController` / `ConfigurationListener` traits
//! - `LocalConfigurationController`: in-process broadcaster

mod traits;
mod local;

pub use traits::{ConfigurationController, ConfigurationListener};
pub use local::LocalConfigurationController;
