//! extkit Core
//!
//! Reactive extension resolution.
//! An [`Extension`] hands a UI component "the current instance of capability `T`",
//! taken from whichever of several competing backends is active right now, and
//! re-resolves it every time one of those backends changes.
//!
//! ## Sources
//!
//! Producers are consulted in a fixed priority order (lowest rank wins):
//! 1. Plugin - a connected plugin from a [`PluginHost`]
//! 2. Tuner - a value built from keyed settings in a [`TunerService`]
//! 3. UI mode - a supplier gated on the device [`UiModeType`]
//! 4. Default - an always-present supplier
//!
//! ```rust,ignore
//! use extkit_core::{ExtensionController, ExtensionServices, Context};
//!
//! let controller = ExtensionController::new(Context::new("com.example.ui"), services);
//! let clock = controller
//!     .new_extension::<ClockFace>()
//!     .with_plugin::<ClockFace>()
//!     .with_tuner(["clock_style"], |settings| settings.get("clock_style").map(ClockFace::named))
//!     .with_default(ClockFace::default)
//!     .with_callback(|face| redraw(face))
//!     .build();
//!
//! // later, when the owning view detaches
//! clock.destroy();
//! ```

pub mod error;
pub mod types;
pub mod logging;
pub mod plugins;
pub mod tuner;
pub mod configuration;
pub mod extension;

// Re-export commonly used types
pub use error::{ExtensionError, ExtensionResult};

pub use types::{
    Configuration, Context, UiModeType, UI_MODE_TYPE_MASK,
    PluginInstance, PluginInterface, PluginType,
};

pub use logging::{Logger, SharedLogger, LogLevel, NoOpLogger, ConsoleLogger, MemoryLogger};

pub use plugins::{PluginHost, PluginListener, LocalPluginHost};

pub use tuner::{
    Tunable, TunerService, TunerSettings, TunerFactory, FnTunerFactory,
    MemoryTunerService, FileTunerService, TunerFileFormat,
};

pub use configuration::{ConfigurationController, ConfigurationListener, LocalConfigurationController};

pub use extension::{
    Extension, ExtensionBuilder, ExtensionController, ExtensionServices, SortOrder,
};
