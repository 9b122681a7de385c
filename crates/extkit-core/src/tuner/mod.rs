//! Tuner (keyed settings) backends
//!
//! - `TunerService` / `Tunable` traits for plugging in a real settings store
//! - `MemoryTunerService`: in-memory values for embedding and tests
//! - `FileTunerService`: values loaded from a YAML or JSON file

mod traits;
mod memory;
mod file;

pub use traits::{Tunable, TunerService, TunerSettings, TunerFactory, FnTunerFactory};
pub use memory::MemoryTunerService;
pub use file::{FileTunerService, TunerFileFormat};
