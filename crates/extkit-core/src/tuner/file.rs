//! File-backed tuner service (YAML or JSON)
//!
//! The file is a flat map of setting key to scalar value:
//!
//! ```yaml
//! sysui_nav_bar: "space,back;home;recent,space"
//! sysui_qs_tiles: wifi,cell,battery
//! network_traffic_autohide: true
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::memory::MemoryTunerService;
use super::traits::{Tunable, TunerService};
use crate::error::{ExtensionError, ExtensionResult};

/// Settings file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunerFileFormat {
    Yaml,
    Json,
}

impl TunerFileFormat {
    /// Pick the format from the file extension, defaulting to YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => TunerFileFormat::Json,
            _ => TunerFileFormat::Yaml,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TunerFileFormat::Yaml => "yaml",
            TunerFileFormat::Json => "json",
        }
    }
}

/// Tuner service whose values are loaded from a settings file
///
/// Values live in memory (see [`MemoryTunerService`]); `reload()` re-reads
/// the file and notifies tunables, `save()` writes the current values back.
///
/// # Example
///
/// ```no_run
/// use extkit_core::FileTunerService;
///
/// // ~/.config/extkit/tuner.yaml
/// let tuner = FileTunerService::user();
/// tuner.reload().unwrap();
/// ```
pub struct FileTunerService {
    path: PathBuf,
    format: TunerFileFormat,
    memory: MemoryTunerService,
}

impl FileTunerService {
    /// Create a file tuner for `path` without reading it yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = TunerFileFormat::from_path(&path);
        Self {
            path,
            format,
            memory: MemoryTunerService::new(),
        }
    }

    /// Create a file tuner and load its values
    pub fn open(path: impl Into<PathBuf>) -> ExtensionResult<Self> {
        let tuner = Self::new(path);
        tuner.reload()?;
        Ok(tuner)
    }

    /// User-level tuner file (~/.config/extkit/tuner.yaml)
    pub fn user() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        Self::new(config_dir.join("extkit").join("tuner.yaml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> TunerFileFormat {
        self.format
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Re-read the file and notify tunables for every key that was present
    /// before or after. A missing file counts as empty.
    ///
    /// Returns the number of keys notified. On a read or parse error the
    /// current values are left untouched.
    pub fn reload(&self) -> ExtensionResult<usize> {
        let values = self.load()?;
        Ok(self.memory.replace_all(values).len())
    }

    /// Write the current values to the file
    pub fn save(&self) -> ExtensionResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let values: BTreeMap<String, String> = self.memory.snapshot().into_iter().collect();
        let content = match self.format {
            TunerFileFormat::Yaml => serde_yaml::to_string(&values)
                .map_err(|e| ExtensionError::Parse(format!("Failed to serialize YAML: {}", e)))?,
            TunerFileFormat::Json => serde_json::to_string_pretty(&values)
                .map_err(|e| ExtensionError::Parse(format!("Failed to serialize JSON: {}", e)))?,
        };

        fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get_value(&self, key: &str) -> Option<String> {
        self.memory.get_value(key)
    }

    /// Write `key` in memory and notify its tunables (call `save()` to persist)
    pub fn set_value(&self, key: &str, value: impl Into<String>) {
        self.memory.set_value(key, value);
    }

    pub fn remove_value(&self, key: &str) {
        self.memory.remove_value(key);
    }

    fn load(&self) -> ExtensionResult<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }

        match self.format {
            TunerFileFormat::Yaml => {
                let raw: BTreeMap<String, serde_yaml::Value> = serde_yaml::from_str(&content)
                    .map_err(|e| ExtensionError::Parse(format!("Failed to parse YAML: {}", e)))?;
                let mut values = HashMap::new();
                for (key, value) in raw {
                    if let Some(value) = yaml_scalar(&key, value)? {
                        values.insert(key, value);
                    }
                }
                Ok(values)
            }
            TunerFileFormat::Json => {
                let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(&content)
                    .map_err(|e| ExtensionError::Parse(format!("Failed to parse JSON: {}", e)))?;
                let mut values = HashMap::new();
                for (key, value) in raw {
                    if let Some(value) = json_scalar(&key, value)? {
                        values.insert(key, value);
                    }
                }
                Ok(values)
            }
        }
    }
}

// Null means "not set"; nested values are rejected.
fn yaml_scalar(key: &str, value: serde_yaml::Value) -> ExtensionResult<Option<String>> {
    match value {
        serde_yaml::Value::Null => Ok(None),
        serde_yaml::Value::String(s) => Ok(Some(s)),
        serde_yaml::Value::Bool(b) => Ok(Some(b.to_string())),
        serde_yaml::Value::Number(n) => Ok(Some(n.to_string())),
        _ => Err(ExtensionError::Parse(format!("Setting '{}' must be a scalar value", key))),
    }
}

fn json_scalar(key: &str, value: serde_json::Value) -> ExtensionResult<Option<String>> {
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Bool(b) => Ok(Some(b.to_string())),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        _ => Err(ExtensionError::Parse(format!("Setting '{}' must be a scalar value", key))),
    }
}

impl TunerService for FileTunerService {
    fn add_tunable(&self, tunable: Arc<dyn Tunable>, keys: &[String]) -> ExtensionResult<()> {
        self.memory.add_tunable(tunable, keys)
    }

    fn remove_tunable(&self, tunable: &Arc<dyn Tunable>) -> ExtensionResult<()> {
        self.memory.remove_tunable(tunable)
    }
}

impl std::fmt::Debug for FileTunerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileTunerService")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("exists", &self.exists())
            .finish()
    }
}
