//! In-memory tuner service

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;

use super::traits::{Tunable, TunerService};
use crate::error::{ExtensionError, ExtensionResult};
use crate::types::same_listener;

struct TunableEntry {
    tunable: Arc<dyn Tunable>,
    keys: HashSet<String>,
}

/// In-memory keyed settings with change notification
///
/// Adding a tunable immediately delivers the current value (or `None`) of
/// every key it asked for. After that, every write notifies the tunables
/// listening on the written key, even if the value did not change.
///
/// # Example
///
/// ```
/// use extkit_core::MemoryTunerService;
///
/// let tuner = MemoryTunerService::new();
/// tuner.set_value("sysui_nav_bar", "space,back;home;recent,space");
/// assert_eq!(tuner.get_value("sysui_nav_bar").as_deref(), Some("space,back;home;recent,space"));
/// ```
#[derive(Default)]
pub struct MemoryTunerService {
    values: RwLock<HashMap<String, String>>,
    tunables: RwLock<Vec<TunableEntry>>,
}

impl MemoryTunerService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tuner service with initial values
    pub fn with_values(initial: HashMap<String, String>) -> Self {
        Self {
            values: RwLock::new(initial),
            tunables: RwLock::new(Vec::new()),
        }
    }

    pub fn get_value(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    /// Write `key` and notify its tunables
    pub fn set_value(&self, key: &str, value: impl Into<String>) {
        let value = value.into();
        self.values.write().insert(key.to_string(), value.clone());
        self.notify(key, Some(&value));
    }

    /// Clear `key` and notify its tunables with `None`
    pub fn remove_value(&self, key: &str) {
        self.values.write().remove(key);
        self.notify(key, None);
    }

    /// Copy of every stored value
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.values.read().clone()
    }

    /// Replace every stored value at once
    ///
    /// Tunables are notified for each key present before or after the
    /// replacement, in sorted key order. Returns the notified keys.
    pub fn replace_all(&self, values: HashMap<String, String>) -> Vec<String> {
        let keys: BTreeSet<String> = {
            let mut current = self.values.write();
            let keys = current.keys().chain(values.keys()).cloned().collect();
            *current = values;
            keys
        };

        for key in &keys {
            let value = self.get_value(key);
            self.notify(key, value.as_deref());
        }
        keys.into_iter().collect()
    }

    /// Number of registered tunables
    pub fn tunable_count(&self) -> usize {
        self.tunables.read().len()
    }

    fn notify(&self, key: &str, value: Option<&str>) {
        let targets: Vec<Arc<dyn Tunable>> = self
            .tunables
            .read()
            .iter()
            .filter(|entry| entry.keys.contains(key))
            .map(|entry| entry.tunable.clone())
            .collect();

        for tunable in targets {
            tunable.on_tuning_changed(key, value);
        }
    }
}

impl TunerService for MemoryTunerService {
    fn add_tunable(&self, tunable: Arc<dyn Tunable>, keys: &[String]) -> ExtensionResult<()> {
        self.tunables.write().push(TunableEntry {
            tunable: tunable.clone(),
            keys: keys.iter().cloned().collect(),
        });

        for key in keys {
            let value = self.get_value(key);
            tunable.on_tuning_changed(key, value.as_deref());
        }
        Ok(())
    }

    fn remove_tunable(&self, tunable: &Arc<dyn Tunable>) -> ExtensionResult<()> {
        let mut tunables = self.tunables.write();
        let before = tunables.len();
        tunables.retain(|entry| !same_listener(&entry.tunable, tunable));

        if tunables.len() == before {
            Err(ExtensionError::not_subscribed("tuner"))
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for MemoryTunerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTunerService")
            .field("values", &self.values.read().len())
            .field("tunables", &self.tunables.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingTunable {
        updates: Mutex<Vec<(String, Option<String>)>>,
    }

    impl Tunable for RecordingTunable {
        fn on_tuning_changed(&self, key: &str, new_value: Option<&str>) {
            self.updates.lock().push((key.to_string(), new_value.map(str::to_string)));
        }
    }

    fn keys(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_add_tunable_delivers_current_values() {
        let tuner = MemoryTunerService::new();
        tuner.set_value("a", "1");

        let recording = Arc::new(RecordingTunable::default());
        tuner.add_tunable(recording.clone(), &keys(&["a", "b"])).unwrap();

        assert_eq!(
            *recording.updates.lock(),
            vec![("a".to_string(), Some("1".to_string())), ("b".to_string(), None)]
        );
    }

    #[test]
    fn test_writes_notify_only_listening_tunables() {
        let tuner = MemoryTunerService::new();
        let recording = Arc::new(RecordingTunable::default());
        tuner.add_tunable(recording.clone(), &keys(&["a"])).unwrap();
        recording.updates.lock().clear();

        tuner.set_value("a", "1");
        tuner.set_value("a", "1");
        tuner.set_value("b", "2");
        tuner.remove_value("a");

        assert_eq!(
            *recording.updates.lock(),
            vec![
                ("a".to_string(), Some("1".to_string())),
                ("a".to_string(), Some("1".to_string())),
                ("a".to_string(), None),
            ]
        );
    }

    #[test]
    fn test_replace_all_notifies_old_and_new_keys() {
        let tuner = MemoryTunerService::new();
        tuner.set_value("old", "x");

        let recording = Arc::new(RecordingTunable::default());
        tuner.add_tunable(recording.clone(), &keys(&["old", "new"])).unwrap();
        recording.updates.lock().clear();

        let notified = tuner.replace_all(HashMap::from([("new".to_string(), "y".to_string())]));
        assert_eq!(notified, vec!["new".to_string(), "old".to_string()]);
        assert_eq!(
            *recording.updates.lock(),
            vec![("new".to_string(), Some("y".to_string())), ("old".to_string(), None)]
        );
    }

    #[test]
    fn test_remove_tunable() {
        let tuner = MemoryTunerService::new();
        let recording = Arc::new(RecordingTunable::default());
        let handle: Arc<dyn Tunable> = recording.clone();
        tuner.add_tunable(handle.clone(), &keys(&["a"])).unwrap();
        assert_eq!(tuner.tunable_count(), 1);

        tuner.remove_tunable(&handle).unwrap();
        assert_eq!(tuner.tunable_count(), 0);
        assert!(matches!(tuner.remove_tunable(&handle), Err(ExtensionError::NotSubscribed(_))));

        recording.updates.lock().clear();
        tuner.set_value("a", "1");
        assert!(recording.updates.lock().is_empty());
    }
}
