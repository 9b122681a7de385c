//! Tuner service traits and the accumulated settings map

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::ExtensionResult;

/// Receives updates for the setting keys it was registered with
pub trait Tunable: Send + Sync {
    /// `key` changed to `new_value` (`None` when the setting was cleared)
    fn on_tuning_changed(&self, key: &str, new_value: Option<&str>);
}

/// Keyed string settings with change notification
///
/// Tunables are identified by their `Arc` allocation.
pub trait TunerService: Send + Sync {
    /// Start delivering changes for `keys` to `tunable`
    fn add_tunable(&self, tunable: Arc<dyn Tunable>, keys: &[String]) -> ExtensionResult<()>;

    /// Stop delivering changes to `tunable`
    fn remove_tunable(&self, tunable: &Arc<dyn Tunable>) -> ExtensionResult<()>;
}

/// Every setting a tunable has been told about so far
///
/// Updates only ever overwrite the key they are for. A key whose setting
/// was cleared stays in the map with no value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TunerSettings {
    values: BTreeMap<String, Option<String>>,
}

impl TunerSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of `key`, if it has one
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.as_deref())
    }

    /// Whether an update for `key` has been seen, with or without a value
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Record an update for `key`
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        self.values.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate keys in sorted order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TunerSettings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut settings = TunerSettings::new();
        for (k, v) in iter {
            settings.insert(k, Some(v.into()));
        }
        settings
    }
}

/// Builds an extension value from tuner settings
pub trait TunerFactory<T>: Send + Sync {
    /// Keys the factory depends on
    fn keys(&self) -> Vec<String>;

    /// Build the value for the current settings, or `None` to defer to
    /// lower-priority sources
    fn create(&self, settings: &TunerSettings) -> Option<T>;
}

/// [`TunerFactory`] made from a key list and a closure
pub struct FnTunerFactory<F> {
    keys: Vec<String>,
    create: F,
}

impl<F> FnTunerFactory<F> {
    pub fn new<I, S>(keys: I, create: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            create,
        }
    }
}

impl<T, F> TunerFactory<T> for FnTunerFactory<F>
where
    F: Fn(&TunerSettings) -> Option<T> + Send + Sync,
{
    fn keys(&self) -> Vec<String> {
        self.keys.clone()
    }

    fn create(&self, settings: &TunerSettings) -> Option<T> {
        (self.create)(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_overwrite_only_updated_key() {
        let mut settings = TunerSettings::new();
        settings.insert("a", Some("1".to_string()));
        settings.insert("b", Some("2".to_string()));
        settings.insert("a", Some("3".to_string()));

        assert_eq!(settings.get("a"), Some("3"));
        assert_eq!(settings.get("b"), Some("2"));
        assert_eq!(settings.len(), 2);
    }

    #[test]
    fn test_cleared_key_is_kept() {
        let mut settings = TunerSettings::new();
        settings.insert("icon_blacklist", None);
        assert!(settings.contains_key("icon_blacklist"));
        assert_eq!(settings.get("icon_blacklist"), None);
        assert!(!settings.contains_key("other"));
    }

    #[test]
    fn test_settings_from_iter() {
        let settings: TunerSettings = [("b", "2"), ("a", "1")].into_iter().collect();
        let keys: Vec<_> = settings.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_fn_tuner_factory() {
        let factory = FnTunerFactory::new(["clock_style"], |s: &TunerSettings| {
            s.get("clock_style").map(str::to_uppercase)
        });
        assert_eq!(TunerFactory::<String>::keys(&factory), vec!["clock_style".to_string()]);

        let settings: TunerSettings = [("clock_style", "bubble")].into_iter().collect();
        assert_eq!(TunerFactory::<String>::create(&factory, &settings), Some("BUBBLE".to_string()));
        assert_eq!(TunerFactory::<String>::create(&factory, &TunerSettings::new()), None);
    }
}
