//! Producer variants and their priority ranks

use std::sync::Arc;

use super::default_item::DefaultItem;
use super::plugin_item::PluginItem;
use super::tuner_item::TunerItem;
use super::ui_mode_item::UiModeItem;

/// Priority rank of a producer kind. Lower ranks win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SortOrder {
    Plugin = 0,
    Tuner = 1,
    UiMode = 2,
    Default = 3,
}

impl SortOrder {
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Plugin => "plugin",
            SortOrder::Tuner => "tuner",
            SortOrder::UiMode => "ui_mode",
            SortOrder::Default => "default",
        }
    }
}

/// One source of an extension's value
///
/// The set of kinds is closed; resolution only needs `get()` and the rank.
pub(crate) enum Producer<T> {
    Plugin(Arc<PluginItem<T>>),
    Tuner(Arc<TunerItem<T>>),
    UiMode(Arc<UiModeItem<T>>),
    Default(DefaultItem<T>),
}

impl<T: Clone + Send + Sync + 'static> Producer<T> {
    pub(crate) fn sort_order(&self) -> SortOrder {
        match self {
            Producer::Plugin(_) => SortOrder::Plugin,
            Producer::Tuner(_) => SortOrder::Tuner,
            Producer::UiMode(_) => SortOrder::UiMode,
            Producer::Default(_) => SortOrder::Default,
        }
    }

    /// Current value; reads held state only
    pub(crate) fn get(&self) -> Option<T> {
        match self {
            Producer::Plugin(item) => item.get(),
            Producer::Tuner(item) => item.get(),
            Producer::UiMode(item) => item.get(),
            Producer::Default(item) => Some(item.get()),
        }
    }

    /// Subscribe to the backing service
    pub(crate) fn attach(&self) {
        match self {
            Producer::Plugin(item) => item.attach(),
            Producer::Tuner(item) => item.attach(),
            Producer::UiMode(item) => item.attach(),
            Producer::Default(_) => {}
        }
    }

    /// Unsubscribe from the backing service; later calls do nothing
    pub(crate) fn destroy(&self) {
        match self {
            Producer::Plugin(item) => item.destroy(),
            Producer::Tuner(item) => item.destroy(),
            Producer::UiMode(item) => item.destroy(),
            Producer::Default(_) => {}
        }
    }
}

impl<T> std::fmt::Debug for Producer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Producer::Plugin(item) => f.debug_tuple("Plugin").field(&item.action()).finish(),
            Producer::Tuner(item) => f.debug_tuple("Tuner").field(&item.keys()).finish(),
            Producer::UiMode(item) => f.debug_tuple("UiMode").field(&item.desired()).finish(),
            Producer::Default(_) => f.write_str("Default"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_ranks() {
        assert_eq!(SortOrder::Plugin.rank(), 0);
        assert_eq!(SortOrder::Tuner.rank(), 1);
        assert_eq!(SortOrder::UiMode.rank(), 2);
        assert_eq!(SortOrder::Default.rank(), 3);
        assert!(SortOrder::Plugin < SortOrder::Default);
    }

    #[test]
    fn test_sort_is_stable_by_rank() {
        let mut orders = vec![
            (SortOrder::Default, "d1"),
            (SortOrder::Plugin, "p1"),
            (SortOrder::Default, "d2"),
            (SortOrder::Tuner, "t1"),
            (SortOrder::Plugin, "p2"),
        ];
        orders.sort_by_key(|(order, _)| *order);
        let names: Vec<_> = orders.iter().map(|(_, n)| *n).collect();
        assert_eq!(names, vec!["p1", "p2", "t1", "d1", "d2"]);
    }
}
