//! Plugin identity types

use std::any::{Any, TypeId};
use std::sync::Arc;

/// A plugin instance as delivered by a [`PluginHost`](crate::PluginHost)
///
/// Hosts are type-agnostic; listeners downcast to the type they registered for.
pub type PluginInstance = Arc<dyn Any + Send + Sync>;

/// A type that can be provided by a plugin
///
/// `ACTION` is the selector a host uses to route instances of this type.
pub trait PluginInterface: Any + Send + Sync {
    const ACTION: &'static str;
}

/// Runtime token for the concrete type a plugin listener accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PluginType {
    type_id: TypeId,
    type_name: &'static str,
}

impl PluginType {
    /// Token for `P`
    pub fn of<P: Any>() -> Self {
        Self {
            type_id: TypeId::of::<P>(),
            type_name: std::any::type_name::<P>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether `instance` is of this type
    pub fn matches(&self, instance: &PluginInstance) -> bool {
        (**instance).type_id() == self.type_id
    }
}
