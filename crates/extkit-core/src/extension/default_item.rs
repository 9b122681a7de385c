//! Always-present fallback producer

/// Boxed value supplier
pub(crate) type Supplier<T> = Box<dyn Fn() -> T + Send + Sync>;

pub(crate) struct DefaultItem<T> {
    supplier: Supplier<T>,
}

impl<T> DefaultItem<T> {
    pub(crate) fn new(supplier: Supplier<T>) -> Self {
        Self { supplier }
    }

    /// Calls the supplier on every read
    pub(crate) fn get(&self) -> T {
        (self.supplier)()
    }
}
