//! Application state shared across handlers.

use std::sync::Arc;

use crate::db::ShoppingStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// shopping store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn ShoppingStore>,
}

impl AppState {
    /// Create a new application state over a store backend.
    #[must_use]
    pub fn new(store: Arc<dyn ShoppingStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store }),
        }
    }

    /// Get a reference to the shopping store.
    #[must_use]
    pub fn store(&self) -> &dyn ShoppingStore {
        self.inner.store.as_ref()
    }
}
