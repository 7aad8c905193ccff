use std::sync::Arc;

use crate::db::{ReviewStore, SharedStore};

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
}

impl AppState {
    pub fn new<S>(store: S) -> Self
    where
        S: ReviewStore + 'static,
    {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn from_shared(store: SharedStore) -> Self {
        Self { store }
    }
}
