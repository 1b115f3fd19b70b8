use std::sync::Arc;

use crate::store::{MemoryStore, RecordStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// State over a fresh in-memory store with the demo catalog.
    pub fn demo() -> Self {
        Self::new(Arc::new(MemoryStore::with_demo_data()))
    }
}
