//! Store wiring shared by all routes.

use std::sync::Arc;

use globaltrade_store::{
    CatalogStore, InquiryStore, MemoryStore, PgStore, ProfileStore, TariffStore,
};

/// Trait handles over the backing store.
///
/// One struct instead of one extension per trait keeps handler signatures
/// short; all four handles point at the same store instance in practice.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<dyn CatalogStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub inquiries: Arc<dyn InquiryStore>,
    pub tariffs: Arc<dyn TariffStore>,
}

impl AppServices {
    /// Fresh in-memory store (dev fallback and tests).
    pub fn in_memory() -> Self {
        Self::from_memory(Arc::new(MemoryStore::new()))
    }

    /// Wrap an existing in-memory store. Tests keep their own handle to seed
    /// rows directly.
    pub fn from_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            catalog: store.clone(),
            profiles: store.clone(),
            inquiries: store.clone(),
            tariffs: store,
        }
    }

    /// Postgres-backed services.
    pub fn postgres(store: PgStore) -> Self {
        let store = Arc::new(store);
        Self {
            catalog: store.clone(),
            profiles: store.clone(),
            inquiries: store.clone(),
            tariffs: store,
        }
    }
}
