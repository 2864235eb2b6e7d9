//! `globaltrade-store` — persistence boundary.
//!
//! Store traits over the marketplace tables plus two implementations: a
//! Postgres store (sqlx) used in production and an in-memory store used by
//! tests and local development. Both execute the same predicate lists built by
//! `globaltrade-catalog`, so filter semantics can be verified without a live
//! database.

pub mod market_store;

pub use market_store::{
    CatalogStore, InquiryStore, MemoryStore, PgStore, ProfileStore, StoreError, TariffStore,
};
