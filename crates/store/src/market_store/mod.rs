//! Store traits for the marketplace tables.
//!
//! Traits are deliberately small and per-table-family so handlers depend only
//! on the access they use and tests can exercise them against the in-memory
//! implementation.

use async_trait::async_trait;
use thiserror::Error;

use globaltrade_catalog::{Category, Predicate, Product, ProductListing};
use globaltrade_core::{ProductId, UserId};
use globaltrade_inquiries::{Inquiry, InquiryDirection, InquiryView};
use globaltrade_profiles::Profile;
use globaltrade_tariffs::TariffRate;

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store-level failure. Propagated to the caller; never retried here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("row decode error: {0}")]
    Decode(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict(db.to_string())
            }
            _ => StoreError::Database(err.to_string()),
        }
    }
}

/// Product listings, categories and the search facets.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// All listings matching every predicate, newest first.
    async fn list_products(
        &self,
        predicates: &[Predicate],
    ) -> Result<Vec<ProductListing>, StoreError>;

    /// Matching listings capped at `limit`, for suggestion lookups.
    async fn search_listings(
        &self,
        predicates: &[Predicate],
        limit: usize,
    ) -> Result<Vec<ProductListing>, StoreError>;

    /// One listing by id, any status. Callers decide visibility.
    async fn get_product(&self, id: ProductId) -> Result<Option<ProductListing>, StoreError>;

    async fn insert_product(&self, product: Product) -> Result<(), StoreError>;

    /// A seller's own listings (all statuses), newest first.
    async fn products_by_seller(&self, seller_id: UserId) -> Result<Vec<Product>, StoreError>;

    /// All categories ordered by name.
    async fn categories(&self) -> Result<Vec<Category>, StoreError>;

    /// Distinct, sorted union of origin countries and seller countries over
    /// active listings.
    async fn country_facet(&self) -> Result<Vec<String>, StoreError>;
}

/// Profile rows, keyed by the authenticated user id.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn profile(&self, id: UserId) -> Result<Option<Profile>, StoreError>;

    /// Insert a signup row. A second insert for the same user id is a
    /// [`StoreError::Conflict`].
    async fn insert_profile(&self, profile: Profile) -> Result<(), StoreError>;
}

/// Inquiry rows with their display joins.
#[async_trait]
pub trait InquiryStore: Send + Sync {
    async fn insert_inquiry(&self, inquiry: Inquiry) -> Result<(), StoreError>;

    /// Inquiries on one side of the direction, newest first, joined with the
    /// product and the counterparty profile.
    async fn inquiries_for(
        &self,
        direction: InquiryDirection,
        limit: Option<usize>,
    ) -> Result<Vec<InquiryView>, StoreError>;
}

/// Tariff reference rows.
#[async_trait]
pub trait TariffStore: Send + Sync {
    /// Most recently updated rates first.
    async fn recent_rates(&self, limit: usize) -> Result<Vec<TariffRate>, StoreError>;

    /// Distinct, sorted origin and destination country lists.
    async fn country_pairs(&self) -> Result<(Vec<String>, Vec<String>), StoreError>;
}
