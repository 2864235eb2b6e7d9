//! In-memory store.
//!
//! Intended for tests/dev. Evaluates the same predicate lists the Postgres
//! store translates to SQL, via `Predicate::matches`, so filter semantics can
//! be pinned without a live database. Not optimized for performance.

use std::cmp::Reverse;
use std::sync::RwLock;

use async_trait::async_trait;

use globaltrade_catalog::{
    Category, Predicate, Product, ProductListing, ProductStatus, SellerSummary,
};
use globaltrade_core::{ProductId, UserId};
use globaltrade_inquiries::{
    CounterpartySummary, Inquiry, InquiryDirection, InquiryView, ProductSummary,
};
use globaltrade_profiles::Profile;
use globaltrade_tariffs::TariffRate;

use super::postgres::distinct_countries;
use super::{CatalogStore, InquiryStore, ProfileStore, StoreError, TariffStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    products: RwLock<Vec<Product>>,
    profiles: RwLock<Vec<Profile>>,
    categories: RwLock<Vec<Category>>,
    inquiries: RwLock<Vec<Inquiry>>,
    tariffs: RwLock<Vec<TariffRate>>,
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Database("lock poisoned".to_string())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a category row (reference data has no insert operation in scope).
    pub fn add_category(&self, category: Category) {
        if let Ok(mut categories) = self.categories.write() {
            categories.push(category);
        }
    }

    /// Seed a tariff reference row.
    pub fn add_tariff_rate(&self, rate: TariffRate) {
        if let Ok(mut tariffs) = self.tariffs.write() {
            tariffs.push(rate);
        }
    }

    /// Seed a profile directly, bypassing the signup conflict check. Lets
    /// tests create verified sellers.
    pub fn add_profile(&self, profile: Profile) {
        if let Ok(mut profiles) = self.profiles.write() {
            profiles.push(profile);
        }
    }

    fn assemble(&self, product: Product) -> Result<ProductListing, StoreError> {
        let profiles = self.profiles.read().map_err(poisoned)?;
        let categories = self.categories.read().map_err(poisoned)?;

        let seller = profiles
            .iter()
            .find(|p| p.id == product.seller_id)
            .map(|p| SellerSummary {
                full_name: p.full_name.clone(),
                company_name: p.company_name.clone(),
                country: p.country.clone(),
                verified: p.verified,
            });
        let category_name = product
            .category_id
            .and_then(|id| categories.iter().find(|c| c.id == id))
            .map(|c| c.name.clone());

        Ok(ProductListing {
            product,
            seller,
            category_name,
        })
    }

    fn matching_listings(&self, predicates: &[Predicate]) -> Result<Vec<ProductListing>, StoreError> {
        let products: Vec<Product> = self.products.read().map_err(poisoned)?.clone();

        let mut listings = Vec::with_capacity(products.len());
        for product in products {
            let listing = self.assemble(product)?;
            if predicates.iter().all(|p| p.matches(&listing)) {
                listings.push(listing);
            }
        }

        listings.sort_by_key(|l| Reverse(l.product.created_at));
        Ok(listings)
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_products(
        &self,
        predicates: &[Predicate],
    ) -> Result<Vec<ProductListing>, StoreError> {
        self.matching_listings(predicates)
    }

    async fn search_listings(
        &self,
        predicates: &[Predicate],
        limit: usize,
    ) -> Result<Vec<ProductListing>, StoreError> {
        let mut listings = self.matching_listings(predicates)?;
        listings.truncate(limit);
        Ok(listings)
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<ProductListing>, StoreError> {
        let product = self
            .products
            .read()
            .map_err(poisoned)?
            .iter()
            .find(|p| p.id == id)
            .cloned();
        product.map(|p| self.assemble(p)).transpose()
    }

    async fn insert_product(&self, product: Product) -> Result<(), StoreError> {
        self.products.write().map_err(poisoned)?.push(product);
        Ok(())
    }

    async fn products_by_seller(&self, seller_id: UserId) -> Result<Vec<Product>, StoreError> {
        let mut products: Vec<Product> = self
            .products
            .read()
            .map_err(poisoned)?
            .iter()
            .filter(|p| p.seller_id == seller_id)
            .cloned()
            .collect();
        products.sort_by_key(|p| Reverse(p.created_at));
        Ok(products)
    }

    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut categories = self.categories.read().map_err(poisoned)?.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn country_facet(&self) -> Result<Vec<String>, StoreError> {
        let rows: Vec<(Option<String>, Option<String>)> = self
            .matching_listings(&[Predicate::Status(ProductStatus::Active)])?
            .into_iter()
            .map(|l| {
                let seller_country = l.seller.and_then(|s| s.country);
                (l.product.origin_country, seller_country)
            })
            .collect();
        Ok(distinct_countries(rows))
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn profile(&self, id: UserId) -> Result<Option<Profile>, StoreError> {
        Ok(self
            .profiles
            .read()
            .map_err(poisoned)?
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn insert_profile(&self, profile: Profile) -> Result<(), StoreError> {
        let mut profiles = self.profiles.write().map_err(poisoned)?;
        if profiles.iter().any(|p| p.id == profile.id) {
            return Err(StoreError::Conflict(format!(
                "profile already exists for user {}",
                profile.id
            )));
        }
        profiles.push(profile);
        Ok(())
    }
}

#[async_trait]
impl InquiryStore for MemoryStore {
    async fn insert_inquiry(&self, inquiry: Inquiry) -> Result<(), StoreError> {
        self.inquiries.write().map_err(poisoned)?.push(inquiry);
        Ok(())
    }

    async fn inquiries_for(
        &self,
        direction: InquiryDirection,
        limit: Option<usize>,
    ) -> Result<Vec<InquiryView>, StoreError> {
        let mut inquiries: Vec<Inquiry> = self
            .inquiries
            .read()
            .map_err(poisoned)?
            .iter()
            .filter(|i| direction.includes(i))
            .cloned()
            .collect();
        inquiries.sort_by_key(|i| Reverse(i.created_at));
        if let Some(limit) = limit {
            inquiries.truncate(limit);
        }

        let products = self.products.read().map_err(poisoned)?;
        let profiles = self.profiles.read().map_err(poisoned)?;

        Ok(inquiries
            .into_iter()
            .map(|inquiry| {
                let product = products
                    .iter()
                    .find(|p| p.id == inquiry.product_id)
                    .map(|p| ProductSummary {
                        title: p.title.clone(),
                        price: p.price,
                        currency: p.currency.clone(),
                    });
                let counterparty_id = direction.counterparty_of(&inquiry);
                let counterparty = profiles
                    .iter()
                    .find(|p| p.id == counterparty_id)
                    .map(|p| CounterpartySummary {
                        company_name: p.company_name.clone(),
                        full_name: p.full_name.clone(),
                        verified: p.verified,
                    });
                InquiryView {
                    inquiry,
                    product,
                    counterparty,
                }
            })
            .collect())
    }
}

#[async_trait]
impl TariffStore for MemoryStore {
    async fn recent_rates(&self, limit: usize) -> Result<Vec<TariffRate>, StoreError> {
        let mut rates = self.tariffs.read().map_err(poisoned)?.clone();
        rates.sort_by_key(|r| Reverse(r.last_updated));
        rates.truncate(limit);
        Ok(rates)
    }

    async fn country_pairs(&self) -> Result<(Vec<String>, Vec<String>), StoreError> {
        let rates = self.tariffs.read().map_err(poisoned)?;
        let mut origins = std::collections::BTreeSet::new();
        let mut destinations = std::collections::BTreeSet::new();
        for rate in rates.iter() {
            origins.insert(rate.origin_country.clone());
            destinations.insert(rate.destination_country.clone());
        }
        Ok((
            origins.into_iter().collect(),
            destinations.into_iter().collect(),
        ))
    }
}
