//! Postgres-backed store (sqlx).
//!
//! Predicate lists are translated into one SQL statement over the joined
//! listing view. Translation must agree with `Predicate::matches`; the
//! in-memory store and the black-box tests pin the shared semantics.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow, Postgres};
use sqlx::{QueryBuilder, Row};
use uuid::Uuid;

use globaltrade_catalog::{
    Category, Predicate, Product, ProductListing, ProductStatus, SellerSummary,
};
use globaltrade_core::{ProductId, UserId};
use globaltrade_inquiries::{
    CounterpartySummary, Inquiry, InquiryDirection, InquiryStatus, InquiryView, ProductSummary,
};
use globaltrade_profiles::{Profile, UserType};
use globaltrade_tariffs::TariffRate;

use super::{CatalogStore, InquiryStore, ProfileStore, StoreError, TariffStore};

const LISTING_SELECT: &str = "\
SELECT p.id, p.seller_id, p.title, p.description, p.price, p.currency, \
       p.minimum_order_quantity, p.unit, p.origin_country, p.hs_code, \
       p.category_id, p.status, p.featured, p.created_at, \
       s.full_name AS seller_full_name, s.company_name AS seller_company_name, \
       s.country AS seller_country, s.verified AS seller_verified, \
       c.name AS category_name \
FROM products p \
LEFT JOIN profiles s ON s.id = p.seller_id \
LEFT JOIN categories c ON c.id = p.category_id";

/// Store over a Postgres pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(8)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Build the listing select with the predicate list appended as a WHERE
    /// clause and the newest-first ordering.
    fn listing_query(predicates: &[Predicate]) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(LISTING_SELECT);

        let mut sep = " WHERE ";
        for predicate in predicates {
            qb.push(sep);
            sep = " AND ";
            match predicate {
                Predicate::Status(status) => {
                    qb.push("p.status = ");
                    qb.push_bind(status.as_str());
                }
                Predicate::Text(q) => {
                    let pattern = like_pattern(q);
                    qb.push("(p.title ILIKE ");
                    qb.push_bind(pattern.clone());
                    qb.push(" OR p.description ILIKE ");
                    qb.push_bind(pattern.clone());
                    qb.push(" OR p.hs_code ILIKE ");
                    qb.push_bind(pattern);
                    qb.push(")");
                }
                Predicate::Category(id) => {
                    qb.push("p.category_id = ");
                    qb.push_bind(*id.as_uuid());
                }
                Predicate::Country(q) => {
                    let pattern = like_pattern(q);
                    qb.push("(p.origin_country ILIKE ");
                    qb.push_bind(pattern.clone());
                    qb.push(" OR s.country ILIKE ");
                    qb.push_bind(pattern);
                    qb.push(")");
                }
                Predicate::MinPrice(min) => {
                    qb.push("p.price >= ");
                    qb.push_bind(*min);
                }
                Predicate::MaxPrice(max) => {
                    qb.push("p.price <= ");
                    qb.push_bind(*max);
                }
                Predicate::VerifiedSeller => {
                    qb.push("s.verified = TRUE");
                }
                Predicate::Featured => {
                    qb.push("p.featured = TRUE");
                }
                Predicate::SuggestionText(q) => {
                    let pattern = like_pattern(q);
                    qb.push("(p.title ILIKE ");
                    qb.push_bind(pattern.clone());
                    qb.push(" OR p.hs_code ILIKE ");
                    qb.push_bind(pattern.clone());
                    qb.push(" OR s.company_name ILIKE ");
                    qb.push_bind(pattern);
                    qb.push(")");
                }
            }
        }

        qb.push(" ORDER BY p.created_at DESC");
        qb
    }
}

fn like_pattern(q: &str) -> String {
    format!("%{q}%")
}

// SQLx row types

#[derive(Debug)]
struct ListingRow {
    id: Uuid,
    seller_id: Uuid,
    title: String,
    description: Option<String>,
    price: Option<f64>,
    currency: String,
    minimum_order_quantity: Option<i32>,
    unit: Option<String>,
    origin_country: Option<String>,
    hs_code: Option<String>,
    category_id: Option<Uuid>,
    status: String,
    featured: bool,
    created_at: DateTime<Utc>,
    seller_full_name: Option<String>,
    seller_company_name: Option<String>,
    seller_country: Option<String>,
    // NULL when the seller profile join found no row.
    seller_verified: Option<bool>,
    category_name: Option<String>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for ListingRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ListingRow {
            id: row.try_get("id")?,
            seller_id: row.try_get("seller_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            currency: row.try_get("currency")?,
            minimum_order_quantity: row.try_get("minimum_order_quantity")?,
            unit: row.try_get("unit")?,
            origin_country: row.try_get("origin_country")?,
            hs_code: row.try_get("hs_code")?,
            category_id: row.try_get("category_id")?,
            status: row.try_get("status")?,
            featured: row.try_get("featured")?,
            created_at: row.try_get("created_at")?,
            seller_full_name: row.try_get("seller_full_name")?,
            seller_company_name: row.try_get("seller_company_name")?,
            seller_country: row.try_get("seller_country")?,
            seller_verified: row.try_get("seller_verified")?,
            category_name: row.try_get("category_name")?,
        })
    }
}

impl ListingRow {
    fn into_listing(self) -> Result<ProductListing, StoreError> {
        let status: ProductStatus = self
            .status
            .parse()
            .map_err(|e| StoreError::Decode(format!("products.status: {e}")))?;

        let seller = self.seller_verified.map(|verified| SellerSummary {
            full_name: self.seller_full_name,
            company_name: self.seller_company_name,
            country: self.seller_country,
            verified,
        });

        Ok(ProductListing {
            product: Product {
                id: ProductId::from_uuid(self.id),
                seller_id: UserId::from_uuid(self.seller_id),
                title: self.title,
                description: self.description,
                price: self.price,
                currency: self.currency,
                minimum_order_quantity: self.minimum_order_quantity,
                unit: self.unit,
                origin_country: self.origin_country,
                hs_code: self.hs_code,
                category_id: self.category_id.map(Into::into),
                status,
                featured: self.featured,
                created_at: self.created_at,
            },
            seller,
            category_name: self.category_name,
        })
    }
}

#[derive(Debug)]
struct ProductRow {
    id: Uuid,
    seller_id: Uuid,
    title: String,
    description: Option<String>,
    price: Option<f64>,
    currency: String,
    minimum_order_quantity: Option<i32>,
    unit: Option<String>,
    origin_country: Option<String>,
    hs_code: Option<String>,
    category_id: Option<Uuid>,
    status: String,
    featured: bool,
    created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for ProductRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            id: row.try_get("id")?,
            seller_id: row.try_get("seller_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            currency: row.try_get("currency")?,
            minimum_order_quantity: row.try_get("minimum_order_quantity")?,
            unit: row.try_get("unit")?,
            origin_country: row.try_get("origin_country")?,
            hs_code: row.try_get("hs_code")?,
            category_id: row.try_get("category_id")?,
            status: row.try_get("status")?,
            featured: row.try_get("featured")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl ProductRow {
    fn into_product(self) -> Result<Product, StoreError> {
        let status: ProductStatus = self
            .status
            .parse()
            .map_err(|e| StoreError::Decode(format!("products.status: {e}")))?;

        Ok(Product {
            id: ProductId::from_uuid(self.id),
            seller_id: UserId::from_uuid(self.seller_id),
            title: self.title,
            description: self.description,
            price: self.price,
            currency: self.currency,
            minimum_order_quantity: self.minimum_order_quantity,
            unit: self.unit,
            origin_country: self.origin_country,
            hs_code: self.hs_code,
            category_id: self.category_id.map(Into::into),
            status,
            featured: self.featured,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug)]
struct ProfileRow {
    id: Uuid,
    user_type: String,
    company_name: Option<String>,
    full_name: Option<String>,
    country: Option<String>,
    city: Option<String>,
    phone: Option<String>,
    website: Option<String>,
    description: Option<String>,
    verified: bool,
    created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for ProfileRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProfileRow {
            id: row.try_get("id")?,
            user_type: row.try_get("user_type")?,
            company_name: row.try_get("company_name")?,
            full_name: row.try_get("full_name")?,
            country: row.try_get("country")?,
            city: row.try_get("city")?,
            phone: row.try_get("phone")?,
            website: row.try_get("website")?,
            description: row.try_get("description")?,
            verified: row.try_get("verified")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl ProfileRow {
    fn into_profile(self) -> Result<Profile, StoreError> {
        let user_type: UserType = self
            .user_type
            .parse()
            .map_err(|e| StoreError::Decode(format!("profiles.user_type: {e}")))?;

        Ok(Profile {
            id: UserId::from_uuid(self.id),
            user_type,
            company_name: self.company_name,
            full_name: self.full_name,
            country: self.country,
            city: self.city,
            phone: self.phone,
            website: self.website,
            description: self.description,
            verified: self.verified,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug)]
struct InquiryViewRow {
    id: Uuid,
    product_id: Uuid,
    buyer_id: Uuid,
    seller_id: Uuid,
    message: String,
    quantity: Option<i32>,
    target_price: Option<f64>,
    currency: String,
    status: String,
    created_at: DateTime<Utc>,
    product_title: Option<String>,
    product_price: Option<f64>,
    product_currency: Option<String>,
    counterparty_company_name: Option<String>,
    counterparty_full_name: Option<String>,
    // NULL when the counterparty profile join found no row.
    counterparty_verified: Option<bool>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for InquiryViewRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(InquiryViewRow {
            id: row.try_get("id")?,
            product_id: row.try_get("product_id")?,
            buyer_id: row.try_get("buyer_id")?,
            seller_id: row.try_get("seller_id")?,
            message: row.try_get("message")?,
            quantity: row.try_get("quantity")?,
            target_price: row.try_get("target_price")?,
            currency: row.try_get("currency")?,
            status: row.try_get("status")?,
            created_at: row.try_get("created_at")?,
            product_title: row.try_get("product_title")?,
            product_price: row.try_get("product_price")?,
            product_currency: row.try_get("product_currency")?,
            counterparty_company_name: row.try_get("counterparty_company_name")?,
            counterparty_full_name: row.try_get("counterparty_full_name")?,
            counterparty_verified: row.try_get("counterparty_verified")?,
        })
    }
}

impl InquiryViewRow {
    fn into_view(self) -> Result<InquiryView, StoreError> {
        let status: InquiryStatus = self
            .status
            .parse()
            .map_err(|e| StoreError::Decode(format!("inquiries.status: {e}")))?;

        let product = self.product_title.map(|title| ProductSummary {
            title,
            price: self.product_price,
            currency: self.product_currency.unwrap_or_default(),
        });

        let counterparty = self.counterparty_verified.map(|verified| CounterpartySummary {
            company_name: self.counterparty_company_name,
            full_name: self.counterparty_full_name,
            verified,
        });

        Ok(InquiryView {
            inquiry: Inquiry {
                id: self.id.into(),
                product_id: self.product_id.into(),
                buyer_id: self.buyer_id.into(),
                seller_id: self.seller_id.into(),
                message: self.message,
                quantity: self.quantity,
                target_price: self.target_price,
                currency: self.currency,
                status,
                created_at: self.created_at,
            },
            product,
            counterparty,
        })
    }
}

#[derive(Debug)]
struct TariffRateRow {
    id: Uuid,
    hs_code: String,
    description: Option<String>,
    origin_country: String,
    destination_country: String,
    base_rate: f64,
    additional_duties: f64,
    last_updated: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for TariffRateRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(TariffRateRow {
            id: row.try_get("id")?,
            hs_code: row.try_get("hs_code")?,
            description: row.try_get("description")?,
            origin_country: row.try_get("origin_country")?,
            destination_country: row.try_get("destination_country")?,
            base_rate: row.try_get("base_rate")?,
            additional_duties: row.try_get("additional_duties")?,
            last_updated: row.try_get("last_updated")?,
        })
    }
}

impl From<TariffRateRow> for TariffRate {
    fn from(row: TariffRateRow) -> Self {
        TariffRate {
            id: row.id.into(),
            hs_code: row.hs_code,
            description: row.description,
            origin_country: row.origin_country,
            destination_country: row.destination_country,
            base_rate: row.base_rate,
            additional_duties: row.additional_duties,
            last_updated: row.last_updated,
        }
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn list_products(
        &self,
        predicates: &[Predicate],
    ) -> Result<Vec<ProductListing>, StoreError> {
        let mut qb = Self::listing_query(predicates);
        let rows: Vec<ListingRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(ListingRow::into_listing).collect()
    }

    async fn search_listings(
        &self,
        predicates: &[Predicate],
        limit: usize,
    ) -> Result<Vec<ProductListing>, StoreError> {
        let mut qb = Self::listing_query(predicates);
        qb.push(" LIMIT ");
        qb.push_bind(limit as i64);
        let rows: Vec<ListingRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(ListingRow::into_listing).collect()
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<ProductListing>, StoreError> {
        let sql = format!("{LISTING_SELECT} WHERE p.id = $1");
        let row: Option<ListingRow> = sqlx::query_as(&sql)
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.map(ListingRow::into_listing).transpose()
    }

    async fn insert_product(&self, product: Product) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO products \
             (id, seller_id, title, description, price, currency, \
              minimum_order_quantity, unit, origin_country, hs_code, \
              category_id, status, featured, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(*product.id.as_uuid())
        .bind(*product.seller_id.as_uuid())
        .bind(product.title)
        .bind(product.description)
        .bind(product.price)
        .bind(product.currency)
        .bind(product.minimum_order_quantity)
        .bind(product.unit)
        .bind(product.origin_country)
        .bind(product.hs_code)
        .bind(product.category_id.map(|id| *id.as_uuid()))
        .bind(product.status.as_str())
        .bind(product.featured)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn products_by_seller(&self, seller_id: UserId) -> Result<Vec<Product>, StoreError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            "SELECT id, seller_id, title, description, price, currency, \
             minimum_order_quantity, unit, origin_country, hs_code, \
             category_id, status, featured, created_at \
             FROM products WHERE seller_id = $1 ORDER BY created_at DESC",
        )
        .bind(*seller_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ProductRow::into_product).collect()
    }

    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        let rows: Vec<(Uuid, String)> =
            sqlx::query_as("SELECT id, name FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| Category {
                id: id.into(),
                name,
            })
            .collect())
    }

    async fn country_facet(&self) -> Result<Vec<String>, StoreError> {
        let rows: Vec<(Option<String>, Option<String>)> = sqlx::query_as(
            "SELECT p.origin_country, s.country \
             FROM products p \
             LEFT JOIN profiles s ON s.id = p.seller_id \
             WHERE p.status = 'active'",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(distinct_countries(rows))
    }
}

/// Sorted, deduplicated union of the two country columns, blanks dropped.
pub(crate) fn distinct_countries(rows: Vec<(Option<String>, Option<String>)>) -> Vec<String> {
    let mut set = std::collections::BTreeSet::new();
    for (origin, seller) in rows {
        for country in [origin, seller].into_iter().flatten() {
            if !country.trim().is_empty() {
                set.insert(country);
            }
        }
    }
    set.into_iter().collect()
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn profile(&self, id: UserId) -> Result<Option<Profile>, StoreError> {
        let row: Option<ProfileRow> = sqlx::query_as(
            "SELECT id, user_type, company_name, full_name, country, city, \
             phone, website, description, verified, created_at \
             FROM profiles WHERE id = $1",
        )
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        row.map(ProfileRow::into_profile).transpose()
    }

    async fn insert_profile(&self, profile: Profile) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO profiles \
             (id, user_type, company_name, full_name, country, city, \
              phone, website, description, verified, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(*profile.id.as_uuid())
        .bind(profile.user_type.as_str())
        .bind(profile.company_name)
        .bind(profile.full_name)
        .bind(profile.country)
        .bind(profile.city)
        .bind(profile.phone)
        .bind(profile.website)
        .bind(profile.description)
        .bind(profile.verified)
        .bind(profile.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl InquiryStore for PgStore {
    async fn insert_inquiry(&self, inquiry: Inquiry) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO inquiries \
             (id, product_id, buyer_id, seller_id, message, quantity, \
              target_price, currency, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(*inquiry.id.as_uuid())
        .bind(*inquiry.product_id.as_uuid())
        .bind(*inquiry.buyer_id.as_uuid())
        .bind(*inquiry.seller_id.as_uuid())
        .bind(inquiry.message)
        .bind(inquiry.quantity)
        .bind(inquiry.target_price)
        .bind(inquiry.currency)
        .bind(inquiry.status.as_str())
        .bind(inquiry.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn inquiries_for(
        &self,
        direction: InquiryDirection,
        limit: Option<usize>,
    ) -> Result<Vec<InquiryView>, StoreError> {
        // The counterparty profile join flips with the direction.
        let (user_id, filter_col, join_col) = match direction {
            InquiryDirection::SentBy(buyer) => (buyer, "buyer_id", "seller_id"),
            InquiryDirection::ReceivedBy(seller) => (seller, "seller_id", "buyer_id"),
        };

        let mut sql = format!(
            "SELECT i.id, i.product_id, i.buyer_id, i.seller_id, i.message, \
             i.quantity, i.target_price, i.currency, i.status, i.created_at, \
             p.title AS product_title, p.price AS product_price, \
             p.currency AS product_currency, \
             cp.company_name AS counterparty_company_name, \
             cp.full_name AS counterparty_full_name, \
             cp.verified AS counterparty_verified \
             FROM inquiries i \
             LEFT JOIN products p ON p.id = i.product_id \
             LEFT JOIN profiles cp ON cp.id = i.{join_col} \
             WHERE i.{filter_col} = $1 ORDER BY i.created_at DESC"
        );
        if limit.is_some() {
            sql.push_str(" LIMIT $2");
        }

        let mut query = sqlx::query_as::<_, InquiryViewRow>(&sql).bind(*user_id.as_uuid());
        if let Some(limit) = limit {
            query = query.bind(limit as i64);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(InquiryViewRow::into_view).collect()
    }
}

#[async_trait]
impl TariffStore for PgStore {
    async fn recent_rates(&self, limit: usize) -> Result<Vec<TariffRate>, StoreError> {
        let rows: Vec<TariffRateRow> = sqlx::query_as(
            "SELECT id, hs_code, description, origin_country, destination_country, \
             base_rate, additional_duties, last_updated \
             FROM tariffs ORDER BY last_updated DESC LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn country_pairs(&self) -> Result<(Vec<String>, Vec<String>), StoreError> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT origin_country, destination_country FROM tariffs")
                .fetch_all(&self.pool)
                .await?;

        let mut origins = std::collections::BTreeSet::new();
        let mut destinations = std::collections::BTreeSet::new();
        for (origin, destination) in rows {
            origins.insert(origin);
            destinations.insert(destination);
        }
        Ok((
            origins.into_iter().collect(),
            destinations.into_iter().collect(),
        ))
    }
}
