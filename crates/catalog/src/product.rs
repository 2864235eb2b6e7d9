use chrono::{DateTime, Utc};
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use globaltrade_core::{CategoryId, DomainError, ProductId, UserId};

/// Listing status lifecycle.
///
/// Listings are never hard-deleted; taking one off the marketplace means
/// moving it to `Inactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Draft,
    Active,
    Inactive,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "draft",
            ProductStatus::Active => "active",
            ProductStatus::Inactive => "inactive",
        }
    }
}

impl core::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ProductStatus::Draft),
            "active" => Ok(ProductStatus::Active),
            "inactive" => Ok(ProductStatus::Inactive),
            other => Err(DomainError::validation(format!(
                "status must be one of: draft, active, inactive; got '{other}'"
            ))),
        }
    }
}

/// A seller's product record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub seller_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub currency: String,
    pub minimum_order_quantity: Option<i32>,
    pub unit: Option<String>,
    pub origin_country: Option<String>,
    pub hs_code: Option<String>,
    pub category_id: Option<CategoryId>,
    pub status: ProductStatus,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }
}

/// Listing submission payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub seller_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub currency: String,
    pub minimum_order_quantity: Option<i32>,
    pub unit: Option<String>,
    pub origin_country: Option<String>,
    pub hs_code: Option<String>,
    pub category_id: Option<CategoryId>,
    pub featured: bool,
    pub status: ProductStatus,
}

impl NewProduct {
    /// Validate a submission. Sellers submit listings as `draft` or `active`;
    /// `inactive` only exists for already-published listings taken down later.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }
        if self.status == ProductStatus::Inactive {
            return Err(DomainError::validation(
                "new listings must be submitted as draft or active",
            ));
        }
        Ok(())
    }

    /// Materialize the stored row.
    pub fn into_product(self, id: ProductId, created_at: DateTime<Utc>) -> Product {
        Product {
            id,
            seller_id: self.seller_id,
            title: self.title,
            description: self.description,
            price: self.price,
            currency: self.currency,
            minimum_order_quantity: self.minimum_order_quantity,
            unit: self.unit,
            origin_country: self.origin_country,
            hs_code: self.hs_code,
            category_id: self.category_id,
            status: self.status,
            featured: self.featured,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> NewProduct {
        NewProduct {
            seller_id: UserId::new(),
            title: "Industrial bearings".to_string(),
            description: Some("Sealed ball bearings, bulk packed".to_string()),
            price: Some(1.25),
            currency: "USD".to_string(),
            minimum_order_quantity: Some(5000),
            unit: Some("piece".to_string()),
            origin_country: Some("Germany".to_string()),
            hs_code: Some("8482.10".to_string()),
            category_id: Some(CategoryId::new()),
            featured: false,
            status: ProductStatus::Draft,
        }
    }

    #[test]
    fn submission_rejects_blank_title() {
        let mut s = submission();
        s.title = "  ".to_string();
        assert!(matches!(
            s.validate().unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[test]
    fn submission_rejects_inactive_status() {
        let mut s = submission();
        s.status = ProductStatus::Inactive;
        assert!(s.validate().is_err());

        s.status = ProductStatus::Active;
        assert!(s.validate().is_ok());
    }

    #[test]
    fn into_product_preserves_fields() {
        let s = submission();
        let id = ProductId::new();
        let now = Utc::now();
        let product = s.clone().into_product(id, now);

        assert_eq!(product.id, id);
        assert_eq!(product.seller_id, s.seller_id);
        assert_eq!(product.title, s.title);
        assert_eq!(product.price, s.price);
        assert_eq!(product.created_at, now);
        assert!(!product.is_active());
    }

    #[test]
    fn status_parses_lowercase_tokens() {
        assert_eq!(
            "active".parse::<ProductStatus>().unwrap(),
            ProductStatus::Active
        );
        assert!("published".parse::<ProductStatus>().is_err());
    }
}
