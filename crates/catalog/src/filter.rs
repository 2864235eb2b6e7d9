//! Listing filters.
//!
//! Request filters become an ordered list of [`Predicate`]s before any store
//! is involved. Each predicate can be evaluated directly against a joined
//! [`ProductListing`] (used by the in-memory store and by tests) and has a SQL
//! translation in the Postgres store; the two must agree.

use serde::{Deserialize, Serialize};

use globaltrade_core::CategoryId;

use crate::listing::ProductListing;
use crate::product::ProductStatus;

/// Sentinel dropdown value meaning "no constraint".
pub const ALL_SENTINEL: &str = "all";

/// Optional filter criteria as they arrive from a listing-page request.
///
/// Price bounds stay raw strings here: malformed numbers degrade to "no
/// constraint" during predicate construction rather than failing the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search: Option<String>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub verified_only: bool,
    pub featured_only: bool,
}

/// One filter clause over the joined listing view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// Listing status equality. Always first in a built list.
    Status(ProductStatus),
    /// Case-insensitive substring match on title, description or HS code.
    Text(String),
    /// Category equality.
    Category(CategoryId),
    /// Case-insensitive substring match on the product's origin country or the
    /// seller's registered country.
    Country(String),
    /// Inclusive lower price bound. Listings without a price never match.
    MinPrice(f64),
    /// Inclusive upper price bound. Listings without a price never match.
    MaxPrice(f64),
    /// Seller profile must exist and be verified (post-join constraint).
    VerifiedSeller,
    /// Featured flag equality.
    Featured,
    /// Suggestion-lookup match: title, HS code or seller company name.
    SuggestionText(String),
}

impl Predicate {
    /// Evaluate this predicate against one joined listing.
    pub fn matches(&self, listing: &ProductListing) -> bool {
        let product = &listing.product;
        match self {
            Predicate::Status(status) => product.status == *status,
            Predicate::Text(q) => {
                contains_ci(&product.title, q)
                    || opt_contains_ci(product.description.as_deref(), q)
                    || opt_contains_ci(product.hs_code.as_deref(), q)
            }
            Predicate::Category(id) => product.category_id == Some(*id),
            Predicate::Country(q) => {
                opt_contains_ci(product.origin_country.as_deref(), q)
                    || opt_contains_ci(
                        listing.seller.as_ref().and_then(|s| s.country.as_deref()),
                        q,
                    )
            }
            Predicate::MinPrice(min) => product.price.is_some_and(|p| p >= *min),
            Predicate::MaxPrice(max) => product.price.is_some_and(|p| p <= *max),
            Predicate::VerifiedSeller => listing.seller.as_ref().is_some_and(|s| s.verified),
            Predicate::Featured => product.featured,
            Predicate::SuggestionText(q) => {
                contains_ci(&product.title, q)
                    || opt_contains_ci(product.hs_code.as_deref(), q)
                    || opt_contains_ci(
                        listing
                            .seller
                            .as_ref()
                            .and_then(|s| s.company_name.as_deref()),
                        q,
                    )
            }
        }
    }
}

/// Translate filter criteria into the ordered predicate list.
///
/// The active-status predicate is always present; everything else is added
/// only when its criterion is present and well-formed. Malformed price bounds
/// and category ids degrade to "no constraint".
pub fn build_predicates(criteria: &FilterCriteria) -> Vec<Predicate> {
    let mut predicates = vec![Predicate::Status(ProductStatus::Active)];

    if let Some(q) = non_empty(criteria.search.as_deref()) {
        predicates.push(Predicate::Text(q.to_string()));
    }

    if let Some(c) = non_empty(criteria.category.as_deref())
        && c != ALL_SENTINEL
        && let Ok(id) = c.parse::<CategoryId>()
    {
        predicates.push(Predicate::Category(id));
    }

    if let Some(c) = non_empty(criteria.country.as_deref())
        && c != ALL_SENTINEL
    {
        predicates.push(Predicate::Country(c.to_string()));
    }

    if let Some(min) = lenient_number(criteria.min_price.as_deref()) {
        predicates.push(Predicate::MinPrice(min));
    }
    if let Some(max) = lenient_number(criteria.max_price.as_deref()) {
        predicates.push(Predicate::MaxPrice(max));
    }

    if criteria.verified_only {
        predicates.push(Predicate::VerifiedSeller);
    }
    if criteria.featured_only {
        predicates.push(Predicate::Featured);
    }

    predicates
}

/// Lenient numeric parse used for price filters and form fields: blank or
/// malformed input means "absent", never an error.
pub fn lenient_number(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Lenient integer parse for quantity fields, same degradation rules.
pub fn lenient_quantity(raw: Option<&str>) -> Option<i32> {
    raw.and_then(|s| s.trim().parse::<i32>().ok())
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn opt_contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| contains_ci(h, needle))
}
