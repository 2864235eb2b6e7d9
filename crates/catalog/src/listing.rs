use serde::{Deserialize, Serialize};

use crate::product::Product;

/// Seller fields joined onto a listing for display and filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerSummary {
    pub full_name: Option<String>,
    pub company_name: Option<String>,
    pub country: Option<String>,
    pub verified: bool,
}

/// A product row joined with its seller profile and category name.
///
/// The joins are optional by construction: a listing whose seller profile or
/// category row is missing still renders, it just carries no seller/category
/// detail. Predicates that touch joined fields treat a missing join as a
/// non-match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductListing {
    pub product: Product,
    pub seller: Option<SellerSummary>,
    pub category_name: Option<String>,
}
