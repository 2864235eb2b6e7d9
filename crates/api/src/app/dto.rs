use serde::Deserialize;

use globaltrade_catalog::{FilterCriteria, Product, ProductListing};
use globaltrade_inquiries::InquiryView;
use globaltrade_profiles::Profile;
use globaltrade_tariffs::{DutyBreakdown, TariffRate, round2};

// -------------------------
// Request DTOs
// -------------------------

/// Listing-page query parameters. Numeric and boolean filters arrive as raw
/// strings and degrade leniently; the flag filters only engage on the literal
/// `"true"` the filter form submits.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub verified: Option<String>,
    pub featured: Option<String>,
}

impl ProductsQuery {
    pub fn into_criteria(self) -> FilterCriteria {
        FilterCriteria {
            search: self.search,
            category: self.category,
            country: self.country,
            min_price: self.min_price,
            max_price: self.max_price,
            verified_only: self.verified.as_deref() == Some("true"),
            featured_only: self.featured.as_deref() == Some("true"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SuggestionParams {
    pub q: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DutyCalcRequest {
    #[serde(default)]
    pub product_value: String,
    #[serde(default)]
    pub tariff_rate: String,
    #[serde(default)]
    pub additional_duties: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub user_type: String,
    pub full_name: Option<String>,
    pub company_name: Option<String>,
    pub country: Option<String>,
}

/// Listing submission. Numeric fields are form strings, parsed leniently.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub title: String,
    pub description: Option<String>,
    pub price: Option<String>,
    pub currency: Option<String>,
    pub minimum_order_quantity: Option<String>,
    pub unit: Option<String>,
    pub origin_country: Option<String>,
    pub hs_code: Option<String>,
    pub category_id: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInquiryRequest {
    pub message: String,
    pub quantity: Option<String>,
    pub target_price: Option<String>,
    pub currency: Option<String>,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn product_to_json(product: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": product.id.to_string(),
        "seller_id": product.seller_id.to_string(),
        "title": product.title,
        "description": product.description,
        "price": product.price,
        "currency": product.currency,
        "minimum_order_quantity": product.minimum_order_quantity,
        "unit": product.unit,
        "origin_country": product.origin_country,
        "hs_code": product.hs_code,
        "category_id": product.category_id.map(|id| id.to_string()),
        "status": product.status.as_str(),
        "featured": product.featured,
        "created_at": product.created_at.to_rfc3339(),
    })
}

pub fn listing_to_json(listing: &ProductListing) -> serde_json::Value {
    let mut value = product_to_json(&listing.product);
    value["seller"] = listing
        .seller
        .as_ref()
        .map(|s| {
            serde_json::json!({
                "full_name": s.full_name,
                "company_name": s.company_name,
                "country": s.country,
                "verified": s.verified,
            })
        })
        .unwrap_or(serde_json::Value::Null);
    value["category_name"] = serde_json::json!(listing.category_name);
    value
}

pub fn profile_to_json(profile: &Profile) -> serde_json::Value {
    serde_json::json!({
        "id": profile.id.to_string(),
        "user_type": profile.user_type.as_str(),
        "company_name": profile.company_name,
        "full_name": profile.full_name,
        "display_name": profile.display_name(),
        "country": profile.country,
        "city": profile.city,
        "phone": profile.phone,
        "website": profile.website,
        "description": profile.description,
        "verified": profile.verified,
        "created_at": profile.created_at.to_rfc3339(),
    })
}

pub fn inquiry_view_to_json(view: &InquiryView) -> serde_json::Value {
    serde_json::json!({
        "id": view.inquiry.id.to_string(),
        "product_id": view.inquiry.product_id.to_string(),
        "message": view.inquiry.message,
        "quantity": view.inquiry.quantity,
        "target_price": view.inquiry.target_price,
        "currency": view.inquiry.currency,
        "status": view.inquiry.status.as_str(),
        "created_at": view.inquiry.created_at.to_rfc3339(),
        "product": view.product.as_ref().map(|p| serde_json::json!({
            "title": p.title,
            "price": p.price,
            "currency": p.currency,
        })),
        "counterparty": view.counterparty.as_ref().map(|c| serde_json::json!({
            "company_name": c.company_name,
            "full_name": c.full_name,
            "verified": c.verified,
        })),
    })
}

pub fn tariff_rate_to_json(rate: &TariffRate) -> serde_json::Value {
    serde_json::json!({
        "id": rate.id.to_string(),
        "hs_code": rate.hs_code,
        "description": rate.description,
        "origin_country": rate.origin_country,
        "destination_country": rate.destination_country,
        "base_rate": rate.base_rate,
        "additional_duties": rate.additional_duties,
        "last_updated": rate.last_updated.to_rfc3339(),
    })
}

/// Presentation shape of a duty breakdown: two-decimal rounding, NaN effective
/// rate serialized as null.
pub fn breakdown_to_json(breakdown: &DutyBreakdown) -> serde_json::Value {
    let effective_rate = if breakdown.effective_rate.is_finite() {
        serde_json::json!(round2(breakdown.effective_rate))
    } else {
        serde_json::Value::Null
    };

    serde_json::json!({
        "product_value": round2(breakdown.product_value),
        "tariff_amount": round2(breakdown.tariff_amount),
        "additional_amount": round2(breakdown.additional_amount),
        "total_duties": round2(breakdown.total_duties),
        "total_cost": round2(breakdown.total_cost),
        "effective_rate": effective_rate,
        "currency": breakdown.currency,
    })
}
