use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Redirect},
};
use chrono::Utc;

use globaltrade_catalog::{
    NewProduct, Predicate, ProductStatus, lenient_number, lenient_quantity,
};
use globaltrade_core::{CategoryId, ProductId};
use globaltrade_inquiries::InquiryDirection;

use crate::app::routes::common::require_profile;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::SessionContext;

const RECENT_INQUIRIES_LIMIT: usize = 5;
const RECOMMENDED_LIMIT: usize = 6;

/// Buyer dashboard. Sellers land on their own dashboard instead.
pub async fn buyer_dashboard(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    let profile = match require_profile(&services, session).await {
        Ok(profile) => profile,
        Err(response) => return response,
    };
    if profile.is_seller() {
        return Redirect::to("/dashboard/seller").into_response();
    }

    let recent_inquiries = match services
        .inquiries
        .inquiries_for(
            InquiryDirection::SentBy(profile.id),
            Some(RECENT_INQUIRIES_LIMIT),
        )
        .await
    {
        Ok(views) => views,
        Err(err) => return errors::store_error_to_response(err),
    };

    // Recommendations are simply featured active listings for now.
    let recommended = match services
        .catalog
        .search_listings(
            &[
                Predicate::Status(ProductStatus::Active),
                Predicate::Featured,
            ],
            RECOMMENDED_LIMIT,
        )
        .await
    {
        Ok(listings) => listings,
        Err(err) => return errors::store_error_to_response(err),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "profile": dto::profile_to_json(&profile),
            "recent_inquiries": recent_inquiries.iter()
                .map(dto::inquiry_view_to_json)
                .collect::<Vec<_>>(),
            "recommended_products": recommended.iter()
                .map(dto::listing_to_json)
                .collect::<Vec<_>>(),
        })),
    )
        .into_response()
}

/// Seller dashboard: own listings, recent incoming inquiries, counts.
pub async fn seller_dashboard(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    let profile = match require_profile(&services, session).await {
        Ok(profile) => profile,
        Err(response) => return response,
    };
    if !profile.is_seller() {
        return Redirect::to("/dashboard").into_response();
    }

    let products = match services.catalog.products_by_seller(profile.id).await {
        Ok(products) => products,
        Err(err) => return errors::store_error_to_response(err),
    };

    let inquiries = match services
        .inquiries
        .inquiries_for(
            InquiryDirection::ReceivedBy(profile.id),
            Some(RECENT_INQUIRIES_LIMIT),
        )
        .await
    {
        Ok(views) => views,
        Err(err) => return errors::store_error_to_response(err),
    };

    let active_products = products
        .iter()
        .filter(|p| p.status == ProductStatus::Active)
        .count();
    let draft_products = products
        .iter()
        .filter(|p| p.status == ProductStatus::Draft)
        .count();
    let pending_inquiries = inquiries
        .iter()
        .filter(|v| v.inquiry.status == globaltrade_inquiries::InquiryStatus::Pending)
        .count();

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "profile": dto::profile_to_json(&profile),
            "products": products.iter().map(dto::product_to_json).collect::<Vec<_>>(),
            "recent_inquiries": inquiries.iter()
                .map(dto::inquiry_view_to_json)
                .collect::<Vec<_>>(),
            "stats": {
                "active_products": active_products,
                "draft_products": draft_products,
                "pending_inquiries": pending_inquiries,
            },
        })),
    )
        .into_response()
}

/// A seller's own listings, all statuses, newest first.
pub async fn list_own_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    let profile = match require_profile(&services, session).await {
        Ok(profile) => profile,
        Err(response) => return response,
    };
    if !profile.is_seller() {
        return Redirect::to("/dashboard").into_response();
    }

    let products = match services.catalog.products_by_seller(profile.id).await {
        Ok(products) => products,
        Err(err) => return errors::store_error_to_response(err),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "items": products.iter().map(dto::product_to_json).collect::<Vec<_>>(),
        })),
    )
        .into_response()
}

/// Submit a new listing as draft or active.
pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Json(body): Json<dto::CreateProductRequest>,
) -> axum::response::Response {
    let profile = match require_profile(&services, session).await {
        Ok(profile) => profile,
        Err(response) => return response,
    };
    if !profile.is_seller() {
        return Redirect::to("/dashboard").into_response();
    }

    let status = match body.status.as_deref() {
        Some(raw) => match raw.parse::<ProductStatus>() {
            Ok(status) => status,
            Err(err) => return errors::domain_error_to_response(err),
        },
        None => ProductStatus::Draft,
    };

    let submission = NewProduct {
        seller_id: profile.id,
        title: body.title,
        description: body.description,
        price: lenient_number(body.price.as_deref()),
        currency: body.currency.unwrap_or_else(|| "USD".to_string()),
        minimum_order_quantity: lenient_quantity(body.minimum_order_quantity.as_deref()),
        unit: body.unit,
        origin_country: body.origin_country,
        hs_code: body.hs_code,
        category_id: body
            .category_id
            .as_deref()
            .and_then(|raw| raw.parse::<CategoryId>().ok()),
        featured: body.featured,
        status,
    };

    if let Err(err) = submission.validate() {
        return errors::domain_error_to_response(err);
    }

    let product = submission.into_product(ProductId::new(), Utc::now());
    let product_id = product.id;
    match services.catalog.insert_product(product).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "id": product_id.to_string() })),
        )
            .into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}
