use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use globaltrade_catalog::{lenient_number, lenient_quantity};
use globaltrade_core::{InquiryId, ProductId};
use globaltrade_inquiries::{InquiryDirection, NewInquiry};

use crate::app::routes::common::require_profile;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::SessionContext;

/// Directional inquiry list: buyers see what they sent, sellers see what they
/// received, newest first.
pub async fn list_inquiries(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
) -> axum::response::Response {
    let profile = match require_profile(&services, session).await {
        Ok(profile) => profile,
        Err(response) => return response,
    };

    let direction = InquiryDirection::for_profile(&profile);
    match services.inquiries.inquiries_for(direction, None).await {
        Ok(views) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "items": views.iter().map(dto::inquiry_view_to_json).collect::<Vec<_>>(),
            })),
        )
            .into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}

/// Send an inquiry on an active product. The seller comes from the product
/// row, never from the request.
pub async fn create_inquiry(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::CreateInquiryRequest>,
) -> axum::response::Response {
    let profile = match require_profile(&services, session).await {
        Ok(profile) => profile,
        Err(response) => return response,
    };

    let product_id: ProductId = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id");
        }
    };

    let listing = match services.catalog.get_product(product_id).await {
        Ok(Some(listing)) if listing.product.is_active() => listing,
        Ok(_) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found");
        }
        Err(err) => return errors::store_error_to_response(err),
    };

    let submission = NewInquiry {
        product_id,
        buyer_id: profile.id,
        seller_id: listing.product.seller_id,
        message: body.message,
        quantity: lenient_quantity(body.quantity.as_deref()),
        target_price: lenient_number(body.target_price.as_deref()),
        currency: body
            .currency
            .unwrap_or_else(|| listing.product.currency.clone()),
    };

    if let Err(err) = submission.validate() {
        return errors::domain_error_to_response(err);
    }

    let inquiry = submission.into_inquiry(InquiryId::new(), Utc::now());
    let inquiry_id = inquiry.id;
    match services.inquiries.insert_inquiry(inquiry).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "id": inquiry_id.to_string() })),
        )
            .into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}
