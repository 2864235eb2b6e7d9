use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
};

use globaltrade_catalog::build_predicates;
use globaltrade_core::ProductId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

/// Marketplace listing page: filtered active listings plus the category and
/// country facets the filter form renders.
pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::ProductsQuery>,
) -> axum::response::Response {
    let criteria = params.into_criteria();
    let predicates = build_predicates(&criteria);

    let listings = match services.catalog.list_products(&predicates).await {
        Ok(listings) => listings,
        Err(err) => return errors::store_error_to_response(err),
    };

    let categories = match services.catalog.categories().await {
        Ok(categories) => categories,
        Err(err) => return errors::store_error_to_response(err),
    };

    let countries = match services.catalog.country_facet().await {
        Ok(countries) => countries,
        Err(err) => return errors::store_error_to_response(err),
    };

    let items: Vec<_> = listings.iter().map(dto::listing_to_json).collect();
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "items": items,
            "total": items.len(),
            "categories": categories.iter().map(|c| serde_json::json!({
                "id": c.id.to_string(),
                "name": c.name,
            })).collect::<Vec<_>>(),
            "countries": countries,
        })),
    )
        .into_response()
}

/// Product detail: only active listings are visible here.
pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id");
        }
    };

    match services.catalog.get_product(id).await {
        Ok(Some(listing)) if listing.product.is_active() => {
            (StatusCode::OK, Json(dto::listing_to_json(&listing))).into_response()
        }
        Ok(_) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "product not found"),
        Err(err) => errors::store_error_to_response(err),
    }
}
