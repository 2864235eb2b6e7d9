use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
};

use globaltrade_catalog::{SuggestionQuery, suggestions as collect_suggestions};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Suggestion endpoint behind the search box.
///
/// Queries below the minimum length answer with an empty list without touching
/// the store.
pub async fn suggestions(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::SuggestionParams>,
) -> axum::response::Response {
    let Some(query) = SuggestionQuery::parse(params.q.as_deref(), params.limit.as_deref()) else {
        return (
            StatusCode::OK,
            Json(serde_json::json!({ "suggestions": [] })),
        )
            .into_response();
    };

    let listings = match services
        .catalog
        .search_listings(&query.predicates(), query.limit)
        .await
    {
        Ok(listings) => listings,
        Err(err) => return errors::store_error_to_response(err),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "suggestions": collect_suggestions(&listings, query.limit),
        })),
    )
        .into_response()
}
