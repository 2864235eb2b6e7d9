use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
};

use globaltrade_tariffs::DutyInput;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// How many reference rows the overview shows.
const OVERVIEW_LIMIT: usize = 20;

/// Tariffs overview: the most recently updated reference rates plus the
/// country dropdown facets.
pub async fn overview(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let rates = match services.tariffs.recent_rates(OVERVIEW_LIMIT).await {
        Ok(rates) => rates,
        Err(err) => return errors::store_error_to_response(err),
    };

    let (origin_countries, destination_countries) = match services.tariffs.country_pairs().await {
        Ok(pairs) => pairs,
        Err(err) => return errors::store_error_to_response(err),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "rates": rates.iter().map(dto::tariff_rate_to_json).collect::<Vec<_>>(),
            "origin_countries": origin_countries,
            "destination_countries": destination_countries,
        })),
    )
        .into_response()
}

/// Import duty estimation. Total over all inputs: blank or malformed numbers
/// coerce to zero and nothing here errors.
pub async fn calculate(Json(body): Json<dto::DutyCalcRequest>) -> axum::response::Response {
    let input = DutyInput::from_form(
        &body.product_value,
        &body.tariff_rate,
        &body.additional_duties,
        &body.currency,
    );
    let breakdown = input.calculate();

    (StatusCode::OK, Json(dto::breakdown_to_json(&breakdown))).into_response()
}
