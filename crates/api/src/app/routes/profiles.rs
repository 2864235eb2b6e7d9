use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use globaltrade_profiles::{NewProfile, UserType};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::SessionContext;

/// Signup: record the profile for the authenticated user. Credentials live
/// with the identity provider; the marketplace only stores the profile row.
/// One profile per user — a second signup is a conflict.
pub async fn signup(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Json(body): Json<dto::SignupRequest>,
) -> axum::response::Response {
    let user_type: UserType = match body.user_type.parse() {
        Ok(user_type) => user_type,
        Err(err) => return errors::domain_error_to_response(err),
    };

    let new_profile = NewProfile {
        user_id: session.user_id(),
        user_type,
        full_name: body.full_name,
        company_name: body.company_name,
        country: body.country,
    };

    if let Err(err) = new_profile.validate() {
        return errors::domain_error_to_response(err);
    }

    let profile = new_profile.into_profile(Utc::now());
    match services.profiles.insert_profile(profile.clone()).await {
        Ok(()) => (StatusCode::CREATED, Json(dto::profile_to_json(&profile))).into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}
