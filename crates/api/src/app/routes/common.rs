use std::sync::Arc;

use globaltrade_profiles::Profile;

use crate::app::{errors, services::AppServices};
use crate::context::SessionContext;
use crate::middleware;

/// Load the session's profile, or produce the response that ends the request.
///
/// A session without a profile gets the same redirect-to-login treatment as a
/// missing session: signup was never completed.
pub async fn require_profile(
    services: &Arc<AppServices>,
    session: SessionContext,
) -> Result<Profile, axum::response::Response> {
    match services.profiles.profile(session.user_id()).await {
        Ok(Some(profile)) => Ok(profile),
        Ok(None) => Err(middleware::redirect_to_login()),
        Err(err) => Err(errors::store_error_to_response(err)),
    }
}
