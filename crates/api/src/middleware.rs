use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;

use globaltrade_auth::JwtValidator;

use crate::context::SessionContext;

/// Where requests without a valid session are sent.
pub const LOGIN_PATH: &str = "/auth/login";

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Session middleware for gated routes.
///
/// A missing or invalid token redirects to the login view instead of failing
/// the request; on success the session context is inserted for handlers.
pub async fn session_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_bearer(req.headers()) else {
        return redirect_to_login();
    };

    match state.jwt.validate(token, Utc::now()) {
        Ok(claims) => {
            req.extensions_mut().insert(SessionContext::new(claims.sub));
            next.run(req).await
        }
        Err(err) => {
            tracing::debug!(error = %err, "rejected session token");
            redirect_to_login()
        }
    }
}

/// The redirect-if-absent contract: no session means the login view.
pub fn redirect_to_login() -> Response {
    Redirect::to(LOGIN_PATH).into_response()
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
