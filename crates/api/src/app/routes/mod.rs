use axum::{
    Router,
    routing::{get, post},
};

pub mod common;
pub mod dashboard;
pub mod inquiries;
pub mod products;
pub mod profiles;
pub mod search;
pub mod system;
pub mod tariffs;

/// Routes that need no session.
pub fn public_router() -> Router {
    Router::new()
        .route("/products", get(products::list_products))
        .route("/products/:id", get(products::get_product))
        .route("/api/products/search", get(search::suggestions))
        .route("/tariffs", get(tariffs::overview))
        .route("/tariffs/calculator", post(tariffs::calculate))
}

/// Routes behind the session middleware.
pub fn gated_router() -> Router {
    Router::new()
        .route("/auth/signup", post(profiles::signup))
        .route("/dashboard", get(dashboard::buyer_dashboard))
        .route("/dashboard/seller", get(dashboard::seller_dashboard))
        .route(
            "/dashboard/products",
            get(dashboard::list_own_products).post(dashboard::create_product),
        )
        .route("/dashboard/inquiries", get(inquiries::list_inquiries))
        .route("/products/:id/inquiries", post(inquiries::create_inquiry))
}
