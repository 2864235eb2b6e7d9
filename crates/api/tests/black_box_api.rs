use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use globaltrade_api::app::{self, services::AppServices};
use globaltrade_auth::SessionClaims;
use globaltrade_catalog::{Category, Product, ProductStatus};
use globaltrade_core::{CategoryId, ProductId, UserId};
use globaltrade_profiles::{NewProfile, Profile, UserType};
use globaltrade_store::MemoryStore;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::{StatusCode, redirect};
use serde_json::json;

struct TestServer {
    base_url: String,
    store: Arc<MemoryStore>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(jwt_secret: &str) -> Self {
        // Build the app (same router as prod) over a seedable in-memory store,
        // bound to an ephemeral port.
        let store = Arc::new(MemoryStore::new());
        let app = app::build_app(
            jwt_secret.to_string(),
            AppServices::from_memory(store.clone()),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            store,
            handle,
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(jwt_secret: &str, user_id: UserId) -> String {
    let now = Utc::now();
    let claims = SessionClaims {
        sub: user_id,
        issued_at: now,
        expires_at: now + ChronoDuration::minutes(10),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

/// Client that surfaces redirects instead of following them.
fn no_redirect_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .unwrap()
}

fn seller_profile(verified: bool) -> Profile {
    let mut profile = NewProfile {
        user_id: UserId::new(),
        user_type: UserType::Seller,
        full_name: Some("Mara Novak".to_string()),
        company_name: Some("Novak Industrial".to_string()),
        country: Some("Germany".to_string()),
    }
    .into_profile(Utc::now());
    profile.verified = verified;
    profile
}

fn active_product(seller_id: UserId, title: &str) -> Product {
    Product {
        id: ProductId::new(),
        seller_id,
        title: title.to_string(),
        description: Some("bulk lot".to_string()),
        price: Some(25.0),
        currency: "USD".to_string(),
        minimum_order_quantity: Some(100),
        unit: Some("piece".to_string()),
        origin_country: Some("Germany".to_string()),
        hs_code: Some("8482.10".to_string()),
        category_id: None,
        status: ProductStatus::Active,
        featured: false,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn gated_routes_redirect_to_login_without_a_session() {
    let srv = TestServer::spawn("test-secret").await;
    let client = no_redirect_client();

    for path in ["/dashboard", "/dashboard/inquiries", "/auth/signup"] {
        let res = if path == "/auth/signup" {
            client
                .post(format!("{}{}", srv.base_url, path))
                .json(&json!({"userType": "buyer"}))
                .send()
                .await
                .unwrap()
        } else {
            client
                .get(format!("{}{}", srv.base_url, path))
                .send()
                .await
                .unwrap()
        };

        assert_eq!(res.status(), StatusCode::SEE_OTHER, "path {path}");
        assert_eq!(res.headers()["location"], "/auth/login");
    }
}

#[tokio::test]
async fn invalid_token_also_redirects() {
    let srv = TestServer::spawn("test-secret").await;
    let client = no_redirect_client();

    let res = client
        .get(format!("{}/dashboard", srv.base_url))
        .bearer_auth("garbage")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn signup_then_dashboard_roundtrip() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let user_id = UserId::new();
    let token = mint_jwt(jwt_secret, user_id);
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/signup", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "userType": "buyer",
            "fullName": "Alex Chen",
            "country": "Singapore",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["user_type"], "buyer");
    assert_eq!(body["verified"], false);

    let res = client
        .get(format!("{}/dashboard", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["profile"]["id"], user_id.to_string());
    assert_eq!(body["profile"]["display_name"], "Alex Chen");

    // One profile per user: a second signup conflicts.
    let res = client
        .post(format!("{}/auth/signup", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({"userType": "seller", "companyName": "Chen Trading"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn signup_rejects_unknown_user_type_and_missing_names() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let token = mint_jwt(jwt_secret, UserId::new());
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/auth/signup", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({"userType": "admin", "fullName": "X"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(format!("{}/auth/signup", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({"userType": "buyer"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn seller_lists_a_product_and_it_appears_in_search() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();

    let seller_id = UserId::new();
    let token = mint_jwt(jwt_secret, seller_id);
    client
        .post(format!("{}/auth/signup", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({"userType": "seller", "companyName": "Chen Trading Co", "country": "China"}))
        .send()
        .await
        .unwrap();

    // Malformed numeric form fields degrade to absent, not an error.
    let res = client
        .post(format!("{}/dashboard/products", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Sealed ball bearings",
            "price": "1.25",
            "minimumOrderQuantity": "lots",
            "hsCode": "8482.10",
            "originCountry": "China",
            "status": "active",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .get(format!("{}/products?search=bearing", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["title"], "Sealed ball bearings");
    assert_eq!(body["items"][0]["minimum_order_quantity"], serde_json::Value::Null);
    assert_eq!(body["items"][0]["seller"]["company_name"], "Chen Trading Co");
    assert_eq!(body["countries"], json!(["China"]));
}

#[tokio::test]
async fn buyers_cannot_submit_listings() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = no_redirect_client();

    let token = mint_jwt(jwt_secret, UserId::new());
    client
        .post(format!("{}/auth/signup", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({"userType": "buyer", "fullName": "Alex Chen"}))
        .send()
        .await
        .unwrap();

    let res = client
        .post(format!("{}/dashboard/products", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({"title": "Not a seller", "status": "active"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()["location"], "/dashboard");
}

#[tokio::test]
async fn verified_filter_returns_only_verified_sellers() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let category = CategoryId::new();
    srv.store.add_category(Category {
        id: category,
        name: "Electronics".to_string(),
    });

    let trusted = seller_profile(true);
    let untrusted = seller_profile(false);
    let (trusted_id, untrusted_id) = (trusted.id, untrusted.id);
    srv.store.add_profile(trusted);
    srv.store.add_profile(untrusted);

    let mut verified_product = active_product(trusted_id, "Verified widget");
    verified_product.category_id = Some(category);
    let mut unverified_product = active_product(untrusted_id, "Unverified widget");
    unverified_product.category_id = Some(category);

    use globaltrade_store::CatalogStore;
    srv.store.insert_product(verified_product).await.unwrap();
    srv.store.insert_product(unverified_product).await.unwrap();

    let res = client
        .get(format!(
            "{}/products?category={}&verified=true",
            srv.base_url, category
        ))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();

    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["title"], "Verified widget");
}

#[tokio::test]
async fn draft_products_are_not_publicly_visible() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let seller = seller_profile(true);
    let seller_id = seller.id;
    srv.store.add_profile(seller);

    let mut draft = active_product(seller_id, "Unreleased");
    draft.status = ProductStatus::Draft;
    let draft_id = draft.id;

    use globaltrade_store::CatalogStore;
    srv.store.insert_product(draft).await.unwrap();

    let res = client
        .get(format!("{}/products/{}", srv.base_url, draft_id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/products", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn suggestion_endpoint_enforces_min_length_and_cap() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let seller = seller_profile(true);
    let seller_id = seller.id;
    srv.store.add_profile(seller);

    use globaltrade_store::CatalogStore;
    srv.store
        .insert_product(active_product(seller_id, "Bearings lot A"))
        .await
        .unwrap();
    srv.store
        .insert_product(active_product(seller_id, "Bearings lot B"))
        .await
        .unwrap();

    // Below the minimum query length: empty, no store involvement.
    let res = client
        .get(format!("{}/api/products/search?q=b", srv.base_url))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["suggestions"], json!([]));

    let res = client
        .get(format!(
            "{}/api/products/search?q=bearings&limit=2",
            srv.base_url
        ))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    let suggestions = body["suggestions"].as_array().unwrap();
    // Two titles fill the cap before any HS code or company name gets in.
    assert_eq!(suggestions.len(), 2);
    assert!(suggestions.iter().all(|s| {
        let s = s.as_str().unwrap();
        s == "Bearings lot A" || s == "Bearings lot B"
    }));
}

#[tokio::test]
async fn duty_calculator_endpoint_matches_the_worked_example() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/tariffs/calculator", srv.base_url))
        .json(&json!({
            "productValue": "10000",
            "tariffRate": "7.5",
            "additionalDuties": "0",
            "currency": "USD",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();

    assert_eq!(body["tariff_amount"], 750.0);
    assert_eq!(body["total_duties"], 750.0);
    assert_eq!(body["total_cost"], 10750.0);
    assert_eq!(body["effective_rate"], 7.5);
    assert_eq!(body["currency"], "USD");
}

#[tokio::test]
async fn duty_calculator_with_zero_value_does_not_error() {
    let srv = TestServer::spawn("test-secret").await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/tariffs/calculator", srv.base_url))
        .json(&json!({
            "productValue": "0",
            "tariffRate": "5",
            "additionalDuties": "2",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();

    assert_eq!(body["total_cost"], 0.0);
    // Undefined effective rate surfaces as null, never a failure.
    assert_eq!(body["effective_rate"], serde_json::Value::Null);
}

#[tokio::test]
async fn inquiry_flow_is_directional() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();

    let seller = seller_profile(true);
    let seller_id = seller.id;
    srv.store.add_profile(seller);

    let product = active_product(seller_id, "Bearings");
    let product_id = product.id;
    use globaltrade_store::CatalogStore;
    srv.store.insert_product(product).await.unwrap();

    let buyer_id = UserId::new();
    let buyer_token = mint_jwt(jwt_secret, buyer_id);
    client
        .post(format!("{}/auth/signup", srv.base_url))
        .bearer_auth(&buyer_token)
        .json(&json!({"userType": "buyer", "fullName": "Alex Chen"}))
        .send()
        .await
        .unwrap();

    let res = client
        .post(format!("{}/products/{}/inquiries", srv.base_url, product_id))
        .bearer_auth(&buyer_token)
        .json(&json!({
            "message": "What is the lead time for 5000 units?",
            "quantity": "5000",
            "targetPrice": "1.10",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    // Buyer sees the inquiry they sent, joined with the seller.
    let res = client
        .get(format!("{}/dashboard/inquiries", srv.base_url))
        .bearer_auth(&buyer_token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["status"], "pending");
    assert_eq!(items[0]["product"]["title"], "Bearings");
    assert_eq!(items[0]["counterparty"]["company_name"], "Novak Industrial");

    // Seller sees it as received, joined with the buyer.
    let seller_token = mint_jwt(jwt_secret, seller_id);
    let res = client
        .get(format!("{}/dashboard/inquiries", srv.base_url))
        .bearer_auth(&seller_token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = res.json().await.unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["counterparty"]["full_name"], "Alex Chen");

    // A blank message is rejected.
    let res = client
        .post(format!("{}/products/{}/inquiries", srv.base_url, product_id))
        .bearer_auth(&buyer_token)
        .json(&json!({"message": "   "}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn seller_dashboard_counts_products_and_inquiries() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = reqwest::Client::new();

    let seller_id = UserId::new();
    let token = mint_jwt(jwt_secret, seller_id);
    client
        .post(format!("{}/auth/signup", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({"userType": "seller", "companyName": "Novak Industrial"}))
        .send()
        .await
        .unwrap();

    for (title, status) in [("Live", "active"), ("WIP", "draft")] {
        client
            .post(format!("{}/dashboard/products", srv.base_url))
            .bearer_auth(&token)
            .json(&json!({"title": title, "status": status}))
            .send()
            .await
            .unwrap();
    }

    let res = client
        .get(format!("{}/dashboard/seller", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();

    assert_eq!(body["stats"]["active_products"], 1);
    assert_eq!(body["stats"]["draft_products"], 1);
    assert_eq!(body["products"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn buyer_dashboard_redirects_sellers() {
    let jwt_secret = "test-secret";
    let srv = TestServer::spawn(jwt_secret).await;
    let client = no_redirect_client();

    let token = mint_jwt(jwt_secret, UserId::new());
    client
        .post(format!("{}/auth/signup", srv.base_url))
        .bearer_auth(&token)
        .json(&json!({"userType": "seller", "companyName": "Novak Industrial"}))
        .send()
        .await
        .unwrap();

    let res = client
        .get(format!("{}/dashboard", srv.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()["location"], "/dashboard/seller");
}
